//! Permission resolution logic.
//!
//! Computes the effective permission set for a role at an account by
//! folding stored overrides over the registry defaults, root-most
//! first, so the override closest to the target account wins.

use std::collections::BTreeMap;

use super::registry::Permission;
use super::types::{Account, OverrideStore, Role};

/// Resolved value of one permission for one role at one account.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectivePermission {
    pub permission: Permission,
    pub enabled: bool,
    pub locked: bool,
    pub readonly: bool,
    /// An override somewhere in the chain set `enabled`.
    pub explicit: bool,
    /// What `enabled` would have been absent the overrides; present
    /// only when an explicit override actually changed it.
    pub prior_default: Option<bool>,
}

/// Resolve one permission along an account chain (root first).
///
/// Each override may set `enabled` and `locked` independently; a field
/// left unset inherits whatever the fold has produced so far, not the
/// global default. Read-only permissions report as locked and ignore
/// overrides entirely.
#[must_use]
pub fn resolve_permission(
    chain: &[Account],
    role: &Role,
    permission: Permission,
    overrides: &OverrideStore,
) -> EffectivePermission {
    let defaults = permission.defaults(role.kind);
    let mut enabled = defaults.enabled;
    let mut locked = defaults.locked || defaults.readonly;
    let mut explicit = false;

    if !defaults.readonly {
        for account in chain {
            let Some(entry) = overrides.get(account.id, &role.name, permission) else {
                continue;
            };
            if let Some(value) = entry.enabled {
                enabled = value;
                explicit = true;
            }
            if let Some(value) = entry.locked {
                locked = value;
            }
        }
    }

    let prior_default = (explicit && enabled != defaults.enabled).then_some(defaults.enabled);

    EffectivePermission {
        permission,
        enabled,
        locked,
        readonly: defaults.readonly,
        explicit,
        prior_default,
    }
}

/// Resolve every permission available at the chain's target account.
///
/// Permissions whose availability predicate excludes the account are
/// omitted entirely, not returned as disabled.
#[must_use]
pub fn list_effective_permissions(
    chain: &[Account],
    role: &Role,
    overrides: &OverrideStore,
) -> BTreeMap<Permission, EffectivePermission> {
    let Some(target) = chain.last() else {
        return BTreeMap::new();
    };
    Permission::all()
        .iter()
        .filter(|permission| permission.available_at(target))
        .map(|permission| {
            (
                *permission,
                resolve_permission(chain, role, *permission, overrides),
            )
        })
        .collect()
}
