//! Role management service.
//!
//! Applies the write-side rules: who may touch roles at an account,
//! which submitted overrides are worth persisting, and which are
//! silently dropped because the permission does not exist at that
//! scope. Identity itself (who the actor is) stays with the caller.

use std::collections::HashMap;

use dashmap::DashMap;
use uuid::Uuid;
use validator::Validate;

use super::api::RoleResponse;
use super::error::RoleError;
use super::registry::{Permission, RoleKind};
use super::resolver::list_effective_permissions;
use super::types::{
    Account, AddRolePayload, Directory, OverrideSetting, OverrideStore, Role, RoleOverride,
};

/// Answers whether an actor may manage roles at an account.
///
/// This is the scope seam only; session handling and identity live in
/// outer layers.
pub trait RoleAuthority {
    fn can_manage_roles(&self, actor: Uuid, account: &Account) -> bool;
}

/// Role and override management over an account directory.
#[derive(Debug)]
pub struct RoleService<A> {
    directory: Directory,
    overrides: OverrideStore,
    /// Custom roles keyed by (owning account, name).
    custom_roles: DashMap<(Uuid, String), Role>,
    authority: A,
}

impl<A: RoleAuthority> RoleService<A> {
    #[must_use]
    pub fn new(directory: Directory, authority: A) -> Self {
        Self {
            directory,
            overrides: OverrideStore::new(),
            custom_roles: DashMap::new(),
            authority,
        }
    }

    #[must_use]
    pub const fn directory(&self) -> &Directory {
        &self.directory
    }

    #[must_use]
    pub const fn overrides(&self) -> &OverrideStore {
        &self.overrides
    }

    /// Create a custom role at an account, optionally seeding permission
    /// overrides in the same request.
    #[tracing::instrument(skip(self, payload))]
    pub fn add_role(
        &self,
        actor: Uuid,
        account_id: Uuid,
        payload: &AddRolePayload,
    ) -> Result<RoleResponse, RoleError> {
        let account = self.directory.get(account_id)?;
        if !self.authority.can_manage_roles(actor, &account) {
            return Err(RoleError::Unauthorized);
        }

        let Some(name) = payload.role.as_deref() else {
            return Err(RoleError::MissingParameter("role"));
        };
        payload
            .validate()
            .map_err(|e| RoleError::Validation(e.to_string()))?;

        let chain = self.directory.chain(account_id)?;
        if self.find_role(&chain, name).is_some() {
            return Err(RoleError::DuplicateRole);
        }

        let role = Role {
            name: name.to_string(),
            kind: RoleKind::Custom,
            account_id: Some(account_id),
        };
        self.custom_roles
            .insert((account_id, role.name.clone()), role.clone());
        tracing::debug!(role = %role.name, account = %account.name, "custom role created");

        self.apply_settings(&account, &role, &payload.permissions);
        Ok(self.respond(&account, &chain, &role))
    }

    /// Update permission overrides for an existing role at an account.
    #[tracing::instrument(skip(self, permissions))]
    pub fn update_overrides(
        &self,
        actor: Uuid,
        account_id: Uuid,
        role_name: &str,
        permissions: &HashMap<String, OverrideSetting>,
    ) -> Result<RoleResponse, RoleError> {
        let account = self.directory.get(account_id)?;
        if !self.authority.can_manage_roles(actor, &account) {
            return Err(RoleError::Unauthorized);
        }

        let chain = self.directory.chain(account_id)?;
        let role = self
            .find_role(&chain, role_name)
            .ok_or(RoleError::RoleNotFound)?;

        self.apply_settings(&account, &role, permissions);
        Ok(self.respond(&account, &chain, &role))
    }

    /// Effective permissions for a role at an account, read-only.
    pub fn effective_permissions(
        &self,
        account_id: Uuid,
        role_name: &str,
    ) -> Result<RoleResponse, RoleError> {
        let account = self.directory.get(account_id)?;
        let chain = self.directory.chain(account_id)?;
        let role = self
            .find_role(&chain, role_name)
            .ok_or(RoleError::RoleNotFound)?;
        Ok(self.respond(&account, &chain, &role))
    }

    /// Resolve a role name visible at the target account: built-ins
    /// everywhere, custom roles anywhere on the chain to the root.
    fn find_role(&self, chain: &[Account], name: &str) -> Option<Role> {
        if let Some((role_name, kind)) = RoleKind::built_in()
            .iter()
            .find(|(role_name, _)| *role_name == name)
        {
            return Some(Role {
                name: (*role_name).to_string(),
                kind: *kind,
                account_id: None,
            });
        }
        chain.iter().rev().find_map(|account| {
            self.custom_roles
                .get(&(account.id, name.to_string()))
                .map(|r| r.clone())
        })
    }

    /// Apply a batch of submitted settings for one role at one account.
    ///
    /// An override row is persisted only when it would change anything:
    /// `enabled` requires an accompanying `explicit=true`, and `locked`
    /// is stored only when submitted as true. Permissions unavailable at
    /// the account, read-only permissions, and unknown names are dropped
    /// without failing the batch.
    fn apply_settings(
        &self,
        account: &Account,
        role: &Role,
        settings: &HashMap<String, OverrideSetting>,
    ) {
        for (key, setting) in settings {
            let Some(permission) = Permission::from_key(key) else {
                tracing::debug!(permission = %key, "ignoring unknown permission");
                continue;
            };
            if !permission.available_at(account) {
                tracing::debug!(
                    permission = %key,
                    account = %account.name,
                    "dropping permission unavailable at this account"
                );
                continue;
            }
            if permission.defaults(role.kind).readonly {
                tracing::debug!(permission = %key, "dropping override for read-only permission");
                continue;
            }

            let enabled = if setting.explicit == Some(true) {
                setting.enabled
            } else {
                None
            };
            let locked = if setting.locked == Some(true) {
                Some(true)
            } else {
                None
            };
            if enabled.is_none() && locked.is_none() {
                continue;
            }

            self.overrides.upsert(RoleOverride {
                account_id: account.id,
                role: role.name.clone(),
                permission,
                enabled,
                locked,
            });
        }
    }

    fn respond(&self, account: &Account, chain: &[Account], role: &Role) -> RoleResponse {
        let permissions = list_effective_permissions(chain, role, &self.overrides);
        RoleResponse::new(account, role, &permissions)
    }
}
