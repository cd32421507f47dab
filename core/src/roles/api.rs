//! Role API response types.
//!
//! Field names are the wire contract consumed by transport layers; keep
//! them stable.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use super::registry::Permission;
use super::resolver::EffectivePermission;
use super::types::{Account, Role};

/// Account summary embedded in role responses.
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub name: String,
    pub root_account_id: Option<Uuid>,
    pub parent_account_id: Option<Uuid>,
    pub id: Uuid,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            name: account.name.clone(),
            root_account_id: account.root_id,
            parent_account_id: account.parent_id,
            id: account.id,
        }
    }
}

/// One resolved permission as exposed on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct EffectivePermissionResponse {
    pub explicit: bool,
    pub readonly: bool,
    pub enabled: bool,
    pub locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_default: Option<bool>,
}

impl From<&EffectivePermission> for EffectivePermissionResponse {
    fn from(resolved: &EffectivePermission) -> Self {
        Self {
            explicit: resolved.explicit,
            readonly: resolved.readonly,
            enabled: resolved.enabled,
            locked: resolved.locked,
            prior_default: resolved.prior_default,
        }
    }
}

/// Full role response: the account context, the role name, and every
/// permission available at that account.
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub account: AccountResponse,
    pub role: String,
    pub permissions: BTreeMap<&'static str, EffectivePermissionResponse>,
}

impl RoleResponse {
    #[must_use]
    pub fn new(
        account: &Account,
        role: &Role,
        permissions: &BTreeMap<Permission, EffectivePermission>,
    ) -> Self {
        Self {
            account: account.into(),
            role: role.name.clone(),
            permissions: permissions
                .iter()
                .map(|(permission, resolved)| (permission.key(), resolved.into()))
                .collect(),
        }
    }
}
