//! Account and Role Type Definitions

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

use super::error::RoleError;
use super::registry::{Permission, RoleKind};

// ============================================================================
// Accounts
// ============================================================================

/// Node in the account tree. Root accounts have no parent and no root
/// reference; sub-accounts carry both.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub root_id: Option<Uuid>,
    /// Designated site-admin account; unlocks site-admin-scoped
    /// permissions.
    pub site_admin: bool,
}

impl Account {
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Registry of accounts with parent links.
#[derive(Debug, Default)]
pub struct Directory {
    accounts: DashMap<Uuid, Account>,
}

impl Directory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a root account.
    pub fn create_root(&self, name: impl Into<String>) -> Account {
        self.insert(name.into(), None, false)
    }

    /// Create the designated site-admin account (a root account).
    pub fn create_site_admin(&self, name: impl Into<String>) -> Account {
        self.insert(name.into(), None, true)
    }

    /// Create a sub-account under an existing parent.
    pub fn create_sub_account(
        &self,
        parent_id: Uuid,
        name: impl Into<String>,
    ) -> Result<Account, RoleError> {
        let parent = self.get(parent_id)?;
        let root_id = parent.root_id.unwrap_or(parent.id);
        let account = Account {
            id: Uuid::now_v7(),
            name: name.into(),
            parent_id: Some(parent.id),
            root_id: Some(root_id),
            site_admin: false,
        };
        self.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    /// Look up an account by id.
    pub fn get(&self, account_id: Uuid) -> Result<Account, RoleError> {
        self.accounts
            .get(&account_id)
            .map(|a| a.clone())
            .ok_or(RoleError::AccountNotFound)
    }

    /// Ordered account chain from the root down to the target.
    ///
    /// Built by walking parent links upward and reversing, so override
    /// resolution can fold root-most first.
    pub fn chain(&self, account_id: Uuid) -> Result<Vec<Account>, RoleError> {
        let mut chain = Vec::new();
        let mut visited = std::collections::HashSet::new();
        let mut cursor = Some(account_id);
        while let Some(id) = cursor {
            if !visited.insert(id) {
                return Err(RoleError::BrokenHierarchy);
            }
            let account = self.get(id)?;
            cursor = account.parent_id;
            chain.push(account);
        }
        chain.reverse();
        Ok(chain)
    }

    fn insert(&self, name: String, parent_id: Option<Uuid>, site_admin: bool) -> Account {
        let account = Account {
            id: Uuid::now_v7(),
            name,
            parent_id,
            root_id: None,
            site_admin,
        };
        self.accounts.insert(account.id, account.clone());
        account
    }
}

// ============================================================================
// Roles
// ============================================================================

/// Named permission-set identity. Built-in roles exist everywhere;
/// custom roles belong to the account subtree they were created in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
    pub name: String,
    pub kind: RoleKind,
    /// Owning account for custom roles; `None` for built-ins.
    pub account_id: Option<Uuid>,
}

// ============================================================================
// Overrides
// ============================================================================

/// A stored permission override: only the parts the client actually
/// submitted, nothing defaulted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleOverride {
    pub account_id: Uuid,
    pub role: String,
    pub permission: Permission,
    pub enabled: Option<bool>,
    pub locked: Option<bool>,
}

/// Concurrent override store, replace-by-key on
/// (account, role, permission).
#[derive(Debug, Default)]
pub struct OverrideStore {
    entries: DashMap<(Uuid, String, Permission), RoleOverride>,
}

impl OverrideStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the override for its key.
    pub fn upsert(&self, entry: RoleOverride) {
        self.entries.insert(
            (entry.account_id, entry.role.clone(), entry.permission),
            entry,
        );
    }

    /// Look up the override stored for (account, role, permission).
    #[must_use]
    pub fn get(&self, account_id: Uuid, role: &str, permission: Permission) -> Option<RoleOverride> {
        self.entries
            .get(&(account_id, role.to_string(), permission))
            .map(|e| e.clone())
    }

    /// Number of stored overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Request Types
// ============================================================================

/// One client-submitted permission setting, all parts optional.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OverrideSetting {
    pub explicit: Option<bool>,
    pub enabled: Option<bool>,
    pub locked: Option<bool>,
}

/// Request to create a role with an initial batch of permission
/// settings, keyed by permission wire name.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AddRolePayload {
    #[validate(length(min = 1, max = 64, message = "Role name must be 1-64 characters"))]
    pub role: Option<String>,
    #[serde(default)]
    pub permissions: HashMap<String, OverrideSetting>,
}

impl AddRolePayload {
    #[must_use]
    pub fn named(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            permissions: HashMap::new(),
        }
    }

    /// Builder: add a permission setting.
    #[must_use]
    pub fn with_setting(mut self, permission: &str, setting: OverrideSetting) -> Self {
        self.permissions.insert(permission.to_string(), setting);
        self
    }
}
