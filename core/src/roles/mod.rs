//! Permission resolution engine.
//!
//! Accounts form a tree; roles carry per-permission defaults; stored
//! overrides layer on top along the root-to-target account chain, with
//! the override closest to the target winning. Restricted permissions
//! simply do not exist outside their scope.

pub mod api;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod service;
pub mod types;

pub use api::{AccountResponse, EffectivePermissionResponse, RoleResponse};
pub use error::RoleError;
pub use registry::{Availability, Permission, PermissionDefaults, RoleKind};
pub use resolver::{list_effective_permissions, resolve_permission, EffectivePermission};
pub use service::{RoleAuthority, RoleService};
pub use types::{
    Account, AddRolePayload, Directory, OverrideSetting, OverrideStore, Role, RoleOverride,
};
