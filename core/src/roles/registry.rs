//! Base permission definitions.
//!
//! Every permission has a global default per role kind plus an
//! availability predicate deciding at which accounts it exists at all.
//! Overrides layered on top of these defaults live in
//! [`super::resolver`].

use serde::{Deserialize, Serialize};

use super::types::Account;

/// Account-scoped permission.
///
/// Closed set: resolution, availability, and defaults all dispatch on
/// it exhaustively, so adding a permission is a compile-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    BecomeUser,
    ManageAccountSettings,
    ManageCourses,
    ManageGrades,
    ManageRoleOverrides,
    ManageStudents,
    ManageWiki,
    ModerateForum,
    PostToForum,
    ReadForum,
    ReadQuestionBanks,
    ReadReports,
    ReadRoster,
    SendMessages,
    SiteAdmin,
    ViewAllGrades,
    ViewStatistics,
}

/// Where a permission is allowed to appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Any account in the hierarchy.
    AnyAccount,
    /// Roles scoped to a root account only.
    RootOnly,
    /// Only the designated site-admin account.
    SiteAdminOnly,
}

/// Global defaults for one (permission, role kind) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionDefaults {
    pub enabled: bool,
    pub locked: bool,
    /// Read-only permissions report as locked and ignore overrides.
    pub readonly: bool,
}

impl Permission {
    /// Returns the wire name of the permission.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::BecomeUser => "become_user",
            Self::ManageAccountSettings => "manage_account_settings",
            Self::ManageCourses => "manage_courses",
            Self::ManageGrades => "manage_grades",
            Self::ManageRoleOverrides => "manage_role_overrides",
            Self::ManageStudents => "manage_students",
            Self::ManageWiki => "manage_wiki",
            Self::ModerateForum => "moderate_forum",
            Self::PostToForum => "post_to_forum",
            Self::ReadForum => "read_forum",
            Self::ReadQuestionBanks => "read_question_banks",
            Self::ReadReports => "read_reports",
            Self::ReadRoster => "read_roster",
            Self::SendMessages => "send_messages",
            Self::SiteAdmin => "site_admin",
            Self::ViewAllGrades => "view_all_grades",
            Self::ViewStatistics => "view_statistics",
        }
    }

    /// Parse a wire name; unknown names resolve to `None`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.key() == key)
    }

    /// Returns all permissions as a slice.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::BecomeUser,
            Self::ManageAccountSettings,
            Self::ManageCourses,
            Self::ManageGrades,
            Self::ManageRoleOverrides,
            Self::ManageStudents,
            Self::ManageWiki,
            Self::ModerateForum,
            Self::PostToForum,
            Self::ReadForum,
            Self::ReadQuestionBanks,
            Self::ReadReports,
            Self::ReadRoster,
            Self::SendMessages,
            Self::SiteAdmin,
            Self::ViewAllGrades,
            Self::ViewStatistics,
        ]
    }

    /// Returns a human-readable description of the permission.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::BecomeUser => "Act as another user",
            Self::ManageAccountSettings => "Manage account-level settings",
            Self::ManageCourses => "Create and manage courses",
            Self::ManageGrades => "Edit grades",
            Self::ManageRoleOverrides => "Manage permission overrides for roles",
            Self::ManageStudents => "Add and remove students",
            Self::ManageWiki => "Manage course wiki pages",
            Self::ModerateForum => "Moderate discussion forums",
            Self::PostToForum => "Post to discussion forums",
            Self::ReadForum => "Read discussion forums",
            Self::ReadQuestionBanks => "View and link to question banks",
            Self::ReadReports => "View usage reports",
            Self::ReadRoster => "See the list of users",
            Self::SendMessages => "Send messages to course members",
            Self::SiteAdmin => "Use site-admin tooling",
            Self::ViewAllGrades => "View all grades",
            Self::ViewStatistics => "View account statistics",
        }
    }

    /// Which accounts this permission exists at.
    #[must_use]
    pub const fn availability(self) -> Availability {
        match self {
            Self::BecomeUser => Availability::RootOnly,
            Self::SiteAdmin => Availability::SiteAdminOnly,
            _ => Availability::AnyAccount,
        }
    }

    /// Whether the availability predicate admits the given account.
    #[must_use]
    pub const fn available_at(self, account: &Account) -> bool {
        match self.availability() {
            Availability::AnyAccount => true,
            Availability::RootOnly => account.is_root(),
            Availability::SiteAdminOnly => account.site_admin,
        }
    }

    /// Global defaults for a role kind, before any overrides.
    #[must_use]
    pub fn defaults(self, kind: RoleKind) -> PermissionDefaults {
        let enabled = match kind {
            RoleKind::AccountAdmin => true,
            RoleKind::Teacher => matches!(
                self,
                Self::ManageGrades
                    | Self::ManageWiki
                    | Self::ModerateForum
                    | Self::PostToForum
                    | Self::ReadForum
                    | Self::ReadQuestionBanks
                    | Self::ReadReports
                    | Self::ReadRoster
                    | Self::SendMessages
                    | Self::ViewAllGrades
            ),
            RoleKind::Ta => matches!(
                self,
                Self::ModerateForum
                    | Self::PostToForum
                    | Self::ReadForum
                    | Self::ReadRoster
                    | Self::SendMessages
                    | Self::ViewAllGrades
            ),
            RoleKind::Student => matches!(
                self,
                Self::PostToForum | Self::ReadForum | Self::ReadRoster | Self::SendMessages
            ),
            RoleKind::Observer => matches!(self, Self::ReadForum),
            RoleKind::Designer => matches!(
                self,
                Self::ManageWiki | Self::ReadForum | Self::ReadRoster | Self::SendMessages
            ),
            RoleKind::Custom => false,
        };
        let readonly = matches!(self, Self::ReadForum) && kind.is_enrollment();
        PermissionDefaults {
            enabled,
            locked: false,
            readonly,
        }
    }
}

// ============================================================================
// Role Kinds
// ============================================================================

/// Classification a role resolves defaults against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    AccountAdmin,
    Teacher,
    Ta,
    Student,
    Observer,
    Designer,
    /// Account-created membership role; everything defaults off.
    Custom,
}

impl RoleKind {
    /// Whether this kind is a course enrollment type.
    #[must_use]
    pub const fn is_enrollment(self) -> bool {
        matches!(
            self,
            Self::Teacher | Self::Ta | Self::Student | Self::Observer | Self::Designer
        )
    }

    /// Built-in role names, present at every account.
    #[must_use]
    pub const fn built_in() -> &'static [(&'static str, Self)] {
        &[
            ("AccountAdmin", Self::AccountAdmin),
            ("TeacherEnrollment", Self::Teacher),
            ("TaEnrollment", Self::Ta),
            ("StudentEnrollment", Self::Student),
            ("ObserverEnrollment", Self::Observer),
            ("DesignerEnrollment", Self::Designer),
        ]
    }
}
