//! Module API response types.
//!
//! Field names are the wire contract consumed by transport layers; keep
//! them stable.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::types::{
    CompletionRequirement, ContentType, Module, ModuleItem, ModuleProgress, ProgressState,
};

// ============================================================================
// Link Building
// ============================================================================

/// Builds user-facing and API URLs for module items from the configured
/// public base URL.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base_url: String,
}

impl LinkBuilder {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Browser-facing URL for an item; sub-headers have none, external
    /// URLs route through the view-recording redirect endpoint.
    #[must_use]
    pub fn item_html_url(&self, course_id: Uuid, item: &ModuleItem) -> Option<String> {
        match item.content_type {
            ContentType::SubHeader => None,
            ContentType::ExternalUrl => Some(format!(
                "{}/api/v1/courses/{}/module_item_redirect/{}",
                self.base_url, course_id, item.id
            )),
            _ => Some(format!(
                "{}/courses/{}/modules/items/{}",
                self.base_url, course_id, item.id
            )),
        }
    }

    /// API URL of the referenced content, for types that expose one.
    #[must_use]
    pub fn item_api_url(&self, course_id: Uuid, item: &ModuleItem) -> Option<String> {
        match item.content_type {
            ContentType::Assignment => item.content_id.map(|content_id| {
                format!(
                    "{}/api/v1/courses/{}/assignments/{}",
                    self.base_url, course_id, content_id
                )
            }),
            ContentType::Discussion => item.content_id.map(|content_id| {
                format!(
                    "{}/api/v1/courses/{}/discussion_topics/{}",
                    self.base_url, course_id, content_id
                )
            }),
            ContentType::Page => item.page_slug.as_ref().map(|slug| {
                format!(
                    "{}/api/v1/courses/{}/pages/{}",
                    self.base_url, course_id, slug
                )
            }),
            ContentType::File => item
                .content_id
                .map(|content_id| format!("{}/api/v1/files/{}", self.base_url, content_id)),
            ContentType::Quiz | ContentType::ExternalUrl | ContentType::SubHeader => None,
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Module listing/show response.
#[derive(Debug, Serialize)]
pub struct ModuleResponse {
    pub name: String,
    pub unlock_at: Option<DateTime<Utc>>,
    pub position: i32,
    pub require_sequential_progress: bool,
    pub prerequisite_module_ids: Vec<Uuid>,
    pub id: Uuid,
    /// Present only on per-user views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ProgressState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl ModuleResponse {
    /// Context-only view, no per-user state.
    #[must_use]
    pub fn new(module: &Module) -> Self {
        Self {
            name: module.name.clone(),
            unlock_at: module.unlock_at,
            position: module.position,
            require_sequential_progress: module.require_sequential_progress,
            prerequisite_module_ids: module.prerequisite_module_ids.clone(),
            id: module.id,
            state: None,
            completed_at: None,
        }
    }

    /// Per-user view with progression state.
    #[must_use]
    pub fn with_progress(module: &Module, progress: &ModuleProgress) -> Self {
        Self {
            state: Some(progress.state),
            completed_at: Some(progress.completed_at),
            ..Self::new(module)
        }
    }
}

/// Completion requirement as exposed on item responses; `completed` is
/// filled on per-user views only.
#[derive(Debug, Serialize)]
pub struct CompletionRequirementResponse {
    #[serde(flatten)]
    pub requirement: CompletionRequirement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Module item listing/show response.
#[derive(Debug, Serialize)]
pub struct ModuleItemResponse {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    pub position: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub title: String,
    pub indent: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_requirement: Option<CompletionRequirementResponse>,
}

impl ModuleItemResponse {
    /// Context-only view.
    #[must_use]
    pub fn new(course_id: Uuid, item: &ModuleItem, links: &LinkBuilder) -> Self {
        Self {
            content_type: item.content_type,
            id: item.id,
            html_url: links.item_html_url(course_id, item),
            position: item.position,
            url: links.item_api_url(course_id, item),
            title: item.title.clone(),
            indent: item.indent,
            completion_requirement: item.completion_requirement.clone().map(|requirement| {
                CompletionRequirementResponse {
                    requirement,
                    completed: None,
                }
            }),
        }
    }

    /// Per-user view: the requirement carries its completion status.
    #[must_use]
    pub fn with_completion(
        course_id: Uuid,
        item: &ModuleItem,
        links: &LinkBuilder,
        completed: Option<bool>,
    ) -> Self {
        let mut response = Self::new(course_id, item, links);
        if let Some(requirement) = response.completion_requirement.as_mut() {
            requirement.completed = completed;
        }
        response
    }
}
