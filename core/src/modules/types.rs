//! Course and Module Type Definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ModuleError;

// ============================================================================
// Content Types
// ============================================================================

/// Kind of content a module item points at.
///
/// Closed set: adding a new content kind is a compile-checked change to
/// every match that dispatches on it (link building, requirement rules).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    Assignment,
    Quiz,
    Discussion,
    Page,
    File,
    ExternalUrl,
    /// Non-content divider shown between items; carries no link or target.
    SubHeader,
}

impl ContentType {
    /// Whether items of this type reference an actual piece of content.
    #[must_use]
    pub const fn is_content(self) -> bool {
        !matches!(self, Self::SubHeader)
    }
}

// ============================================================================
// Completion Requirements
// ============================================================================

/// Declared condition a learner must meet for a module item to count
/// toward module completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompletionRequirement {
    MustView,
    MustContribute,
    MustSubmit,
    MinScore { min_score: f64 },
}

// ============================================================================
// Module Items
// ============================================================================

/// A positioned reference to content inside a module.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleItem {
    pub id: Uuid,
    pub module_id: Uuid,
    pub content_type: ContentType,
    /// Target content id; `None` for sub-headers and external URLs.
    pub content_id: Option<Uuid>,
    pub title: String,
    /// Dense 1-based position within the owning module.
    pub position: i32,
    /// Display indent level; purely a rendering hint.
    pub indent: u32,
    /// Destination for `ExternalUrl` items.
    pub external_url: Option<String>,
    /// URL slug for `Page` items.
    pub page_slug: Option<String>,
    pub completion_requirement: Option<CompletionRequirement>,
}

/// Parameters for attaching a new item to a module.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub content_type: ContentType,
    pub title: String,
    pub content_id: Option<Uuid>,
    pub indent: u32,
    pub external_url: Option<String>,
    pub page_slug: Option<String>,
}

impl NewItem {
    #[must_use]
    pub fn new(content_type: ContentType, title: impl Into<String>) -> Self {
        Self {
            content_type,
            title: title.into(),
            content_id: None,
            indent: 0,
            external_url: None,
            page_slug: None,
        }
    }

    /// Builder: set the referenced content id.
    #[must_use]
    pub const fn with_content(mut self, content_id: Uuid) -> Self {
        self.content_id = Some(content_id);
        self
    }

    /// Builder: set the display indent.
    #[must_use]
    pub const fn with_indent(mut self, indent: u32) -> Self {
        self.indent = indent;
        self
    }

    /// Builder: set the destination of an external-URL item.
    #[must_use]
    pub fn with_external_url(mut self, url: impl Into<String>) -> Self {
        self.external_url = Some(url.into());
        self
    }

    /// Builder: set the page slug of a wiki-page item.
    #[must_use]
    pub fn with_page_slug(mut self, slug: impl Into<String>) -> Self {
        self.page_slug = Some(slug.into());
        self
    }
}

// ============================================================================
// Modules
// ============================================================================

/// Parameters for creating a module.
#[derive(Debug, Clone)]
pub struct NewModule {
    pub name: String,
    pub unlock_at: Option<DateTime<Utc>>,
    pub require_sequential_progress: bool,
}

impl NewModule {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unlock_at: None,
            require_sequential_progress: false,
        }
    }

    /// Builder: gate the module until the given time.
    #[must_use]
    pub const fn with_unlock_at(mut self, unlock_at: DateTime<Utc>) -> Self {
        self.unlock_at = Some(unlock_at);
        self
    }

    /// Builder: require items to be completed in position order.
    #[must_use]
    pub const fn sequential(mut self) -> Self {
        self.require_sequential_progress = true;
        self
    }
}

/// An ordered collection of items with completion requirements and
/// prerequisite gating.
#[derive(Debug, Clone, Serialize)]
pub struct Module {
    pub id: Uuid,
    pub name: String,
    /// Dense 1-based position within the owning course.
    pub position: i32,
    pub unlock_at: Option<DateTime<Utc>>,
    pub require_sequential_progress: bool,
    /// Ids of modules that must be completed first; each must precede
    /// this module in course order.
    pub prerequisite_module_ids: Vec<Uuid>,
    /// Items ordered by position.
    pub items: Vec<ModuleItem>,
    /// Bumped on every definition change; cached progress computed
    /// against an older revision is stale.
    #[serde(skip)]
    revision: u64,
}

impl Module {
    fn new(spec: NewModule, position: i32) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: spec.name,
            position,
            unlock_at: spec.unlock_at,
            require_sequential_progress: spec.require_sequential_progress,
            prerequisite_module_ids: Vec::new(),
            items: Vec::new(),
            revision: 0,
        }
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, item_id: Uuid) -> Option<&ModuleItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

// ============================================================================
// Courses
// ============================================================================

/// A course: the ordering context that owns modules.
#[derive(Debug, Clone)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    modules: Vec<Module>,
}

impl Course {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            modules: Vec::new(),
        }
    }

    /// Modules in position order.
    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Look up a module by id.
    #[must_use]
    pub fn module(&self, module_id: Uuid) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    /// Look up an item across all modules.
    #[must_use]
    pub fn find_item(&self, item_id: Uuid) -> Option<&ModuleItem> {
        self.modules.iter().find_map(|m| m.item(item_id))
    }

    /// Append a module at the next position.
    pub fn add_module(&mut self, spec: NewModule) -> Uuid {
        let position = i32::try_from(self.modules.len()).unwrap_or(i32::MAX - 1) + 1;
        let module = Module::new(spec, position);
        let id = module.id;
        self.modules.push(module);
        id
    }

    /// Remove a module and renumber the remaining modules densely.
    ///
    /// Prerequisite lists naming the removed module are left as-is;
    /// evaluation surfaces them as configuration faults rather than
    /// silently treating them as satisfied.
    pub fn remove_module(&mut self, module_id: Uuid) -> Result<(), ModuleError> {
        let index = self
            .modules
            .iter()
            .position(|m| m.id == module_id)
            .ok_or(ModuleError::NotFound)?;
        self.modules.remove(index);
        for (offset, module) in self.modules.iter_mut().enumerate() {
            module.position = i32::try_from(offset).unwrap_or(i32::MAX - 1) + 1;
            module.revision += 1;
        }
        Ok(())
    }

    /// Append an item to a module at the next position.
    pub fn add_item(&mut self, module_id: Uuid, spec: NewItem) -> Result<Uuid, ModuleError> {
        let module = self.module_mut(module_id)?;
        let position = i32::try_from(module.items.len()).unwrap_or(i32::MAX - 1) + 1;
        let item = ModuleItem {
            id: Uuid::now_v7(),
            module_id,
            content_type: spec.content_type,
            content_id: spec.content_id,
            title: spec.title,
            position,
            indent: spec.indent,
            external_url: spec.external_url,
            page_slug: spec.page_slug,
            completion_requirement: None,
        };
        let id = item.id;
        module.items.push(item);
        module.revision += 1;
        Ok(id)
    }

    /// Remove an item and renumber its siblings densely.
    pub fn remove_item(&mut self, module_id: Uuid, item_id: Uuid) -> Result<(), ModuleError> {
        let module = self.module_mut(module_id)?;
        let index = module
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or(ModuleError::ItemNotFound)?;
        module.items.remove(index);
        for (offset, item) in module.items.iter_mut().enumerate() {
            item.position = i32::try_from(offset).unwrap_or(i32::MAX - 1) + 1;
        }
        module.revision += 1;
        Ok(())
    }

    /// Replace a module's prerequisite list.
    ///
    /// Every id must name an existing module at a strictly lower
    /// position; anything else is a configuration fault.
    pub fn set_prerequisites(
        &mut self,
        module_id: Uuid,
        prerequisites: Vec<Uuid>,
    ) -> Result<(), ModuleError> {
        let position = self
            .module(module_id)
            .ok_or(ModuleError::NotFound)?
            .position;
        for prereq_id in &prerequisites {
            let prereq = self
                .module(*prereq_id)
                .ok_or(ModuleError::UnknownPrerequisite(*prereq_id))?;
            if prereq.position >= position {
                return Err(ModuleError::PrerequisiteOrder {
                    prerequisite: *prereq_id,
                    module: module_id,
                });
            }
        }
        let module = self.module_mut(module_id)?;
        module.prerequisite_module_ids = prerequisites;
        module.revision += 1;
        Ok(())
    }

    /// Replace a module's completion requirement set.
    ///
    /// Items absent from `requirements` lose their requirement.
    pub fn set_completion_requirements(
        &mut self,
        module_id: Uuid,
        requirements: &[(Uuid, CompletionRequirement)],
    ) -> Result<(), ModuleError> {
        {
            let module = self.module(module_id).ok_or(ModuleError::NotFound)?;
            if requirements
                .iter()
                .any(|(item_id, _)| module.item(*item_id).is_none())
            {
                return Err(ModuleError::ItemNotFound);
            }
        }
        let module = self.module_mut(module_id)?;
        for item in &mut module.items {
            item.completion_requirement = requirements
                .iter()
                .find(|(item_id, _)| *item_id == item.id)
                .map(|(_, req)| req.clone());
        }
        module.revision += 1;
        Ok(())
    }

    /// Change a module's unlock time.
    pub fn set_unlock_at(
        &mut self,
        module_id: Uuid,
        unlock_at: Option<DateTime<Utc>>,
    ) -> Result<(), ModuleError> {
        let module = self.module_mut(module_id)?;
        module.unlock_at = unlock_at;
        module.revision += 1;
        Ok(())
    }

    fn module_mut(&mut self, module_id: Uuid) -> Result<&mut Module, ModuleError> {
        self.modules
            .iter_mut()
            .find(|m| m.id == module_id)
            .ok_or(ModuleError::NotFound)
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Aggregate progression state of a module for one learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressState {
    Locked,
    Unlocked,
    Started,
    Completed,
}

/// Derived per-user module progress.
///
/// Recomputed on demand from the module definition and the event log;
/// never stored as an authoritative flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleProgress {
    pub module_id: Uuid,
    pub user_id: Uuid,
    pub state: ProgressState,
    pub completed_at: Option<DateTime<Utc>>,
    /// Ids of items whose requirement is currently satisfied.
    pub requirements_met: Vec<Uuid>,
    /// Module revision this progress was computed against.
    #[serde(skip)]
    pub(crate) revision: u64,
}
