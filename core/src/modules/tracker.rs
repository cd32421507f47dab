//! Progress tracking service.
//!
//! Owns the event log, the completion timestamps, and an advisory
//! progress cache. Evaluation is recomputed from the log on demand; the
//! cache is revision-checked and never authoritative.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::config::Config;

use super::error::ModuleError;
use super::events::{EventKind, EventLog};
use super::progression::{aggregate_state, evaluate_items, item_completion};
use super::types::{Course, Module, ModuleItem, ModuleProgress, ProgressState};

/// Per-user progression state over one course's event history.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    log: EventLog,
    /// First-completion stamps keyed by (user, module). Retained while
    /// the module stays completed (or merely locked); cleared when the
    /// requirement set regresses the state.
    completions: DashMap<(Uuid, Uuid), DateTime<Utc>>,
    cache: DashMap<(Uuid, Uuid), ModuleProgress>,
    cache_enabled: bool,
    grandfather_completions: bool,
}

impl ProgressTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache_enabled: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_config(config: &Config) -> Self {
        Self {
            cache_enabled: config.progress_cache,
            grandfather_completions: config.grandfather_completions,
            ..Self::default()
        }
    }

    /// The underlying event log.
    #[must_use]
    pub const fn log(&self) -> &EventLog {
        &self.log
    }

    /// Record a learner action against an item.
    ///
    /// The only mutation point besides course definition edits; appends
    /// to the log and drops the cached progress for the owning module.
    #[tracing::instrument(skip(self, item), fields(item_id = %item.id))]
    pub fn record_event(&self, user_id: Uuid, item: &ModuleItem, kind: EventKind) {
        if self.log.record(user_id, item.id, kind) {
            // The event can unlock modules that list this item's module
            // as a prerequisite, so every cached entry for the user goes.
            self.cache.retain(|(cached_user, _), _| *cached_user != user_id);
            tracing::debug!(module_id = %item.module_id, "recorded event, cache invalidated");
        }
    }

    /// Record a view, e.g. from the external-URL redirect endpoint.
    pub fn mark_viewed(&self, user_id: Uuid, item: &ModuleItem) {
        self.record_event(user_id, item, EventKind::Viewed);
    }

    /// Compute the module's progress for a user at `now`.
    #[tracing::instrument(skip(self, course))]
    pub fn evaluate(
        &self,
        course: &Course,
        module_id: Uuid,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ModuleProgress, ModuleError> {
        let module = course.module(module_id).ok_or(ModuleError::NotFound)?;

        if self.cache_enabled {
            if let Some(hit) = self.cache.get(&(user_id, module_id)) {
                if hit.revision == module.revision() {
                    return Ok(hit.clone());
                }
            }
        }

        let progress = self.compute(course, module, user_id, now)?;
        if self.cache_enabled {
            self.cache
                .insert((user_id, module_id), progress.clone());
        }
        Ok(progress)
    }

    /// Per-item completion projection; `None` for requirement-less items.
    #[must_use]
    pub fn item_completion(&self, user_id: Uuid, item: &ModuleItem) -> Option<bool> {
        item_completion(item, &self.log, user_id)
    }

    fn compute(
        &self,
        course: &Course,
        module: &Module,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ModuleProgress, ModuleError> {
        // The time gate outranks prerequisites and requirements alike.
        if module.unlock_at.is_some_and(|unlock_at| now < unlock_at) {
            return Ok(self.conclude(module, user_id, ProgressState::Locked, Vec::new(), now));
        }

        for prereq_id in &module.prerequisite_module_ids {
            if course.module(*prereq_id).is_none() {
                return Err(ModuleError::UnknownPrerequisite(*prereq_id));
            }
            // Terminates: prerequisites sit at strictly lower positions.
            let prereq_progress = self.evaluate(course, *prereq_id, user_id, now)?;
            if prereq_progress.state != ProgressState::Completed {
                return Ok(self.conclude(
                    module,
                    user_id,
                    ProgressState::Locked,
                    Vec::new(),
                    now,
                ));
            }
        }

        let outcomes = evaluate_items(module, &self.log, user_id);
        let state = aggregate_state(&outcomes);
        Ok(self.conclude(module, user_id, state, outcomes.satisfied, now))
    }

    /// Apply the completion-timestamp discipline and build the result.
    fn conclude(
        &self,
        module: &Module,
        user_id: Uuid,
        state: ProgressState,
        requirements_met: Vec<Uuid>,
        now: DateTime<Utc>,
    ) -> ModuleProgress {
        let key = (user_id, module.id);
        let (state, completed_at) = match state {
            ProgressState::Completed => {
                // Stamp once; later evaluations reuse the stored value.
                let stamp = *self.completions.entry(key).or_insert(now);
                (ProgressState::Completed, Some(stamp))
            }
            // Locked does not mean the requirements stopped being
            // satisfied, so an earlier stamp survives it.
            ProgressState::Locked => (ProgressState::Locked, None),
            regressed => {
                let prior = self.completions.get(&key).map(|stamp| *stamp);
                match prior {
                    Some(stamp) if self.grandfather_completions => {
                        (ProgressState::Completed, Some(stamp))
                    }
                    Some(_) => {
                        self.completions.remove(&key);
                        (regressed, None)
                    }
                    None => (regressed, None),
                }
            }
        };

        ModuleProgress {
            module_id: module.id,
            user_id,
            state,
            completed_at,
            requirements_met,
            revision: module.revision(),
        }
    }
}
