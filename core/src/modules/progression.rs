//! Pure progression evaluation.
//!
//! Everything in this file is a read-only function of the module
//! definition and the event log; recording events and caching results
//! live in [`super::tracker`].

use uuid::Uuid;

use super::events::{CompletionEvent, EventKind, EventLog};
use super::types::{CompletionRequirement, Module, ModuleItem, ProgressState};

/// Whether the recorded events satisfy a single requirement.
#[must_use]
pub fn requirement_satisfied(
    requirement: &CompletionRequirement,
    events: &[CompletionEvent],
) -> bool {
    events.iter().any(|event| match (requirement, &event.kind) {
        (CompletionRequirement::MustView, EventKind::Viewed)
        | (CompletionRequirement::MustContribute, EventKind::Contributed)
        | (CompletionRequirement::MustSubmit, EventKind::Submitted) => true,
        (CompletionRequirement::MinScore { min_score }, EventKind::Scored { score }) => {
            score >= min_score
        }
        _ => false,
    })
}

/// Per-module tally of requirement outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcomes {
    /// Items whose requirement is satisfied, in position order.
    pub satisfied: Vec<Uuid>,
    /// Number of items carrying a requirement.
    pub required: usize,
}

/// Evaluate every requirement in a module for one user.
///
/// With sequential progress enabled, a requirement is only reachable
/// while every earlier requirement is satisfied; events recorded
/// against an unreached item do not count.
#[must_use]
pub fn evaluate_items(module: &Module, log: &EventLog, user_id: Uuid) -> ItemOutcomes {
    let mut satisfied = Vec::new();
    let mut required = 0;
    let mut reachable = true;

    for item in &module.items {
        let Some(requirement) = &item.completion_requirement else {
            continue;
        };
        required += 1;
        let met =
            reachable && requirement_satisfied(requirement, &log.events_for(user_id, item.id));
        if met {
            satisfied.push(item.id);
        } else if module.require_sequential_progress {
            reachable = false;
        }
    }

    ItemOutcomes {
        satisfied,
        required,
    }
}

/// Collapse item outcomes into an aggregate state.
///
/// A module with no requirements at all is unlocked, never completed.
#[must_use]
pub fn aggregate_state(outcomes: &ItemOutcomes) -> ProgressState {
    if outcomes.required == 0 || outcomes.satisfied.is_empty() {
        ProgressState::Unlocked
    } else if outcomes.satisfied.len() == outcomes.required {
        ProgressState::Completed
    } else {
        ProgressState::Started
    }
}

/// Per-item completion projection for detail views.
///
/// `None` for items without a requirement: they never block anything
/// and have no completion status to report.
#[must_use]
pub fn item_completion(item: &ModuleItem, log: &EventLog, user_id: Uuid) -> Option<bool> {
    item.completion_requirement
        .as_ref()
        .map(|req| requirement_satisfied(req, &log.events_for(user_id, item.id)))
}
