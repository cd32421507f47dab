//! Append-only log of requirement-relevant learner actions.
//!
//! Progress is derived by matching these facts against the module
//! definition; nothing here is ever mutated after being recorded.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Learner action kinds that requirements can match on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    Viewed,
    Contributed,
    Submitted,
    Scored { score: f64 },
}

/// A recorded fact: this user did this to this item at this time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionEvent {
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub kind: EventKind,
    pub recorded_at: DateTime<Utc>,
}

/// Concurrent append-only event store keyed by (user, item).
///
/// Appends to different keys never contend; appends to the same key are
/// atomic at map-entry granularity.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: DashMap<(Uuid, Uuid), Vec<CompletionEvent>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event; returns false when an identical event already
    /// exists for the key (re-recording is a no-op).
    pub fn record(&self, user_id: Uuid, item_id: Uuid, kind: EventKind) -> bool {
        let mut entry = self.entries.entry((user_id, item_id)).or_default();
        if entry.iter().any(|e| e.kind == kind) {
            return false;
        }
        entry.push(CompletionEvent {
            user_id,
            item_id,
            kind,
            recorded_at: Utc::now(),
        });
        true
    }

    /// Snapshot of the events recorded for (user, item).
    #[must_use]
    pub fn events_for(&self, user_id: Uuid, item_id: Uuid) -> Vec<CompletionEvent> {
        self.entries
            .get(&(user_id, item_id))
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    /// Total number of recorded events, across all keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().map(|e| e.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
