//! Module progression engine.
//!
//! Courses hold ordered modules of positioned items; items declare
//! completion requirements; learner actions land in an append-only
//! event log. Progress (locked / unlocked / started / completed) is a
//! pure function of the definition, the prerequisite states, the clock,
//! and the log, never a stored flag.

pub mod api;
pub mod error;
pub mod events;
pub mod progression;
pub mod tracker;
pub mod types;

pub use api::{LinkBuilder, ModuleItemResponse, ModuleResponse};
pub use error::ModuleError;
pub use events::{CompletionEvent, EventKind, EventLog};
pub use progression::{
    aggregate_state, evaluate_items, item_completion, requirement_satisfied, ItemOutcomes,
};
pub use tracker::ProgressTracker;
pub use types::{
    CompletionRequirement, ContentType, Course, Module, ModuleItem, ModuleProgress, NewItem,
    NewModule, ProgressState,
};
