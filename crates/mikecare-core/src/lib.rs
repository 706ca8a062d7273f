//! # mikecare-core
//!
//! The deterministic core of MikeCare - THE LOGIC.
//!
//! A user describes a concern, tags it with a category, and receives a
//! structured plan: immediate relief steps, a week-by-week healing plan, and
//! resources. This crate holds everything that does not need a network:
//!
//! - `registry`: the closed set of concern categories
//! - `catalog`: category → solution plan, with a default fallback
//! - `submission`: the `Editing -> Submitting -> Resolved` state machine
//! - `progress`: checklist state and completion math
//! - `journal`: sample entries and the search/category filter
//! - `storage`: durable key-value store (in-memory + redb)
//! - `session`: application state with load/persist lifecycle
//! - `routing`: path → view resolution and screen gating
//!
//! ## Architectural Constraints
//!
//! - Has NO async, NO network dependencies (pure Rust)
//! - Does not log; errors are returned and the app layer decides what to report
//! - The simulated analysis delay is NOT here: the flow hands out a ticket and
//!   the caller waits

// =============================================================================
// MODULES
// =============================================================================

pub mod auth;
pub mod catalog;
pub mod journal;
pub mod primitives;
pub mod progress;
pub mod registry;
pub mod resolver;
pub mod routing;
pub mod session;
pub mod storage;
pub mod submission;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{CareError, CategoryId, Mood, StepId};

// =============================================================================
// RE-EXPORTS: Components
// =============================================================================

pub use auth::{AuthReply, Credentials, User};
pub use catalog::{Resource, ResourceKind, SolutionCatalog, SolutionPlan, WeekBlock};
pub use journal::{CategoryFilter, JournalEntry};
pub use progress::{Completion, StepProgress, completion_ratio};
pub use registry::{Category, category, list_categories};
pub use resolver::{CatalogResolver, SolutionResolver};
pub use routing::{Screen, View};
pub use session::{AppState, Language, OnboardingResponses, Session, SolutionsView, StorageBackend};
pub use storage::{KeyValueStore, MemoryStore, RedbStore, StoreKey};
pub use submission::{FlowState, SubmissionFlow, SubmissionRecord, SubmitTicket};
