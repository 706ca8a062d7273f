//! # Primitives
//!
//! Hardcoded runtime constants for the MikeCare CORE.
//!
//! These are compiled into the binary and are immutable at runtime.

/// Default simulated analysis latency between submit and hand-off.
///
/// No work happens during this delay. It stands in for a future analysis
/// engine and is overridable through configuration.
pub const DEFAULT_ANALYSIS_DELAY_MS: u64 = 2000;

/// Text appended to a draft when a voice recording is stopped.
pub const VOICE_NOTE_MARKER: &str = " [Voice note recorded]";

/// Value stored under the onboarding key once the questionnaire is done.
pub const ONBOARDING_COMPLETED: &str = "completed";

/// Sentinel accepted by the journal category filter to match every entry.
pub const ALL_CATEGORIES: &str = "all";

/// Maximum accepted length of submission text, in bytes.
///
/// Longer drafts are rejected at the API boundary before reaching the flow.
pub const MAX_SUBMISSION_TEXT_LENGTH: usize = 10_000;

/// Maximum accepted length of a journal search term, in bytes.
pub const MAX_SEARCH_TERM_LENGTH: usize = 256;

// =============================================================================
// USER-FACING MESSAGES
// =============================================================================

/// Alert shown when the auth endpoint rejects a login without a message.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";

/// Alert shown when the login request fails in transport or parsing.
pub const LOGIN_ERROR_MESSAGE: &str = "An error occurred during login.";

/// Journal empty state while a search or category filter is active.
pub const JOURNAL_NO_MATCHES_MESSAGE: &str = "No entries match your search criteria.";

/// Journal empty state with no active search or filter.
pub const JOURNAL_EMPTY_MESSAGE: &str = "No journal entries yet.";
