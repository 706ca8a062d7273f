//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use mikecare_core::{
    AppState as CoreState, CategoryId, Completion, FlowState, JournalEntry, Language,
    OnboardingResponses, Screen, SolutionPlan, StepId, SubmissionFlow, SubmissionRecord, User,
    View,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Body of every non-2xx JSON response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// =============================================================================
// SCREEN / SESSION
// =============================================================================

/// Screen gating result for a path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenResponse {
    pub path: String,
    /// `login`, `onboarding`, `access_denied`, or the view name.
    pub screen: String,
    /// The routed view, when the screen is a view.
    pub view: Option<View>,
}

impl ScreenResponse {
    #[must_use]
    pub fn new(path: &str, screen: Screen) -> Self {
        let view = match screen {
            Screen::View(view) => Some(view),
            Screen::Login | Screen::Onboarding | Screen::AccessDenied => None,
        };
        Self {
            path: path.to_string(),
            screen: screen.label().to_string(),
            view,
        }
    }
}

/// Query string for `GET /screen`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScreenQuery {
    #[serde(default)]
    pub path: Option<String>,
}

/// Durable session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user: Option<User>,
    pub onboarding_complete: bool,
    pub language: Language,
    /// Landing screen label for `/`.
    pub screen: String,
}

impl SessionResponse {
    #[must_use]
    pub fn new(state: &CoreState, landing: Screen) -> Self {
        Self {
            authenticated: state.is_authenticated(),
            user: state.user.clone(),
            onboarding_complete: state.onboarding_complete,
            language: state.language,
            screen: landing.label().to_string(),
        }
    }
}

// =============================================================================
// LOGIN / ONBOARDING
// =============================================================================

/// Login (or registration, when `name` is present) request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub screen: String,
}

/// Onboarding completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingRequest {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub responses: OnboardingResponses,
}

// =============================================================================
// CATALOG
// =============================================================================

/// Plan lookup by raw category key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub category: String,
    /// `true` when the key is unknown and the default plan was served.
    pub fallback: bool,
    pub total_steps: usize,
    pub plan: SolutionPlan,
}

// =============================================================================
// INPUT
// =============================================================================

/// Submission request for `POST /input`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputRequest {
    pub text: String,
    #[serde(default)]
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub voice_note: bool,
}

/// Successful submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputResponse {
    pub record: SubmissionRecord,
    /// Where the client should navigate next.
    pub redirect: String,
}

/// Snapshot of the input screen state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputStateResponse {
    pub state: FlowState,
    pub text: String,
    pub category: Option<CategoryId>,
    pub recording: bool,
    pub can_submit: bool,
}

impl From<&SubmissionFlow> for InputStateResponse {
    fn from(flow: &SubmissionFlow) -> Self {
        Self {
            state: flow.state(),
            text: flow.text().to_string(),
            category: flow.category(),
            recording: flow.is_recording(),
            can_submit: flow.can_submit(),
        }
    }
}

// =============================================================================
// SOLUTIONS
// =============================================================================

/// Mounted Solutions view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionsResponse {
    pub plan: SolutionPlan,
    /// Every checklist id of the plan, immediate steps first.
    pub steps: Vec<StepId>,
    pub progress: ProgressResponse,
}

/// Checklist progress for the mounted plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub completed: Vec<StepId>,
    pub completed_count: usize,
    pub total_steps: usize,
    pub percent: u8,
    pub ratio: f64,
}

impl ProgressResponse {
    #[must_use]
    pub fn new(completed: Vec<StepId>, completion: Completion, ratio: f64) -> Self {
        Self {
            completed,
            completed_count: completion.completed,
            total_steps: completion.total,
            percent: completion.percent,
            ratio,
        }
    }
}

/// Result of toggling one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub step: StepId,
    pub completed: bool,
    pub progress: ProgressResponse,
}

// =============================================================================
// JOURNAL
// =============================================================================

/// Query string for `GET /journal`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JournalQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Filtered journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalResponse {
    pub entries: Vec<JournalEntry>,
    pub tabs: Vec<String>,
    /// Set when `entries` is empty.
    pub empty_message: Option<String>,
}
