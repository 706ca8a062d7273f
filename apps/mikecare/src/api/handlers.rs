//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        CatalogResponse, ErrorResponse, HealthResponse, InputRequest, InputResponse,
        InputStateResponse, JournalQuery, JournalResponse, LoginRequest, LoginResponse,
        OnboardingRequest, ProgressResponse, ScreenQuery, ScreenResponse, SessionResponse,
        SolutionsResponse, ToggleResponse,
    },
};
use crate::analysis::{Draft, SubmitOutcome, submit_draft};
use crate::auth_client::AuthError;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use mikecare_core::{
    CareError, CategoryFilter, Credentials, Session, SolutionCatalog, SolutionsView, StepId,
    View, journal, list_categories,
    primitives::{MAX_SEARCH_TERM_LENGTH, MAX_SUBMISSION_TEXT_LENGTH},
    progress::plan_steps,
};

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// A JSON error with its status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<CareError> for ApiError {
    fn from(e: CareError) -> Self {
        let status = match &e {
            CareError::UnknownCategory(_)
            | CareError::InvalidStepId(_)
            | CareError::InvalidMood(_) => StatusCode::BAD_REQUEST,
            CareError::UnknownStep(_) => StatusCode::NOT_FOUND,
            CareError::SubmissionInProgress => StatusCode::CONFLICT,
            CareError::SerializationError(_)
            | CareError::DeserializationError(_)
            | CareError::IoError(_) => {
                tracing::error!(error = %e, "Session storage failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// SCREEN & SESSION HANDLERS
// =============================================================================

/// Landing screen for `/`.
pub async fn landing_handler(State(state): State<AppState>) -> Json<ScreenResponse> {
    let session = state.session.read().await;
    let path = View::Dashboard.path();
    Json(ScreenResponse::new(path, session.screen_for(path)))
}

/// Screen gating for an arbitrary path.
pub async fn screen_handler(
    State(state): State<AppState>,
    Query(query): Query<ScreenQuery>,
) -> Json<ScreenResponse> {
    let session = state.session.read().await;
    let path = query.path.unwrap_or_else(|| View::Dashboard.path().to_string());
    let screen = session.screen_for(&path);
    Json(ScreenResponse::new(&path, screen))
}

fn session_response(session: &Session) -> SessionResponse {
    SessionResponse::new(session.state(), session.screen_for(View::Dashboard.path()))
}

/// Current durable session state.
pub async fn session_handler(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state.session.read().await;
    Json(session_response(&session))
}

/// Authenticate against the external endpoint and persist the user.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let credentials = match request.name {
        Some(name) => Credentials::register(name, request.email, request.password),
        None => Credentials::login(request.email, request.password),
    };

    // The session lock is not held during the network call.
    let user = match state.auth.authenticate(&credentials).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(email = %credentials.email(), error = %e, "Login failed");
            let status = match &e {
                AuthError::Rejected { .. } => StatusCode::UNAUTHORIZED,
                AuthError::Network(_) | AuthError::Parse(_) => StatusCode::BAD_GATEWAY,
            };
            return Err(ApiError::new(status, e.alert_text()));
        }
    };

    let mut session = state.session.write().await;
    session.login(user.clone())?;
    tracing::info!(email = %user.email, "User signed in");
    Ok(Json(LoginResponse {
        user,
        screen: session.screen_for(View::Dashboard.path()).label().to_string(),
    }))
}

/// Forget the signed-in user.
pub async fn logout_handler(State(state): State<AppState>) -> ApiResult<SessionResponse> {
    let mut session = state.session.write().await;
    session.logout()?;
    Ok(Json(session_response(&session)))
}

/// Persist onboarding answers and mark onboarding complete.
pub async fn onboarding_handler(
    State(state): State<AppState>,
    Json(request): Json<OnboardingRequest>,
) -> ApiResult<SessionResponse> {
    let mut session = state.session.write().await;
    session.complete_onboarding(request.language, &request.responses)?;
    tracing::info!(language = %request.language, "Onboarding completed");
    Ok(Json(session_response(&session)))
}

// =============================================================================
// CATALOG HANDLERS
// =============================================================================

/// List the concern categories.
pub async fn categories_handler() -> impl IntoResponse {
    Json(list_categories())
}

/// Resolve a raw category key, flagging the default-plan fallback.
pub async fn catalog_handler(Path(category): Path<String>) -> Json<CatalogResponse> {
    let catalog = SolutionCatalog::builtin();
    let (plan, fallback) = match catalog.lookup(&category) {
        Some(plan) => (plan, false),
        None => {
            tracing::warn!(category = %category, "Unknown category, serving default plan");
            (catalog.default_plan(), true)
        }
    };
    Json(CatalogResponse {
        category,
        fallback,
        total_steps: plan.total_steps(),
        plan: plan.clone(),
    })
}

// =============================================================================
// INPUT HANDLERS
// =============================================================================

fn too_long_message(len: usize) -> String {
    format!(
        "Submission length {} exceeds maximum {} bytes",
        len, MAX_SUBMISSION_TEXT_LENGTH
    )
}

/// Run a submission: validate, wait out the analysis delay, store the record.
pub async fn input_handler(
    State(state): State<AppState>,
    Json(request): Json<InputRequest>,
) -> Result<Json<InputResponse>, ApiError> {
    let draft = Draft {
        text: request.text,
        category: request.category,
        voice_note: request.voice_note,
    };

    match submit_draft(&state.session, state.analysis, draft).await? {
        SubmitOutcome::Resolved(record) => Ok(Json(InputResponse {
            record,
            redirect: View::Solutions.path().to_string(),
        })),
        SubmitOutcome::Blocked => Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Describe what is on your mind and pick a category",
        )),
        SubmitOutcome::TooLong(len) => Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            too_long_message(len),
        )),
        SubmitOutcome::InProgress => Err(CareError::SubmissionInProgress.into()),
    }
}

/// Current input screen state.
pub async fn input_state_handler(State(state): State<AppState>) -> Json<InputStateResponse> {
    let session = state.session.read().await;
    Json(InputStateResponse::from(session.flow()))
}

// =============================================================================
// SOLUTIONS HANDLERS
// =============================================================================

fn progress_of(session: &Session) -> Option<ProgressResponse> {
    let completion = session.completion()?;
    Some(ProgressResponse::new(
        session.progress().iter().copied().collect(),
        completion,
        session.completion_ratio(),
    ))
}

fn no_plan() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "No solution plan is open")
}

/// Mount the Solutions view. Redirects home when nothing was submitted.
pub async fn solutions_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let mut session = state.session.write().await;
    match session.open_solutions()? {
        SolutionsView::Ready(plan) => {
            let progress = progress_of(&session).ok_or_else(no_plan)?;
            let steps = plan_steps(&plan);
            Ok(Json(SolutionsResponse {
                plan: *plan,
                steps,
                progress,
            })
            .into_response())
        }
        SolutionsView::RedirectHome => {
            tracing::debug!("No submission stored, redirecting home");
            Ok(Redirect::to(View::Dashboard.path()).into_response())
        }
    }
}

/// Toggle one checklist step of the mounted plan.
pub async fn toggle_step_handler(
    State(state): State<AppState>,
    Path(step): Path<String>,
) -> ApiResult<ToggleResponse> {
    let step: StepId = step.parse()?;
    let mut session = state.session.write().await;
    let completed = session.toggle_step(step)?;
    let progress = progress_of(&session).ok_or_else(no_plan)?;
    Ok(Json(ToggleResponse {
        step,
        completed,
        progress,
    }))
}

/// Progress of the mounted plan.
pub async fn progress_handler(State(state): State<AppState>) -> ApiResult<ProgressResponse> {
    let session = state.session.read().await;
    progress_of(&session).map(Json).ok_or_else(no_plan)
}

// =============================================================================
// JOURNAL HANDLER
// =============================================================================

/// Sample journal filtered by search term and category tab.
pub async fn journal_handler(Query(query): Query<JournalQuery>) -> ApiResult<JournalResponse> {
    let search = query.search.unwrap_or_default();
    if search.len() > MAX_SEARCH_TERM_LENGTH {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            format!(
                "Search term length {} exceeds maximum {} bytes",
                search.len(),
                MAX_SEARCH_TERM_LENGTH
            ),
        ));
    }
    let filter: CategoryFilter = match query.category.as_deref() {
        None | Some("") => CategoryFilter::All,
        Some(raw) => raw.parse()?,
    };

    let entries: Vec<_> = journal::filter(journal::sample_entries(), &search, filter)
        .into_iter()
        .cloned()
        .collect();
    let empty_message = entries
        .is_empty()
        .then(|| journal::empty_state_message(&search, filter).to_string());

    Ok(Json(JournalResponse {
        entries,
        tabs: CategoryFilter::TABS.iter().map(ToString::to_string).collect(),
        empty_message,
    }))
}
