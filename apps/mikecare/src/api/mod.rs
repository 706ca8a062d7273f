//! # MikeCare HTTP API Module
//!
//! JSON API over a single shared [`Session`], using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /` - Landing screen for the session
//! - `GET /screen?path=` - Screen gating for a path
//! - `GET /session` - Durable session state
//! - `POST /login`, `POST /logout`, `POST /onboarding`
//! - `GET /categories` - Concern categories
//! - `GET /solutions/catalog/{category}` - Plan for a raw category key
//! - `POST /input` - Submit a concern (waits out the analysis delay)
//! - `GET /input/state` - Input screen state
//! - `GET /solutions` - Mount the Solutions view (303 to `/` if empty)
//! - `POST /solutions/steps/{step}` - Toggle a checklist step
//! - `GET /solutions/progress` - Checklist progress
//! - `GET /journal?search=&category=` - Filtered sample journal
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `MIKECARE_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `MIKECARE_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `MIKECARE_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::{ENV_API_KEY, get_api_key_from_env};
pub use handlers::ApiError;
pub use middleware::{ENV_RATE_LIMIT, create_rate_limiter, get_rate_limit_from_env};
pub use types::{
    CatalogResponse, ErrorResponse, HealthResponse, InputRequest, InputResponse,
    InputStateResponse, JournalQuery, JournalResponse, LoginRequest, LoginResponse,
    OnboardingRequest, ProgressResponse, ScreenQuery, ScreenResponse, SessionResponse,
    SolutionsResponse, ToggleResponse,
};

use crate::AppError;
use crate::analysis::SimulatedAnalysis;
use crate::auth_client::AuthClient;
use crate::config::Config;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use mikecare_core::Session;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub const ENV_CORS_ORIGINS: &str = "MIKECARE_CORS_ORIGINS";

/// Request bodies above this size are rejected with 413.
const MAX_BODY_BYTES: usize = 64 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// The single user session.
    pub session: Arc<RwLock<Session>>,
    /// Client for the external login endpoint.
    pub auth: AuthClient,
    /// Delay applied between submit and hand-off.
    pub analysis: SimulatedAnalysis,
}

impl AppState {
    /// Build state from a session and resolved configuration.
    pub fn new(session: Session, config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            session: Arc::new(RwLock::new(session)),
            auth: AuthClient::new(config.auth_url.clone(), config.auth_timeout())?,
            analysis: SimulatedAnalysis::new(config.analysis_delay()),
        })
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from `MIKECARE_CORS_ORIGINS`.
///
/// - `*`: allow every origin (development only)
/// - unset: localhost only
/// - otherwise: comma-separated list of origins
fn build_cors_layer() -> CorsLayer {
    match std::env::var(ENV_CORS_ORIGINS).ok().as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (MIKECARE_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(hv) => {
                        tracing::info!("CORS: Allowing origin: {}", origin);
                        Some(hv)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                        None
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in MIKECARE_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                cors_for(allowed_origins)
            }
        }
        None => {
            tracing::info!("CORS: No MIKECARE_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

fn cors_for(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Localhost origins for the usual dev-server ports.
fn build_localhost_cors() -> CorsLayer {
    let origins = [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5173",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();
    cors_for(origins)
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Rate Limiting (if enabled)
/// 4. Authentication (if `MIKECARE_API_KEY` is set)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set MIKECARE_API_KEY to enable authentication."
        );
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/", get(handlers::landing_handler))
        .route("/screen", get(handlers::screen_handler))
        .route("/session", get(handlers::session_handler))
        .route("/login", post(handlers::login_handler))
        .route("/logout", post(handlers::logout_handler))
        .route("/onboarding", post(handlers::onboarding_handler))
        .route("/categories", get(handlers::categories_handler))
        .route(
            "/solutions/catalog/{category}",
            get(handlers::catalog_handler),
        )
        .route("/input", post(handlers::input_handler))
        .route("/input/state", get(handlers::input_state_handler))
        .route("/solutions", get(handlers::solutions_handler))
        .route(
            "/solutions/steps/{step}",
            post(handlers::toggle_step_handler),
        )
        .route("/solutions/progress", get(handlers::progress_handler))
        .route("/journal", get(handlers::journal_handler));

    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl+C.
pub async fn run_server(config: &Config, session: Session) -> Result<(), AppError> {
    let state = AppState::new(session, config)?;
    let router = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("MikeCare HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
