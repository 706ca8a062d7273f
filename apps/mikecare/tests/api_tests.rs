//! Integration tests for the MikeCare HTTP API.
//!
//! Uses axum-test to drive the router without binding a port. Login tests
//! run a throwaway auth endpoint on a loopback port.

// Allow holding MutexGuard across await in auth tests - tests are serialized
// to avoid env var conflicts
#![allow(clippy::unwrap_used, clippy::panic, clippy::await_holding_lock)]

use axum::Json;
use axum::http::{HeaderValue, StatusCode};
use axum::routing::post;
use axum_test::TestServer;
use mikecare::api::{
    AppState, CatalogResponse, ErrorResponse, HealthResponse, InputResponse, InputStateResponse,
    JournalResponse, LoginResponse, ProgressResponse, ScreenResponse, SessionResponse,
    SolutionsResponse, ToggleResponse, create_router,
};
use mikecare::config::Config;
use mikecare_core::{CategoryId, Language, Session, StepId, User, View};
use serde_json::{Value, json};
use std::sync::Mutex;

/// Serializes tests that touch `MIKECARE_API_KEY`.
static AUTH_TEST_MUTEX: Mutex<()> = Mutex::new(());

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

struct TestGuard {
    _guard: std::sync::MutexGuard<'static, ()>,
}

impl Drop for TestGuard {
    fn drop(&mut self) {
        // SAFETY: Tests run sequentially under AUTH_TEST_MUTEX, so no concurrent env access.
        unsafe { std::env::remove_var("MIKECARE_API_KEY") };
    }
}

fn test_config(auth_url: &str) -> Config {
    Config {
        auth_url: auth_url.to_string(),
        analysis_delay_ms: 0,
        auth_timeout_secs: 2,
        ..Config::default()
    }
}

fn server_for(session: Session, auth_url: &str) -> TestServer {
    let state = AppState::new(session, &test_config(auth_url)).unwrap();
    TestServer::new(create_router(state)).unwrap()
}

fn lock_env() -> TestGuard {
    let guard = AUTH_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    // SAFETY: Tests run sequentially under AUTH_TEST_MUTEX, so no concurrent env access.
    unsafe { std::env::remove_var("MIKECARE_API_KEY") };
    TestGuard { _guard: guard }
}

/// Fresh in-memory session, signed out.
fn create_test_server() -> (TestServer, TestGuard) {
    let guard = lock_env();
    (server_for(Session::new(), "http://127.0.0.1:9/api/login"), guard)
}

/// Signed-in, onboarded session.
fn create_onboarded_server() -> (TestServer, TestGuard) {
    let guard = lock_env();
    let mut session = Session::new();
    session
        .login(User {
            id: Some(json!(7)),
            name: Some("Amina".to_string()),
            email: "amina@example.com".to_string(),
            is_admin: false,
        })
        .unwrap();
    session
        .complete_onboarding(Language::English, &Default::default())
        .unwrap();
    (server_for(session, "http://127.0.0.1:9/api/login"), guard)
}

/// Start a stand-in auth endpoint that accepts one password.
async fn spawn_auth_endpoint() -> String {
    async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if body["password"] == "correct horse" {
            (
                StatusCode::OK,
                Json(json!({
                    "user": {
                        "id": 1,
                        "name": "Amina",
                        "email": body["email"],
                        "isAdmin": false
                    }
                })),
            )
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Invalid credentials" })),
            )
        }
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = axum::Router::new().route("/api/login", post(login));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/login", addr)
}

async fn submit_work(server: &TestServer) -> InputResponse {
    let response = server
        .post("/input")
        .json(&json!({ "text": "My manager keeps piling on work", "category": "work" }))
        .await;
    response.assert_status_ok();
    response.json()
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _guard) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// SCREEN GATING TESTS
// =============================================================================

#[tokio::test]
async fn test_landing_is_login_when_signed_out() {
    let (server, _guard) = create_test_server();

    let screen: ScreenResponse = server.get("/").await.json();
    assert_eq!(screen.screen, "login");
    assert_eq!(screen.view, None);
}

#[tokio::test]
async fn test_admin_path_denied_for_regular_user() {
    let (server, _guard) = create_onboarded_server();

    let screen: ScreenResponse = server
        .get("/screen")
        .add_query_param("path", "/admin")
        .await
        .json();
    assert_eq!(screen.screen, "access_denied");

    let screen: ScreenResponse = server
        .get("/screen")
        .add_query_param("path", "/nowhere")
        .await
        .json();
    assert_eq!(screen.view, Some(View::Dashboard));
}

// =============================================================================
// LOGIN / ONBOARDING TESTS
// =============================================================================

#[tokio::test]
async fn test_login_success_lands_on_onboarding() {
    let guard = lock_env();
    let auth_url = spawn_auth_endpoint().await;
    let server = server_for(Session::new(), &auth_url);

    let response = server
        .post("/login")
        .json(&json!({ "email": "amina@example.com", "password": "correct horse" }))
        .await;

    response.assert_status_ok();
    let login: LoginResponse = response.json();
    assert_eq!(login.user.email, "amina@example.com");
    assert_eq!(login.screen, "onboarding");

    let session: SessionResponse = server.get("/session").await.json();
    assert!(session.authenticated);
    drop(guard);
}

#[tokio::test]
async fn test_login_rejected_shows_server_message() {
    let guard = lock_env();
    let auth_url = spawn_auth_endpoint().await;
    let server = server_for(Session::new(), &auth_url);

    let response = server
        .post("/login")
        .json(&json!({ "email": "amina@example.com", "password": "wrong" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let error: ErrorResponse = response.json();
    assert_eq!(error.error, "Invalid credentials");

    let session: SessionResponse = server.get("/session").await.json();
    assert!(!session.authenticated);
    assert_eq!(session.screen, "login");
    drop(guard);
}

#[tokio::test]
async fn test_login_unreachable_endpoint_is_bad_gateway() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/login")
        .json(&json!({ "email": "amina@example.com", "password": "x" }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let error: ErrorResponse = response.json();
    assert_eq!(error.error, "An error occurred during login.");
}

#[tokio::test]
async fn test_onboarding_then_logout() {
    let guard = lock_env();
    let auth_url = spawn_auth_endpoint().await;
    let server = server_for(Session::new(), &auth_url);
    server
        .post("/login")
        .json(&json!({ "email": "amina@example.com", "password": "correct horse" }))
        .await
        .assert_status_ok();

    let response = server
        .post("/onboarding")
        .json(&json!({ "language": "swahili", "responses": { "sleep": "poor" } }))
        .await;
    response.assert_status_ok();
    let session: SessionResponse = response.json();
    assert!(session.onboarding_complete);
    assert_eq!(session.language, Language::Swahili);
    assert_eq!(session.screen, "dashboard");

    let session: SessionResponse = server.post("/logout").await.json();
    assert!(!session.authenticated);
    assert!(session.onboarding_complete);
    drop(guard);
}

// =============================================================================
// CATALOG TESTS
// =============================================================================

#[tokio::test]
async fn test_categories_lists_seven() {
    let (server, _guard) = create_test_server();

    let categories: Vec<Value> = server.get("/categories").await.json();
    assert_eq!(categories.len(), 7);
    assert_eq!(categories[0]["id"], "relationships");
}

#[tokio::test]
async fn test_catalog_unknown_key_flags_fallback() {
    let (server, _guard) = create_test_server();

    let known: CatalogResponse = server.get("/solutions/catalog/work").await.json();
    assert!(!known.fallback);
    assert_eq!(known.plan.title, "Managing Work Stress");
    assert_eq!(known.total_steps, 15);

    let unknown: CatalogResponse = server.get("/solutions/catalog/astrology").await.json();
    assert!(unknown.fallback);
    assert_eq!(unknown.plan.title, "General Wellness Plan");
}

// =============================================================================
// INPUT / SOLUTIONS TESTS
// =============================================================================

#[tokio::test]
async fn test_submit_resolves_work_plan() {
    let (server, _guard) = create_onboarded_server();

    let input = submit_work(&server).await;
    assert_eq!(input.record.category_id, CategoryId::Work);
    assert_eq!(input.redirect, "/solutions");

    let response = server.get("/solutions").await;
    response.assert_status_ok();
    let solutions: SolutionsResponse = response.json();
    assert_eq!(solutions.plan.title, "Managing Work Stress");
    assert_eq!(solutions.plan.estimated_time, "2-4 weeks");
    assert_eq!(solutions.progress.completed_count, 0);
    assert_eq!(solutions.steps.len(), solutions.progress.total_steps);

    let state: InputStateResponse = server.get("/input/state").await.json();
    assert!(!state.can_submit);
}

#[tokio::test]
async fn test_submit_without_text_is_unprocessable() {
    let (server, _guard) = create_onboarded_server();

    let response = server
        .post("/input")
        .json(&json!({ "text": "   ", "category": "work" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let response = server
        .post("/input")
        .json(&json!({ "text": "Something is wrong" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_solutions_redirects_home_without_submission() {
    let (server, _guard) = create_onboarded_server();

    let response = server.get("/solutions").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");
}

#[tokio::test]
async fn test_toggle_step_and_progress() {
    let (server, _guard) = create_onboarded_server();
    submit_work(&server).await;
    server.get("/solutions").await.assert_status_ok();

    let toggle: ToggleResponse = server.post("/solutions/steps/immediate-0").await.json();
    assert!(toggle.completed);
    assert_eq!(toggle.step, StepId::Immediate(0));

    let toggle: ToggleResponse = server.post("/solutions/steps/1-2").await.json();
    assert!(toggle.completed);
    assert_eq!(toggle.progress.completed_count, 2);

    let toggle: ToggleResponse = server.post("/solutions/steps/immediate-0").await.json();
    assert!(!toggle.completed);

    let progress: ProgressResponse = server.get("/solutions/progress").await.json();
    assert_eq!(progress.completed, vec![StepId::Task { week: 1, task: 2 }]);
    assert_eq!(progress.total_steps, 15);
}

#[tokio::test]
async fn test_toggle_rejects_bad_steps() {
    let (server, _guard) = create_onboarded_server();
    submit_work(&server).await;
    server.get("/solutions").await.assert_status_ok();

    server
        .post("/solutions/steps/week-one")
        .await
        .assert_status_bad_request();
    server
        .post("/solutions/steps/immediate-01")
        .await
        .assert_status_bad_request();
    server
        .post("/solutions/steps/immediate-99")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_progress_without_plan_is_not_found() {
    let (server, _guard) = create_onboarded_server();

    server
        .get("/solutions/progress")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_new_submission_replaces_cached_plan() {
    let (server, _guard) = create_onboarded_server();
    submit_work(&server).await;
    server.get("/solutions").await.assert_status_ok();

    server
        .post("/input")
        .json(&json!({ "text": "We keep arguing", "category": "relationships" }))
        .await
        .assert_status_ok();

    let solutions: SolutionsResponse = server.get("/solutions").await.json();
    assert_eq!(solutions.plan.title, "Building Healthy Relationships");
}

// =============================================================================
// JOURNAL TESTS
// =============================================================================

#[tokio::test]
async fn test_journal_search_is_case_insensitive() {
    let (server, _guard) = create_test_server();

    let journal: JournalResponse = server
        .get("/journal")
        .add_query_param("search", "STRESS")
        .await
        .json();
    assert_eq!(journal.entries.len(), 1);
    assert_eq!(journal.tabs[0], "all");
    assert_eq!(journal.empty_message, None);
}

#[tokio::test]
async fn test_journal_empty_result_has_message() {
    let (server, _guard) = create_test_server();

    let journal: JournalResponse = server
        .get("/journal")
        .add_query_param("search", "zebra")
        .await
        .json();
    assert!(journal.entries.is_empty());
    assert_eq!(
        journal.empty_message.as_deref(),
        Some("No entries match your search criteria.")
    );
}

#[tokio::test]
async fn test_journal_unknown_category_is_bad_request() {
    let (server, _guard) = create_test_server();

    server
        .get("/journal")
        .add_query_param("category", "astrology")
        .await
        .assert_status_bad_request();
}

// =============================================================================
// AUTHENTICATION TESTS
// =============================================================================

fn create_auth_test_server(api_key: &str) -> TestServer {
    // SAFETY: Tests run sequentially under AUTH_TEST_MUTEX, so no concurrent env access.
    unsafe { std::env::set_var("MIKECARE_API_KEY", api_key) };
    server_for(Session::new(), "http://127.0.0.1:9/api/login")
}

#[tokio::test]
async fn test_auth_missing_key_is_unauthorized() {
    let _guard = lock_env();
    let server = create_auth_test_server("test-secret-key-12345");

    server
        .get("/categories")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server.get("/health").await.assert_status_ok();
}

#[tokio::test]
async fn test_auth_valid_bearer_token() {
    let _guard = lock_env();
    let api_key = "test-secret-key-12345";
    let server = create_auth_test_server(api_key);

    let response = server
        .get("/categories")
        .add_header(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {}", api_key)
                .parse::<HeaderValue>()
                .unwrap(),
        )
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_auth_wrong_key_is_unauthorized() {
    let _guard = lock_env();
    let server = create_auth_test_server("test-secret-key-12345");

    server
        .get("/categories")
        .add_header(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer nope"),
        )
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
