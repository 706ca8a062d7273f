//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Every command opens the session from the database, does one thing, and
//! exits. With the redb backend state carries over between invocations; with
//! the memory backend each command starts fresh.

use crate::AppError;
use crate::analysis::{Draft, SimulatedAnalysis, SubmitOutcome, submit_draft};
use crate::api;
use crate::auth_client::AuthClient;
use crate::config::Config;
use mikecare_core::{
    CategoryFilter, CategoryId, Credentials, Language, OnboardingResponses, Session,
    SolutionCatalog, SolutionPlan, SolutionsView, StepId, journal, list_categories,
    primitives::MAX_SUBMISSION_TEXT_LENGTH, progress::plan_steps,
};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

// =============================================================================
// CONTEXT
// =============================================================================

/// Storage backend selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Redb,
    Memory,
}

impl Backend {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Redb => "redb",
            Backend::Memory => "memory",
        }
    }
}

impl FromStr for Backend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "redb" => Ok(Backend::Redb),
            "memory" => Ok(Backend::Memory),
            other => Err(AppError::Usage(format!(
                "Unknown backend '{}'. Use 'redb' or 'memory'.",
                other
            ))),
        }
    }
}

/// Global options shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub database: PathBuf,
    pub backend: Backend,
    pub json_mode: bool,
}

impl Context {
    /// Open the session for this invocation.
    pub fn open_session(&self) -> Result<Session, AppError> {
        match self.backend {
            Backend::Redb => Ok(Session::with_redb(&self.database)?),
            Backend::Memory => Ok(Session::new()),
        }
    }
}

fn print_json(value: &impl serde::Serialize) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

fn print_plan(plan: &SolutionPlan) {
    println!("{}", plan.title);
    println!("{}", "=".repeat(plan.title.chars().count()));
    if let Some(category) = &plan.category {
        println!("Category:       {}", category);
    }
    println!("Estimated time: {}", plan.estimated_time);
    println!();
    println!("{}", plan.description);
    println!();
    println!("Immediate steps:");
    for (i, step) in plan.immediate_steps.iter().enumerate() {
        println!("  [{}] {}", StepId::Immediate(i), step);
    }
    println!();
    println!("Healing plan:");
    for (w, week) in plan.healing_plan.iter().enumerate() {
        println!("  Week {}: {}", week.week, week.title);
        for (t, task) in week.tasks.iter().enumerate() {
            println!("    [{}] {}", StepId::Task { week: w, task: t }, task);
        }
    }
    if !plan.resources.is_empty() {
        println!();
        println!("Resources:");
        for resource in &plan.resources {
            let contact = resource
                .contact
                .as_deref()
                .or(resource.link.as_deref())
                .unwrap_or("");
            println!("  - {} ({:?}) {}", resource.title, resource.kind, contact);
        }
    }
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    ctx: &Context,
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), AppError> {
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    let session = ctx.open_session()?;

    println!("MikeCare Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Address:  {}", config.bind_addr());
    println!("  Backend:  {}", ctx.backend.as_str());
    println!("  Database: {:?}", ctx.database);
    println!("  Auth URL: {}", config.auth_url);
    println!("  Delay:    {} ms", config.analysis_delay_ms);
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&config, session).await
}

// =============================================================================
// CATALOG COMMANDS
// =============================================================================

/// List concern categories.
pub fn cmd_categories(ctx: &Context) -> Result<(), AppError> {
    let categories = list_categories();
    if ctx.json_mode {
        print_json(&categories);
        return Ok(());
    }
    for category in categories {
        println!(
            "{:<14} {:<26} {}",
            category.id, category.display_name, category.description
        );
    }
    Ok(())
}

/// Show the plan for a raw category key.
pub fn cmd_solution(ctx: &Context, category: &str) -> Result<(), AppError> {
    let catalog = SolutionCatalog::builtin();
    let fallback = catalog.lookup(category).is_none();
    if fallback {
        tracing::warn!(category = %category, "Unknown category, showing default plan");
    }
    let plan = catalog.resolve(category);

    if ctx.json_mode {
        print_json(&serde_json::json!({
            "category": category,
            "fallback": fallback,
            "total_steps": plan.total_steps(),
            "plan": plan,
        }));
        return Ok(());
    }
    print_plan(plan);
    Ok(())
}

// =============================================================================
// SUBMISSION COMMANDS
// =============================================================================

/// Submit a concern and wait out the analysis delay.
pub async fn cmd_submit(
    ctx: &Context,
    config: &Config,
    text: String,
    category: &str,
    voice_note: bool,
    delay_ms: Option<u64>,
) -> Result<(), AppError> {
    let category: CategoryId = category.parse()?;
    let delay = delay_ms.map_or_else(|| config.analysis_delay(), Duration::from_millis);
    let session = Arc::new(RwLock::new(ctx.open_session()?));

    if !ctx.json_mode {
        println!("Analyzing your situation...");
    }
    let draft = Draft {
        text,
        category: Some(category),
        voice_note,
    };
    match submit_draft(&session, SimulatedAnalysis::new(delay), draft).await? {
        SubmitOutcome::Resolved(record) => {
            if ctx.json_mode {
                print_json(&record);
            } else {
                println!("Saved. Run `mikecare solutions` to see your plan.");
            }
            Ok(())
        }
        SubmitOutcome::Blocked => Err(AppError::Usage(
            "Nothing to submit: describe what is on your mind.".to_string(),
        )),
        SubmitOutcome::TooLong(len) => Err(AppError::Usage(format!(
            "Text is {} bytes; the limit is {} bytes.",
            len, MAX_SUBMISSION_TEXT_LENGTH
        ))),
        SubmitOutcome::InProgress => Err(mikecare_core::CareError::SubmissionInProgress.into()),
    }
}

/// Open the plan for the latest submission, optionally completing steps.
pub fn cmd_solutions(ctx: &Context, complete: &[String]) -> Result<(), AppError> {
    let mut session = ctx.open_session()?;

    let plan = match session.open_solutions()? {
        SolutionsView::Ready(plan) => plan,
        SolutionsView::RedirectHome => {
            if ctx.json_mode {
                print_json(&serde_json::json!({ "redirect": "/" }));
            } else {
                println!("No submission yet. Run `mikecare submit` first.");
            }
            return Ok(());
        }
    };

    for raw in complete {
        let step: StepId = raw.parse()?;
        session.toggle_step(step)?;
    }
    let completion = session
        .completion()
        .ok_or_else(|| AppError::Usage("No plan is open".to_string()))?;

    if ctx.json_mode {
        print_json(&serde_json::json!({
            "plan": plan,
            "steps": plan_steps(&plan),
            "completed": session.progress().iter().collect::<Vec<_>>(),
            "percent": completion.percent,
            "ratio": session.completion_ratio(),
        }));
        return Ok(());
    }

    print_plan(&plan);
    println!();
    println!(
        "Progress: {}/{} steps ({}%)",
        completion.completed, completion.total, completion.percent
    );
    Ok(())
}

// =============================================================================
// JOURNAL COMMAND
// =============================================================================

/// Search the sample journal.
pub fn cmd_journal(ctx: &Context, search: &str, category: &str) -> Result<(), AppError> {
    let filter: CategoryFilter = category.parse()?;
    let entries = journal::filter(journal::sample_entries(), search, filter);

    if ctx.json_mode {
        print_json(&entries);
        return Ok(());
    }
    if entries.is_empty() {
        println!("{}", journal::empty_state_message(search, filter));
        return Ok(());
    }
    for entry in entries {
        println!(
            "{}  [{}] {} (mood: {})",
            entry.date,
            entry.category,
            entry.title,
            entry.mood.label()
        );
        println!("    {}", entry.excerpt);
        let tags: Vec<&str> = entry.tags.iter().map(String::as_str).collect();
        println!("    tags: {}", tags.join(", "));
    }
    Ok(())
}

// =============================================================================
// SESSION COMMANDS
// =============================================================================

/// Sign in through the configured auth endpoint.
pub async fn cmd_login(
    ctx: &Context,
    config: &Config,
    email: String,
    password: String,
    name: Option<String>,
) -> Result<(), AppError> {
    let credentials = match name {
        Some(name) => Credentials::register(name, email, password),
        None => Credentials::login(email, password),
    };
    let client = AuthClient::new(config.auth_url.clone(), config.auth_timeout())?;

    let user = match client.authenticate(&credentials).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            eprintln!("{}", e.alert_text());
            return Err(e.into());
        }
    };

    let mut session = ctx.open_session()?;
    session.login(user)?;
    if ctx.json_mode {
        print_json(session.state());
    } else if let Some(user) = session.user() {
        println!("Welcome, {}!", user.display_name());
    }
    Ok(())
}

/// Sign out.
pub fn cmd_logout(ctx: &Context) -> Result<(), AppError> {
    let mut session = ctx.open_session()?;
    session.logout()?;
    if !ctx.json_mode {
        println!("Signed out.");
    }
    Ok(())
}

/// Complete onboarding.
pub fn cmd_onboard(
    ctx: &Context,
    language: &str,
    responses: Option<&str>,
) -> Result<(), AppError> {
    let language: Language = language.parse()?;
    let responses: OnboardingResponses = match responses {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| AppError::Usage(format!("Invalid --responses JSON: {}", e)))?,
        None => OnboardingResponses::new(),
    };

    let mut session = ctx.open_session()?;
    session.complete_onboarding(language, &responses)?;
    if !ctx.json_mode {
        println!("Onboarding complete. Language: {}", language);
    }
    Ok(())
}

/// Show session state.
pub fn cmd_status(ctx: &Context) -> Result<(), AppError> {
    let session = ctx.open_session()?;
    let state = session.state();
    let landing = session.screen_for("/");
    let current = session.current_input()?;

    if ctx.json_mode {
        print_json(&serde_json::json!({
            "database": ctx.database.to_string_lossy(),
            "backend": ctx.backend.as_str(),
            "state": state,
            "screen": landing.label(),
            "current_input": current,
        }));
        return Ok(());
    }

    println!("MikeCare Session Status");
    println!("=======================");
    println!("Database:   {:?}", ctx.database);
    println!("Backend:    {}", ctx.backend.as_str());
    println!();
    match &state.user {
        Some(user) => println!("User:       {} <{}>", user.display_name(), user.email),
        None => println!("User:       (signed out)"),
    }
    println!("Onboarded:  {}", state.onboarding_complete);
    println!("Language:   {}", state.language);
    println!("Screen:     {}", landing.label());
    if let Some(record) = current {
        println!(
            "Last input: [{}] {}",
            record.category_id,
            record.timestamp.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new database.
pub fn cmd_init(ctx: &Context, force: bool) -> Result<(), AppError> {
    if ctx.backend == Backend::Memory {
        return Err(AppError::Usage(
            "The memory backend has nothing to initialize.".to_string(),
        ));
    }
    if ctx.database.exists() {
        if !force {
            return Err(AppError::Usage(
                "Database already exists. Use --force to overwrite.".to_string(),
            ));
        }
        std::fs::remove_file(&ctx.database)?;
    }
    let _session = Session::with_redb(&ctx.database)?;
    println!("Initialized new redb database at {:?}", ctx.database);
    Ok(())
}
