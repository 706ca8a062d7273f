//! # MikeCare CLI Module
//!
//! This module implements the CLI interface for MikeCare.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `categories` - List concern categories
//! - `solution` - Show the plan for a category key
//! - `submit` - Submit a concern and resolve a plan
//! - `solutions` - Open the plan for the latest submission
//! - `journal` - Search the sample journal
//! - `login` / `logout` - Sign in through the auth endpoint, or sign out
//! - `onboard` - Complete onboarding
//! - `status` - Show session state
//! - `init` - Initialize a new database

mod commands;

use crate::AppError;
use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// MikeCare - wellness companion
///
/// Describe what is on your mind, pick a category, and work through a plan.
#[derive(Parser, Debug)]
#[command(name = "mikecare")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the session database
    #[arg(short = 'D', long, global = true, default_value = "mikecare.db")]
    pub database: PathBuf,

    /// Storage backend: "redb" (persistent) or "memory" (lost on exit)
    #[arg(short = 'B', long, global = true, default_value = "redb")]
    pub backend: String,

    /// Configuration file (TOML). Defaults to ./mikecare.toml if present
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List concern categories
    Categories,

    /// Show the solution plan for a category key
    Solution {
        /// Category key (unknown keys get the general plan)
        category: String,
    },

    /// Submit a concern
    Submit {
        /// What is on your mind
        #[arg(short, long)]
        text: String,

        /// Category key
        #[arg(short = 'C', long)]
        category: String,

        /// Attach a voice note marker
        #[arg(long)]
        voice_note: bool,

        /// Analysis delay in milliseconds (overrides config)
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Open the plan for the latest submission
    Solutions {
        /// Step ids to mark complete (e.g. immediate-0, 1-2)
        #[arg(long = "complete", value_delimiter = ',')]
        complete: Vec<String>,
    },

    /// Search the sample journal
    Journal {
        /// Case-insensitive search term
        #[arg(short, long, default_value = "")]
        search: String,

        /// Category tab ("all" or a category key)
        #[arg(short = 'C', long, default_value = "all")]
        category: String,
    },

    /// Sign in through the auth endpoint
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Register a new account with this display name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Sign out
    Logout,

    /// Complete onboarding
    Onboard {
        /// Preferred language (english, swahili)
        #[arg(short, long, default_value = "english")]
        language: String,

        /// Questionnaire answers as a JSON object
        #[arg(short, long)]
        responses: Option<String>,
    },

    /// Show session state
    Status,

    /// Initialize a new empty database
    Init {
        /// Force initialization even if database exists
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let config = Config::load(cli.config.as_deref())?;
    if cli.verbose {
        tracing::info!(?config, "Configuration loaded");
    }

    let ctx = Context {
        database: cli.database,
        backend: cli.backend.parse()?,
        json_mode: cli.json_mode,
    };

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(&ctx, config, host, port).await,
        Some(Commands::Categories) => cmd_categories(&ctx),
        Some(Commands::Solution { category }) => cmd_solution(&ctx, &category),
        Some(Commands::Submit {
            text,
            category,
            voice_note,
            delay_ms,
        }) => cmd_submit(&ctx, &config, text, &category, voice_note, delay_ms).await,
        Some(Commands::Solutions { complete }) => cmd_solutions(&ctx, &complete),
        Some(Commands::Journal { search, category }) => cmd_journal(&ctx, &search, &category),
        Some(Commands::Login {
            email,
            password,
            name,
        }) => cmd_login(&ctx, &config, email, password, name).await,
        Some(Commands::Logout) => cmd_logout(&ctx),
        Some(Commands::Onboard {
            language,
            responses,
        }) => cmd_onboard(&ctx, &language, responses.as_deref()),
        Some(Commands::Init { force }) => cmd_init(&ctx, force),
        Some(Commands::Status) | None => cmd_status(&ctx),
    }
}
