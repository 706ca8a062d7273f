//! # MikeCare - Wellness Companion
//!
//! The main binary for MikeCare.
//!
//! This application provides:
//! - HTTP JSON API over the user session (axum-based)
//! - CLI interface for the same operations
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                apps/mikecare (THE BINARY)            │
//! │                                                      │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────┐  │
//! │  │   CLI       │  │   HTTP API  │  │ Auth client  │  │
//! │  │  (clap)     │  │   (axum)    │  │  (reqwest)   │  │
//! │  └──────┬──────┘  └──────┬──────┘  └──────┬───────┘  │
//! │         └────────────────┼────────────────┘          │
//! │                          ▼                           │
//! │                 ┌─────────────────┐                  │
//! │                 │  mikecare-core  │                  │
//! │                 └─────────────────┘                  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! mikecare server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! mikecare status
//! mikecare submit -t "My manager keeps piling on work" -C work
//! mikecare solutions --complete immediate-0,0-1
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // MIKECARE_LOG_FORMAT=json switches to machine-parseable output.
    let log_format = std::env::var("MIKECARE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mikecare=info,mikecare_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = mikecare::cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = mikecare::cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_banner() {
    println!(
        r#"
  MikeCare v{}
  A place to put down what is on your mind.
"#,
        env!("CARGO_PKG_VERSION")
    );
}
