//! # MikeCare
//!
//! The application layer over `mikecare-core`: HTTP API, CLI, configuration,
//! the authentication client, and the simulated analysis step.
//!
//! The binary in `main.rs` only initialises logging and dispatches to
//! [`cli::execute`].

pub mod analysis;
pub mod api;
pub mod auth_client;
pub mod cli;
pub mod config;
pub mod error;

pub use error::AppError;
