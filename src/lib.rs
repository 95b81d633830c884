//! `fulcrum-plan` library crate.
//!
//! The binary (`fulcrum`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future fetch orchestration, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod plan;
pub mod report;
pub mod validate;
