//! Reprise CLI
//!
//! Wiring for the `reprise` binary: configuration, service construction and
//! the interactive session.

pub mod app;
pub mod commands;
pub mod config;
pub mod session;

pub use app::App;
pub use config::RepriseConfig;
