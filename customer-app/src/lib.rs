//! Customer application
//!
//! Entry points that wire configuration, container and repository together for each call.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Per-call customer operations
pub mod app;

/// Environment and error types
pub mod types;
