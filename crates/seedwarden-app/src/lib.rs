#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Seedwarden application bootstrap wiring.
//!
//! Layout: `bootstrap.rs` (configuration, telemetry and client wiring),
//! `poller.rs` (per-client poll loop).

/// Application bootstrap and shutdown.
pub mod bootstrap;
/// Application error types.
pub mod error;
mod poller;

pub use bootstrap::run_app;
pub use error::{AppError, AppResult};
