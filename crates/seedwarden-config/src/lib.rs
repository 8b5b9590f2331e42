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

//! File-backed configuration for the reconciliation service.
//!
//! Layout: `model.rs` (typed documents and conversions into core types),
//! `validate.rs` (validation rules), `loader.rs` (file and environment loading).

pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, LOG_LEVEL_ENV, apply_env_overrides, load_from_env,
    load_from_path, load_with_env, parse_document,
};
pub use model::{AppConfig, ClientSettings, LoggingSettings, SeedingPolicy};
pub use validate::validate;
