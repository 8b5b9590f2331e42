#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Reconciliation engine that turns a daemon's raw queue into canonical items.
//!
//! Layout: `settings.rs` (per-client knobs), `snapshot.rs` (pure per-record
//! reconciliation), `host.rs` (client status helpers), `engine.rs` (async
//! operations over a [`seedwarden_core::TorrentClientProxy`]).

pub mod engine;
pub mod host;
pub mod settings;
pub mod snapshot;

pub use engine::ReconciliationEngine;
pub use host::{is_localhost, output_root};
pub use settings::{EngineSettings, MINIMUM_TRANSMISSION_VERSION};
pub use snapshot::{Reconciled, reconcile, requires_seeding_limits};
