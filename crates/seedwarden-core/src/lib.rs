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

//! Client-agnostic download queue model and the pure policies applied to it.
//!
//! Layout: `model` (raw and canonical records), `service` (proxy capability
//! trait), and one module per policy: `eta`, `magnet`, `status`, `seeding`,
//! `scope`, `version`. Nothing in this crate performs IO; adapters implement
//! [`TorrentClientProxy`] and the engine crate drives the policies.

pub mod error;
pub mod eta;
pub mod magnet;
pub mod model;
pub mod scope;
pub mod seeding;
pub mod service;
pub mod status;
pub mod version;

pub use error::{QueueError, QueueResult};
pub use model::{
    CanonicalQueueItem, ClientStatus, LimitMode, QueueItemStatus, RawTorrentRecord,
    RawTorrentStatus, ScopeConfig, SeedingLimits, TorrentErrorKind, TorrentFault,
    TorrentSubmission,
};
pub use service::TorrentClientProxy;
