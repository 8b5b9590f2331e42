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

//! Transmission JSON-RPC adapter implementing the download-client proxy.
//!
//! Layout: `rpc.rs` (transport and session handshake), `wire.rs` (payloads),
//! `convert.rs` (payload to core record mapping), `proxy.rs` (trait impl).

pub mod convert;
pub mod error;
pub mod proxy;
pub mod rpc;
pub mod wire;

pub use error::TransmissionError;
pub use proxy::TransmissionProxy;
pub use rpc::{Endpoint, RpcClient, SESSION_ID_HEADER};
pub use wire::{SESSION_FIELDS, SessionInfo, TORRENT_FIELDS, WireTorrent};
