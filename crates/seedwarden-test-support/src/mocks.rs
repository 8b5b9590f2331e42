//! In-memory download client used by engine and app suites.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use seedwarden_core::{
    QueueError, QueueResult, RawTorrentRecord, SeedingLimits, TorrentClientProxy,
};

/// Submission captured by [`StaticProxy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedSubmission {
    /// Metainfo payload submission.
    Data {
        /// Payload bytes.
        metainfo: Vec<u8>,
        /// Requested download directory.
        download_dir: Option<String>,
    },
    /// URL or magnet submission.
    Url {
        /// Submitted URL.
        url: String,
        /// Requested download directory.
        download_dir: Option<String>,
    },
}

#[derive(Debug)]
struct ProxyState {
    records: Vec<RawTorrentRecord>,
    version: String,
    default_dir: Option<String>,
    session_limits: SeedingLimits,
    assigned_hash: String,
    offline: bool,
    list_calls: usize,
    session_calls: usize,
    submissions: Vec<RecordedSubmission>,
}

/// Proxy that serves a fixed record list and records every call.
///
/// Clones share state, so a test can keep a handle after moving one into the
/// engine.
#[derive(Debug, Clone)]
pub struct StaticProxy {
    state: Arc<Mutex<ProxyState>>,
}

impl StaticProxy {
    /// Serve `records` from a daemon advertising a supported version.
    #[must_use]
    pub fn new(records: Vec<RawTorrentRecord>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ProxyState {
                records,
                version: "2.84 ()".to_string(),
                default_dir: None,
                session_limits: SeedingLimits::default(),
                assigned_hash: "ASSIGNED".to_string(),
                offline: false,
                list_calls: 0,
                session_calls: 0,
                submissions: Vec::new(),
            })),
        }
    }

    /// Advertise a different version string.
    #[must_use]
    pub fn with_version(self, version: &str) -> Self {
        self.lock().version = version.to_string();
        self
    }

    /// Report a default download directory.
    #[must_use]
    pub fn with_default_dir(self, dir: &str) -> Self {
        self.lock().default_dir = Some(dir.to_string());
        self
    }

    /// Report session-wide seeding limits.
    #[must_use]
    pub fn with_session_limits(self, limits: SeedingLimits) -> Self {
        self.lock().session_limits = limits;
        self
    }

    /// Identifier echoed for every submission.
    #[must_use]
    pub fn with_assigned_hash(self, hash: &str) -> Self {
        self.lock().assigned_hash = hash.to_string();
        self
    }

    /// Toggle whether every call fails as if the daemon were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Replace the served records.
    pub fn set_records(&self, records: Vec<RawTorrentRecord>) {
        self.lock().records = records;
    }

    /// Number of `list_torrents` calls observed.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.lock().list_calls
    }

    /// Number of `get_session_limits` calls observed.
    #[must_use]
    pub fn session_calls(&self) -> usize {
        self.lock().session_calls
    }

    /// Submissions observed, in order.
    #[must_use]
    pub fn submissions(&self) -> Vec<RecordedSubmission> {
        self.lock().submissions.clone()
    }

    fn lock(&self) -> MutexGuard<'_, ProxyState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn ensure_online(&self, operation: &'static str) -> QueueResult<()> {
        if self.lock().offline {
            return Err(QueueError::client_unavailable(
                operation,
                io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl TorrentClientProxy for StaticProxy {
    async fn list_torrents(&self) -> QueueResult<Vec<RawTorrentRecord>> {
        self.lock().list_calls += 1;
        self.ensure_online("list_torrents")?;
        Ok(self.lock().records.clone())
    }

    async fn add_torrent_from_data(
        &self,
        metainfo: &[u8],
        download_dir: Option<&str>,
    ) -> QueueResult<String> {
        self.ensure_online("add_torrent_from_data")?;
        let mut state = self.lock();
        state.submissions.push(RecordedSubmission::Data {
            metainfo: metainfo.to_vec(),
            download_dir: download_dir.map(str::to_string),
        });
        Ok(state.assigned_hash.clone())
    }

    async fn add_torrent_from_url(
        &self,
        url: &str,
        download_dir: Option<&str>,
    ) -> QueueResult<String> {
        self.ensure_online("add_torrent_from_url")?;
        let mut state = self.lock();
        state.submissions.push(RecordedSubmission::Url {
            url: url.to_string(),
            download_dir: download_dir.map(str::to_string),
        });
        Ok(state.assigned_hash.clone())
    }

    async fn get_client_version(&self) -> QueueResult<String> {
        self.ensure_online("get_client_version")?;
        Ok(self.lock().version.clone())
    }

    async fn get_default_download_dir(&self) -> QueueResult<Option<String>> {
        self.ensure_online("get_default_download_dir")?;
        Ok(self.lock().default_dir.clone())
    }

    async fn get_session_limits(&self) -> QueueResult<SeedingLimits> {
        self.lock().session_calls += 1;
        self.ensure_online("get_session_limits")?;
        Ok(self.lock().session_limits)
    }
}
