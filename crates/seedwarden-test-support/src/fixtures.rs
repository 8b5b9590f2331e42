//! Record builders shared by integration suites.

use std::time::Duration;

use seedwarden_core::{
    LimitMode, RawTorrentRecord, RawTorrentStatus, TorrentErrorKind, TorrentFault,
};

/// Info hash used by the sample records.
pub const SAMPLE_HASH: &str = "CBC2F069FE8BB2F544EAE707D75BCD3DE9DCF951";
/// Magnet URI whose base32 `btih` decodes to [`SAMPLE_HASH`].
pub const SAMPLE_MAGNET: &str =
    "magnet:?xt=urn:btih:ZPBPA2P6ROZPKRHK44D5OW6NHXU5Z6KR&tr=udp&dn=Droned.S01E01";
/// Title used by the sample records.
pub const SAMPLE_TITLE: &str = "Droned.S01E01.Pilot.1080p.WEB-DL-DRONE";
/// Daemon download root used by the sample records.
pub const SAMPLE_DOWNLOAD_DIR: &str = "C:/Downloads/Finished/transmission";

/// Fluent builder for [`RawTorrentRecord`] fixtures.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: RawTorrentRecord,
}

impl RecordBuilder {
    /// Start from an unfinished, downloading record.
    #[must_use]
    pub fn new(hash: &str, name: &str) -> Self {
        Self {
            record: RawTorrentRecord {
                hash: hash.to_string(),
                name: name.to_string(),
                status: RawTorrentStatus::Downloading,
                download_dir: SAMPLE_DOWNLOAD_DIR.to_string(),
                finished: false,
                total_size: 1_000,
                left_until_done: 100,
                ratio: 0.0,
                seeding_time: Duration::ZERO,
                eta: 30,
                ratio_limit: LimitMode::Global,
                idle_limit: LimitMode::Global,
                error: None,
            },
        }
    }

    /// Sample record waiting in the daemon queue.
    #[must_use]
    pub fn queued() -> Self {
        Self::new(SAMPLE_HASH, SAMPLE_TITLE).status(RawTorrentStatus::Queued)
    }

    /// Sample record actively downloading.
    #[must_use]
    pub fn downloading() -> Self {
        Self::new(SAMPLE_HASH, SAMPLE_TITLE)
    }

    /// Sample record fully downloaded and seeding.
    #[must_use]
    pub fn completed() -> Self {
        Self::new(SAMPLE_HASH, SAMPLE_TITLE)
            .status(RawTorrentStatus::Seeding)
            .finished(true)
            .left_until_done(0)
            .eta(-1)
    }

    /// Magnet record whose metadata has not been fetched yet.
    #[must_use]
    pub fn metadata_pending(hash: &str) -> Self {
        Self::new(hash, "").total_size(0).left_until_done(0).eta(-1)
    }

    /// Set the raw daemon status.
    #[must_use]
    pub const fn status(mut self, status: RawTorrentStatus) -> Self {
        self.record.status = status;
        self
    }

    /// Set the daemon finished signal.
    #[must_use]
    pub const fn finished(mut self, finished: bool) -> Self {
        self.record.finished = finished;
        self
    }

    /// Set the download directory.
    #[must_use]
    pub fn download_dir(mut self, dir: &str) -> Self {
        self.record.download_dir = dir.to_string();
        self
    }

    /// Set the total payload size.
    #[must_use]
    pub const fn total_size(mut self, bytes: u64) -> Self {
        self.record.total_size = bytes;
        self
    }

    /// Set the remaining byte count.
    #[must_use]
    pub const fn left_until_done(mut self, bytes: u64) -> Self {
        self.record.left_until_done = bytes;
        self
    }

    /// Set the share ratio.
    #[must_use]
    pub const fn ratio(mut self, ratio: f64) -> Self {
        self.record.ratio = ratio;
        self
    }

    /// Set seeding time in minutes.
    #[must_use]
    pub const fn seeding_minutes(mut self, minutes: u64) -> Self {
        self.record.seeding_time = Duration::from_secs(minutes * 60);
        self
    }

    /// Set the raw ETA value.
    #[must_use]
    pub const fn eta(mut self, eta: i64) -> Self {
        self.record.eta = eta;
        self
    }

    /// Set the per-item ratio limit mode.
    #[must_use]
    pub const fn ratio_limit(mut self, mode: LimitMode<f64>) -> Self {
        self.record.ratio_limit = mode;
        self
    }

    /// Set a per-item idle limit override in minutes.
    #[must_use]
    pub const fn idle_override_minutes(mut self, minutes: u64) -> Self {
        self.record.idle_limit = LimitMode::Override(Duration::from_secs(minutes * 60));
        self
    }

    /// Set the per-item idle limit mode.
    #[must_use]
    pub const fn idle_limit(mut self, mode: LimitMode<Duration>) -> Self {
        self.record.idle_limit = mode;
        self
    }

    /// Attach a daemon error.
    #[must_use]
    pub fn error(mut self, kind: TorrentErrorKind, message: &str) -> Self {
        self.record.error = Some(TorrentFault {
            kind,
            message: message.to_string(),
        });
        self
    }

    /// Finish the record.
    #[must_use]
    pub fn build(self) -> RawTorrentRecord {
        self.record
    }
}
