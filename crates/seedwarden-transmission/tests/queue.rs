use std::time::Duration;

use httpmock::MockServer;
use httpmock::prelude::*;
use seedwarden_core::{QueueItemStatus, SeedingLimits, TorrentClientProxy};
use seedwarden_engine::{EngineSettings, ReconciliationEngine};
use seedwarden_telemetry::Metrics;
use seedwarden_transmission::{Endpoint, TORRENT_FIELDS, TransmissionProxy};
use serde_json::json;

const RPC_PATH: &str = "/transmission/rpc";

fn proxy(server: &MockServer) -> anyhow::Result<TransmissionProxy> {
    Ok(TransmissionProxy::new(&Endpoint {
        host: server.host(),
        port: server.port(),
        use_ssl: false,
        url_base: "/transmission/".to_string(),
        username: None,
        password: None,
    })?)
}

fn seeding_torrent(status: i64, left_until_done: i64) -> serde_json::Value {
    json!({
        "hashString": "cbc2f069fe8bb2f544eae707d75bcd3de9dcf951",
        "name": "Droned.S01E01.Pilot.1080p.WEB-DL-DRONE",
        "downloadDir": "/downloads/complete",
        "totalSize": 1000,
        "leftUntilDone": left_until_done,
        "isFinished": false,
        "eta": -1,
        "status": status,
        "secondsSeeding": 600,
        "errorString": "",
        "error": 0,
        "uploadedEver": 500,
        "downloadedEver": 1000,
        "seedRatioLimit": 2.0,
        "seedRatioMode": 0,
        "seedIdleLimit": 10,
        "seedIdleMode": 0
    })
}

fn mock_listing<'a>(server: &'a MockServer, torrents: &[serde_json::Value]) -> httpmock::Mock<'a> {
    server.mock(|when, then| {
        when.method(POST)
            .path(RPC_PATH)
            .json_body(json!({
                "method": "torrent-get",
                "arguments": { "fields": TORRENT_FIELDS }
            }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "result": "success",
                "arguments": { "torrents": torrents }
            }));
    })
}

fn engine(server: &MockServer) -> anyhow::Result<ReconciliationEngine<TransmissionProxy>> {
    let policy = SeedingLimits {
        ratio_limit: Some(2.0),
        idle_limit: Some(Duration::from_secs(3_600)),
    };
    let settings = EngineSettings::new("seedbox", server.host()).with_seeding(policy);
    Ok(ReconciliationEngine::new(proxy(server)?, settings, Metrics::new()?))
}

#[tokio::test]
async fn torrent_still_seeding_is_listed_as_finished() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let listing = mock_listing(&server, &[seeding_torrent(6, 0)]);

    let records = proxy(&server)?.list_torrents().await?;
    listing.assert();

    assert_eq!(records.len(), 1);
    assert!(records[0].finished);
    assert!(records[0].is_seeding());
    Ok(())
}

#[tokio::test]
async fn torrent_still_seeding_reports_completed() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let listing = mock_listing(&server, &[seeding_torrent(6, 0), seeding_torrent(4, 250)]);

    let items = engine(&server)?.get_items().await?;
    listing.assert();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].download_id, "CBC2F069FE8BB2F544EAE707D75BCD3DE9DCF951");
    assert_eq!(items[0].status, QueueItemStatus::Completed);
    assert_eq!(items[0].remaining_size, 0);
    assert!(!items[0].can_be_removed);
    assert_eq!(items[1].status, QueueItemStatus::Downloading);
    assert_eq!(items[1].remaining_size, 250);
    Ok(())
}
