use std::io::Write;
use std::time::Duration;

use seedwarden_config::{
    CONFIG_PATH_ENV, ConfigError, LOG_LEVEL_ENV, load_from_path, load_with_env,
};
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> anyhow::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

const FULL_DOCUMENT: &str = r#"{
    "logging": { "level": "warn", "format": "json" },
    "poll_interval_secs": 15,
    "seeding": { "ratio_limit": 2.0, "idle_limit_minutes": 30 },
    "clients": [
        {
            "name": "seedbox",
            "host": "10.0.0.5",
            "port": 9092,
            "use_ssl": true,
            "url_base": "/rpc-base/",
            "username": "admin",
            "password": "secret",
            "category": "radarr"
        },
        { "name": "local", "host": "localhost", "directory": "/data/complete/sonarr" }
    ]
}"#;

#[tokio::test]
async fn loads_full_document_from_disk() -> anyhow::Result<()> {
    let file = write_config(FULL_DOCUMENT)?;
    let config = load_from_path(file.path()).await?;

    assert_eq!(config.poll_interval(), Duration::from_secs(15));
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format.as_deref(), Some("json"));

    let limits = config.seeding.limits();
    assert_eq!(limits.ratio_limit, Some(2.0));
    assert_eq!(limits.idle_limit, Some(Duration::from_secs(1_800)));

    let seedbox = &config.clients[0];
    assert_eq!(seedbox.port, 9092);
    assert!(seedbox.use_ssl);
    assert_eq!(seedbox.scope().category(), Some("radarr"));

    let local = &config.clients[1];
    assert_eq!(local.port, 9091);
    assert_eq!(local.url_base, "/transmission/");
    assert_eq!(local.scope().directory(), Some("/data/complete/sonarr"));
    Ok(())
}

#[tokio::test]
async fn env_lookup_selects_file_and_overrides_level() -> anyhow::Result<()> {
    let file = write_config(FULL_DOCUMENT)?;
    let path = file.path().to_string_lossy().into_owned();
    let config = load_with_env(|name| match name {
        CONFIG_PATH_ENV => Some(path.clone()),
        LOG_LEVEL_ENV => Some("seedwarden_engine=debug".to_string()),
        _ => None,
    })
    .await?;
    assert_eq!(config.logging.level, "seedwarden_engine=debug");
    assert_eq!(config.clients.len(), 2);
    Ok(())
}

#[tokio::test]
async fn missing_file_reports_io_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("absent.json");
    match load_from_path(&missing).await {
        Err(ConfigError::Io { operation, path, .. }) => {
            assert_eq!(operation, "config.read");
            assert_eq!(path, missing);
        }
        other => panic!("expected io error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn invalid_document_fails_validation() -> anyhow::Result<()> {
    let file = write_config(
        r#"{ "clients": [ { "name": "a", "host": "h" }, { "name": "a", "host": "h2" } ] }"#,
    )?;
    let result = load_from_path(file.path()).await;
    assert!(matches!(result, Err(ConfigError::DuplicateClient { name }) if name == "a"));

    let negative_idle = write_config(r#"{ "seeding": { "idle_limit_minutes": -5 } }"#)?;
    let result = load_from_path(negative_idle.path()).await;
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
    Ok(())
}
