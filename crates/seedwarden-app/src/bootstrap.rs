//! Boot sequence: configuration, telemetry, client wiring and shutdown.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use seedwarden_config::{AppConfig, ClientSettings, SeedingPolicy};
use seedwarden_core::TorrentClientProxy;
use seedwarden_engine::{EngineSettings, ReconciliationEngine};
use seedwarden_telemetry::{LogFormat, LoggingConfig, Metrics, log_format_from_config};
use seedwarden_transmission::{Endpoint, TransmissionProxy};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::poller::spawn_poller;

const BUILD_SHA: &str = match option_env!("SEEDWARDEN_BUILD_SHA") {
    Some(sha) => sha,
    None => "dev",
};

/// Entry point for the Seedwarden boot sequence.
///
/// Loads configuration, installs logging, verifies every configured daemon
/// and polls them until Ctrl-C is received.
///
/// # Errors
///
/// Returns an error if configuration, telemetry or any client fails to start.
pub async fn run_app() -> AppResult<()> {
    let config = seedwarden_config::load_from_env()
        .await
        .map_err(|err| AppError::config("config.load", err))?;
    seedwarden_telemetry::init_logging(&logging_config(&config))
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    info!(
        build_sha = seedwarden_telemetry::build_sha(),
        clients = config.clients.len(),
        "Seedwarden bootstrap starting"
    );

    if config.clients.is_empty() {
        return Err(AppError::NoClients);
    }
    let metrics =
        Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;

    let mut engines = Vec::with_capacity(config.clients.len());
    for client in &config.clients {
        engines.push(connect(client, &config.seeding, &metrics).await?);
    }

    let outcome = supervise(engines, config.poll_interval(), shutdown_signal()).await;
    flush_metrics(&metrics);
    outcome
}

/// Log the Prometheus exposition accumulated over the process lifetime.
pub(crate) fn flush_metrics(metrics: &Metrics) -> Option<String> {
    match metrics.render() {
        Ok(exposition) => {
            info!(metrics = %exposition, "final metrics");
            Some(exposition)
        }
        Err(err) => {
            warn!(error = %err, "metrics render failed");
            None
        }
    }
}

/// Build the logging configuration from the loaded document.
pub(crate) fn logging_config(config: &AppConfig) -> LoggingConfig<'_> {
    LoggingConfig {
        level: &config.logging.level,
        format: log_format_from_config(config.logging.format.as_deref())
            .unwrap_or_else(LogFormat::infer),
        build_sha: BUILD_SHA,
    }
}

/// Map client settings onto the RPC endpoint.
pub(crate) fn endpoint_for(client: &ClientSettings) -> Endpoint {
    Endpoint {
        host: client.host.clone(),
        port: client.port,
        use_ssl: client.use_ssl,
        url_base: client.url_base.clone(),
        username: client.username.clone(),
        password: client.password.clone(),
    }
}

/// Map client settings and the shared policy onto engine settings.
pub(crate) fn engine_settings(
    client: &ClientSettings,
    seeding: &SeedingPolicy,
) -> EngineSettings {
    EngineSettings::new(client.name.trim(), client.host.trim())
        .with_scope(client.scope())
        .with_seeding(seeding.limits())
}

async fn connect(
    client: &ClientSettings,
    seeding: &SeedingPolicy,
    metrics: &Metrics,
) -> AppResult<ReconciliationEngine<TransmissionProxy>> {
    let proxy = TransmissionProxy::new(&endpoint_for(client))
        .map_err(|err| AppError::transmission(&client.name, err))?;
    info!(client = %client.name, url = %proxy.rpc().url(), "transmission client configured");
    let engine = ReconciliationEngine::new(
        proxy,
        engine_settings(client, seeding),
        metrics.clone(),
    );
    engine
        .verify()
        .await
        .map_err(|err| AppError::client("engine.verify", &client.name, err))?;
    Ok(engine)
}

/// Poll every engine until `shutdown` resolves, then stop the pollers.
pub(crate) async fn supervise<P, F>(
    engines: Vec<ReconciliationEngine<P>>,
    every: Duration,
    shutdown: F,
) -> AppResult<()>
where
    P: TorrentClientProxy + 'static,
    F: Future<Output = AppResult<()>>,
{
    let pollers: Vec<_> = engines
        .into_iter()
        .map(|engine| spawn_poller(Arc::new(engine), every))
        .collect();
    info!(
        pollers = pollers.len(),
        interval_secs = every.as_secs(),
        "pollers running"
    );

    let outcome = shutdown.await;

    for poller in pollers {
        poller.abort();
        if let Err(err) = poller.await
            && !err.is_cancelled()
        {
            warn!(error = %err, "poller task join failed");
        }
    }
    info!("Seedwarden shutdown complete");
    outcome
}

async fn shutdown_signal() -> AppResult<()> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|source| AppError::Signal { source })?;
    info!("shutdown signal received");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedwarden_config::LoggingSettings;
    use seedwarden_test_support::{RecordBuilder, StaticProxy};

    fn client() -> ClientSettings {
        ClientSettings {
            name: " seedbox ".to_string(),
            host: "localhost".to_string(),
            port: 9092,
            use_ssl: true,
            url_base: "/custom/".to_string(),
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            directory: None,
            category: Some("radarr".to_string()),
        }
    }

    #[test]
    fn endpoint_carries_connection_settings() -> anyhow::Result<()> {
        let endpoint = endpoint_for(&client());
        assert_eq!(
            endpoint.rpc_url()?.as_str(),
            "https://localhost:9092/custom/rpc"
        );
        assert_eq!(endpoint.username.as_deref(), Some("admin"));
        Ok(())
    }

    #[test]
    fn engine_settings_combine_scope_and_policy() {
        let policy = SeedingPolicy {
            ratio_limit: Some(1.5),
            idle_limit_minutes: Some(30),
        };
        let settings = engine_settings(&client(), &policy);
        assert_eq!(settings.client, "seedbox");
        assert_eq!(settings.scope.category(), Some("radarr"));
        assert_eq!(settings.seeding.ratio_limit, Some(1.5));
        assert_eq!(settings.seeding.idle_limit, Some(Duration::from_secs(1_800)));
    }

    #[test]
    fn logging_config_honours_configured_format() {
        let config = AppConfig {
            logging: LoggingSettings {
                level: "debug".to_string(),
                format: Some("json".to_string()),
            },
            ..AppConfig::default()
        };
        let logging = logging_config(&config);
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, LogFormat::Json);
    }

    #[tokio::test]
    async fn supervise_polls_until_shutdown() -> anyhow::Result<()> {
        let proxy = StaticProxy::new(vec![RecordBuilder::downloading().build()]);
        let engine = ReconciliationEngine::new(
            proxy.clone(),
            EngineSettings::new("seedbox", "localhost"),
            Metrics::new()?,
        );
        let shutdown = async {
            tokio::time::sleep(Duration::from_millis(40)).await;
            Ok::<(), AppError>(())
        };
        supervise(vec![engine], Duration::from_millis(5), shutdown).await?;
        assert!(proxy.list_calls() >= 1);
        Ok(())
    }

    #[tokio::test]
    async fn flushed_metrics_cover_every_client() -> anyhow::Result<()> {
        let metrics = Metrics::new()?;
        let proxy = StaticProxy::new(vec![RecordBuilder::downloading().build()]);
        let engines = vec![
            ReconciliationEngine::new(
                proxy.clone(),
                EngineSettings::new("seedbox", "localhost"),
                metrics.clone(),
            ),
            ReconciliationEngine::new(
                proxy,
                EngineSettings::new("nas", "10.0.0.5"),
                metrics.clone(),
            ),
        ];
        let shutdown = async {
            tokio::time::sleep(Duration::from_millis(40)).await;
            Ok::<(), AppError>(())
        };
        supervise(engines, Duration::from_millis(5), shutdown).await?;

        let exposition = flush_metrics(&metrics).unwrap_or_default();
        assert!(exposition.contains("seedwarden_polls_total{client=\"seedbox\"}"));
        assert!(exposition.contains("seedwarden_polls_total{client=\"nas\"}"));
        Ok(())
    }

    #[tokio::test]
    async fn supervise_returns_the_shutdown_outcome() {
        let engines: Vec<ReconciliationEngine<StaticProxy>> = Vec::new();
        let outcome = supervise(engines, Duration::from_secs(60), async {
            Err(AppError::NoClients)
        })
        .await;
        assert!(matches!(outcome, Err(AppError::NoClients)));
    }
}
