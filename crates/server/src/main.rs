use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fetchflicks_core::metrics::ARTIFACTS_SWEPT;
use fetchflicks_core::{
    load_config, sweep_stale, validate_config, Config, DownloadService, FfmpegMuxer, HttpFetcher,
    IntakeService, MessageStore, Muxer, NoopNotifier, Notifier, ProgressTracker, SmtpNotifier,
    SqliteMessageStore, YtDlpExtractor,
};
use fetchflicks_server::api::create_router;
use fetchflicks_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("FETCHFLICKS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);
    info!("Scratch directory: {:?}", config.download.scratch_dir);

    // Message store
    let store: Arc<dyn MessageStore> = Arc::new(
        SqliteMessageStore::new(&config.database.path)
            .context("Failed to create message store")?,
    );
    info!("Message store initialized");

    // Notifier
    let notifier: Arc<dyn Notifier> = match &config.smtp {
        Some(smtp) => {
            Arc::new(SmtpNotifier::new(smtp).context("Failed to create SMTP notifier")?)
        }
        None => {
            info!("No SMTP configured, contact messages will only be stored");
            Arc::new(NoopNotifier)
        }
    };
    info!("Using notifier: {}", notifier.name());

    // External tools
    let extractor = YtDlpExtractor::new(config.extractor.clone());
    if let Err(e) = extractor.validate().await {
        warn!("yt-dlp is not usable, downloads will fail: {}", e);
    }

    let muxer = FfmpegMuxer::new(config.muxer.clone());
    if let Err(e) = muxer.validate().await {
        warn!("ffmpeg is not usable, adaptive downloads will fail: {}", e);
    }

    let fetcher = HttpFetcher::new(&config.download).context("Failed to create HTTP client")?;

    let progress = Arc::new(ProgressTracker::new(Duration::from_secs(
        config.progress.retention_secs,
    )));

    let downloads = Arc::new(DownloadService::new(
        Arc::new(extractor),
        Arc::new(fetcher),
        Arc::new(muxer),
        Arc::clone(&progress),
        &config.download,
    ));
    let intake = Arc::new(IntakeService::new(store, notifier));

    // Background cleanup of finished progress entries and stale scratch files
    let sweeper = tokio::spawn(run_sweeper(config.clone(), Arc::clone(&progress)));

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), downloads, intake));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    sweeper.abort();

    Ok(())
}

/// Periodically prune finished progress entries and remove leftover scratch
/// directories.
async fn run_sweeper(config: Config, progress: Arc<ProgressTracker>) {
    let ttl = Duration::from_secs(config.download.artifact_ttl_secs);
    let mut interval =
        tokio::time::interval(Duration::from_secs(config.progress.sweep_interval_secs));

    loop {
        interval.tick().await;

        let pruned = progress.prune();
        if pruned > 0 {
            info!(pruned, "Pruned finished progress entries");
        }

        match sweep_stale(&config.download.scratch_dir, ttl).await {
            Ok(0) => {}
            Ok(removed) => {
                ARTIFACTS_SWEPT.inc_by(removed as u64);
                info!(removed, "Removed stale scratch entries");
            }
            Err(e) => warn!(error = %e, "Scratch sweep failed"),
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
