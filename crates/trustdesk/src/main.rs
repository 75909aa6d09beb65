mod cli;
mod client;
mod commands;
mod format;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use cli::{CertsSubcommand, Cli, Command, Config, NetSubcommand};
use trustdesk_netcheck::NetCheckCore;
use trustdesk_truststore::TrustCore;

/// Maximum time to wait for orderly shutdown before forcing exit.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(20);

/// Brief pause after cancellation to let in-flight requests complete.
const SHUTDOWN_DRAIN: Duration = Duration::from_millis(500);

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.daemon && cli.command.is_some() {
        anyhow::bail!("--daemon does not combine with a subcommand");
    }

    // Initialize logging
    let level = match cli.verbose {
        0 => cli.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Hold the non-blocking guards for the lifetime of main so logs flush on exit.
    let _log_guards = init_logging(env_filter, cli.log_file.as_deref())?;

    // ── Synchronous subcommands (no runtime needed) ──────────────────
    match &cli.command {
        Some(Command::Version) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "platform": std::env::consts::OS,
                    })
                );
            } else {
                println!("trustdesk {}", env!("CARGO_PKG_VERSION"));
            }
            return Ok(());
        }
        Some(Command::Status) => {
            return commands::status::status(&cli, &Config::from_cli(&cli));
        }
        _ => {}
    }

    // ── Everything below needs a Tokio runtime ──────────────────────
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_cli(&cli);

    // ── Verb subcommands (async, in-process cores) ──────────────────
    if let Some(command) = &cli.command {
        return match command {
            Command::Certs(certs_cmd) => match &certs_cmd.command {
                CertsSubcommand::List => commands::certs::list(&config, cli.json).await,
                CertsSubcommand::Check { file } => {
                    commands::certs::check(&config, file, cli.json).await
                }
                CertsSubcommand::Install { file } => {
                    commands::certs::install(&config, file, cli.json).await
                }
                CertsSubcommand::InstallAll => {
                    commands::certs::install_all(&config, cli.json).await
                }
            },
            Command::Net(net_cmd) => match &net_cmd.command {
                NetSubcommand::Domains => commands::net::domains(&config, cli.json).await,
                NetSubcommand::Check { target, http } => {
                    commands::net::check(&config, target, *http, cli.json).await
                }
            },
            // Handled in main() before the runtime was created
            Command::Version | Command::Status => Ok(()),
        };
    }

    // ── Daemon mode ─────────────────────────────────────────────────
    trustdesk_common::paths::ensure_data_dir();
    startup_diagnostics(&config);

    let cancel = CancellationToken::new();
    let mut tasks = Vec::new();
    let started_at = std::time::Instant::now();

    let trust = Arc::new(TrustCore::new(&config.cert_dir));
    let net = Arc::new(NetCheckCore::new(&config.domains_file));

    {
        let trust = trust.clone();
        let net = net.clone();
        let port = config.http_port;
        let token = cancel.clone();
        tasks.push(tokio::spawn(async move {
            if let Err(e) = start_http(trust, net, port, token, started_at).await {
                tracing::error!(error = %e, "HTTP adapter failed");
            }
        }));
    }

    tracing::info!("Ready.");

    // Wait for shutdown signal
    shutdown_signal().await;
    tracing::info!("Shutting down...");

    // Ordered shutdown with hard timeout
    let shutdown = async {
        cancel.cancel();
        tokio::time::sleep(SHUTDOWN_DRAIN).await;
        for task in tasks {
            let _ = task.await;
        }
    };
    if tokio::time::timeout(SHUTDOWN_TIMEOUT, shutdown)
        .await
        .is_err()
    {
        tracing::warn!(
            "Shutdown timed out after {:?}, forcing exit",
            SHUTDOWN_TIMEOUT
        );
    }

    Ok(())
}

// ── HTTP server startup ─────────────────────────────────────────────

pub(crate) async fn start_http(
    trust: Arc<TrustCore>,
    net: Arc<NetCheckCore>,
    port: u16,
    cancel: CancellationToken,
    started_at: std::time::Instant,
) -> anyhow::Result<()> {
    use axum::extract::State as AxumState;
    use axum::response::Json;
    use axum::routing::get;
    use axum::Router;
    use tower_http::cors::CorsLayer;
    use trustdesk_common::api::Capability;

    #[derive(Clone)]
    struct AppState {
        trust: Arc<TrustCore>,
        net: Arc<NetCheckCore>,
        started_at: std::time::Instant,
    }

    async fn unified_status_handler(
        AxumState(state): AxumState<AppState>,
    ) -> Json<serde_json::Value> {
        let capabilities = vec![state.trust.status(), state.net.status()];
        let uptime_secs = state.started_at.elapsed().as_secs();
        Json(serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "platform": std::env::consts::OS,
            "uptime_secs": uptime_secs,
            "daemon": true,
            "capabilities": capabilities,
        }))
    }

    let app_state = AppState {
        trust: trust.clone(),
        net: net.clone(),
        started_at,
    };

    let app = Router::new()
        .route("/healthz", get(health))
        .route("/v1/status", get(unified_status_handler))
        .with_state(app_state)
        .nest("/v1/certs", trustdesk_truststore::http::routes(trust))
        .nest("/v1/net", trustdesk_netcheck::http::routes(net))
        .layer(CorsLayer::permissive());

    // Installation endpoints elevate privileges; the adapter stays loopback.
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tracing::info!("HTTP adapter listening on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    tracing::debug!("HTTP adapter stopped");
    Ok(())
}

async fn health() -> &'static str {
    "OK"
}

/// Wait for Ctrl+C or platform-specific shutdown signal.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for Ctrl+C");
}

// ── Daemon startup diagnostics ──────────────────────────────────────

pub(crate) fn startup_diagnostics(config: &Config) {
    tracing::info!("trustdesk v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Platform: {}", std::env::consts::OS);

    match hostname::get() {
        Ok(h) => tracing::info!("Hostname: {}", h.to_string_lossy()),
        Err(e) => tracing::warn!(error = %e, "Could not determine hostname"),
    }

    tracing::info!("Certificate directory: {}", config.cert_dir.display());
    tracing::info!("Domains file: {}", config.domains_file.display());
    tracing::info!("TCP {}: listening (HTTP adapter)", config.http_port);
}

// ── Logging setup ───────────────────────────────────────────────────

/// Initialize tracing with stderr + optional file output.
/// Returns guards that must be held for the lifetime of the program
/// to ensure the non-blocking writers flush on shutdown.
pub(crate) fn init_logging(
    env_filter: tracing_subscriber::EnvFilter,
    log_file: Option<&std::path::Path>,
) -> anyhow::Result<Vec<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::prelude::*;

    // Always use non-blocking stderr to avoid deadlocks when stderr is a
    // redirected pipe that nobody reads (e.g. a supervised service).
    let (nb_stderr, stderr_guard) = tracing_appender::non_blocking(std::io::stderr());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(nb_stderr);

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        let (nb_file, file_guard) = tracing_appender::non_blocking(file);
        let file_layer = tracing_subscriber::fmt::layer().with_writer(nb_file);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();

        Ok(vec![stderr_guard, file_guard])
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();

        Ok(vec![stderr_guard])
    }
}
