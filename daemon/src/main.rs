//! chainwatch daemon — entry point for running a watcher.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use chainwatch_gateway::JsonRpcGateway;
use chainwatch_rpc::RpcServer;
use chainwatch_watcher::{init_logging, LogFormat, WatcherConfig, WatcherService};

#[derive(Parser)]
#[command(
    name = "chainwatch-daemon",
    about = "Follows a chain node and records transactions for subscribed addresses"
)]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint of the chain node to follow.
    #[arg(long, env = "CHAINWATCH_NODE_URL")]
    node_url: Option<String>,

    /// Seconds between poll cycles.
    #[arg(long, env = "CHAINWATCH_POLL_INTERVAL")]
    poll_interval: Option<u64>,

    /// HTTP API port.
    #[arg(long, env = "CHAINWATCH_API_PORT")]
    api_port: Option<u16>,

    /// Enable the Prometheus /metrics endpoint.
    #[arg(long, env = "CHAINWATCH_ENABLE_METRICS")]
    metrics: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "CHAINWATCH_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json".
    #[arg(long, env = "CHAINWATCH_LOG_FORMAT")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging is not up yet, so remember what happened during config
    // loading and report it afterwards.
    let mut config_note: Option<String> = None;
    let file_config = cli.config.as_ref().and_then(|path| {
        match WatcherConfig::from_toml_file(&path.display().to_string()) {
            Ok(cfg) => {
                config_note = Some(format!("loaded config from {}", path.display()));
                Some(cfg)
            }
            Err(e) => {
                config_note = Some(format!(
                    "failed to load config from {}: {e}; using CLI defaults",
                    path.display()
                ));
                None
            }
        }
    });

    let base = file_config.unwrap_or_default();
    let config = WatcherConfig {
        node_url: cli.node_url.unwrap_or(base.node_url),
        poll_interval_secs: cli.poll_interval.unwrap_or(base.poll_interval_secs),
        api_port: cli.api_port.unwrap_or(base.api_port),
        enable_metrics: cli.metrics || base.enable_metrics,
        log_level: cli.log_level,
        log_format: cli.log_format.unwrap_or(base.log_format),
        ..base
    };

    init_logging(LogFormat::parse(&config.log_format), &config.log_level);
    if let Some(note) = config_note {
        tracing::info!("{note}");
    }

    tracing::info!(
        "starting chainwatch (node: {}, poll: {}s, API port: {}, metrics: {})",
        config.node_url,
        config.poll_interval_secs,
        config.api_port,
        if config.enable_metrics { "on" } else { "off" },
    );

    let gateway = Arc::new(JsonRpcGateway::with_timeout(
        &config.node_url,
        Duration::from_secs(config.request_timeout_secs),
    ));
    let service = Arc::new(WatcherService::new(&config, gateway));
    let shutdown = service.shutdown_controller();

    service.start();

    let rpc = RpcServer::new(config.api_port, Arc::clone(&service), config.enable_metrics);
    let rpc_shutdown = shutdown.subscribe();
    let rpc_handle = tokio::spawn(async move {
        if let Err(e) = rpc.start(rpc_shutdown).await {
            tracing::error!(error = %e, "API server exited with error");
        }
    });

    shutdown.wait_for_signal().await;

    tracing::info!("shutdown signal received, stopping watcher");
    service.stop().await?;
    let _ = rpc_handle.await;

    tracing::info!("chainwatch daemon exited cleanly");
    Ok(())
}
