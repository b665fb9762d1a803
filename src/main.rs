//! Uptime Watchdog: record when the Internet connection drops, how long it stays down, and when it returns.

mod config;
mod duration;
mod monitor;
mod network;
mod sink;
mod tracker;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use config::{MonitorConfig, PollingInterval, ProbeTarget};
use monitor::Monitor;
use sink::{EventSink, LogFile};

#[derive(Parser, Debug)]
#[command(
    name = "uptime-watchdog",
    version,
    about = "Monitor the uptime of the Internet connection and record any downtime",
    long_about = "Periodically opens a TCP connection to a public endpoint. When it fails, logs the time of failure, a heartbeat for every minute of downtime, the time of restoration and the total downtime duration."
)]
struct Cli {
    /// Do not create a logfile (console only, no write access to disk needed)
    #[arg(long = "no-logfile", short = 'n')]
    pub no_logfile: bool,

    /// Polling interval in seconds while the connection is up: 1, 2, 3, 4, 5, 10, 20, 30 or 60
    #[arg(long = "freq", short = 'f', alias = "interval", value_name = "N", default_value = "1")]
    pub freq: PollingInterval,

    /// Logfile path
    #[arg(long, default_value = config::DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Probe host
    #[arg(long, default_value = network::DEFAULT_PROBE_HOST)]
    pub host: String,

    /// Probe TCP port
    #[arg(long, default_value_t = network::DEFAULT_PROBE_PORT)]
    pub port: u16,

    /// Probe connect timeout in seconds
    #[arg(long, default_value_t = network::DEFAULT_PROBE_TIMEOUT_SECS)]
    pub timeout: u64,
}

impl Cli {
    fn monitor_config(&self) -> anyhow::Result<MonitorConfig> {
        Ok(MonitorConfig {
            polling_interval: self.freq,
            log_file: (!self.no_logfile).then(|| self.log_file.clone()),
            target: ProbeTarget::new(self.host.as_str(), self.port, self.timeout)?,
        })
    }
}

/// Opens the log file up front so an unwritable path fails before monitoring starts
fn open_log_file(config: &MonitorConfig) -> anyhow::Result<Option<LogFile>> {
    let Some(path) = config.log_file.as_deref() else {
        tracing::info!("Logfile disabled, console output only");
        return Ok(None);
    };
    let log_file =
        LogFile::open(path).context("Unable to create logfile. Exiting program.")?;
    tracing::info!("Logging to {}", log_file.path().display());
    Ok(Some(log_file))
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = cli.monitor_config()?;

    let log_file = open_log_file(&config)?;

    tracing::info!(
        "Uptime Watchdog started, target: {}, timeout: {:?}",
        config.target,
        config.target.timeout
    );

    let target = &config.target;
    Monitor::new(&config, EventSink::stdout(log_file))
        .run(
            move || network::probe(&target.host, target.port, target.timeout),
            shutdown_signal(),
        )
        .await;

    Ok(())
}
