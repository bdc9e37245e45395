mod config;
mod output;
mod paths;
mod presentation;
mod status;
mod usage;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{ConfigOverrides, StatusConfig};
use output::{print_view, OutputFormat};
use status::{status_channel, CycleRunner, RefreshScheduler, StatusReceiver};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use usage::{CredentialLocator, HttpUsageApi};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CLAUDE_USAGE_STATUS_GIT_SHA"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "claude-usage-status")]
#[command(about = "Claude plan usage for editor and shell status lines")]
#[command(version = VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to config file (default: ~/.claude-usage-status/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seconds between refreshes in watch mode
    #[arg(short = 'i', long, global = true, value_name = "SECONDS")]
    interval: Option<u64>,

    /// Currency symbol for extra-usage amounts
    #[arg(long, global = true)]
    currency: Option<String>,

    /// Locale used to pick the currency symbol, e.g. en-US
    #[arg(long, global = true)]
    locale: Option<String>,

    /// IANA time zone for reset times, e.g. Europe/Paris
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Refresh once and print the status
    Once {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Refresh on a timer and print the status after every refresh.
    /// Press Enter to refresh immediately.
    Watch {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            refresh_interval_seconds: self.interval,
            currency_symbol: self.currency.clone(),
            locale: self.locale.clone(),
            timezone: self.timezone.clone(),
        }
    }

    fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => paths::default_config_path(),
        }
    }
}

/// Logs go to stderr; stdout carries only status output.
fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("claude_usage_status=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("claude_usage_status=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_config(path: &Path, overrides: &ConfigOverrides) -> Result<StatusConfig> {
    StatusConfig::load_or_default(path)?.with_overrides(overrides)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    let config_path = cli.config_path()?;
    let overrides = cli.overrides();
    let config = load_config(&config_path, &overrides)?;
    debug!("Loaded configuration from {}", config_path.display());

    let locator = CredentialLocator::platform_default();
    debug!("Credential sources: {:?}", locator.sources());

    let (status_tx, status_rx) = status_channel();
    let runner = Arc::new(CycleRunner::new(
        locator,
        Arc::new(HttpUsageApi::new(config.base_url.clone())),
        config.display_settings()?,
        status_tx,
    ));

    match cli.command {
        Command::Once { json } => {
            runner.run_cycle().await;
            let view = status_rx.borrow().clone();
            print_view(&view, OutputFormat::from_json_flag(json))?;
        }
        Command::Watch { json } => {
            let session = WatchSession {
                runner,
                status_rx,
                config,
                config_path,
                overrides,
                format: OutputFormat::from_json_flag(json),
            };
            session.run().await?;
        }
    }

    Ok(())
}

struct WatchSession {
    runner: Arc<CycleRunner>,
    status_rx: StatusReceiver,
    config: StatusConfig,
    config_path: PathBuf,
    overrides: ConfigOverrides,
    format: OutputFormat,
}

impl WatchSession {
    async fn run(mut self) -> Result<()> {
        let initial = self.status_rx.borrow_and_update().clone();
        print_view(&initial, self.format)?;

        let scheduler =
            RefreshScheduler::start(Arc::clone(&self.runner), self.config.refresh_interval());
        let mut reload = ReloadSignal::new()?;
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;

        let result = loop {
            tokio::select! {
                changed = self.status_rx.changed() => {
                    if changed.is_err() {
                        break Ok(());
                    }
                    let view = self.status_rx.borrow_and_update().clone();
                    if let Err(e) = print_view(&view, self.format) {
                        break Err(e);
                    }
                }
                line = lines.next_line(), if stdin_open => {
                    match line {
                        Ok(Some(_)) => scheduler.trigger(),
                        Ok(None) => {
                            debug!("stdin closed, manual refresh disabled");
                            stdin_open = false;
                        }
                        Err(e) => {
                            debug!("Failed to read stdin: {}", e);
                            stdin_open = false;
                        }
                    }
                }
                _ = reload.recv() => {
                    self.reload(&scheduler).await;
                }
                _ = tokio::signal::ctrl_c() => {
                    debug!("Interrupted, stopping");
                    break Ok(());
                }
            }
        };

        scheduler.stop().await;
        result
    }

    /// Re-reads the config file and applies the interval and display
    /// settings. A bad file keeps the running configuration.
    async fn reload(&mut self, scheduler: &RefreshScheduler) {
        let config = match load_config(&self.config_path, &self.overrides) {
            Ok(config) => config,
            Err(e) => {
                warn!("Config reload failed, keeping current settings: {:#}", e);
                return;
            }
        };
        let display = match config.display_settings() {
            Ok(display) => display,
            Err(e) => {
                warn!("Config reload failed, keeping current settings: {:#}", e);
                return;
            }
        };

        if config.base_url != self.config.base_url {
            warn!("base_url changes take effect after a restart");
        }
        self.runner.set_display(display).await;
        if config.refresh_interval() != scheduler.interval() {
            scheduler.set_interval(config.refresh_interval());
        }
        info!(
            "Configuration reloaded from {}",
            self.config_path.display()
        );
        self.config = config;
        scheduler.trigger();
    }
}

/// SIGHUP on Unix; never fires elsewhere.
struct ReloadSignal {
    #[cfg(unix)]
    hangup: tokio::signal::unix::Signal,
}

impl ReloadSignal {
    #[cfg(unix)]
    fn new() -> Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        let hangup = signal(SignalKind::hangup()).context("Failed to install SIGHUP handler")?;
        Ok(Self { hangup })
    }

    #[cfg(not(unix))]
    fn new() -> Result<Self> {
        Ok(Self {})
    }

    #[cfg(unix)]
    async fn recv(&mut self) {
        if self.hangup.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }

    #[cfg(not(unix))]
    async fn recv(&mut self) {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
