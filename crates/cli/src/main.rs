//! Command-line front end for the daylog logger.

use clap::{Args, Parser, Subcommand, ValueEnum};
use daylog::{Logger, LoggerConfig, Mode};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "daylog")]
#[command(about = "Structured logging with daily file rotation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit a single record
    Emit {
        #[command(flatten)]
        target: Target,

        /// Severity of the record
        #[arg(long, value_enum, default_value_t = Level::Info)]
        level: Level,

        /// Message text
        #[arg(long)]
        message: String,
    },
    /// Emit a record periodically with rotation running
    Heartbeat {
        #[command(flatten)]
        target: Target,

        /// Seconds between records
        #[arg(long, default_value = "60")]
        every_secs: u64,

        /// Stop after this many records
        #[arg(long)]
        count: Option<u64>,

        /// Seconds between rotation checks
        #[arg(long, default_value = "3600")]
        check_interval_secs: u64,
    },
}

/// Overrides for the environment configuration.
#[derive(Args)]
struct Target {
    /// Output mode (prod or dev); defaults to LOGGER_MOD
    #[arg(long)]
    mode: Option<Mode>,

    /// Log directory; defaults to LOGGER_SERVICE_PATH
    #[arg(long)]
    path: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Emit {
            target,
            level,
            message,
        } => {
            let logger = install(&target, None)?;
            emit(&logger, level, &message);
        }
        Commands::Heartbeat {
            target,
            every_secs,
            count,
            check_interval_secs,
        } => {
            let check_interval = Duration::from_secs(check_interval_secs.max(1));
            let logger = install(&target, Some(check_interval))?;
            run_heartbeat(&logger, Duration::from_secs(every_secs.max(1)), count).await;
            logger.stop_rotation();
        }
    }

    Ok(())
}

/// Build the logger from the environment plus flags and make it the default.
///
/// # Arguments
/// * `target` - Flag overrides
/// * `check_interval` - Rotation check period, `None` for no watcher
fn install(target: &Target, check_interval: Option<Duration>) -> anyhow::Result<Arc<Logger>> {
    let mut config = LoggerConfig::from_env()?;
    if let Some(mode) = target.mode {
        config.mode = mode;
    }
    if let Some(path) = &target.path {
        config.path = path.clone();
    }

    let mut builder = Logger::builder()
        .mode(config.mode)
        .category(config.category)
        .path(config.path)
        .rotation_watcher(check_interval.is_some());
    if let Some(interval) = check_interval {
        builder = builder.check_interval(interval);
    }

    Ok(daylog::set(builder.build()?))
}

fn emit(logger: &Logger, level: Level, message: &str) {
    match level {
        Level::Debug => daylog::debug!(logger, source = "cli", "{}", message),
        Level::Info => daylog::info!(logger, source = "cli", "{}", message),
        Level::Warn => daylog::warn!(logger, source = "cli", "{}", message),
        Level::Error => daylog::error!(logger, source = "cli", "{}", message),
    }
}

async fn run_heartbeat(logger: &Logger, every: Duration, count: Option<u64>) {
    daylog::info!(
        logger,
        mode = %logger.mode(),
        category = %logger.category(),
        path = %logger.path().display(),
        "heartbeat started"
    );

    let mut ticker = tokio::time::interval(every);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut beats = 0u64;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                beats += 1;
                daylog::info!(logger, beats, file = ?logger.current_file(), "heartbeat");
                if count.is_some_and(|limit| beats >= limit) {
                    break;
                }
            }
            _ = &mut shutdown => {
                daylog::info!(logger, beats, "interrupted");
                break;
            }
        }
    }
}
