use std::error::Error;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "cumunisp.log";

/// Routes `tracing` (and `log`, via the bridge) to a daily rolling file, keeping the terminal free for the REPL.
///
/// The returned guard flushes the background writer on drop; hold it until the process exits.
pub fn init(dir: Option<&Path>, filter: &str) -> Result<WorkerGuard, Box<dyn Error>> {
    tracing_log::LogTracer::init()?;

    let dir = dir.map(Path::to_path_buf).unwrap_or_else(default_dir);
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter)?)
        .with_timer(ChronoLocal::rfc_3339())
        .with_ansi(false)
        .with_writer(writer)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(guard)
}

fn default_dir() -> PathBuf { std::env::temp_dir() }
