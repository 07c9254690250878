use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "create-kapp.log";

/// Installs the global subscriber. Stdout belongs to the prompts, so logs go
/// to a file in the user cache directory and, with `verbose`, to stderr.
///
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init(verbose: bool) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,hyper_util=warn,reqwest=warn"));

    let log_dir = log_directory();
    let (file_layer, guard) = match &log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    let console_layer = verbose.then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    match log_dir {
        Some(dir) => tracing::debug!(path = %dir.join(LOG_FILE).display(), "logging to file"),
        None => tracing::warn!("no usable cache directory, file logging disabled"),
    }

    guard
}

fn log_directory() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("com", "kars1996", "create-kapp")?;
    let dir = dirs.cache_dir().to_path_buf();
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}
