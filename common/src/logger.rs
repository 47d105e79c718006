use std::{
    fs::{self, OpenOptions},
    io,
    path::Path,
    sync::Mutex,
};

use chrono::Local;
use console_subscriber::ConsoleLayer;
use tracing::Level;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

pub const LOG_DIR: &str = "logs";
const DEFAULT_FILTER: &str = "info";

/// Installs the global tracing subscriber writing to `<log_dir>/<date>.log`.
///
/// Stdout belongs to the monitor table, so nothing is logged there. Calling
/// this twice is harmless; the second registration is ignored.
pub fn init_logging(log_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(log_dir)?;
    let date_prefix = Local::now().format("%Y-%m-%d").to_string();
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(format!("{date_prefix}.log")))?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .with_filter(env_filter);

    let result = if console_enabled() {
        let console_layer = ConsoleLayer::builder().with_default_env().spawn();
        let console_filter = Targets::new()
            .with_target("tokio", Level::TRACE)
            .with_target("runtime", Level::TRACE);
        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(console_layer.with_filter(console_filter))
            .try_init()
    } else {
        tracing_subscriber::registry().with(fmt_layer).try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

fn console_enabled() -> bool {
    std::env::var("TOKIO_CONSOLE")
        .map(|value| value != "0")
        .unwrap_or(false)
}
