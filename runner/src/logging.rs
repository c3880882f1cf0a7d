use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Context;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard};
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Installs the global subscriber: human-readable lines on stderr and, if `logfile` is given, json
/// lines in that file. The level comes from `RUST_LOG` (default `info`).
///
/// The returned guard flushes the file writer on drop; keep it alive until the program ends.
pub fn init_logging(logfile: Option<impl AsRef<Path>>) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_log = fmt::layer().with_writer(std::io::stderr);
    let r = registry().with(stderr_log).with(env_filter);

    match logfile {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path.as_ref())
                .with_context(|| format!("cannot open log file {}", path.as_ref().display()))?;
            let (writer, guard) = non_blocking::NonBlockingBuilder::default()
                .lossy(false)
                .finish(file);
            let json = fmt::layer().json().with_writer(writer);
            r.with(json).try_init()?;
            Ok(Some(guard))
        }
        None => {
            r.try_init()?;
            Ok(None)
        }
    }
}
