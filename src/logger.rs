// logger.rs
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use chrono::Local;
use directories::BaseDirs;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::Writer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_KEEP_RUNS: usize = 4;
const DEFAULT_PREFIX: &str = "deck";

/// Timestamp like "2026-10-15 14:03:31".
struct ChronoLocalTime;

impl FormatTime for ChronoLocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn logs_dir(app_id: &str) -> io::Result<PathBuf> {
    let base = BaseDirs::new().ok_or_else(|| io::Error::other("no home dir"))?;
    let dir = base.data_dir().join(app_id);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// `<prefix>-YYYYMMDD-HHMMSS-PID.log`
fn run_log_path(dir: &Path, prefix: &str) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    dir.join(format!("{prefix}-{stamp}-{}.log", std::process::id()))
}

/// Delete the oldest `<prefix>-*.log` files, keeping the newest `keep`.
fn cleanup_old_runs(dir: &Path, prefix: &str, keep: usize) {
    let mut entries: Vec<(SystemTime, PathBuf)> = fs::read_dir(dir)
        .into_iter()
        .flatten()
        .flatten()
        .filter_map(|e| {
            let p = e.path();
            let name = p.file_name()?.to_str()?;
            let is_run = name.starts_with(prefix) && p.extension().is_some_and(|x| x == "log");
            if !is_run {
                return None;
            }
            let mtime = e
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            Some((mtime, p))
        })
        .collect();
    entries.sort_by_key(|(t, _)| *t);
    let to_delete = entries.len().saturating_sub(keep);
    for (_, p) in entries.into_iter().take(to_delete) {
        let _ = fs::remove_file(p);
    }
}

/// Initialize tracing for this process:
/// - One file per run under the user data dir for `app_id`
/// - Keep the newest few runs (delete older)
/// - Respects RUST_LOG (defaults to "info")
///
/// The guard must be kept alive to flush logs on exit.
pub fn init(app_id: &str) -> io::Result<WorkerGuard> {
    init_with(app_id, DEFAULT_PREFIX, DEFAULT_KEEP_RUNS)
}

/// Same as `init` but lets you set the file prefix and how many runs to keep.
pub fn init_with(app_id: &str, file_prefix: &str, keep_runs: usize) -> io::Result<WorkerGuard> {
    let dir = logs_dir(app_id)?;
    init_in(&dir, file_prefix, keep_runs)
}

/// Log into an explicit directory.
pub fn init_in(dir: &Path, file_prefix: &str, keep_runs: usize) -> io::Result<WorkerGuard> {
    fs::create_dir_all(dir)?;
    cleanup_old_runs(dir, file_prefix, keep_runs);

    let path = run_log_path(dir, file_prefix);
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;
    let (nb_writer, guard) = non_blocking(file);

    let fmt_layer = fmt::layer()
        .with_writer(nb_writer)
        .with_timer(ChronoLocalTime)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    // If a global subscriber already exists, keep it.
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init();

    Ok(guard)
}

/// Plain stderr logging for tools and tests.
pub fn init_stderr() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_timer(ChronoLocalTime)
                .with_target(false),
        )
        .try_init();
}
