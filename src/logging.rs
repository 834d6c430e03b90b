use crate::config::storefront::DebugLogRotation;
use crate::config::Config;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "tienda-debug.log";
const LOG_FILTER: &str = "tienda=debug,warn";

/// Keeps the non-blocking writer flushing until dropped.
#[allow(dead_code)]
pub struct LogGuard(WorkerGuard);

/// Where the storefront writes its debug log and how old files are pruned
#[derive(Debug, Clone, PartialEq)]
struct LogFile {
    dir: PathBuf,
    name: String,
    rotation: DebugLogRotation,
}

impl LogFile {
    /// Resolve `debug_log_path` (file, directory or unset) against the config directory.
    fn from_config(config: &Config) -> Result<Self> {
        let rotation = config.debug_log_rotation.unwrap_or(DebugLogRotation::Session);
        let path = match config.debug_log_path.as_deref() {
            None => crate::config::config_path()?.with_file_name(LOG_FILE_NAME),
            Some(raw) => {
                let path = home_relative(raw);
                if raw.ends_with(std::path::MAIN_SEPARATOR) || path.is_dir() {
                    path.join(LOG_FILE_NAME)
                } else {
                    path
                }
            }
        };
        Self::at(&path, rotation)
    }

    fn at(path: &Path, rotation: DebugLogRotation) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .context("Invalid debug_log_path: no UTF-8 file name")?
            .to_string();
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self { dir, name, rotation })
    }

    /// Prefix shared by rotated files; `None` when nothing rotates.
    fn rotated_prefix(&self) -> Option<String> {
        match self.rotation {
            DebugLogRotation::None => None,
            // tracing_appender names daily files `{name}.{YYYY-MM-DD}`
            DebugLogRotation::Daily => Some(format!("{}.", self.name)),
            DebugLogRotation::Session => Some(format!("{}.session-", self.name)),
        }
    }

    fn default_keep(&self) -> usize {
        match self.rotation {
            DebugLogRotation::Daily => 7,
            _ => 20,
        }
    }

    /// Delete all but the newest `keep` rotated files. `0` keeps everything.
    fn prune(&self, keep: Option<usize>) -> Result<()> {
        let Some(prefix) = self.rotated_prefix() else {
            return Ok(());
        };
        let keep = keep.unwrap_or_else(|| self.default_keep());
        if keep == 0 {
            return Ok(());
        }

        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read log directory: {}", self.dir.display()))?;
        let mut rotated: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(&prefix))
            .collect();

        // Date and timestamp suffixes sort chronologically.
        rotated.sort_unstable_by(|a, b| b.cmp(a));

        for stale in rotated.into_iter().skip(keep) {
            let path = self.dir.join(&stale);
            if let Err(e) = fs::remove_file(&path) {
                tracing::debug!(error = %e, file = %path.display(), "could not prune old log file");
            }
        }
        Ok(())
    }

    /// Open the writer for this run, returning the path it logs to.
    fn open(&self) -> Result<(NonBlocking, WorkerGuard, PathBuf)> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create log directory: {}", self.dir.display()))?;

        if self.rotation == DebugLogRotation::Daily {
            let appender = tracing_appender::rolling::daily(&self.dir, &self.name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            return Ok((writer, guard, self.dir.join(&self.name)));
        }

        let path = match self.rotation {
            DebugLogRotation::Session => {
                let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
                self.dir.join(format!("{}.session-{stamp}", self.name))
            }
            _ => self.dir.join(&self.name),
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        let (writer, guard) = tracing_appender::non_blocking(file);
        Ok((writer, guard, path))
    }
}

fn home_relative(raw: &str) -> PathBuf {
    match (raw.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => {
            home.join(rest.trim_start_matches('/'))
        }
        _ => PathBuf::from(raw),
    }
}

/// Initialize debug logging.
///
/// The terminal belongs to the UI, so logs only ever go to a file, next to
/// the config file unless `debug_log_path` says otherwise. Disabled unless
/// `debug = true`.
pub fn init(config: &Config) -> Result<Option<LogGuard>> {
    if !config.debug {
        return Ok(None);
    }

    let target = LogFile::from_config(config)?;
    fs::create_dir_all(&target.dir)
        .with_context(|| format!("Failed to create log directory: {}", target.dir.display()))?;
    target.prune(config.debug_log_keep)?;
    let (writer, guard, path) = target.open()?;

    let filter = EnvFilter::try_new(LOG_FILTER).unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .try_init()
        .ok(); // Already initialized in tests.

    tracing::info!(log_file = %path.display(), rotation = ?target.rotation, "debug logging enabled");

    Ok(Some(LogGuard(guard)))
}

/// Mask cookie values in a `Cookie`-style header string (`a=1; b=2` -> `a=***; b=***`).
pub fn redact_cookies(input: &str) -> String {
    input
        .split(';')
        .map(|pair| {
            let pair = pair.trim();
            match pair.split_once('=') {
                Some((name, value)) if !value.is_empty() => format!("{name}=***"),
                _ => pair.to_string(),
            }
        })
        .filter(|pair| !pair.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_redact_cookies_masks_values() {
        assert_eq!(
            redact_cookies("csrftoken=abc123; sessionid=zzz"),
            "csrftoken=***; sessionid=***"
        );
        assert_eq!(redact_cookies("flag"), "flag");
    }

    #[test]
    fn test_prune_keeps_newest_sessions() {
        let dir = TempDir::new().unwrap();
        for ts in ["20260101-000000", "20260102-000000", "20260103-000000"] {
            fs::write(dir.path().join(format!("{LOG_FILE_NAME}.session-{ts}")), "").unwrap();
        }
        fs::write(dir.path().join("config.toml"), "").unwrap();

        let target = LogFile::at(&dir.path().join(LOG_FILE_NAME), DebugLogRotation::Session).unwrap();
        target.prune(Some(2)).unwrap();

        let left = names_in(dir.path());
        assert_eq!(left.len(), 3);
        assert!(left.contains(&"config.toml".to_string()));
        assert!(!left.iter().any(|n| n.ends_with("20260101-000000")));
    }

    #[test]
    fn test_prune_without_rotation_touches_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(format!("{LOG_FILE_NAME}.session-1")), "").unwrap();

        let target = LogFile::at(&dir.path().join(LOG_FILE_NAME), DebugLogRotation::None).unwrap();
        target.prune(Some(1)).unwrap();
        target.prune(Some(0)).unwrap();

        assert_eq!(names_in(dir.path()).len(), 1);
    }

    #[test]
    fn test_directory_path_gets_default_file_name() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            debug_log_path: Some(dir.path().to_string_lossy().to_string()),
            ..Config::default()
        };

        let target = LogFile::from_config(&config).unwrap();

        assert_eq!(target.dir, dir.path());
        assert_eq!(target.name, LOG_FILE_NAME);
        assert_eq!(target.rotation, DebugLogRotation::Session);
    }

    #[test]
    fn test_session_file_is_stamped() {
        let dir = TempDir::new().unwrap();
        let target = LogFile::at(&dir.path().join("run.log"), DebugLogRotation::Session).unwrap();

        let (_writer, _guard, path) = target.open().unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("run.log.session-"), "got {name}");
        assert!(path.exists());
    }
}
