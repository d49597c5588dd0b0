//! Log file setup
//!
//! The terminal belongs to the UI, so tracing output goes to a file
//! (`citywx.log` in the data directory unless overridden). Filtering follows
//! `RUST_LOG`, defaulting to `citywx=info`.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file name inside the data directory
pub const LOG_FILE: &str = "citywx.log";

/// Filter used when `RUST_LOG` is unset or invalid
const DEFAULT_FILTER: &str = "citywx=info";

/// Picks the log file: the explicit path, else `citywx.log` in `data_dir`
pub fn log_path(explicit: Option<&Path>, data_dir: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| data_dir.map(|dir| dir.join(LOG_FILE)))
}

/// Installs the global subscriber writing to `path`
///
/// Returns the path actually used, or `None` when there is no path or the
/// file cannot be opened, in which case log output is discarded.
pub fn init(path: Option<&Path>) -> Option<PathBuf> {
    let file = path.and_then(|p| open_log(p).map(|f| (p.to_path_buf(), f)));

    let (used, writer) = match file {
        Some((used, file)) => (Some(used), BoxMakeWriter::new(Mutex::new(file))),
        None => (None, BoxMakeWriter::new(std::io::sink)),
    };

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init();

    used
}

fn open_log(path: &Path) -> Option<fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).ok()?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_path_wins() {
        let path = log_path(Some(Path::new("/tmp/x.log")), Some(Path::new("/data")));
        assert_eq!(path, Some(PathBuf::from("/tmp/x.log")));
    }

    #[test]
    fn test_default_path_in_data_dir() {
        let path = log_path(None, Some(Path::new("/data")));
        assert_eq!(path, Some(PathBuf::from("/data/citywx.log")));
        assert_eq!(log_path(None, None), None);
    }

    #[test]
    fn test_open_log_creates_parent_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("nested").join(LOG_FILE);
        assert!(open_log(&path).is_some());
        assert!(path.exists());
    }

    #[test]
    fn test_open_log_fails_under_a_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "x").expect("write blocker");
        assert!(open_log(&blocker.join(LOG_FILE)).is_none());
    }

    #[test]
    fn test_init_reports_the_file_in_use() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(LOG_FILE);
        assert_eq!(init(Some(&path)), Some(path.clone()));
        assert!(path.exists());
    }

    #[test]
    fn test_init_reports_none_when_file_unavailable() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "x").expect("write blocker");
        assert_eq!(init(Some(&blocker.join(LOG_FILE))), None);
        assert_eq!(init(None), None);
    }
}
