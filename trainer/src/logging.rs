use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, EnvFilter};

/// Environment variable holding the log filter, e.g. `CAVALA_LOG=cavala_core=debug`
pub const LOG_ENV: &str = "CAVALA_LOG";

/// Where logs go when `--log-file` is not given
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("cavala").join("cavala.log"))
}

/// Install the global subscriber. The terminal belongs to the TUI, so output
/// goes to a file; with no writable file, logs are dropped.
pub fn init(log_file: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let path = log_file.map(Path::to_path_buf).or_else(default_log_path);
    let (writer, opened) = match path.as_deref().map(open_log_file) {
        Some(Ok(file)) => (BoxMakeWriter::new(Mutex::new(file)), path),
        Some(Err(e)) => {
            eprintln!("Warning: logging disabled: {}", e);
            (BoxMakeWriter::new(std::io::sink), None)
        }
        None => (BoxMakeWriter::new(std::io::sink), None),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {}", e))?;

    Ok(opened)
}

fn open_log_file(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_is_created_with_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cavala.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn default_path_lives_under_cavala() {
        if let Some(path) = default_log_path() {
            assert!(path.ends_with("cavala/cavala.log"));
        }
    }
}
