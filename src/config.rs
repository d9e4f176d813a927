//! Centralized configuration for the detector writer/reader.
//!
//! Goals:
//! - Single place for tunables instead of scattering env lookups.
//! - DetectorConfig::from_env() reads NB_* variables; fluent `with_*`
//!   setters override specific fields.
//!
//! The ring geometry (file size, page size, page count) is fixed by the
//! on-disk format and deliberately not configurable.

use std::path::{Path, PathBuf};

use crate::consts::LOG_FILE;
use crate::util::env_bool;

#[derive(Clone, Debug)]
pub struct DetectorConfig {
    /// Directory holding the log file and valid-checkpoint command files.
    /// Env: NB_LOG_DIR (default ".")
    pub dir: PathBuf,

    /// Log file name inside `dir`.
    /// Env: NB_LOG_FILE (default "nabang.blog")
    pub file_name: String,

    /// Poll interval while `valid` waits for the viewer's verdict, ms.
    /// Env: NB_VALID_POLL_MS (default 50)
    pub valid_poll_ms: u64,

    /// Synchronous view flush after every publish (msync MS_SYNC instead of
    /// MS_ASYNC). Slower; only useful when the log must hit disk eagerly.
    /// Env: NB_SYNC_FLUSH (default false; "1|true|yes|on" => true)
    pub sync_flush: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            file_name: LOG_FILE.to_string(),
            valid_poll_ms: 50,
            sync_flush: false,
        }
    }
}

impl DetectorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("NB_LOG_DIR") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.dir = PathBuf::from(s);
            }
        }

        if let Ok(v) = std::env::var("NB_LOG_FILE") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.file_name = s.to_string();
            }
        }

        if let Ok(v) = std::env::var("NB_VALID_POLL_MS") {
            if let Ok(n) = v.trim().parse::<u64>() {
                cfg.valid_poll_ms = n;
            }
        }

        cfg.sync_flush = env_bool("NB_SYNC_FLUSH", cfg.sync_flush);

        cfg
    }

    /// Full path of the log file.
    pub fn log_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_file_name<S: Into<String>>(mut self, name: S) -> Self {
        self.file_name = name.into();
        self
    }

    pub fn with_valid_poll_ms(mut self, ms: u64) -> Self {
        self.valid_poll_ms = ms;
        self
    }

    pub fn with_sync_flush(mut self, on: bool) -> Self {
        self.sync_flush = on;
        self
    }

    /// Config pointing at an explicit log file path.
    pub fn for_log_path(path: &Path) -> Self {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| LOG_FILE.to_string());
        Self::default().with_dir(dir).with_file_name(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_setters() {
        let cfg = DetectorConfig::default();
        assert_eq!(cfg.file_name, LOG_FILE);
        assert_eq!(cfg.log_path(), PathBuf::from(".").join(LOG_FILE));

        let cfg = cfg.with_dir("/tmp/x").with_file_name("a.blog");
        assert_eq!(cfg.log_path(), PathBuf::from("/tmp/x/a.blog"));
    }

    #[test]
    fn for_log_path_splits_dir_and_name() {
        let cfg = DetectorConfig::for_log_path(Path::new("/var/run/app.blog"));
        assert_eq!(cfg.dir, PathBuf::from("/var/run"));
        assert_eq!(cfg.file_name, "app.blog");

        let cfg = DetectorConfig::for_log_path(Path::new("bare.blog"));
        assert_eq!(cfg.dir, PathBuf::from("."));
        assert_eq!(cfg.file_name, "bare.blog");
    }
}
