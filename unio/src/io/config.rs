//! Runtime configuration (TOML).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::mode::CallMode;

/// Default receive buffer size for files and connections (32 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;

/// Runtime configuration.
///
/// Missing fields default to the values a bare `Runtime::default()` uses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Which operations suspend (`pre-resolved` or `deferred`).
    pub mode: CallMode,

    /// Size of the per-entry receive buffer, allocated once per handle.
    pub buffer_size: usize,

    /// Host substituted when an address has an empty host part.
    pub wildcard_host: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            mode: CallMode::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            wildcard_host: "0.0.0.0".to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn with_mode(mode: CallMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(anyhow!("buffer_size must be > 0"));
        }
        if self.wildcard_host.trim().is_empty() {
            return Err(anyhow!("wildcard_host must not be empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `RuntimeConfig::default()`.
pub fn load_config(path: &Path) -> Result<RuntimeConfig> {
    if !path.exists() {
        let cfg = RuntimeConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: RuntimeConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &RuntimeConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, &buf)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, RuntimeConfig::default());
        assert_eq!(cfg.buffer_size, 32 * 1024);
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("unio.toml");
        let cfg = RuntimeConfig {
            mode: CallMode::Deferred,
            buffer_size: 4096,
            wildcard_host: "127.0.0.1".to_string(),
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("unio.toml");
        fs::write(&path, "mode = \"deferred\"\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.mode, CallMode::Deferred);
        assert_eq!(cfg.buffer_size, DEFAULT_BUFFER_SIZE);
    }

    #[test]
    fn rejects_zero_buffer() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("unio.toml");
        fs::write(&path, "buffer_size = 0\n").expect("write");
        let err = load_config(&path).expect_err("zero buffer");
        assert!(err.to_string().contains("buffer_size"));
    }

    #[test]
    fn rejects_unknown_mode() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("unio.toml");
        fs::write(&path, "mode = \"eager\"\n").expect("write");
        assert!(load_config(&path).is_err());
    }
}
