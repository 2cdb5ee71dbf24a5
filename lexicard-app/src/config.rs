//! Application configuration loaded from `config.toml`.
//!
//! Lookup order: `--config <path>`, then `config.toml` in the platform config
//! directory, then built-in defaults. A missing default file is fine; a file
//! that exists but does not parse is an error.

use anyhow::{bail, Context, Result};
use lexicard_core::{IntervalTable, Scheduler, DEFAULT_INTERVALS};
use lexicard_json::paths;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_FILTER: &str = "lexicard=info,lexicard_core=info,lexicard_json=info";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Review gaps in days, one per phase.
    pub intervals: Vec<u32>,
    /// Delete words from the store once they graduate.
    pub retire_graduated: bool,
    pub store_path: Option<PathBuf>,
    /// Backups kept beside the store. Writes within the same second share
    /// one backup, so this counts roughly one backup per action.
    pub max_backups: usize,
    pub log_filter: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            intervals: DEFAULT_INTERVALS.to_vec(),
            retire_graduated: true,
            store_path: None,
            max_backups: 10,
            log_filter: None,
        }
    }
}

impl AppConfig {
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => {
                if !p.exists() {
                    bail!("config file not found: {}", p.display());
                }
                p.to_path_buf()
            }
            None => {
                let p = paths::default_config_file();
                if !p.exists() {
                    return Ok(Self::default());
                }
                p
            }
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(text)?;
        cfg.interval_table()?;
        Ok(cfg)
    }

    pub fn interval_table(&self) -> Result<IntervalTable> {
        Ok(IntervalTable::new(self.intervals.clone())?)
    }

    pub fn scheduler(&self) -> Result<Scheduler> {
        Ok(Scheduler::new(self.interval_table()?).with_retire_graduated(self.retire_graduated))
    }

    /// Store file and backups dir; a CLI override wins over the config value.
    pub fn store_paths(&self, cli_override: Option<&Path>) -> (PathBuf, PathBuf) {
        match cli_override.map(Path::to_path_buf).or_else(|| self.store_path.clone()) {
            Some(file) => {
                let backups = paths::backups_for(&file);
                (file, backups)
            }
            None => paths::default_store_file(),
        }
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.intervals, DEFAULT_INTERVALS.to_vec());
        assert!(cfg.retire_graduated);
        assert_eq!(cfg.max_backups, 10);
        assert_eq!(cfg.log_filter(), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn parses_all_keys() {
        let cfg = AppConfig::from_toml(
            r#"
            intervals = [1, 2, 4]
            retire_graduated = false
            store_path = "/tmp/words.json"
            max_backups = 3
            log_filter = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.interval_table().unwrap().len(), 3);
        assert!(!cfg.scheduler().unwrap().retires_graduated());
        let (file, backups) = cfg.store_paths(None);
        assert_eq!(file, PathBuf::from("/tmp/words.json"));
        assert_eq!(backups, PathBuf::from("/tmp/backups"));
        assert_eq!(cfg.log_filter(), "debug");
    }

    #[test]
    fn cli_store_path_wins() {
        let cfg = AppConfig::from_toml(r#"store_path = "/a/b.json""#).unwrap();
        let (file, _) = cfg.store_paths(Some(Path::new("/c/d.json")));
        assert_eq!(file, PathBuf::from("/c/d.json"));
    }

    #[test]
    fn rejects_bad_intervals_and_unknown_keys() {
        assert!(AppConfig::from_toml("intervals = []").is_err());
        assert!(AppConfig::from_toml("intervals = [1, 0]").is_err());
        assert!(AppConfig::from_toml("colour = true").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
        let path = dir.path().join("c.toml");
        std::fs::write(&path, "max_backups = 4").unwrap();
        assert_eq!(AppConfig::load(Some(&path)).unwrap().max_backups, 4);
    }
}
