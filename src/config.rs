use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::words::Difficulty;

pub const DEFAULT_DURATION_SECS: u32 = 60;

/// Round settings captured when a round starts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub duration_secs: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }
}

impl GameConfig {
    /// Build from raw user input. Bad values fall back silently.
    pub fn from_raw(difficulty: &str, duration: &str) -> Self {
        Self {
            difficulty: Difficulty::parse_or_default(difficulty),
            duration_secs: parse_duration(duration),
        }
    }

    /// A zero duration read from disk is treated as missing.
    pub fn normalized(self) -> Self {
        Self {
            duration_secs: if self.duration_secs == 0 {
                DEFAULT_DURATION_SECS
            } else {
                self.duration_secs
            },
            ..self
        }
    }
}

pub fn parse_duration(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(secs) if secs > 0 => secs,
        _ => DEFAULT_DURATION_SECS,
    }
}

/// Remembers the last settings between runs
pub trait ConfigStore {
    fn load(&self) -> GameConfig;
    fn save(&self, cfg: &GameConfig) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("keyrush_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> GameConfig {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<GameConfig>(&bytes) {
                return cfg.normalized();
            }
        }
        GameConfig::default()
    }

    fn save(&self, cfg: &GameConfig) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        let cfg = GameConfig::default();
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        let cfg = GameConfig {
            difficulty: Difficulty::Hard,
            duration_secs: 30,
        };
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn unknown_values_on_disk_fall_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{"difficulty": "insane", "durationSecs": 0}"#).unwrap();

        assert_eq!(FileConfigStore::with_path(&path).load(), GameConfig::default());
    }

    #[test]
    fn from_raw_defaults() {
        assert_eq!(GameConfig::from_raw("", ""), GameConfig::default());
        assert_eq!(
            GameConfig::from_raw("easy", "45"),
            GameConfig {
                difficulty: Difficulty::Easy,
                duration_secs: 45
            }
        );
    }

    #[test]
    fn parse_duration_rejects_bad_input() {
        assert_eq!(parse_duration("30"), 30);
        assert_eq!(parse_duration(" 90 "), 90);
        assert_eq!(parse_duration("0"), DEFAULT_DURATION_SECS);
        assert_eq!(parse_duration("-5"), DEFAULT_DURATION_SECS);
        assert_eq!(parse_duration("ten"), DEFAULT_DURATION_SECS);
        assert_eq!(parse_duration("2.5"), DEFAULT_DURATION_SECS);
    }
}
