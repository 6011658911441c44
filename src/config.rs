use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "chime";
const SETTINGS_FILE: &str = "settings.json";

/// Player configuration carried across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default)]
    pub looping: bool,
}

fn default_volume() -> f32 {
    100.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            looping: false,
        }
    }
}

pub fn config_root() -> Result<PathBuf> {
    if let Ok(override_dir) = env::var("CHIME_CONFIG_DIR") {
        return Ok(PathBuf::from(override_dir));
    }

    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .context("neither HOME nor USERPROFILE is set")?;
    Ok(PathBuf::from(home).join(".config").join(APP_DIR))
}

pub fn settings_path() -> Result<PathBuf> {
    Ok(config_root()?.join(SETTINGS_FILE))
}

pub fn ensure_config_dir() -> Result<PathBuf> {
    let root = config_root()?;
    fs::create_dir_all(&root).with_context(|| format!("failed to create {}", root.display()))?;
    Ok(root)
}

pub fn load_settings() -> Result<Settings> {
    let path = settings_path()?;
    if !path.exists() {
        return Ok(Settings::default());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse settings file {}", path.display()))?;
    Ok(settings)
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    ensure_config_dir()?;
    let path = settings_path()?;
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_then_save_and_load_round_trip() {
        let dir = tempdir().expect("tempdir");
        unsafe {
            env::set_var("CHIME_CONFIG_DIR", dir.path().to_string_lossy().as_ref());
        }

        let defaults = load_settings().expect("load defaults");
        assert_eq!(defaults.volume, 100.0);
        assert!(!defaults.looping);

        let settings = Settings {
            volume: 62.5,
            looping: true,
        };
        save_settings(&settings).expect("save");
        let loaded = load_settings().expect("load");
        assert_eq!(loaded.volume, 62.5);
        assert!(loaded.looping);
    }
}
