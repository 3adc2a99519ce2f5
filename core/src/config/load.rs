use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default planlog data directory: ~/.planlog
pub fn get_planlog_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".planlog"))
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    let cfg = toml::from_str::<AppConfig>(&s)?;
    Ok(cfg)
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.planlog/config.toml
    let user_config = get_planlog_data_dir()?.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg = if user_config.exists() {
        load_from_path(&user_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut cfg);
    Ok(cfg)
}

// Environment variable overrides (highest priority).
fn apply_env_overrides(cfg: &mut AppConfig) {
    if let Ok(v) = std::env::var("PLANLOG_ADDRESS") {
        if !v.trim().is_empty() {
            cfg.api.address = v;
        }
    }
    if let Ok(v) = std::env::var("PLANLOG_TOKEN") {
        if !v.trim().is_empty() {
            cfg.api.token = v;
        }
    }
}
