use crate::infra::retry::RetryPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExploreConfig {
    pub max_initial_explored_count: usize,
    pub explore_limit: usize,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            max_initial_explored_count: 3,
            explore_limit: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListSyncConfig {
    pub page_size: u32,
    pub retry: RetryPolicy,
    pub explore: ExploreConfig,
}

impl Default for ListSyncConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            retry: RetryPolicy::default(),
            explore: ExploreConfig::default(),
        }
    }
}

pub fn load_config() -> ListSyncConfig {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> ListSyncConfig {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return ListSyncConfig::default();
    };
    match toml::from_str(&contents) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("Ignoring invalid config at {}: {}", path.display(), err);
            ListSyncConfig::default()
        }
    }
}

pub fn save_config(config: &ListSyncConfig) -> Result<()> {
    save_config_to(config, &config_path())
}

pub fn save_config_to(config: &ListSyncConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create config dir {}", parent.display()))?;
    }
    let contents = toml::to_string_pretty(config).context("serialize config")?;
    std::fs::write(path, contents).with_context(|| format!("write {}", path.display()))
}

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("LISTSYNC_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    app_data_dir().join("config.toml")
}

fn app_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var("LISTSYNC_DATA_HOME") {
        return PathBuf::from(path);
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = home::home_dir() {
            return home
                .join("Library")
                .join("Application Support")
                .join("listsync");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("listsync");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("listsync");
        }
        if let Some(home) = home::home_dir() {
            return home.join(".local").join("share").join("listsync");
        }
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".listsync")
}
