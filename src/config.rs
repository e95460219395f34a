//! Docking configuration persistence
//!
//! Stores window sizing defaults in `~/.config/dockspace/config.yaml`

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::layout::TabId;

/// Size of windows created for tabs with no configured default
pub const FALLBACK_WINDOW_SIZE: Vec2 = Vec2::new(1000.0, 600.0);

/// Docking configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockConfig {
    /// Size used when a tab has to be spawned into a brand-new window
    #[serde(default = "default_fallback_window_size")]
    pub fallback_window_size: Vec2,

    /// Per tab type window sizes, overriding the fallback
    #[serde(default)]
    pub default_tab_window_sizes: BTreeMap<String, Vec2>,

    /// Title given to windows that show no major tab
    #[serde(default = "default_application_title")]
    pub application_title: String,
}

fn default_fallback_window_size() -> Vec2 {
    FALLBACK_WINDOW_SIZE
}

fn default_application_title() -> String {
    "Dockspace".to_string()
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            fallback_window_size: default_fallback_window_size(),
            default_tab_window_sizes: BTreeMap::new(),
            application_title: default_application_title(),
        }
    }
}

impl DockConfig {
    /// Window size for a new window hosting `tab_id`
    pub fn default_window_size(&self, tab_id: &TabId) -> Vec2 {
        self.default_tab_window_sizes
            .get(&tab_id.tab_type)
            .copied()
            .unwrap_or(self.fallback_window_size)
    }

    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, or return defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_size_falls_back() {
        let mut config = DockConfig::default();
        assert_eq!(config.default_window_size(&TabId::new("Log")), FALLBACK_WINDOW_SIZE);

        config
            .default_tab_window_sizes
            .insert("Log".to_string(), Vec2::new(400.0, 300.0));
        assert_eq!(
            config.default_window_size(&TabId::with_instance("Log", 2)),
            Vec2::new(400.0, 300.0)
        );
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: DockConfig = serde_yaml::from_str("application_title: Studio\n").unwrap();
        assert_eq!(config.application_title, "Studio");
        assert_eq!(config.fallback_window_size, FALLBACK_WINDOW_SIZE);
        assert!(config.default_tab_window_sizes.is_empty());
    }
}
