//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::Project;
use crate::import::preview::DEFAULT_PREVIEW_LIMIT;

/// Default store location, relative to the project root
pub const DEFAULT_STORE_PATH: &str = ".folio/store.db";

/// Folio configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Admin user name checked by the auth service
    pub admin_user: Option<String>,

    /// Admin password checked by the auth service
    pub admin_password: Option<String>,

    /// Path of the SQLite record store
    pub store: Option<String>,

    /// Rows shown in the import preview before the "...and N more" line
    pub preview_limit: Option<usize>,
}

impl Config {
    /// Load configuration for a project (or none), merging sources in
    /// priority order
    pub fn load_for(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/folio/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (.folio/config.yaml)
        if let Some(project) = project {
            if let Some(project_config) = Self::read_file(&project.config_path()) {
                config.merge(project_config);
            }
        }

        // 4. Environment variables
        if let Ok(user) = std::env::var("FOLIO_ADMIN_USER") {
            config.admin_user = Some(user);
        }
        if let Ok(password) = std::env::var("FOLIO_ADMIN_PASSWORD") {
            config.admin_password = Some(password);
        }
        if let Ok(store) = std::env::var("FOLIO_STORE") {
            config.store = Some(store);
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "ignoring unreadable config file"
                );
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "folio")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.admin_user.is_some() {
            self.admin_user = other.admin_user;
        }
        if other.admin_password.is_some() {
            self.admin_password = other.admin_password;
        }
        if other.store.is_some() {
            self.store = other.store;
        }
        if other.preview_limit.is_some() {
            self.preview_limit = other.preview_limit;
        }
    }

    /// Resolve the store path against the project root
    pub fn store_path(&self, project_root: &Path) -> PathBuf {
        let raw = self.store.as_deref().unwrap_or(DEFAULT_STORE_PATH);
        let path = Path::new(raw);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_root.join(path)
        }
    }

    pub fn preview_limit(&self) -> usize {
        self.preview_limit
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_PREVIEW_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_later_layer() {
        let mut base = Config {
            admin_user: Some("admin".into()),
            store: Some("a.db".into()),
            ..Default::default()
        };
        base.merge(Config {
            store: Some("b.db".into()),
            preview_limit: Some(25),
            ..Default::default()
        });

        assert_eq!(base.admin_user.as_deref(), Some("admin"));
        assert_eq!(base.store.as_deref(), Some("b.db"));
        assert_eq!(base.preview_limit(), 25);
    }

    #[test]
    fn test_store_path_relative_to_root() {
        let config = Config::default();
        let root = Path::new("/srv/site");
        assert_eq!(config.store_path(root), root.join(DEFAULT_STORE_PATH));

        let config = Config {
            store: Some("/var/lib/folio.db".into()),
            ..Default::default()
        };
        assert_eq!(config.store_path(root), PathBuf::from("/var/lib/folio.db"));
    }

    #[test]
    fn test_zero_preview_limit_falls_back() {
        let config = Config {
            preview_limit: Some(0),
            ..Default::default()
        };
        assert_eq!(config.preview_limit(), DEFAULT_PREVIEW_LIMIT);
    }

    #[test]
    fn test_parses_yaml() {
        let config: Config =
            serde_yml::from_str("admin_user: owner\npreview_limit: 5\n").unwrap();
        assert_eq!(config.admin_user.as_deref(), Some("owner"));
        assert_eq!(config.preview_limit, Some(5));
        assert!(config.admin_password.is_none());
    }
}
