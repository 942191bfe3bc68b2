//! # Configuration
//!
//! TOML configuration shared by the GUI and the CLI. Every table is optional;
//! missing keys fall back to defaults.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8088"
//! timeout_secs = 10
//!
//! [user]
//! id = 1
//! email = "admin@example.com"
//!
//! [menu]
//! item_height = 32.0
//! vertical_spacing = 32.0
//!
//! [editor]
//! default_crontab = "0 12 * * 1"
//! text_based_viz_types = ["pivot_table", "pivot_table_v2", "table", "paired_ttest"]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ReportError, ReportResult};
use crate::menu::MenuMetrics;
use crate::report::{
    ActingUser, S3SubMethod, DEFAULT_CRONTAB, S3_SUB_METHODS, TEXT_BASED_VISUALIZATION_TYPES,
};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "REPORT_FORMS_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub user: UserConfig,
    pub menu: MenuMetrics,
    pub editor: EditorOptions,
}

impl AppConfig {
    /// Parse a TOML document
    pub fn from_toml_str(raw: &str, origin: &str) -> ReportResult<Self> {
        toml::from_str(raw).map_err(|e| ReportError::config(origin, e.to_string()))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> ReportResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(AppConfig::default());
        }
        let raw = fs::read_to_string(path)
            .map_err(|e| ReportError::config(path.display().to_string(), e.to_string()))?;
        Self::from_toml_str(&raw, &path.display().to_string())
    }

    /// Load from an explicit path, else from `REPORT_FORMS_CONFIG`, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> ReportResult<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match std::env::var_os(CONFIG_ENV_VAR) {
                Some(path) => Self::load(Path::new(&path)),
                None => Ok(AppConfig::default()),
            },
        }
    }

    pub fn acting_user(&self) -> ActingUser {
        ActingUser::new(self.user.id, self.user.email.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "http://localhost:8088".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub id: i64,
    pub email: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        UserConfig {
            id: 1,
            email: "admin@example.com".to_string(),
        }
    }
}

/// Option sets handed to the editors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    pub default_crontab: String,
    /// Chart kinds that may be reported as embedded text
    pub text_based_viz_types: Vec<String>,
    /// Storage credential styles offered to the user
    pub s3_sub_methods: Vec<S3SubMethod>,
}

impl Default for EditorOptions {
    fn default() -> Self {
        EditorOptions {
            default_crontab: DEFAULT_CRONTAB.to_string(),
            text_based_viz_types: TEXT_BASED_VISUALIZATION_TYPES
                .iter()
                .map(|kind| kind.to_string())
                .collect(),
            s3_sub_methods: S3_SUB_METHODS.to_vec(),
        }
    }
}
