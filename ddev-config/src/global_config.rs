//! Global configuration for tool-wide settings
//!
//! This module defines the structure of `~/.ddev/global_config.yaml`, which
//! holds defaults that apply to every project on the machine: router ports,
//! the project TLD and the xhprof/xhgui defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml_ng as serde_yaml;
use tracing::debug;

use crate::types::XhprofMode;
use ddev_core::error::{DdevError, Result};

pub const GLOBAL_CONFIG_FILE: &str = "global_config.yaml";

/// Root structure for global configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Host port for the xhgui UI over http
    #[serde(default = "default_xhgui_http_port")]
    pub xhgui_http_port: String,

    /// Host port for the xhgui UI over https
    #[serde(default = "default_xhgui_https_port")]
    pub xhgui_https_port: String,

    /// Default collection mode for projects that do not set one
    #[serde(default = "default_xhprof_mode")]
    pub xhprof_mode: XhprofMode,

    #[serde(default = "default_router_http_port")]
    pub router_http_port: String,

    #[serde(default = "default_router_https_port")]
    pub router_https_port: String,

    /// When false, services are reached directly on the docker host IP
    #[serde(default = "default_true")]
    pub router_enabled: bool,

    #[serde(default = "default_project_tld")]
    pub project_tld: String,

    /// Extra configuration kept for round-tripping
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

fn default_xhgui_http_port() -> String {
    "8143".to_string()
}

fn default_xhgui_https_port() -> String {
    "8142".to_string()
}

fn default_xhprof_mode() -> XhprofMode {
    XhprofMode::Prepend
}

fn default_router_http_port() -> String {
    "80".to_string()
}

fn default_router_https_port() -> String {
    "443".to_string()
}

fn default_project_tld() -> String {
    "ddev.site".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            xhgui_http_port: default_xhgui_http_port(),
            xhgui_https_port: default_xhgui_https_port(),
            xhprof_mode: default_xhprof_mode(),
            router_http_port: default_router_http_port(),
            router_https_port: default_router_https_port(),
            router_enabled: true,
            project_tld: default_project_tld(),
            extra: IndexMap::new(),
        }
    }
}

impl GlobalConfig {
    /// Directory holding the global config: `$DDEV_GLOBAL_DIR` or `~/.ddev`.
    pub fn global_dir() -> Result<PathBuf> {
        if let Ok(dir) = env::var("DDEV_GLOBAL_DIR") {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        let home = dirs::home_dir()
            .ok_or_else(|| DdevError::Config("Cannot determine home directory".to_string()))?;
        Ok(home.join(".ddev"))
    }

    /// Load from the standard location; a missing file yields the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::global_dir()?.join(GLOBAL_CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no global config, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: GlobalConfig = serde_yaml::from_str(&content).map_err(|e| {
            DdevError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.normalize();
        Ok(config)
    }

    /// The global mode must be concrete; anything deferring falls back to prepend.
    fn normalize(&mut self) {
        if self.xhprof_mode.defers_to_global() {
            self.xhprof_mode = default_xhprof_mode();
        }
        if self.xhgui_http_port.trim().is_empty() {
            self.xhgui_http_port = default_xhgui_http_port();
        }
        if self.xhgui_https_port.trim().is_empty() {
            self.xhgui_https_port = default_xhgui_https_port();
        }
    }
}
