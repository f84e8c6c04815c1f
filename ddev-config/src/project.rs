//! The project aggregate.
//!
//! A `Project` is loaded from `<approot>/.ddev/config.yaml` on every command.
//! The app-type hooks mutate it in memory (config overrides, settings paths);
//! nothing here writes it back.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml_ng as serde_yaml;

use crate::global_config::GlobalConfig;
use crate::types::{AppType, DatabaseDesc, DatabaseEngine, WebserverType, XhprofMode};
use ddev_core::error::{DdevError, Result};

pub const CONFIG_DIR: &str = ".ddev";
pub const CONFIG_FILE: &str = "config.yaml";
pub const DEFAULT_PHP_VERSION: &str = "8.3";

fn default_php_version() -> String {
    DEFAULT_PHP_VERSION.to_string()
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Stable name used in hostnames and the compose project name
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub app_type: Option<AppType>,

    /// Served directory, relative to the approot
    #[serde(default)]
    pub docroot: String,

    /// Directory holding composer.json, relative to the approot
    #[serde(default)]
    pub composer_root: String,

    #[serde(default = "default_php_version")]
    pub php_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webserver_type: Option<WebserverType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseDesc>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub disable_settings_management: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub disable_upload_dirs_warning: bool,

    /// Overrides the app type's default upload directories
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upload_dirs: Vec<String>,

    #[serde(default, skip_serializing_if = "XhprofMode::is_empty")]
    pub xhprof_mode: XhprofMode,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub xhgui_http_port: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub xhgui_https_port: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub router_http_port: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub router_https_port: String,

    /// Serve only plain http through the router
    #[serde(default, skip_serializing_if = "is_false")]
    pub http_only: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_tld: String,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,

    /// Absolute project root; set by the loader, never serialized
    #[serde(skip)]
    pub approot: PathBuf,

    #[serde(skip)]
    pub site_settings_path: Option<PathBuf>,

    #[serde(skip)]
    pub site_local_settings_path: Option<PathBuf>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            name: String::new(),
            app_type: None,
            docroot: String::new(),
            composer_root: String::new(),
            php_version: default_php_version(),
            webserver_type: None,
            database: None,
            disable_settings_management: false,
            disable_upload_dirs_warning: false,
            upload_dirs: Vec::new(),
            xhprof_mode: XhprofMode::Empty,
            xhgui_http_port: String::new(),
            xhgui_https_port: String::new(),
            router_http_port: String::new(),
            router_https_port: String::new(),
            http_only: false,
            project_tld: String::new(),
            extra: IndexMap::new(),
            approot: PathBuf::new(),
            site_settings_path: None,
            site_local_settings_path: None,
        }
    }
}

impl Project {
    /// In-memory project rooted at `approot`, for callers that have no config file yet.
    pub fn new(name: &str, approot: &Path) -> Self {
        Self {
            name: name.to_string(),
            approot: approot.to_path_buf(),
            ..Default::default()
        }
    }

    /// Load `<approot>/.ddev/config.yaml`.
    pub fn load(approot: &Path) -> Result<Self> {
        let path = approot.join(CONFIG_DIR).join(CONFIG_FILE);
        let content = fs::read_to_string(&path).map_err(|e| {
            DdevError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut project: Project = if content.trim().is_empty() {
            Project::default()
        } else {
            serde_yaml::from_str(&content).map_err(|e| {
                DdevError::Config(format!("Failed to parse {}: {}", path.display(), e))
            })?
        };
        project.approot = approot.canonicalize().unwrap_or_else(|_| approot.to_path_buf());
        if project.name.trim().is_empty() {
            project.name = project
                .approot
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "project".to_string());
        }
        Ok(project)
    }

    /// Walk up from `start` to the first directory containing `.ddev/config.yaml`.
    pub fn find_approot(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE).is_file())
            .map(Path::to_path_buf)
    }

    pub fn docroot_path(&self) -> PathBuf {
        self.approot.join(&self.docroot)
    }

    pub fn composer_root_path(&self) -> PathBuf {
        self.approot.join(&self.composer_root)
    }

    /// The configured database, or the default (mariadb) when unset.
    pub fn database_desc(&self) -> DatabaseDesc {
        self.database.clone().unwrap_or_default()
    }

    pub fn database_engine(&self) -> DatabaseEngine {
        self.database_desc().engine
    }

    /// Client binary inside the `db` container.
    pub fn db_client_command(&self) -> &'static str {
        let db = self.database_desc();
        match db.engine {
            DatabaseEngine::Postgres => "psql",
            DatabaseEngine::Mariadb if db.version_at_least("11") => "mariadb",
            _ => "mysql",
        }
    }

    pub fn hostname(&self, global: &GlobalConfig) -> String {
        let tld = if self.project_tld.is_empty() {
            &global.project_tld
        } else {
            &self.project_tld
        };
        format!("{}.{}", self.name, tld)
    }

    pub fn router_http_port<'a>(&'a self, global: &'a GlobalConfig) -> &'a str {
        non_empty_or(&self.router_http_port, &global.router_http_port)
    }

    pub fn router_https_port<'a>(&'a self, global: &'a GlobalConfig) -> &'a str {
        non_empty_or(&self.router_https_port, &global.router_https_port)
    }

    pub fn http_url(&self, global: &GlobalConfig) -> String {
        url_with_port("http", &self.hostname(global), self.router_http_port(global), "80")
    }

    pub fn https_url(&self, global: &GlobalConfig) -> String {
        url_with_port("https", &self.hostname(global), self.router_https_port(global), "443")
    }

    /// https unless the project is http-only.
    pub fn primary_url(&self, global: &GlobalConfig) -> String {
        if self.http_only {
            self.http_url(global)
        } else {
            self.https_url(global)
        }
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn url_with_port(scheme: &str, host: &str, port: &str, default_port: &str) -> String {
    if port.is_empty() || port == default_port {
        format!("{scheme}://{host}")
    } else {
        format!("{scheme}://{host}:{port}")
    }
}
