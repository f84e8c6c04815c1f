//! Closed enumerations used by the project configuration.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use ddev_core::error::DdevError;

/// Framework tag identifying the application's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    Cakephp,
    Contao,
    Django4,
    Drupal,
    Expressionengine,
    Laravel,
    Magento,
    Magento2,
    Php,
    Python,
    Shopware6,
    Silverstripe,
    Typo3,
    Wordpress,
}

impl AppType {
    pub const ALL: [AppType; 14] = [
        AppType::Cakephp,
        AppType::Contao,
        AppType::Django4,
        AppType::Drupal,
        AppType::Expressionengine,
        AppType::Laravel,
        AppType::Magento,
        AppType::Magento2,
        AppType::Php,
        AppType::Python,
        AppType::Shopware6,
        AppType::Silverstripe,
        AppType::Typo3,
        AppType::Wordpress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppType::Cakephp => "cakephp",
            AppType::Contao => "contao",
            AppType::Django4 => "django4",
            AppType::Drupal => "drupal",
            AppType::Expressionengine => "expressionengine",
            AppType::Laravel => "laravel",
            AppType::Magento => "magento",
            AppType::Magento2 => "magento2",
            AppType::Php => "php",
            AppType::Python => "python",
            AppType::Shopware6 => "shopware6",
            AppType::Silverstripe => "silverstripe",
            AppType::Typo3 => "typo3",
            AppType::Wordpress => "wordpress",
        }
    }

    /// Python app types run under gunicorn instead of php-fpm.
    pub fn is_python(&self) -> bool {
        matches!(self, AppType::Django4 | AppType::Python)
    }
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppType {
    type Err = DdevError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        AppType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| DdevError::UnknownAppType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebserverType {
    #[serde(rename = "nginx-fpm")]
    NginxFpm,
    #[serde(rename = "apache-fpm")]
    ApacheFpm,
    #[serde(rename = "nginx-gunicorn")]
    NginxGunicorn,
    #[serde(rename = "generic")]
    Generic,
}

impl WebserverType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebserverType::NginxFpm => "nginx-fpm",
            WebserverType::ApacheFpm => "apache-fpm",
            WebserverType::NginxGunicorn => "nginx-gunicorn",
            WebserverType::Generic => "generic",
        }
    }
}

impl fmt::Display for WebserverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseEngine {
    Mysql,
    Mariadb,
    Postgres,
}

impl DatabaseEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseEngine::Mysql => "mysql",
            DatabaseEngine::Mariadb => "mariadb",
            DatabaseEngine::Postgres => "postgres",
        }
    }

    pub fn is_mysql_family(&self) -> bool {
        matches!(self, DatabaseEngine::Mysql | DatabaseEngine::Mariadb)
    }

    /// Port the engine listens on inside the `db` container.
    pub fn port(&self) -> u16 {
        match self {
            DatabaseEngine::Postgres => 5432,
            _ => 3306,
        }
    }
}

impl fmt::Display for DatabaseEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_MARIADB_VERSION: &str = "10.11";
pub const DEFAULT_POSTGRES_VERSION: &str = "16";

/// Database engine plus version, e.g. `mariadb:10.11`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseDesc {
    #[serde(rename = "type")]
    pub engine: DatabaseEngine,
    pub version: String,
}

impl DatabaseDesc {
    pub fn new(engine: DatabaseEngine, version: &str) -> Self {
        Self {
            engine,
            version: version.to_string(),
        }
    }

    /// Numeric comparison of dotted versions ("10.11" > "10.3").
    pub fn version_at_least(&self, minimum: &str) -> bool {
        compare_versions(&self.version, minimum) != Ordering::Less
    }
}

impl Default for DatabaseDesc {
    fn default() -> Self {
        Self::new(DatabaseEngine::Mariadb, DEFAULT_MARIADB_VERSION)
    }
}

impl fmt::Display for DatabaseDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.engine, self.version)
    }
}

/// Compare dotted numeric versions component by component; missing or
/// non-numeric components count as zero.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse = |v: &str| -> Vec<u64> {
        v.split('.')
            .map(|part| {
                part.chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect::<String>()
                    .parse()
                    .unwrap_or(0)
            })
            .collect()
    };
    let (left, right) = (parse(a), parse(b));
    let len = left.len().max(right.len());
    for i in 0..len {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// How xhprof output is collected.
///
/// `Empty` and `Global` both defer to the global configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum XhprofMode {
    #[default]
    #[serde(rename = "")]
    Empty,
    #[serde(rename = "global")]
    Global,
    #[serde(rename = "prepend")]
    Prepend,
    #[serde(rename = "xhgui")]
    Xhgui,
}

impl XhprofMode {
    pub fn is_empty(&self) -> bool {
        *self == XhprofMode::Empty
    }

    pub fn defers_to_global(&self) -> bool {
        matches!(self, XhprofMode::Empty | XhprofMode::Global)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            XhprofMode::Empty => "",
            XhprofMode::Global => "global",
            XhprofMode::Prepend => "prepend",
            XhprofMode::Xhgui => "xhgui",
        }
    }
}

impl fmt::Display for XhprofMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
