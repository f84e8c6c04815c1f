//! Connection values as seen from inside the web container.

use serde::Serialize;

use ddev_config::types::DatabaseEngine;
use ddev_config::Project;

pub const DB_HOST: &str = "db";
pub const DB_NAME: &str = "db";
pub const DB_USER: &str = "db";
pub const DB_PASSWORD: &str = "db";
pub const MAILER_HOST: &str = "127.0.0.1";
pub const MAILER_PORT: u16 = 1025;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DbSettings {
    pub host: String,
    pub name: String,
    pub user: String,
    pub password: String,
    pub port: u16,
    #[serde(skip)]
    pub engine: DatabaseEngine,
    /// `mysql` or `pgsql`; used as URL scheme and Drupal/Contao driver name
    pub driver: &'static str,
    pub pdo_driver: &'static str,
    pub django_engine: &'static str,
}

impl DbSettings {
    pub fn for_engine(engine: DatabaseEngine) -> Self {
        let postgres = engine == DatabaseEngine::Postgres;
        Self {
            host: DB_HOST.to_string(),
            name: DB_NAME.to_string(),
            user: DB_USER.to_string(),
            password: DB_PASSWORD.to_string(),
            port: engine.port(),
            engine,
            driver: if postgres { "pgsql" } else { "mysql" },
            pdo_driver: if postgres { "pdo_pgsql" } else { "pdo_mysql" },
            django_engine: if postgres {
                "django.db.backends.postgresql"
            } else {
                "django.db.backends.mysql"
            },
        }
    }

    pub fn for_project(project: &Project) -> Self {
        Self::for_engine(project.database_engine())
    }

    /// `mysql://db:db@db:3306/db`
    pub fn url(&self) -> String {
        format!(
            "{}://{}:{}@{}:{}/{}",
            self.driver, self.user, self.password, self.host, self.port, self.name
        )
    }

    /// Class name Silverstripe expects in `SS_DATABASE_CLASS`.
    pub fn silverstripe_class(&self) -> &'static str {
        match self.engine {
            DatabaseEngine::Postgres => "PostgreSQLDatabase",
            _ => "MySQLDatabase",
        }
    }
}

pub fn mailer_url() -> String {
    format!("smtp://{MAILER_HOST}:{MAILER_PORT}")
}
