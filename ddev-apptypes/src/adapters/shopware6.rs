use super::{composer_requires, env_values, write_env_settings};
use ddev_config::types::DatabaseEngine;
use ddev_config::{GlobalConfig, Project};
use ddev_core::error::Result;
use ddev_settings::db::{mailer_url, DbSettings};
use tracing::debug;

const MIN_MARIADB_VERSION: &str = "10.3";

pub fn detect(project: &Project) -> bool {
    composer_requires(project, "shopware/core") || composer_requires(project, "shopware/platform")
}

pub fn set_settings_paths(project: &mut Project) {
    project.site_settings_path = Some(project.composer_root_path().join(".env"));
}

pub fn config_override(project: &mut Project) -> Result<()> {
    if let Some(db) = project.database.as_mut() {
        if db.engine == DatabaseEngine::Mariadb && !db.version_at_least(MIN_MARIADB_VERSION) {
            debug!(from = %db.version, to = MIN_MARIADB_VERSION, "raising mariadb version");
            db.version = MIN_MARIADB_VERSION.to_string();
        }
    }
    Ok(())
}

pub fn post_start(project: &Project, global: &GlobalConfig) -> Result<()> {
    let Some(path) = project.site_settings_path.as_deref() else {
        return Ok(());
    };
    let db = DbSettings::for_project(project);
    let values = env_values([
        ("DATABASE_URL", db.url()),
        ("APP_URL", project.primary_url(global)),
        ("MAILER_DSN", mailer_url()),
        ("MAILER_URL", mailer_url()),
    ]);
    write_env_settings(path, None, &values)?;
    Ok(())
}

pub fn upload_dirs(_project: &Project) -> Vec<String> {
    vec!["media".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddev_config::DatabaseDesc;
    use tempfile::TempDir;

    #[test]
    fn test_mariadb_raised_to_minimum() {
        let dir = TempDir::new().unwrap();
        let mut project = Project::new("sw", dir.path());
        project.database = Some(DatabaseDesc::new(DatabaseEngine::Mariadb, "10.2"));
        config_override(&mut project).unwrap();
        assert_eq!(project.database_desc().version, "10.3");

        project.database = Some(DatabaseDesc::new(DatabaseEngine::Mariadb, "10.11"));
        config_override(&mut project).unwrap();
        assert_eq!(project.database_desc().version, "10.11");

        project.database = Some(DatabaseDesc::new(DatabaseEngine::Mysql, "5.7"));
        config_override(&mut project).unwrap();
        assert_eq!(project.database_desc().version, "5.7");
    }
}
