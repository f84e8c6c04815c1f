use super::{composer_requires, env_values, write_env_settings};
use ddev_config::types::{DatabaseDesc, DatabaseEngine, WebserverType};
use ddev_config::{GlobalConfig, Project};
use ddev_core::error::Result;
use ddev_settings::db::{mailer_url, DbSettings};

const PHP_VERSION: &str = "8.1";
const MARIADB_VERSION: &str = "10.4";

pub fn detect(project: &Project) -> bool {
    composer_requires(project, "silverstripe/framework")
        || composer_requires(project, "silverstripe/recipe-cms")
}

pub fn set_settings_paths(project: &mut Project) {
    project.site_settings_path = Some(project.composer_root_path().join(".env"));
}

pub fn config_override(project: &mut Project) -> Result<()> {
    project.php_version = PHP_VERSION.to_string();
    project.webserver_type = Some(WebserverType::ApacheFpm);
    project.database = Some(DatabaseDesc::new(DatabaseEngine::Mariadb, MARIADB_VERSION));
    Ok(())
}

pub fn post_start(project: &Project, global: &GlobalConfig) -> Result<()> {
    let Some(path) = project.site_settings_path.as_deref() else {
        return Ok(());
    };
    let db = DbSettings::for_project(project);
    let values = env_values([
        ("SS_BASE_URL", project.primary_url(global)),
        ("SS_DATABASE_CLASS", db.silverstripe_class().to_string()),
        ("SS_DATABASE_SERVER", db.host.clone()),
        ("SS_DATABASE_PORT", db.port.to_string()),
        ("SS_DATABASE_USERNAME", db.user.clone()),
        ("SS_DATABASE_PASSWORD", db.password.clone()),
        ("SS_DATABASE_NAME", db.name.clone()),
        ("SS_ENVIRONMENT_TYPE", "dev".to_string()),
        ("SS_DEFAULT_ADMIN_USERNAME", "admin".to_string()),
        ("SS_DEFAULT_ADMIN_PASSWORD", "password".to_string()),
        ("MAILER_DSN", mailer_url()),
    ]);
    write_env_settings(path, None, &values)?;
    Ok(())
}

pub fn upload_dirs(_project: &Project) -> Vec<String> {
    vec!["assets".to_string()]
}
