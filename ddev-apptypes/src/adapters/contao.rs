use super::{composer_requires, env_values, write_env_settings};
use ddev_config::{GlobalConfig, Project, WebserverType};
use ddev_core::error::Result;
use ddev_settings::db::{mailer_url, DbSettings};

pub fn detect(project: &Project) -> bool {
    composer_requires(project, "contao/manager-bundle")
        || composer_requires(project, "contao/core-bundle")
}

pub fn set_settings_paths(project: &mut Project) {
    project.site_settings_path = Some(project.composer_root_path().join(".env.local"));
}

pub fn config_override(project: &mut Project) -> Result<()> {
    if project.webserver_type.is_none() {
        project.webserver_type = Some(WebserverType::ApacheFpm);
    }
    Ok(())
}

pub fn post_start(project: &Project, _global: &GlobalConfig) -> Result<()> {
    let Some(path) = project.site_settings_path.as_deref() else {
        return Ok(());
    };
    let db = DbSettings::for_project(project);
    let values = env_values([
        ("DATABASE_URL", db.url()),
        ("MAILER_DSN", mailer_url()),
    ]);
    write_env_settings(path, None, &values)?;
    Ok(())
}

pub fn upload_dirs(_project: &Project) -> Vec<String> {
    vec!["files".to_string()]
}
