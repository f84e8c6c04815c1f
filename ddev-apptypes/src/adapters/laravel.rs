use super::{env_values, write_env_settings};
use ddev_config::{GlobalConfig, Project};
use ddev_core::ddev_warning;
use ddev_core::error::Result;
use ddev_settings::db::{DbSettings, MAILER_HOST, MAILER_PORT};

pub fn detect(project: &Project) -> bool {
    project.composer_root_path().join("artisan").is_file()
}

pub fn set_settings_paths(project: &mut Project) {
    project.site_settings_path = Some(project.composer_root_path().join(".env"));
}

pub fn post_start(project: &Project, global: &GlobalConfig) -> Result<()> {
    let Some(path) = project.site_settings_path.as_deref() else {
        return Ok(());
    };
    let example = project.composer_root_path().join(".env.example");
    if !path.exists() && !example.is_file() {
        ddev_warning!(
            "No {} or .env.example found; create .env to configure the database connection",
            path.display()
        );
        return Ok(());
    }

    let db = DbSettings::for_project(project);
    let values = env_values([
        ("APP_URL", project.primary_url(global)),
        ("DB_HOST", db.host.clone()),
        ("DB_PORT", db.port.to_string()),
        ("DB_DATABASE", db.name.clone()),
        ("DB_USERNAME", db.user.clone()),
        ("DB_PASSWORD", db.password.clone()),
        ("DB_CONNECTION", db.driver.to_string()),
        ("MAIL_MAILER", "smtp".to_string()),
        ("MAIL_HOST", MAILER_HOST.to_string()),
        ("MAIL_PORT", MAILER_PORT.to_string()),
    ]);
    write_env_settings(path, Some(&example), &values)?;
    Ok(())
}
