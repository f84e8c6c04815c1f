use std::path::PathBuf;

use super::{check_includes, write_generated};
use ddev_config::{GlobalConfig, Project};
use ddev_core::error::Result;
use ddev_settings::signature::{ownership, Ownership};
use ddev_settings::templates::SettingsTemplate;

const DDEV_SETTINGS: &str = "settings.ddev.php";

fn sites_default(project: &Project) -> PathBuf {
    project.docroot_path().join("sites/default")
}

pub fn detect(project: &Project) -> bool {
    project.docroot_path().join("core/lib/Drupal.php").is_file()
}

pub fn set_settings_paths(project: &mut Project) {
    project.site_settings_path = Some(sites_default(project).join("settings.php"));
    project.site_local_settings_path = Some(sites_default(project).join(DDEV_SETTINGS));
}

pub fn post_start(project: &Project, global: &GlobalConfig) -> Result<()> {
    if let Some(settings) = project.site_settings_path.as_deref() {
        match ownership(settings) {
            Ownership::Absent | Ownership::Owned => {
                write_generated(project, global, settings, SettingsTemplate::DrupalSettings)?;
            }
            Ownership::UserOwned => check_includes(settings, DDEV_SETTINGS),
        }
    }
    if let Some(ddev_settings) = project.site_local_settings_path.as_deref() {
        write_generated(project, global, ddev_settings, SettingsTemplate::DrupalSettingsDdev)?;
    }
    Ok(())
}

pub fn upload_dirs(_project: &Project) -> Vec<String> {
    vec!["sites/default/files".to_string()]
}
