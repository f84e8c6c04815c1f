use std::path::PathBuf;

use super::{composer_requires, write_generated};
use ddev_config::{GlobalConfig, Project};
use ddev_core::error::Result;
use ddev_settings::templates::SettingsTemplate;

fn typo3conf(project: &Project) -> PathBuf {
    project.docroot_path().join("typo3conf")
}

pub fn detect(project: &Project) -> bool {
    project.docroot_path().join("typo3/sysext/core").is_dir()
        || composer_requires(project, "typo3/cms-core")
}

pub fn set_settings_paths(project: &mut Project) {
    project.site_settings_path = Some(typo3conf(project).join("LocalConfiguration.php"));
    project.site_local_settings_path = Some(typo3conf(project).join("AdditionalConfiguration.php"));
}

/// `LocalConfiguration.php` belongs to the TYPO3 installer; only the
/// additional file is generated.
pub fn post_start(project: &Project, global: &GlobalConfig) -> Result<()> {
    let Some(additional) = project.site_local_settings_path.as_deref() else {
        return Ok(());
    };
    write_generated(
        project,
        global,
        additional,
        SettingsTemplate::Typo3AdditionalConfiguration,
    )?;
    Ok(())
}

pub fn upload_dirs(_project: &Project) -> Vec<String> {
    vec!["fileadmin".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_user_additional_configuration_is_left_alone() {
        let dir = TempDir::new().unwrap();
        let mut project = Project::new("t3", dir.path());
        set_settings_paths(&mut project);
        fs::create_dir_all(typo3conf(&project)).unwrap();
        let additional = typo3conf(&project).join("AdditionalConfiguration.php");
        fs::write(&additional, "<?php // mine\n").unwrap();

        post_start(&project, &GlobalConfig::default()).unwrap();
        assert_eq!(fs::read_to_string(&additional).unwrap(), "<?php // mine\n");
    }
}
