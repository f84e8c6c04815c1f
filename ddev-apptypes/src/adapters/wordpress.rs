use super::{check_includes, write_generated};
use ddev_config::{GlobalConfig, Project};
use ddev_core::error::Result;
use ddev_settings::signature::{ownership, Ownership};
use ddev_settings::templates::SettingsTemplate;

const DDEV_CONFIG: &str = "wp-config-ddev.php";

pub fn detect(project: &Project) -> bool {
    project.docroot_path().join("wp-settings.php").is_file()
}

pub fn set_settings_paths(project: &mut Project) {
    let docroot = project.docroot_path();
    project.site_settings_path = Some(docroot.join("wp-config.php"));
    project.site_local_settings_path = Some(docroot.join(DDEV_CONFIG));
}

pub fn post_start(project: &Project, global: &GlobalConfig) -> Result<()> {
    if let Some(config) = project.site_settings_path.as_deref() {
        match ownership(config) {
            Ownership::Absent | Ownership::Owned => {
                write_generated(project, global, config, SettingsTemplate::WordpressConfig)?;
            }
            Ownership::UserOwned => check_includes(config, DDEV_CONFIG),
        }
    }
    if let Some(ddev_config) = project.site_local_settings_path.as_deref() {
        write_generated(project, global, ddev_config, SettingsTemplate::WordpressConfigDdev)?;
    }
    Ok(())
}

pub fn upload_dirs(_project: &Project) -> Vec<String> {
    vec!["wp-content/uploads".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generated_config_is_stable() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("wp-settings.php"), "<?php\n").unwrap();
        let mut project = Project::new("wp", dir.path());
        assert!(detect(&project));
        set_settings_paths(&mut project);

        post_start(&project, &GlobalConfig::default()).unwrap();
        let first = fs::read_to_string(dir.path().join(DDEV_CONFIG)).unwrap();
        post_start(&project, &GlobalConfig::default()).unwrap();
        let second = fs::read_to_string(dir.path().join(DDEV_CONFIG)).unwrap();
        assert_eq!(first, second);
        assert!(fs::read_to_string(dir.path().join("wp-config.php"))
            .unwrap()
            .contains(DDEV_CONFIG));
    }
}
