//! Magento 1 and Magento 2. Both own a single generated settings file.

use super::write_generated;
use ddev_config::{GlobalConfig, Project};
use ddev_core::error::Result;
use ddev_settings::templates::SettingsTemplate;

pub fn detect_magento2(project: &Project) -> bool {
    project.composer_root_path().join("bin/magento").is_file()
}

pub fn detect_magento(project: &Project) -> bool {
    project.docroot_path().join("app/Mage.php").is_file()
}

pub fn set_magento2_settings_paths(project: &mut Project) {
    project.site_settings_path = Some(project.composer_root_path().join("app/etc/env.php"));
}

pub fn set_magento_settings_paths(project: &mut Project) {
    project.site_settings_path = Some(project.docroot_path().join("app/etc/local.xml"));
}

pub fn magento2_post_start(project: &Project, global: &GlobalConfig) -> Result<()> {
    if let Some(env_php) = project.site_settings_path.as_deref() {
        write_generated(project, global, env_php, SettingsTemplate::Magento2Env)?;
    }
    Ok(())
}

pub fn magento_post_start(project: &Project, global: &GlobalConfig) -> Result<()> {
    if let Some(local_xml) = project.site_settings_path.as_deref() {
        write_generated(project, global, local_xml, SettingsTemplate::MagentoLocalXml)?;
    }
    Ok(())
}

pub fn upload_dirs(_project: &Project) -> Vec<String> {
    vec!["media".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_magento2_env_php_generated_under_composer_root() {
        let dir = TempDir::new().unwrap();
        let mut project = Project::new("m2", dir.path());
        project.docroot = "pub".into();
        set_magento2_settings_paths(&mut project);
        magento2_post_start(&project, &GlobalConfig::default()).unwrap();

        let env = fs::read_to_string(dir.path().join("app/etc/env.php")).unwrap();
        assert!(env.contains("#ddev-generated"));
        assert!(env.contains("'host' => 'db'"));
    }

    #[test]
    fn test_user_local_xml_is_kept() {
        let dir = TempDir::new().unwrap();
        let mut project = Project::new("m1", dir.path());
        set_magento_settings_paths(&mut project);
        fs::create_dir_all(dir.path().join("app/etc")).unwrap();
        fs::write(dir.path().join("app/etc/local.xml"), "<config/>\n").unwrap();

        magento_post_start(&project, &GlobalConfig::default()).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("app/etc/local.xml")).unwrap(),
            "<config/>\n"
        );
    }
}
