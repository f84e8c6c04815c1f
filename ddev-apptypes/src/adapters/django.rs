use super::{check_includes, write_generated};
use ddev_config::{GlobalConfig, Project};
use ddev_core::ddev_warning;
use ddev_core::error::Result;
use ddev_core::file_system::find_file;
use ddev_settings::templates::SettingsTemplate;

const SETTINGS_SEARCH_DEPTH: usize = 3;

pub fn detect(project: &Project) -> bool {
    project.docroot_path().join("manage.py").is_file()
}

/// The first `settings.py` below the approot, and `settings.ddev.py` beside it.
pub fn set_settings_paths(project: &mut Project) {
    if let Some(settings) = find_file(&project.approot, "settings.py", SETTINGS_SEARCH_DEPTH) {
        project.site_local_settings_path = settings.parent().map(|dir| dir.join("settings.ddev.py"));
        project.site_settings_path = Some(settings);
    }
}

pub fn post_start(project: &Project, global: &GlobalConfig) -> Result<()> {
    let (Some(settings), Some(ddev_settings)) = (
        project.site_settings_path.as_deref(),
        project.site_local_settings_path.as_deref(),
    ) else {
        ddev_warning!(
            "No settings.py found under {}; database settings were not generated",
            project.approot.display()
        );
        return Ok(());
    };
    write_generated(project, global, ddev_settings, SettingsTemplate::DjangoSettingsDdev)?;
    check_includes(settings, "settings.ddev");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_settings_found_in_package() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("mysite/mysite")).unwrap();
        fs::write(dir.path().join("mysite/mysite/settings.py"), "DEBUG = True\n").unwrap();
        let mut project = Project::new("dj", dir.path());
        set_settings_paths(&mut project);
        assert_eq!(
            project.site_settings_path,
            Some(dir.path().join("mysite/mysite/settings.py"))
        );

        post_start(&project, &GlobalConfig::default()).unwrap();
        let generated =
            fs::read_to_string(dir.path().join("mysite/mysite/settings.ddev.py")).unwrap();
        assert!(generated.contains("'ENGINE': 'django.db.backends.mysql'"));
        assert_eq!(
            fs::read_to_string(dir.path().join("mysite/mysite/settings.py")).unwrap(),
            "DEBUG = True\n"
        );
    }

    #[test]
    fn test_no_settings_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let mut project = Project::new("dj", dir.path());
        set_settings_paths(&mut project);
        assert!(project.site_settings_path.is_none());
        post_start(&project, &GlobalConfig::default()).unwrap();
    }
}
