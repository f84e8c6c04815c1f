//! Generic python projects, and the webserver default shared with django4.

use ddev_config::types::{DatabaseDesc, DatabaseEngine, DEFAULT_POSTGRES_VERSION};
use ddev_config::{Project, WebserverType};
use ddev_core::error::Result;
use ddev_core::file_system::has_files_with_extension;

/// `.py` files in the docroot and no `manage.py`.
pub fn looks_like_python(project: &Project) -> bool {
    let docroot = project.docroot_path();
    has_files_with_extension(&docroot, "py") && !docroot.join("manage.py").exists()
}

pub fn detect(project: &Project) -> bool {
    looks_like_python(project)
}

fn default_webserver(project: &mut Project) {
    if project.webserver_type.is_none() {
        project.webserver_type = Some(WebserverType::NginxGunicorn);
    }
}

pub fn config_override(project: &mut Project) -> Result<()> {
    default_webserver(project);
    if project.database.is_none() {
        project.database = Some(DatabaseDesc::new(
            DatabaseEngine::Postgres,
            DEFAULT_POSTGRES_VERSION,
        ));
    }
    Ok(())
}

pub fn config_override_django(project: &mut Project) -> Result<()> {
    default_webserver(project);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_python_defaults() {
        let dir = TempDir::new().unwrap();
        let mut project = Project::new("py", dir.path());
        config_override(&mut project).unwrap();
        assert_eq!(project.webserver_type, Some(WebserverType::NginxGunicorn));
        assert_eq!(project.database_desc().to_string(), "postgres:16");
    }

    #[test]
    fn test_configured_database_kept() {
        let dir = TempDir::new().unwrap();
        let mut project = Project::new("py", dir.path());
        project.database = Some(DatabaseDesc::new(DatabaseEngine::Mysql, "8.0"));
        project.webserver_type = Some(WebserverType::Generic);
        config_override(&mut project).unwrap();
        assert_eq!(project.database_engine(), DatabaseEngine::Mysql);
        assert_eq!(project.webserver_type, Some(WebserverType::Generic));
    }

    #[test]
    fn test_manage_py_is_not_generic_python() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.py"), "").unwrap();
        let project = Project::new("py", dir.path());
        assert!(detect(&project));
        fs::write(dir.path().join("manage.py"), "").unwrap();
        assert!(!detect(&project));
    }
}
