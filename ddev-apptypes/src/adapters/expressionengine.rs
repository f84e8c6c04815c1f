use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::{env_values, write_env_settings};
use ddev_config::{GlobalConfig, Project};
use ddev_core::error::Result;
use ddev_core::file_system::regex_capture;
use ddev_settings::db::DbSettings;

/// Only a quoted literal is understood; concatenations and constants are not.
const SYSTEM_PATH_PATTERN: &str = r#"\$system_path\s*=\s*['"]([^'"]+)['"]\s*;"#;

pub fn detect(project: &Project) -> bool {
    project.docroot_path().join("system/ee").is_dir() || project.approot.join("system/ee").is_dir()
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Directory that holds `.env.php`: the parent of the resolved `$system_path`.
fn env_dir(project: &Project) -> Option<PathBuf> {
    let index = project.docroot_path().join("index.php");
    let system_path = match regex_capture(&index, SYSTEM_PATH_PATTERN) {
        Ok(Some(path)) => path,
        Ok(None) => return None,
        Err(e) => {
            debug!(error = %e, "could not read system_path");
            return None;
        }
    };
    if Path::new(&system_path).is_absolute() {
        debug!(system_path = %system_path, "absolute system_path, not resolvable on the host");
        return None;
    }
    let resolved = normalize(&project.docroot_path().join(system_path.trim_end_matches('/')));
    resolved.parent().map(Path::to_path_buf)
}

pub fn set_settings_paths(project: &mut Project) {
    let dir = env_dir(project).unwrap_or_else(|| project.approot.clone());
    project.site_settings_path = Some(dir.join(".env.php"));
}

pub fn post_start(project: &Project, global: &GlobalConfig) -> Result<()> {
    let Some(path) = project.site_settings_path.as_deref() else {
        return Ok(());
    };
    let db = DbSettings::for_project(project);
    let values = env_values([
        ("DB_HOSTNAME", db.host.clone()),
        ("DB_DATABASE", db.name.clone()),
        ("DB_USERNAME", db.user.clone()),
        ("DB_PASSWORD", db.password.clone()),
        ("DB_PORT", db.port.to_string()),
        ("BASE_URL", format!("{}/", project.primary_url(global))),
    ]);
    write_env_settings(path, None, &values)?;
    Ok(())
}

pub fn upload_dirs(_project: &Project) -> Vec<String> {
    vec!["images".to_string()]
}
