//! Start and teardown sequences built on the registry.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::detect::resolve_app_type;
use crate::registry::{registry, AppTypeDescriptor};
use ddev_config::{AppType, GlobalConfig, Project};
use ddev_core::ddev_warning;
use ddev_core::error::{DdevError, Result};
use ddev_provider::{Provider, WEB_READY_TIMEOUT, WEB_SERVICE};
use ddev_settings::signature::{ddev_sibling, remove_if_owned};

fn descriptor(app_type: AppType) -> Result<&'static AppTypeDescriptor> {
    registry()
        .get(app_type)
        .ok_or_else(|| DdevError::UnknownAppType(app_type.to_string()))
}

/// Resolve the app type, record it on the project and set its settings paths.
pub fn prepare_project(project: &mut Project) -> Result<&'static AppTypeDescriptor> {
    let app_type = resolve_app_type(project);
    project.app_type = Some(app_type);
    let desc = descriptor(app_type)?;
    if let Some(setter) = desc.settings_path_setter {
        setter(project);
    }
    debug!(
        app_type = %app_type,
        settings = ?project.site_settings_path,
        local_settings = ?project.site_local_settings_path,
        "settings paths"
    );
    Ok(desc)
}

/// Run the app type's config override, if any.
pub fn apply_config_override(project: &mut Project) -> Result<()> {
    let app_type = project.app_type.unwrap_or_else(|| resolve_app_type(project));
    if let Some(config_override) = descriptor(app_type)?.config_override {
        config_override(project)?;
    }
    Ok(())
}

/// Materialize the app's settings files. No-op when settings management is off.
pub fn post_start(project: &Project, global: &GlobalConfig) -> Result<()> {
    if project.disable_settings_management {
        debug!(project = %project.name, "settings management disabled");
        return Ok(());
    }
    let app_type = project.app_type.unwrap_or_else(|| resolve_app_type(project));
    if let Some(post_start) = descriptor(app_type)?.post_start {
        post_start(project, global)?;
    }
    Ok(())
}

/// Upload directories (absolute) the project is expected to have.
pub fn upload_dirs(project: &Project) -> Vec<PathBuf> {
    let relative = if project.upload_dirs.is_empty() {
        project
            .app_type
            .and_then(|t| registry().get(t))
            .and_then(|d| d.upload_dirs)
            .map(|dirs| dirs(project))
            .unwrap_or_default()
    } else {
        project.upload_dirs.clone()
    };
    relative
        .iter()
        .map(|dir| project.docroot_path().join(dir))
        .collect()
}

/// Warn about upload directories that do not exist. Returns the missing ones.
pub fn check_upload_dirs(project: &Project) -> Vec<PathBuf> {
    if project.disable_upload_dirs_warning {
        return Vec::new();
    }
    let missing: Vec<PathBuf> = upload_dirs(project)
        .into_iter()
        .filter(|dir| !dir.is_dir())
        .collect();
    for dir in &missing {
        ddev_warning!(
            "Upload directory {} does not exist; set disable_upload_dirs_warning to silence this",
            dir.display()
        );
    }
    missing
}

/// Full start: type and paths, config override, containers, settings, upload check.
///
/// A failing config override returns before any container is touched.
pub fn start_project(
    project: &mut Project,
    global: &GlobalConfig,
    provider: &dyn Provider,
) -> Result<AppType> {
    prepare_project(project)?;
    apply_config_override(project)?;

    provider.compose_up(project)?;
    provider.ensure_service(project, WEB_SERVICE, WEB_READY_TIMEOUT)?;

    post_start(project, global)?;
    check_upload_dirs(project);

    let app_type = project.app_type.unwrap_or(AppType::Php);
    info!(project = %project.name, app_type = %app_type, "project started");
    Ok(app_type)
}

/// Delete generated settings files that still carry the signature.
pub fn remove_settings(project: &mut Project) -> Result<Vec<PathBuf>> {
    prepare_project(project)?;
    let mut removed = Vec::new();
    let candidates = [
        project.site_settings_path.clone(),
        project.site_settings_path.as_deref().and_then(ddev_sibling),
        project.site_local_settings_path.clone(),
    ];
    for path in candidates.into_iter().flatten() {
        if remove_if_owned(&path)? {
            removed.push(path);
        }
    }
    Ok(removed)
}

/// Stop containers, optionally removing generated settings first.
pub fn stop_project(
    project: &mut Project,
    provider: &dyn Provider,
    remove_generated: bool,
) -> Result<Vec<PathBuf>> {
    let removed = if remove_generated {
        remove_settings(project)?
    } else {
        Vec::new()
    };
    provider.compose_down(project)?;
    Ok(removed)
}
