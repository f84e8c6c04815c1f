use std::path::Path;

use anyhow::{Context, Result};

use ddev_apptypes::{detect_app_type, fallback_app_type};
use ddev_config::Project;
use ddev_core::{ddev_info, ddev_println};

/// Print the app type detection settles on. The configured type, when it
/// differs, is mentioned on stderr.
pub fn handle_detect(approot: &Path) -> Result<()> {
    let project = Project::load(approot)
        .with_context(|| format!("Failed to load project at {}", approot.display()))?;

    let detected = detect_app_type(&project).unwrap_or_else(|| fallback_app_type(&project));
    if let Some(configured) = project.app_type.filter(|t| *t != detected) {
        ddev_info!("Configured type is {}, detected {}", configured, detected);
    }
    ddev_println!("{}", detected);
    Ok(())
}
