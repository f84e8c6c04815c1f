use anyhow::{Context, Result};

use super::ProjectContext;
use ddev_apptypes::{start_project, stop_project};
use ddev_core::{ddev_info, ddev_success, ddev_warning};
use ddev_provider::mkcert::mkcert_ca_root;

pub fn handle_start(ctx: ProjectContext) -> Result<()> {
    let ProjectContext {
        mut project,
        global,
        provider,
    } = ctx;

    if mkcert_ca_root().is_none() {
        ddev_warning!("mkcert CA not found; https URLs will not be trusted. Run 'mkcert -install'.");
    }

    let app_type = start_project(&mut project, &global, provider.as_ref())
        .with_context(|| format!("Failed to start {}", project.name))?;
    ddev_success!(
        "Started {} ({}) at {}",
        project.name,
        app_type,
        project.primary_url(&global)
    );
    Ok(())
}

pub fn handle_stop(ctx: ProjectContext, remove_settings: bool) -> Result<()> {
    let ProjectContext {
        mut project,
        provider,
        ..
    } = ctx;

    let removed = stop_project(&mut project, provider.as_ref(), remove_settings)
        .with_context(|| format!("Failed to stop {}", project.name))?;
    for path in &removed {
        ddev_info!("Removed {}", path.display());
    }
    ddev_success!("Stopped {}", project.name);
    Ok(())
}
