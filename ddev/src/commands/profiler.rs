use anyhow::{Context, Result};

use super::ProjectContext;
use crate::cli::{ToggleSubcommand, XhguiSubcommand};
use ddev_apptypes::resolve_app_type;
use ddev_config::{Project, XhprofMode};
use ddev_core::{ddev_println, ddev_success, ddev_warning};
use ddev_xhprof::Profiler;

/// The profiler refuses python projects, so the type has to be known even
/// when config.yaml leaves it out.
fn typed_project(ctx: &ProjectContext) -> Project {
    let mut project = ctx.project.clone();
    project.app_type = Some(resolve_app_type(&project));
    project
}

pub fn handle_xhprof(ctx: &ProjectContext, command: ToggleSubcommand) -> Result<()> {
    let project = typed_project(ctx);
    let profiler = Profiler::new(&project, &ctx.global, ctx.provider.as_ref());
    match command {
        ToggleSubcommand::On => {
            profiler.enable().context("Failed to enable xhprof")?;
            ddev_success!("Enabled xhprof (mode {})", profiler.mode());
        }
        ToggleSubcommand::Off => {
            profiler.disable().context("Failed to disable xhprof")?;
            ddev_success!("Disabled xhprof");
        }
        ToggleSubcommand::Status => {
            let loaded = profiler.status().context("Failed to query xhprof status")?;
            ddev_println!("{}", if loaded { "enabled" } else { "disabled" });
        }
    }
    Ok(())
}

pub fn handle_xhgui(ctx: &ProjectContext, command: XhguiSubcommand) -> Result<()> {
    let project = typed_project(ctx);
    let profiler = Profiler::new(&project, &ctx.global, ctx.provider.as_ref());
    match command {
        XhguiSubcommand::On => {
            if profiler.mode() != XhprofMode::Xhgui {
                ddev_warning!(
                    "xhprof_mode is '{}'; set it to 'xhgui' so profiles are sent to xhgui",
                    profiler.mode()
                );
            }
            profiler.xhgui_setup().context("Failed to set up xhgui")?;
            let url = profiler.xhgui_url().context("Failed to resolve the xhgui URL")?;
            ddev_success!("xhgui is running at {}", url);
        }
        XhguiSubcommand::Off => {
            profiler.xhgui_disable().context("Failed to disable xhgui")?;
            ddev_success!("Disabled xhprof; the xhgui service is still running");
        }
        XhguiSubcommand::Status => {
            let active = profiler.xhgui_status().context("Failed to query xhgui status")?;
            ddev_println!("{}", if active { "enabled" } else { "disabled" });
        }
        XhguiSubcommand::Url => {
            ddev_println!("{}", profiler.xhgui_url().context("Failed to resolve the xhgui URL")?);
        }
    }
    Ok(())
}
