// Command handlers

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use crate::cli::{Args, Command};
use ddev_config::{GlobalConfig, Project};
use ddev_provider::{get_provider, Provider};

pub mod detect;
pub mod lifecycle;
pub mod profiler;

/// Main command dispatcher
pub fn execute_command(args: Args) -> Result<()> {
    let approot = find_project_root(args.project)?;
    debug!(approot = %approot.display(), "using project");

    match args.command {
        Command::Detect => detect::handle_detect(&approot),
        Command::Start => {
            let ctx = ProjectContext::load(&approot)?;
            lifecycle::handle_start(ctx)
        }
        Command::Stop { remove_settings } => {
            let ctx = ProjectContext::load(&approot)?;
            lifecycle::handle_stop(ctx, remove_settings)
        }
        Command::Xhprof { command } => {
            let ctx = ProjectContext::load(&approot)?;
            profiler::handle_xhprof(&ctx, command)
        }
        Command::Xhgui { command } => {
            let ctx = ProjectContext::load(&approot)?;
            profiler::handle_xhgui(&ctx, command)
        }
    }
}

fn find_project_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let start = match explicit {
        Some(dir) => dir,
        None => env::current_dir().context("Failed to read the current directory")?,
    };
    Project::find_approot(&start).ok_or_else(|| {
        anyhow!(
            "No ddev project found at or above {} (missing .ddev/config.yaml)",
            start.display()
        )
    })
}

/// Everything a container-backed command needs.
pub struct ProjectContext {
    pub project: Project,
    pub global: GlobalConfig,
    pub provider: Box<dyn Provider>,
}

impl ProjectContext {
    fn load(approot: &std::path::Path) -> Result<Self> {
        let project = Project::load(approot)
            .with_context(|| format!("Failed to load project at {}", approot.display()))?;
        let global = GlobalConfig::load().context("Failed to load global configuration")?;
        let provider_name = env::var("DDEV_PROVIDER").ok().filter(|p| !p.trim().is_empty());
        let provider = get_provider(provider_name.as_deref()).context("Failed to select provider")?;
        debug!(project = %project.name, provider = provider.name(), "loaded project context");
        Ok(Self {
            project,
            global,
            provider,
        })
    }
}
