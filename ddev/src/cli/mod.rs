// CLI argument parsing and definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "ddev")]
#[command(about = "Framework-aware settings and profiler management for local PHP and Python projects")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Project directory (defaults to the nearest parent with .ddev/config.yaml)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ToggleSubcommand {
    /// Turn it on
    On,
    /// Turn it off
    Off,
    /// Report whether it is on
    Status,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum XhguiSubcommand {
    /// Create the xhgui database, enable xhprof and start the sidecar
    On,
    /// Disable xhprof; the sidecar keeps running
    Off,
    /// Report whether xhgui is collecting
    Status,
    /// Print the xhgui URL
    Url,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the app type that would be used for the project
    Detect,

    /// Start the project and write framework settings
    Start,

    /// Stop the project
    Stop {
        /// Also delete settings files ddev generated
        #[arg(long)]
        remove_settings: bool,
    },

    /// Control the xhprof extension in the web container
    Xhprof {
        #[command(subcommand)]
        command: ToggleSubcommand,
    },

    /// Control the xhgui profiling UI
    Xhgui {
        #[command(subcommand)]
        command: XhguiSubcommand,
    },
}
