//! Configuration model for ddev-rs.
//!
//! - `project` - the per-project aggregate loaded from `.ddev/config.yaml`
//! - `global_config` - user-wide defaults from `~/.ddev/global_config.yaml`
//! - `types` - closed enumerations shared by both (app type, webserver, database, xhprof mode)

pub mod global_config;
pub mod project;
pub mod types;

pub use global_config::GlobalConfig;
pub use project::Project;
pub use types::{AppType, DatabaseDesc, DatabaseEngine, WebserverType, XhprofMode};
