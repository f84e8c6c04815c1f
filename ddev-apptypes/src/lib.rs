//! App-type registry, detection and per-framework settings adapters.
//!
//! ```text
//! detect_app_type ─► registry descriptor ─► settings paths
//!                                         ─► config override ─► containers up
//!                                         ─► post-start settings ─► upload-dir check
//! ```

pub mod adapters;
pub mod detect;
pub mod hooks;
pub mod registry;

pub use detect::{detect_app_type, fallback_app_type, resolve_app_type};
pub use hooks::{
    apply_config_override, check_upload_dirs, post_start, prepare_project, remove_settings,
    start_project, stop_project,
};
pub use registry::{registry, AppTypeDescriptor, Registry};
