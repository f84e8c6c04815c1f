//! App-type detection.

use tracing::debug;

use crate::adapters::python::looks_like_python;
use crate::registry::registry;
use ddev_config::{AppType, Project};

/// First registry entry whose detector matches, in registry order.
pub fn detect_app_type(project: &Project) -> Option<AppType> {
    let winner = registry().iter().find_map(|descriptor| {
        let detector = descriptor.detector?;
        detector(project).then_some(descriptor.app_type)
    });
    match winner {
        Some(app_type) => debug!(app_type = %app_type, approot = %project.approot.display(), "detected"),
        None => debug!(approot = %project.approot.display(), "no detector matched"),
    }
    winner
}

/// Generic type for a project no detector claimed.
pub fn fallback_app_type(project: &Project) -> AppType {
    if looks_like_python(project) {
        AppType::Python
    } else {
        AppType::Php
    }
}

/// Configured type, else the detected one, else the fallback.
pub fn resolve_app_type(project: &Project) -> AppType {
    project
        .app_type
        .or_else(|| detect_app_type(project))
        .unwrap_or_else(|| fallback_app_type(project))
}
