//! Profiler control for a running project.
//!
//! XHProf lives in the web container and is switched with the
//! `enable_xhprof` / `disable_xhprof` helpers shipped in the web image. XHGui
//! is an optional compose profile with its own database in the project's db
//! service. Everything here goes through a [`ddev_provider::Provider`].

pub mod ports;
pub mod profiler;
mod xhgui;

pub use ports::{parse_expose, resolve_xhgui_ports};
pub use profiler::{effective_mode, ensure_supported, Profiler, XHPROF_LOADED_CHECK};
pub use xhgui::xhgui_database_command;
