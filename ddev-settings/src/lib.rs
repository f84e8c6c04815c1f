//! Settings-file plumbing shared by the app-type adapters.
//!
//! - `envfile` - lossless `KEY=VALUE` codec and key merge
//! - `signature` - the `#ddev-generated` ownership gate
//! - `db` - connection values handed to the app inside the web container
//! - `templates` - generated PHP/Python/XML settings files

pub mod db;
pub mod envfile;
pub mod signature;
pub mod templates;

pub use db::DbSettings;
pub use envfile::{merge_and_write, read_env_file, EnvFile};
pub use signature::{choose_settings_target, ddev_sibling, Ownership, SIGNATURE};
pub use templates::{render, SettingsContext, SettingsTemplate};
