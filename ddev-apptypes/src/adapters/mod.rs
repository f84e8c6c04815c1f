//! Per-framework adapters.
//!
//! Adapters are plain functions over the project. Two kinds of settings files
//! are handled here:
//!
//! - env-style files (`.env`, `.env.local`, `.env.php`) are merged key by
//!   key while they carry the signature; a user-owned one is left as is and
//!   the settings go to its `.ddev` sibling
//! - generated files (PHP/Python/XML) are rendered whole and only ever written
//!   through the signature gate

pub mod cakephp;
pub mod contao;
pub mod django;
pub mod drupal;
pub mod expressionengine;
pub mod laravel;
pub mod magento;
pub mod python;
pub mod shopware6;
pub mod silverstripe;
pub mod typo3;
pub mod wordpress;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info};

use ddev_config::{GlobalConfig, Project};
use ddev_core::error::{DdevError, Result};
use ddev_core::file_system::{copy_file, file_contains};
use ddev_core::{ddev_info, ddev_warning};
use ddev_settings::envfile::{merge_and_write, read_env_file};
use ddev_settings::signature::{choose_settings_target, ddev_sibling, write_with_signature};
use ddev_settings::templates::{render, SettingsContext, SettingsTemplate};

/// Ordered key/value set destined for an env file.
pub(crate) type EnvValues = IndexMap<String, String>;

pub(crate) fn env_values<K: Into<String>, V: Into<String>>(
    pairs: impl IntoIterator<Item = (K, V)>,
) -> EnvValues {
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Outcome of an env-file update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnvWrite {
    Created,
    Updated,
}

/// File the env settings for `primary` should go to.
///
/// A user-owned primary is left alone and its `.ddev` sibling is used
/// instead. `None` when the sibling is user-owned as well.
pub(crate) fn resolve_env_target(primary: &Path) -> Result<Option<PathBuf>> {
    let sibling = ddev_sibling(primary);
    let mut candidates: Vec<&Path> = vec![primary];
    candidates.extend(sibling.as_deref());

    match choose_settings_target(&candidates) {
        Ok(target) => {
            if target != primary {
                ddev_warning!(
                    "{} is not managed by ddev (no #ddev-generated line); writing ddev settings to {} instead",
                    primary.display(),
                    target.display()
                );
            }
            Ok(Some(target))
        }
        Err(DdevError::UserOwnedSettings { path }) => {
            ddev_warning!(
                "{} exists and is not managed by ddev; leaving it alone",
                path.display()
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Merge `values` into the env settings for `primary`, going through
/// [`resolve_env_target`]. Returns the file written and how.
pub(crate) fn write_env_settings(
    primary: &Path,
    example: Option<&Path>,
    values: &EnvValues,
) -> Result<Option<(PathBuf, EnvWrite)>> {
    let Some(target) = resolve_env_target(primary)? else {
        return Ok(None);
    };
    // the example only seeds the file the framework actually reads
    let example = example.filter(|_| target == primary);
    let outcome = merge_env_target(&target, example, values)?;
    Ok(Some((target, outcome)))
}

/// Merge `values` into `target`, which must be absent or signed.
///
/// A missing file is seeded from `example` when one exists, otherwise started
/// empty; either way the new file is signed. Changing a value that is already
/// present in an existing file is announced.
pub(crate) fn merge_env_target(
    target: &Path,
    example: Option<&Path>,
    values: &EnvValues,
) -> Result<EnvWrite> {
    let (mut env, outcome) = match read_env_file(target)? {
        Some(env) => {
            for (key, value) in values {
                if let Some(old) = env.get(key) {
                    if &old != value {
                        ddev_warning!(
                            "Overwriting {} in {} (was '{}')",
                            key,
                            target.display(),
                            old
                        );
                    }
                }
            }
            (env, EnvWrite::Updated)
        }
        None => {
            let seeded = match example {
                Some(example) if example.is_file() => {
                    copy_file(example, target)?;
                    info!(from = %example.display(), to = %target.display(), "seeded env file from example");
                    read_env_file(target)?
                }
                Some(example) => {
                    debug!(example = %example.display(), "no example env file");
                    None
                }
                None => None,
            };
            (seeded.unwrap_or_default(), EnvWrite::Created)
        }
    };

    if outcome == EnvWrite::Created {
        env.ensure_signature();
    }
    merge_and_write(target, values, Some(&env.serialize()))?;
    info!(path = %target.display(), keys = values.len(), "wrote env settings");
    Ok(outcome)
}

/// Render `template` and write it through the signature gate.
///
/// A user-owned target is reported and left alone; the caller keeps going.
pub(crate) fn write_generated(
    project: &Project,
    global: &GlobalConfig,
    path: &Path,
    template: SettingsTemplate,
) -> Result<bool> {
    let content = render(template, &SettingsContext::for_project(project, global))?;
    match write_with_signature(path, &content) {
        Ok(()) => {
            info!(path = %path.display(), "wrote generated settings");
            Ok(true)
        }
        Err(DdevError::UserOwnedSettings { path }) => {
            ddev_warning!(
                "{} exists and is not managed by ddev (no #ddev-generated line); leaving it alone",
                path.display()
            );
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Warn when a user-owned primary settings file does not pull in the
/// generated one.
pub(crate) fn check_includes(primary: &Path, generated_name: &str) {
    if primary.is_file() && !file_contains(primary, generated_name) {
        ddev_info!(
            "{} does not include {}; add an include so ddev's settings take effect",
            primary.display(),
            generated_name
        );
    }
}

/// Whether composer.json at the composer root mentions `package`.
pub(crate) fn composer_requires(project: &Project, package: &str) -> bool {
    let composer = project.composer_root_path().join("composer.json");
    file_contains(&composer, &format!("\"{package}\""))
}
