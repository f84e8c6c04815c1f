//! Ownership gate for generated settings files.
//!
//! A file is ours only while it carries the `#ddev-generated` marker. A file
//! without the marker belongs to the user and is never written or removed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use ddev_core::error::{DdevError, Result};
use ddev_core::file_system::{file_contains, write_atomic};

pub const SIGNATURE: &str = "#ddev-generated";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Absent,
    Owned,
    UserOwned,
}

pub fn ownership(path: &Path) -> Ownership {
    if !path.exists() {
        Ownership::Absent
    } else if file_contains(path, SIGNATURE) {
        Ownership::Owned
    } else {
        Ownership::UserOwned
    }
}

pub fn has_signature(path: &Path) -> bool {
    ownership(path) == Ownership::Owned
}

/// Fallback path written when the user owns `path`: `.env` becomes
/// `.env.ddev`, `.env.php` becomes `.env.ddev.php`. Files that already carry
/// a `.ddev` part have no sibling.
pub fn ddev_sibling(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    if name.contains(".ddev") {
        return None;
    }
    let sibling = match name.strip_suffix(".php") {
        Some(stem) if !stem.is_empty() => format!("{stem}.ddev.php"),
        _ => format!("{name}.ddev"),
    };
    Some(path.with_file_name(sibling))
}

/// Pick the first candidate that is absent or signed.
///
/// Candidates are tried in order (primary first). When every candidate
/// exists without the marker the last one is reported as the conflict.
pub fn choose_settings_target(candidates: &[&Path]) -> Result<PathBuf> {
    for candidate in candidates {
        match ownership(candidate) {
            Ownership::Absent | Ownership::Owned => return Ok(candidate.to_path_buf()),
            Ownership::UserOwned => {
                debug!(path = %candidate.display(), "settings candidate is user-owned")
            }
        }
    }
    match candidates.last() {
        Some(last) => Err(DdevError::UserOwnedSettings {
            path: last.to_path_buf(),
        }),
        None => Err(DdevError::Internal(
            "no settings file candidates given".to_string(),
        )),
    }
}

/// Make an existing settings file and its directory writable by the owner.
///
/// CMS installers like to leave `sites/default` read-only.
pub fn prepare_for_write(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        if let Some(dir) = path.parent() {
            if dir.is_dir() {
                fs::set_permissions(dir, fs::Permissions::from_mode(0o755))?;
            }
        }
        if path.is_file() {
            fs::set_permissions(path, fs::Permissions::from_mode(0o644))?;
        }
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}

/// Write a generated file through the gate.
///
/// `content` must contain the signature so the next run still recognises it.
pub fn write_with_signature(path: &Path, content: &str) -> Result<()> {
    if !content.contains(SIGNATURE) {
        return Err(DdevError::Internal(format!(
            "generated content for {} is missing the {SIGNATURE} marker",
            path.display()
        )));
    }
    if ownership(path) == Ownership::UserOwned {
        return Err(DdevError::UserOwnedSettings {
            path: path.to_path_buf(),
        });
    }
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    prepare_for_write(path)?;
    write_atomic(path, content.as_bytes())?;
    prepare_for_write(path)?;
    debug!(path = %path.display(), "wrote generated settings");
    Ok(())
}

/// Delete `path` only when we own it. Returns whether a file was removed.
pub fn remove_if_owned(path: &Path) -> Result<bool> {
    match ownership(path) {
        Ownership::Owned => {
            prepare_for_write(path)?;
            fs::remove_file(path)?;
            info!(path = %path.display(), "removed generated settings");
            Ok(true)
        }
        Ownership::UserOwned => {
            debug!(path = %path.display(), "leaving user-owned file in place");
            Ok(false)
        }
        Ownership::Absent => Ok(false),
    }
}
