//! File inspection primitives used by the app-type detectors and settings writers.
//!
//! These helpers do not own policy: they answer questions about files and
//! perform small, safe mutations. Reads are streamed so large files never have
//! to be held in memory just to answer "does it contain X".

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use regex::Regex;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::error::{DdevError, Result};

/// Check if a file or directory exists at `path`
pub fn file_exists(path: &Path) -> bool {
    path.exists()
}

/// Check if a file exists in a directory
pub fn has_file(dir: &Path, filename: &str) -> bool {
    dir.join(filename).exists()
}

/// Check if any of the specified files exist in a directory
pub fn has_any_file(dir: &Path, filenames: &[&str]) -> bool {
    filenames.iter().any(|&filename| has_file(dir, filename))
}

/// Check if a directory exists inside `dir`
pub fn has_dir(dir: &Path, dirname: &str) -> bool {
    dir.join(dirname).is_dir()
}

/// True when the file can be opened for reading.
pub fn is_readable(path: &Path) -> bool {
    File::open(path).is_ok()
}

/// Fixed-string search, line by line. Unreadable files never match.
pub fn file_contains(path: &Path, needle: &str) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let reader = BufReader::new(file);
    for line in reader.lines() {
        match line {
            Ok(line) if line.contains(needle) => return true,
            Ok(_) => {}
            // Non-UTF-8 content; fall back to a bounded byte scan
            Err(_) => return file_contains_bytes(path, needle.as_bytes()),
        }
    }
    false
}

fn file_contains_bytes(path: &Path, needle: &[u8]) -> bool {
    let Ok(bytes) = fs::read(path) else {
        return false;
    };
    !needle.is_empty() && bytes.windows(needle.len()).any(|w| w == needle)
}

/// Return the first capture group of the first line matching `pattern`.
///
/// The pattern is applied per line, so it cannot span lines.
pub fn regex_capture(path: &Path, pattern: &str) -> Result<Option<String>> {
    let re = Regex::new(pattern)?;
    let file = File::open(path)?;
    for line in BufReader::new(file).lines() {
        let line = line?;
        if let Some(caps) = re.captures(&line) {
            return Ok(caps.get(1).map(|m| m.as_str().to_string()));
        }
    }
    Ok(None)
}

/// Copy `src` to `dest` through a temp file in the destination directory
/// followed by a rename, so readers never observe a half-written file.
pub fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    let contents = fs::read(src)?;
    write_atomic(dest, &contents)
}

/// Write bytes to `dest` atomically (temp file + rename in the same directory).
///
/// An existing target keeps its permissions; a new file gets 0644.
pub fn write_atomic(dest: &Path, contents: &[u8]) -> Result<()> {
    let dir = parent_dir(dest);
    fs::create_dir_all(&dir)?;
    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    carry_permissions(dest, tmp.as_file())?;
    tmp.persist(dest).map_err(|e| DdevError::Io(e.error))?;
    Ok(())
}

#[cfg(unix)]
fn carry_permissions(dest: &Path, tmp: &File) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = match fs::metadata(dest) {
        Ok(meta) => meta.permissions(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => fs::Permissions::from_mode(0o644),
        Err(e) => return Err(e.into()),
    };
    tmp.set_permissions(permissions)?;
    Ok(())
}

#[cfg(not(unix))]
fn carry_permissions(dest: &Path, tmp: &File) -> Result<()> {
    if let Ok(meta) = fs::metadata(dest) {
        tmp.set_permissions(meta.permissions())?;
    }
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Replace the first occurrence of `search` in the file with `replacement`.
///
/// Fails when `search` is not present.
pub fn replace_in_file(path: &Path, search: &str, replacement: &str) -> Result<()> {
    if replace_first(path, search, replacement)? {
        Ok(())
    } else {
        Err(DdevError::Internal(format!(
            "'{}' not found in {}",
            search.lines().next().unwrap_or(search),
            path.display()
        )))
    }
}

/// Like [`replace_in_file`] but a missing `search` string is not an error.
///
/// Returns whether a replacement happened.
pub fn replace_in_file_optional(path: &Path, search: &str, replacement: &str) -> Result<bool> {
    replace_first(path, search, replacement)
}

fn replace_first(path: &Path, search: &str, replacement: &str) -> Result<bool> {
    let contents = fs::read_to_string(path)?;
    let Some(pos) = contents.find(search) else {
        return Ok(false);
    };
    let mut updated = String::with_capacity(contents.len() + replacement.len());
    updated.push_str(&contents[..pos]);
    updated.push_str(replacement);
    updated.push_str(&contents[pos + search.len()..]);
    write_atomic(path, updated.as_bytes())?;
    Ok(true)
}

/// Non-recursive check for files with the given extension (without the dot).
pub fn has_files_with_extension(dir: &Path, ext: &str) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    entries.flatten().any(|entry| {
        let path = entry.path();
        path.is_file() && path.extension().is_some_and(|e| e == ext)
    })
}

/// Find the first file called `name` below `root`, searching at most `max_depth`
/// levels. Hidden directories and `vendor`/`node_modules` are skipped.
/// Entries are visited in file-name order so the result is deterministic.
pub fn find_file(root: &Path, name: &str, max_depth: usize) -> Option<PathBuf> {
    WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || {
                let n = e.file_name().to_string_lossy();
                !n.starts_with('.') && n != "vendor" && n != "node_modules"
            }
        })
        .flatten()
        .find(|e| e.file_type().is_file() && e.file_name() == name)
        .map(|e| e.into_path())
}
