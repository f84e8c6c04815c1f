//! Local TLS root-CA discovery.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use tracing::debug;

use ddev_core::command_stream::{is_tool_installed, run_captured};

static CA_ROOT: Lazy<Option<PathBuf>> = Lazy::new(locate_ca_root);

fn locate_ca_root() -> Option<PathBuf> {
    if !is_tool_installed("mkcert") {
        debug!("mkcert not found in PATH");
        return None;
    }
    let output = run_captured("mkcert", &["-CAROOT"]).ok()?;
    if !output.success() {
        return None;
    }
    parse_ca_root(&output.stdout)
}

fn parse_ca_root(stdout: &str) -> Option<PathBuf> {
    let line = stdout.lines().next()?.trim();
    if line.is_empty() {
        return None;
    }
    let path = PathBuf::from(line);
    path.join("rootCA.pem").is_file().then_some(path)
}

/// Directory holding mkcert's `rootCA.pem`, located once per process.
///
/// `None` means https URLs will not be trusted by the host browser.
pub fn mkcert_ca_root() -> Option<&'static Path> {
    CA_ROOT.as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_ca_root_requires_root_pem() {
        let dir = TempDir::new().unwrap();
        let stdout = format!("{}\n", dir.path().display());
        assert_eq!(parse_ca_root(&stdout), None);

        fs::write(dir.path().join("rootCA.pem"), "pem").unwrap();
        assert_eq!(parse_ca_root(&stdout), Some(dir.path().to_path_buf()));
        assert_eq!(parse_ca_root("\n"), None);
    }
}
