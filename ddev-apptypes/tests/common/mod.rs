#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ddev_config::Project;
use tempfile::TempDir;

/// Throwaway project directory for detection and settings tests
pub struct ProjectTestFixture {
    temp_dir: TempDir,
}

impl ProjectTestFixture {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    pub fn create_file(&self, relative: &str, content: &str) -> io::Result<()> {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    }

    pub fn create_dir(&self, relative: &str) -> io::Result<()> {
        fs::create_dir_all(self.join(relative))
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.join(relative)).unwrap_or_default()
    }

    pub fn project(&self, name: &str) -> Project {
        Project::new(name, self.path())
    }
}
