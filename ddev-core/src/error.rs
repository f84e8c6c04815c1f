use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DdevError {
    Io(#[from] std::io::Error),
    /// A settings file exists without the ownership signature.
    UserOwnedSettings {
        path: PathBuf,
    },
    UnknownAppType(String),
    ProfilerUnsupported(String),
    Timeout(String),
    Command(String),
    Config(String),
    Serialization(String),
    Template(String),
    Internal(String),
}

impl Display for DdevError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            DdevError::Io(e) => write!(f, "I/O error: {}", e),
            DdevError::UserOwnedSettings { path } => {
                write!(
                    f,
                    "Settings file {} is managed by the user (no #ddev-generated signature)\n\n",
                    path.display()
                )?;
                write!(f, "Fix:\n")?;
                write!(f, "  • Remove the file to let ddev regenerate it, or\n")?;
                write!(f, "  • Set disable_settings_management: true in .ddev/config.yaml")
            }
            DdevError::UnknownAppType(s) => write!(f, "Unknown app type: {}", s),
            DdevError::ProfilerUnsupported(s) => write!(f, "Profiler not supported: {}", s),
            DdevError::Timeout(s) => write!(f, "Timed out: {}", s),
            DdevError::Command(s) => write!(f, "Command failed: {}", s),
            DdevError::Config(s) => write!(f, "Configuration error: {}", s),
            DdevError::Serialization(s) => write!(f, "Serialization error: {}", s),
            DdevError::Template(s) => write!(f, "Template error: {}", s),
            DdevError::Internal(s) => write!(f, "Internal error: {}", s),
        }
    }
}

impl From<serde_yaml_ng::Error> for DdevError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        DdevError::Serialization(err.to_string())
    }
}

impl From<tera::Error> for DdevError {
    fn from(err: tera::Error) -> Self {
        // tera nests the useful message in the source chain
        let mut msg = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            msg.push_str(": ");
            msg.push_str(&inner.to_string());
            source = inner.source();
        }
        DdevError::Template(msg)
    }
}

impl From<regex::Error> for DdevError {
    fn from(err: regex::Error) -> Self {
        DdevError::Internal(format!("invalid pattern: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, DdevError>;
