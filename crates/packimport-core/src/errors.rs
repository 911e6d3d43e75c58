use std::path::PathBuf;
use thiserror::Error;

use crate::hook::Priority;

/// Failures reported by a [`ResourceStore`](crate::store::ResourceStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("resource not found: {key}")]
    NotFound { key: String },

    #[error("resource is empty: {key}")]
    Empty { key: String },

    #[error("IO error reading resource {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while reading or building a resource package.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("package too small: {len} bytes, the trailer alone needs 12")]
    MissingTrailer { len: u64 },

    #[error("package length {declared} exceeds the available {available} bytes")]
    LengthOutOfBounds { declared: u64, available: u64 },

    #[error("entry {index} is truncated while reading its {field}")]
    Truncated { index: u32, field: &'static str },

    #[error("entry {index} has a name that is not valid UTF-8")]
    InvalidEntryName { index: u32 },

    #[error("duplicate resource entry: {name}")]
    DuplicateEntry { name: String },

    #[error("{remaining} bytes follow the {count} declared entries")]
    TrailingBytes { count: u32, remaining: u64 },
}

/// Errors surfaced by the import machinery.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid module name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("No module named '{name}'")]
    ModuleNotFound { name: String },

    #[error("resource for module '{name}' is unavailable ({path})")]
    ResourceUnavailable {
        name: String,
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("cannot read module '{name}' from {path}: {source}")]
    SourceUnreadable {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File \"{path}\", line {line}: {message}")]
    Execution {
        name: String,
        path: String,
        line: usize,
        message: String,
    },

    #[error("finder '{finder}' cannot load '{name}': the module spec came from another finder")]
    LoaderMismatch { finder: &'static str, name: String },
}

impl ImportError {
    /// The module the failed import was asked for.
    pub fn module_name(&self) -> &str {
        match self {
            Self::InvalidName { name, .. }
            | Self::ModuleNotFound { name }
            | Self::ResourceUnavailable { name, .. }
            | Self::SourceUnreadable { name, .. }
            | Self::Execution { name, .. }
            | Self::LoaderMismatch { name, .. } => name,
        }
    }
}

/// Errors from registering a finder into the meta path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InstallError {
    #[error("resource finder already installed with {installed} priority, {requested} requested")]
    DuplicateInstall {
        installed: Priority,
        requested: Priority,
    },

    #[error("finder '{id}' is already registered at position {position}")]
    AlreadyRegistered { id: &'static str, position: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Failures while wiring up a [`Container`](crate::di::Container).
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("cannot open resource package {path}: {source}")]
    Package {
        path: PathBuf,
        #[source]
        source: PackageError,
    },

    #[error("resource directory does not exist: {path}")]
    MissingResourceDir { path: PathBuf },

    #[error(transparent)]
    Install(#[from] InstallError),
}
