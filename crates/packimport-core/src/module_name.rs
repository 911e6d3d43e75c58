use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use crate::errors::ImportError;

/// A fully-qualified, dotted module name as requested by an import.
///
/// Always absolute and never empty. The dotted form is kept alongside the
/// split segments so lookups and key derivation never re-join.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleName {
    dotted: Arc<str>,
    segments: Vec<Arc<str>>,
}

impl ModuleName {
    /// Parse a dotted module name.
    ///
    /// Rejects empty names, empty segments (`".a"`, `"a..b"`, `"a."`) and
    /// segments containing path separators.
    pub fn parse(name: &str) -> Result<Self, ImportError> {
        let invalid = |reason| ImportError::InvalidName {
            name: name.to_string(),
            reason,
        };

        if name.is_empty() {
            return Err(invalid("module name is empty"));
        }

        let segments: Vec<Arc<str>> = name.split('.').map(Arc::from).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(invalid("module name has an empty segment"));
        }
        if segments.iter().any(|s| s.contains(['/', '\\'])) {
            return Err(invalid("module name contains a path separator"));
        }

        Ok(Self {
            dotted: Arc::from(name),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.dotted
    }

    pub fn segments(&self) -> &[Arc<str>] {
        &self.segments
    }
}

impl Display for ModuleName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted)
    }
}

impl TryFrom<&str> for ModuleName {
    type Error = ImportError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
