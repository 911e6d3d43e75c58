//! Values passed between the resolver and the source provider.

use std::fmt::{self, Display, Formatter};

use crate::module_name::ModuleName;

/// Suffix appended to module names when none is configured.
pub const DEFAULT_SOURCE_SUFFIX: &str = "py";

/// A leading dot on a suffix is ignored, so `".py"` and `"py"` agree.
pub fn normalize_suffix(suffix: &str) -> &str {
    suffix.trim_start_matches('.')
}

/// Store key for a module: `"<module-name>.<suffix>"`.
///
/// A pure function of the name and suffix; no state, no caching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey(String);

impl ResourceKey {
    pub fn for_module(name: &ModuleName, suffix: &str) -> Self {
        Self(format!("{name}.{}", normalize_suffix(suffix)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ResourceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Synthetic path shown in tracebacks and error messages for modules loaded
/// out of a resource store.
///
/// It names no file. There is deliberately no conversion to
/// [`std::path::Path`], so nothing can open it by accident.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VirtualPath(String);

impl VirtualPath {
    pub fn for_module(name: &ModuleName, suffix: &str) -> Self {
        Self(format!("{name}.{}", normalize_suffix(suffix)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VirtualPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a successful resolve.
///
/// Short-lived: owned by the import that produced it and never cached. It
/// says the resource existed when resolved, not that it still exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    name: ModuleName,
    key: ResourceKey,
    virtual_path: VirtualPath,
}

impl ModuleDescriptor {
    pub fn new(name: ModuleName, suffix: &str) -> Self {
        let key = ResourceKey::for_module(&name, suffix);
        let virtual_path = VirtualPath::for_module(&name, suffix);
        Self {
            name,
            key,
            virtual_path,
        }
    }

    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub fn virtual_path(&self) -> &VirtualPath {
        &self.virtual_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_appends_suffix() {
        let name = ModuleName::parse("foo.bar").unwrap();
        assert_eq!(ResourceKey::for_module(&name, "py").as_str(), "foo.bar.py");
        assert_eq!(ResourceKey::for_module(&name, "lua").as_str(), "foo.bar.lua");
    }

    #[test]
    fn test_leading_dot_on_suffix_is_ignored() {
        let name = ModuleName::parse("x").unwrap();
        let descriptor = ModuleDescriptor::new(name.clone(), ".py");

        assert_eq!(descriptor.key().as_str(), "x.py");
        assert_eq!(descriptor.virtual_path().as_str(), "x.py");
        assert_eq!(descriptor, ModuleDescriptor::new(name, "py"));
    }

    #[test]
    fn test_descriptor_fields() {
        let name = ModuleName::parse("tools.util").unwrap();
        let descriptor = ModuleDescriptor::new(name.clone(), DEFAULT_SOURCE_SUFFIX);

        assert_eq!(descriptor.name(), &name);
        assert_eq!(descriptor.key().as_str(), "tools.util.py");
        assert_eq!(descriptor.virtual_path().to_string(), "tools.util.py");
    }
}
