//! Runtime representation of an imported module.

use indexmap::IndexMap;
use std::fmt::{self, Display, Formatter};

use crate::module_name::ModuleName;

/// Values a module namespace can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// An executed module: its name, the path diagnostics refer to, and its
/// namespace in definition order.
///
/// `__name__` and `__file__` are always present. For store-backed modules
/// `__file__` is the virtual path.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    name: ModuleName,
    file: String,
    attrs: IndexMap<String, Value>,
}

impl Module {
    pub fn new(name: ModuleName, file: impl Into<String>) -> Self {
        let file = file.into();
        let mut attrs = IndexMap::new();
        attrs.insert("__name__".to_string(), Value::Str(name.to_string()));
        attrs.insert("__file__".to_string(), Value::Str(file.clone()));
        Self { name, file, attrs }
    }

    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    /// Diagnostic path, the same value as `__file__`.
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn get(&self, attr: &str) -> Option<&Value> {
        self.attrs.get(attr)
    }

    pub fn set(&mut self, attr: impl Into<String>, value: Value) {
        self.attrs.insert(attr.into(), value);
    }

    /// All attributes, dunders included, in definition order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Attributes not starting with an underscore.
    pub fn public_attrs(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attrs().filter(|(k, _)| !k.starts_with('_'))
    }
}
