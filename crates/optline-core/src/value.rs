use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;

/// A value stored for an option.
///
/// Argument-less options store `Bool(true)`, argument-taking options store the
/// raw `Str`, and multi-supported options accumulate a `List`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Bool(bool),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Option name to value mapping.
///
/// Keys are exactly the option names written by the parser; there are no
/// reserved or inherited entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct OptionMap {
    entries: IndexMap<String, Value>,
}

impl OptionMap {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// The value as a string, when the option stored a single string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Whether an argument-less option was set (or defaulted) to `true`.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    /// All values of a multi-supported option. A single value is returned as a
    /// one-element slice.
    pub fn get_all(&self, name: &str) -> Option<&[Value]> {
        self.get(name).map(|v| match v {
            Value::List(items) => items.as_slice(),
            single => std::slice::from_ref(single),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OptionMap {
    pub(crate) fn insert(&mut self, name: &str, value: Value) {
        self.entries.insert(name.to_string(), value);
    }

    pub(crate) fn append(&mut self, name: &str, value: Value) {
        match self.entries.get_mut(name) {
            Some(Value::List(items)) => items.push(value),
            _ => {
                self.entries.insert(name.to_string(), Value::List(vec![value]));
            }
        }
    }
}

/// Output of one parse call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParseResult {
    pub options: OptionMap,
    pub positionals: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip))]
    explicit: HashSet<String>,
}

impl ParseResult {
    /// Whether `name` was given in argv, as opposed to only seeded from a default.
    ///
    /// Keys are recorded as they are stored in `options`, so the mirrored short
    /// name counts too: after `--name x`, both `is_explicit("name")` and
    /// `is_explicit("n")` are true.
    pub fn is_explicit(&self, name: &str) -> bool {
        self.explicit.contains(name)
    }

    pub(crate) fn mark_explicit(&mut self, name: &str) {
        self.explicit.insert(name.to_string());
    }
}
