use std::collections::HashMap;
use std::fmt;

use crate::error::EventError;
use crate::registry::Registry;
use crate::value::Value;

/// Key under which positional and post-terminator tokens are announced.
pub const POSITIONAL: &str = "";

pub type Callback<'a> = Box<dyn FnMut(&Value) + 'a>;

/// Callbacks keyed by canonical option name.
#[derive(Default)]
pub struct Events<'a> {
    handlers: HashMap<String, Callback<'a>>,
}

impl fmt::Debug for Events<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Events").field("handlers", &names).finish()
    }
}

impl<'a> Events<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `callback` to an option (by long or short name), or to
    /// [`POSITIONAL`]. Replaces any earlier binding.
    pub fn on<F>(&mut self, registry: &Registry, name: &str, callback: F) -> Result<(), EventError>
    where
        F: FnMut(&Value) + 'a,
    {
        let key = self.resolve(registry, name)?;
        self.handlers.insert(key, Box::new(callback));
        Ok(())
    }

    /// Invoke the callback bound to `name`. Unlike dispatch during parsing, a
    /// missing callback is an error here.
    pub fn emit(&mut self, registry: &Registry, name: &str, value: &Value) -> Result<(), EventError> {
        let key = if name == POSITIONAL {
            POSITIONAL
        } else {
            registry.canonical_name(name).unwrap_or(name)
        };
        match self.handlers.get_mut(key) {
            Some(callback) => {
                callback(value);
                Ok(())
            }
            None => Err(EventError::NoHandler(name.to_string())),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Parser-side dispatch by canonical name.
    ///
    /// An option without a callback is normal here, so absence is reported
    /// as `false` rather than as an error.
    pub(crate) fn dispatch(&mut self, canonical: &str, value: &Value) -> bool {
        match self.handlers.get_mut(canonical) {
            Some(callback) => {
                tracing::trace!(name = canonical, %value, "dispatching event");
                callback(value);
                true
            }
            None => false,
        }
    }

    fn resolve(&self, registry: &Registry, name: &str) -> Result<String, EventError> {
        if name == POSITIONAL {
            return Ok(String::new());
        }
        registry
            .canonical_name(name)
            .map(str::to_string)
            .ok_or_else(|| EventError::UnknownOption(name.to_string()))
    }
}
