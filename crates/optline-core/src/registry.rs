use indexmap::IndexMap;
use std::collections::HashMap;

use crate::definition::{OptionDef, OptionSpec, long_name};
use crate::error::DefinitionError;

/// The validated set of options for one parser.
///
/// Definitions are owned once in `defs`; the long and short indexes hold
/// positions into it, so both names always resolve to the same record.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    defs: Vec<OptionDef>,
    by_long: IndexMap<String, usize>,
    by_short: HashMap<char, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from an option table.
    pub fn with_specs<I>(specs: I) -> Result<Self, DefinitionError>
    where
        I: IntoIterator,
        I::Item: Into<OptionSpec>,
    {
        let mut registry = Self::new();
        registry.register(specs)?;
        Ok(registry)
    }

    /// Validate and add each spec in order.
    ///
    /// Stops at the first invalid spec; specs before it stay registered.
    pub fn register<I>(&mut self, specs: I) -> Result<(), DefinitionError>
    where
        I: IntoIterator,
        I::Item: Into<OptionSpec>,
    {
        for spec in specs {
            self.register_one(spec.into())?;
        }
        Ok(())
    }

    /// Register `spec` under whichever of its names are still free.
    ///
    /// A taken short name is dropped, and a taken long name is dropped together
    /// with its flags. Returns `Ok(false)` without touching the registry when
    /// both names are already taken.
    pub fn register_if_absent(&mut self, spec: impl Into<OptionSpec>) -> Result<bool, DefinitionError> {
        let mut spec = spec.into();
        let short = spec.short.trim().to_string();
        let long = long_name(&spec.definition);

        let short_taken = match single_char(&short) {
            Some(c) => self.by_short.contains_key(&c),
            None => short.is_empty(),
        };
        let long_taken = long.is_empty() || self.by_long.contains_key(&long);

        if short_taken && long_taken {
            tracing::debug!(short = %short, long = %long, "option already present, not filling");
            return Ok(false);
        }
        if short_taken {
            spec.short = String::new();
        }
        if long_taken {
            spec.definition = String::new();
        }
        self.register_one(spec)?;
        Ok(true)
    }

    /// Resolve a long name, falling back to a one-character short name.
    pub fn lookup(&self, name: &str) -> Option<&OptionDef> {
        if let Some(&idx) = self.by_long.get(name) {
            return Some(&self.defs[idx]);
        }
        single_char(name).and_then(|c| self.lookup_short(c))
    }

    pub fn lookup_long(&self, long: &str) -> Option<&OptionDef> {
        self.by_long.get(long).map(|&idx| &self.defs[idx])
    }

    pub fn lookup_short(&self, short: char) -> Option<&OptionDef> {
        self.by_short.get(&short).map(|&idx| &self.defs[idx])
    }

    /// Canonical name for a long or short name.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(OptionDef::name)
    }

    /// Definitions in display order (registration order unless sorted).
    pub fn iter(&self) -> impl Iterator<Item = &OptionDef> {
        self.by_long.values().map(|&idx| &self.defs[idx])
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Order `iter()` by long name.
    pub fn sort(&mut self) {
        self.by_long.sort_keys();
    }

    fn register_one(&mut self, spec: OptionSpec) -> Result<(), DefinitionError> {
        let last = self.by_long.keys().last().map(String::as_str);
        let def = OptionDef::from_spec(spec, last)?;

        if self.by_long.contains_key(def.long()) {
            return Err(DefinitionError::Redefined(def.long().to_string()));
        }
        if let Some(short) = def.short() {
            if let Some(&existing) = self.by_short.get(&short) {
                return Err(DefinitionError::DuplicateShortName {
                    short,
                    existing: self.defs[existing].name().to_string(),
                });
            }
        }

        tracing::debug!(
            name = def.name(),
            short = ?def.short(),
            has_argument = def.has_argument(),
            multi = def.multi_supported(),
            optional = def.optional(),
            "registered option"
        );

        let idx = self.defs.len();
        self.by_long.insert(def.long().to_string(), idx);
        if let Some(short) = def.short() {
            self.by_short.insert(short, idx);
        }
        self.defs.push(def);
        Ok(())
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
