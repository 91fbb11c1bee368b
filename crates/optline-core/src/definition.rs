//! Option definitions and the compact definition-string encoding.
//!
//! An option is declared as `(short, definition, comment, default)`, where the
//! definition string carries the long name followed by flag tokens:
//!
//! - `name`        argument-less option
//! - `name=ARG`    option takes an argument
//! - `name=ARG+`   option takes an argument and accumulates repeated occurrences
//! - `name[=ARG]`  the argument may be omitted (long options only)

use crate::error::DefinitionError;
use crate::value::Value;

/// One entry of an option table, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSpec {
    pub short: String,
    pub definition: String,
    pub comment: String,
    pub default: Option<Value>,
}

impl OptionSpec {
    pub fn new(short: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            short: short.into(),
            definition: definition.into(),
            ..Default::default()
        }
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

impl<S: Into<String>, D: Into<String>> From<(S, D)> for OptionSpec {
    fn from((short, definition): (S, D)) -> Self {
        Self::new(short, definition)
    }
}

impl<S: Into<String>, D: Into<String>, C: Into<String>> From<(S, D, C)> for OptionSpec {
    fn from((short, definition, comment): (S, D, C)) -> Self {
        Self::new(short, definition).comment(comment)
    }
}

impl<S, D, C, V> From<(S, D, C, V)> for OptionSpec
where
    S: Into<String>,
    D: Into<String>,
    C: Into<String>,
    V: Into<Value>,
{
    fn from((short, definition, comment, default): (S, D, C, V)) -> Self {
        Self::new(short, definition)
            .comment(comment)
            .default_value(default)
    }
}

/// A validated option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDef {
    name: String,
    short: Option<char>,
    long: String,
    has_argument: bool,
    multi_supported: bool,
    optional: bool,
    comment: String,
    definition: String,
    default: Option<Value>,
}

impl OptionDef {
    /// Canonical name: the long name, or the short name when no long name was given.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Single-character name, if any.
    pub fn short(&self) -> Option<char> {
        self.short
    }

    /// Long name; the short name for short-only options.
    pub fn long(&self) -> &str {
        &self.long
    }

    /// Whether the option consumes a value.
    pub fn has_argument(&self) -> bool {
        self.has_argument
    }

    /// Whether repeated occurrences accumulate into a list.
    pub fn multi_supported(&self) -> bool {
        self.multi_supported
    }

    /// Whether the value may be omitted (`--name[=VALUE]`).
    pub fn optional(&self) -> bool {
        self.optional
    }

    /// Description shown in help rows.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// The definition string as written, used for help rows.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// True when the option was declared with only a short name.
    pub fn is_short_only(&self) -> bool {
        self.short
            .is_some_and(|s| self.long.chars().eq(std::iter::once(s)))
    }

    /// Decode `spec` into a definition. Checks that only need the spec itself;
    /// uniqueness is the registry's job. `last` names the previously defined
    /// option for the empty-name message.
    pub(crate) fn from_spec(spec: OptionSpec, last: Option<&str>) -> Result<Self, DefinitionError> {
        let short_raw = spec.short.trim();
        let flags = DefinitionFlags::decode(&spec.definition);

        if flags.optional && !short_raw.is_empty() {
            return Err(DefinitionError::OptionalWithShortName(
                spec.definition.clone(),
            ));
        }

        let long = if flags.long.is_empty() {
            short_raw.to_string()
        } else {
            flags.long
        };
        if long.is_empty() {
            return Err(DefinitionError::EmptyName {
                last: last.map(str::to_string),
            });
        }

        let short = if short_raw.is_empty() {
            None
        } else {
            let mut chars = short_raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => return Err(DefinitionError::InvalidShortName(short_raw.to_string())),
            }
        };

        Ok(Self {
            name: long.clone(),
            short,
            long,
            has_argument: flags.has_argument,
            multi_supported: flags.multi_supported,
            optional: flags.optional,
            comment: spec.comment,
            definition: spec.definition,
            default: spec.default,
        })
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct DefinitionFlags {
    long: String,
    has_argument: bool,
    multi_supported: bool,
    optional: bool,
}

impl DefinitionFlags {
    fn decode(definition: &str) -> Self {
        Self {
            long: long_name(definition),
            has_argument: definition.contains('='),
            multi_supported: definition.contains('+'),
            optional: has_optional_fragment(definition),
        }
    }
}

/// Leading run of word characters and `-`.
pub(crate) fn long_name(definition: &str) -> String {
    definition
        .chars()
        .take_while(|&c| is_word_char(c) || c == '-')
        .collect()
}

/// `[=` followed somewhere later by `]`.
fn has_optional_fragment(definition: &str) -> bool {
    definition
        .find("[=")
        .is_some_and(|start| definition[start + 2..].contains(']'))
}

/// ASCII word character: letters, digits and underscore.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
