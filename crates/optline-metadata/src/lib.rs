//! Option tables stored as JSON.
//!
//! A table is a JSON array whose entries are either records
//!
//! ```json
//! { "short": "n", "definition": "name=NAME", "comment": "who to greet", "default": "world" }
//! ```
//!
//! or positional tuples in the same order, `["n", "name=NAME", "who to greet", "world"]`.
//! Missing trailing tuple items and missing record fields are empty.

use optline_core::{OptionSpec, Value};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("invalid option table JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("option table entry {index}: {reason}")]
    InvalidEntry { index: usize, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionEntry {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub short: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub definition: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Tuple(Vec<serde_json::Value>),
    Record(OptionEntry),
}

/// Parse a JSON option table.
pub fn from_json_str(json: &str) -> Result<Vec<OptionEntry>, MetadataError> {
    let raw: Vec<RawEntry> = serde_json::from_str(json)?;
    raw.into_iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            RawEntry::Record(entry) => Ok(entry),
            RawEntry::Tuple(items) => entry_from_tuple(index, items),
        })
        .collect()
}

/// Parse a JSON option table straight into specs ready for registration.
pub fn specs_from_json_str(json: &str) -> Result<Vec<OptionSpec>, MetadataError> {
    from_json_str(json)?
        .into_iter()
        .enumerate()
        .map(|(index, entry)| entry.into_spec(index))
        .collect()
}

impl OptionEntry {
    /// Convert into an [`OptionSpec`]. `index` is only used in error messages.
    pub fn into_spec(self, index: usize) -> Result<OptionSpec, MetadataError> {
        let mut spec = OptionSpec::new(self.short, self.definition).comment(self.comment);
        spec.default = match self.default {
            Some(json) => json_to_value(&json).map_err(|reason| MetadataError::InvalidEntry {
                index,
                reason: format!("default {reason}"),
            })?,
            None => None,
        };
        Ok(spec)
    }
}

fn entry_from_tuple(index: usize, items: Vec<serde_json::Value>) -> Result<OptionEntry, MetadataError> {
    if items.len() > 4 {
        return Err(MetadataError::InvalidEntry {
            index,
            reason: format!("expected at most 4 items, got {}", items.len()),
        });
    }
    let mut items = items.into_iter();
    let mut text = |field: &str| -> Result<String, MetadataError> {
        match items.next() {
            None | Some(serde_json::Value::Null) => Ok(String::new()),
            Some(serde_json::Value::String(s)) => Ok(s),
            Some(other) => Err(MetadataError::InvalidEntry {
                index,
                reason: format!("{field} must be a string, got {other}"),
            }),
        }
    };
    let short = text("short")?;
    let definition = text("definition")?;
    let comment = text("comment")?;
    let default = items.next().filter(|v| !v.is_null());
    Ok(OptionEntry {
        short,
        definition,
        comment,
        default,
    })
}

/// `null` means no default. Numbers are kept as their JSON text.
fn json_to_value(json: &serde_json::Value) -> Result<Option<Value>, String> {
    Ok(match json {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
        serde_json::Value::Number(n) => Some(Value::Str(n.to_string())),
        serde_json::Value::String(s) => Some(Value::Str(s.clone())),
        serde_json::Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match json_to_value(item)? {
                    Some(v) => out.push(v),
                    None => return Err("arrays must not contain null".to_string()),
                }
            }
            Some(Value::List(out))
        }
        serde_json::Value::Object(_) => return Err("must not be an object".to_string()),
    })
}
