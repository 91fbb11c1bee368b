//! getopt-style command-line option parsing.
//!
//! Options are declared as `(short, definition, comment, default)` tuples and
//! collected in a [`Registry`]. The [`parser`] walks argv token by token,
//! handling short clusters (`-abc`, `-xVALUE`), long options (`--name=VALUE`,
//! `--name VALUE`, optional `--color[=WHEN]`), the `--` terminator and
//! positionals, and fires [`Events`] callbacks as values are recognized.
//!
//! [`Getopt`] bundles a registry, callbacks, a help template and an error
//! policy for the common case.

pub mod definition;
pub mod error;
pub mod events;
pub mod getopt;
pub mod help;
pub mod parser;
pub mod registry;
pub mod value;

pub use definition::{OptionDef, OptionSpec};
pub use error::{DefinitionError, Error, EventError, ParseError};
pub use events::{Callback, Events, POSITIONAL};
pub use getopt::{ErrorHandler, Getopt};
pub use parser::parse;
pub use registry::Registry;
pub use value::{OptionMap, ParseResult, Value};

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
