use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::definition::{OptionDef, OptionSpec};
use crate::error::{DefinitionError, Error, EventError, ParseError};
use crate::events::Events;
use crate::help;
use crate::parser;
use crate::registry::Registry;
use crate::value::{ParseResult, Value};

pub type ErrorHandler<'a> = Box<dyn FnMut(&ParseError) + 'a>;

/// Registry, callbacks, help template and error policy in one place.
///
/// ```
/// use optline_core::Getopt;
///
/// let mut getopt = Getopt::new([
///     ("v", "verbose", "be chatty"),
///     ("n", "name=NAME", "who to greet"),
/// ])?;
/// getopt.error(|_| {});
///
/// let result = getopt.parse(["-v", "--name=world", "extra"])?;
/// assert!(result.options.is_set("verbose"));
/// assert_eq!(result.options.get_str("name"), Some("world"));
/// assert_eq!(result.positionals, vec!["extra"]);
/// # Ok::<(), optline_core::Error>(())
/// ```
pub struct Getopt<'a> {
    registry: Registry,
    events: Events<'a>,
    help: String,
    bound_help: Option<Rc<RefCell<String>>>,
    error_handler: ErrorHandler<'a>,
}

impl fmt::Debug for Getopt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Getopt")
            .field("registry", &self.registry)
            .field("events", &self.events)
            .field("help", &self.help)
            .field("help_bound", &self.bound_help.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a> Getopt<'a> {
    pub fn new<I>(specs: I) -> Result<Self, DefinitionError>
    where
        I: IntoIterator,
        I::Item: Into<OptionSpec>,
    {
        Ok(Self {
            registry: Registry::with_specs(specs)?,
            events: Events::new(),
            help: help::default_template(help::program_name().as_deref()),
            bound_help: None,
            error_handler: Box::new(report_and_exit),
        })
    }

    /// Same as [`Getopt::new`], for one-line construction.
    pub fn create<I>(specs: I) -> Result<Self, DefinitionError>
    where
        I: IntoIterator,
        I::Item: Into<OptionSpec>,
    {
        Self::new(specs)
    }

    pub fn append<I>(&mut self, specs: I) -> Result<&mut Self, DefinitionError>
    where
        I: IntoIterator,
        I::Item: Into<OptionSpec>,
    {
        self.registry.register(specs)?;
        Ok(self)
    }

    /// Register `spec` unless its names are already taken. See
    /// [`Registry::register_if_absent`].
    pub fn fill(&mut self, spec: impl Into<OptionSpec>) -> Result<bool, DefinitionError> {
        self.registry.register_if_absent(spec)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn lookup(&self, name: &str) -> Option<&OptionDef> {
        self.registry.lookup(name)
    }

    /// Canonical name of the option `name` refers to.
    pub fn option_name(&self, name: &str) -> Option<&str> {
        self.registry.canonical_name(name)
    }

    pub fn on<F>(&mut self, name: &str, callback: F) -> Result<&mut Self, EventError>
    where
        F: FnMut(&Value) + 'a,
    {
        self.events.on(&self.registry, name, callback)?;
        Ok(self)
    }

    pub fn emit(&mut self, name: &str, value: impl Into<Value>) -> Result<(), EventError> {
        self.events.emit(&self.registry, name, &value.into())
    }

    /// Replace the handler that sees parse failures before they are returned.
    ///
    /// The default handler prints the error to stderr and exits with status 1.
    /// A handler that returns normally lets `parse` hand the error back.
    pub fn error<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&ParseError) + 'a,
    {
        self.error_handler = Box::new(handler);
        self
    }

    pub fn parse<I>(&mut self, argv: I) -> Result<ParseResult, ParseError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        if let Some(text) = &self.bound_help {
            *text.borrow_mut() = self.help_text();
        }

        match parser::parse(&self.registry, &mut self.events, argv) {
            Ok(result) => {
                tracing::debug!(
                    options = result.options.len(),
                    positionals = result.positionals.len(),
                    "parsed arguments"
                );
                Ok(result)
            }
            Err(err) => {
                tracing::debug!(error = %err, "argument parsing failed");
                (self.error_handler)(&err);
                Err(err)
            }
        }
    }

    /// Parse the arguments of the running process, minus the program name.
    pub fn parse_system(&mut self) -> Result<ParseResult, ParseError> {
        let argv: Vec<String> = std::env::args().skip(1).collect();
        self.parse(argv)
    }

    /// Set the help template; `[[OPTIONS]]` marks where the table goes.
    pub fn set_help(&mut self, template: impl Into<String>) -> &mut Self {
        self.help = template.into();
        self
    }

    /// Order help rows by long name.
    pub fn sort(&mut self) -> &mut Self {
        self.registry.sort();
        self
    }

    pub fn help_text(&self) -> String {
        help::render(&self.help, &self.registry)
    }

    pub fn show_help(&self) -> &Self {
        println!("{}", self.help_text());
        self
    }

    /// Add `-h, --help` if absent and make it print the help and exit with
    /// status 0 when seen during parsing.
    pub fn bind_help(&mut self, template: Option<&str>) -> Result<&mut Self, Error> {
        if let Some(template) = template {
            self.set_help(template);
        }
        self.fill(("h", "help", "display this help"))?;

        let text = Rc::new(RefCell::new(self.help_text()));
        let shown = Rc::clone(&text);
        self.on("help", move |_| {
            println!("{}", shown.borrow());
            std::process::exit(0);
        })?;
        self.bound_help = Some(text);
        Ok(self)
    }

    pub fn version() -> &'static str {
        crate::VERSION
    }
}

fn report_and_exit(err: &ParseError) {
    eprintln!("{err}");
    std::process::exit(1);
}
