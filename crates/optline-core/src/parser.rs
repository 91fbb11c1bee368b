//! Argv tokenizer.
//!
//! Tokens are popped from the front of a work queue one at a time. A value
//! attached to an option (`-xVALUE`, `--opt=VALUE`, or the empty string for an
//! omitted optional argument) is pushed back onto the front of the queue, so
//! every argument-taking option reads its value the same way: by popping the
//! next entry.

use std::collections::VecDeque;

use crate::definition::{OptionDef, is_word_char};
use crate::error::ParseError;
use crate::events::{Events, POSITIONAL};
use crate::registry::Registry;
use crate::value::{ParseResult, Value};

/// Parse `argv` against `registry`, firing `events` callbacks in token order.
///
/// The caller's sequence is copied into the work queue and never modified.
/// On error the partially built result is discarded.
pub fn parse<I>(registry: &Registry, events: &mut Events<'_>, argv: I) -> Result<ParseResult, ParseError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let queue: VecDeque<String> = argv.into_iter().map(|s| s.as_ref().to_string()).collect();
    Parser {
        registry,
        events,
        queue,
        state: State::Scanning,
        result: ParseResult::default(),
    }
    .run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scanning,
    ConsumingShortCluster,
    ConsumingLongValue,
    Terminated,
}

/// Syntactic class of one argv token.
#[derive(Debug, PartialEq, Eq)]
enum Token<'t> {
    /// `-abc`: the run of word characters (and `-`) after the dash.
    ShortCluster(&'t str),
    /// `--name` or `--name=value`.
    Long { name: &'t str, value: Option<&'t str> },
    /// `--`
    Terminator,
    Positional,
}

fn classify(arg: &str) -> Token<'_> {
    if let Some(body) = arg.strip_prefix("--") {
        if body.is_empty() {
            return Token::Terminator;
        }
        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        if is_option_name(name) {
            return Token::Long { name, value };
        }
        return Token::Positional;
    }
    if let Some(body) = arg.strip_prefix('-') {
        if body.starts_with(is_word_char) {
            let end = body
                .find(|c: char| !(is_word_char(c) || c == '-'))
                .unwrap_or(body.len());
            return Token::ShortCluster(&body[..end]);
        }
    }
    Token::Positional
}

fn is_option_name(name: &str) -> bool {
    name.starts_with(is_word_char) && name.chars().all(|c| is_word_char(c) || c == '-')
}

struct Parser<'r, 'e, 'a> {
    registry: &'r Registry,
    events: &'e mut Events<'a>,
    queue: VecDeque<String>,
    state: State,
    result: ParseResult,
}

impl<'r> Parser<'r, '_, '_> {
    fn run(mut self) -> Result<ParseResult, ParseError> {
        self.seed_defaults();

        while self.state != State::Terminated {
            let Some(arg) = self.queue.pop_front() else {
                break;
            };
            match classify(&arg) {
                Token::ShortCluster(cluster) => self.short_cluster(&arg, cluster)?,
                Token::Long { name, value } => self.long_option(name, value)?,
                Token::Terminator => self.terminate(),
                Token::Positional => self.positional(arg.clone()),
            }
            if self.state != State::Terminated {
                self.transition(State::Scanning);
            }
        }

        Ok(self.result)
    }

    fn seed_defaults(&mut self) {
        for def in self.registry.iter() {
            if let Some(default) = def.default_value() {
                self.result.options.insert(def.name(), default.clone());
            }
        }
    }

    fn short_cluster(&mut self, arg: &str, cluster: &str) -> Result<(), ParseError> {
        self.transition(State::ConsumingShortCluster);
        let registry = self.registry;
        for (idx, c) in cluster.char_indices() {
            let def = registry
                .lookup_short(c)
                .ok_or_else(|| ParseError::UnknownOption(c.to_string()))?;

            if !def.has_argument() {
                self.save(def, Value::Bool(true));
                continue;
            }

            // Everything after this character in the token is its value.
            let rest = &arg[1 + idx + c.len_utf8()..];
            if !rest.is_empty() {
                self.queue.push_front(rest.to_string());
            }
            let value = self.take_argument(def)?;
            self.save(def, Value::Str(value));
            break;
        }
        Ok(())
    }

    fn long_option(&mut self, name: &str, attached: Option<&str>) -> Result<(), ParseError> {
        let registry = self.registry;
        let def = registry
            .lookup_long(name)
            .ok_or_else(|| ParseError::UnknownOption(name.to_string()))?;

        if !def.has_argument() {
            // An attached value is not consumed here; it is scanned as the next token.
            if let Some(value) = attached {
                self.queue.push_front(value.to_string());
            }
            self.save(def, Value::Bool(true));
            return Ok(());
        }

        self.transition(State::ConsumingLongValue);
        match attached {
            Some(value) => self.queue.push_front(value.to_string()),
            None if def.optional() => self.queue.push_front(String::new()),
            None => {}
        }
        let value = self.take_argument(def)?;
        self.save(def, Value::Str(value));
        Ok(())
    }

    fn terminate(&mut self) {
        self.transition(State::Terminated);
        let rest: Vec<String> = self.queue.drain(..).collect();
        for token in rest {
            self.positional(token);
        }
    }

    fn positional(&mut self, token: String) {
        let value = Value::Str(token.clone());
        self.result.positionals.push(token);
        self.events.dispatch(POSITIONAL, &value);
    }

    fn take_argument(&mut self, def: &OptionDef) -> Result<String, ParseError> {
        self.queue
            .pop_front()
            .ok_or_else(|| ParseError::MissingArgument(def.long().to_string()))
    }

    /// Store `value` under the canonical name, mirror it under the short name,
    /// then notify the option's callback if one is bound.
    fn save(&mut self, def: &'r OptionDef, value: Value) {
        let name = def.name();
        let seen = self.result.is_explicit(name);
        let options = &mut self.result.options;

        if def.multi_supported() {
            // The first explicit occurrence replaces a seeded default.
            if seen {
                options.append(name, value.clone());
            } else {
                options.insert(name, Value::List(vec![value.clone()]));
            }
        } else {
            options.insert(name, value.clone());
        }
        self.result.mark_explicit(name);

        // Only the latest value is mirrored, even for accumulating options.
        if let Some(short) = def.short().filter(|_| !def.is_short_only()) {
            let short = short.to_string();
            self.result.options.insert(&short, value.clone());
            self.result.mark_explicit(&short);
        }

        tracing::trace!(name, %value, "stored option value");
        self.events.dispatch(name, &value);
    }

    fn transition(&mut self, next: State) {
        if self.state != next {
            tracing::trace!(from = ?self.state, to = ?next, "parser state");
            self.state = next;
        }
    }
}
