// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::parser::{Match, Parser};
use crate::source::get_args;
use crate::table::Table;

/// Trait that an argument handler must implement.
pub trait Handler {
    /// Function that will handle all matched options.
    ///
    /// Since the handler is provided with a mutable reference to itself,
    /// it can store and modify its state when called.
    ///
    /// # Parameters
    ///
    /// `arg` - The [Arg] provides details of the option found
    ///         on the command-line.
    ///
    /// # Return value
    //
    /// - If the handler logic succeeds, return `Ok(())`.
    /// - If the handler needs to fail, it should return one of the [Error]
    ///   values. If the main errors are not appropriate, make the handler
    ///   return [Error::HandlerError].
    ///
    /// # Notes
    ///
    /// If a handler call fails, the command-line parsing will
    /// stop and the error will be returned to the caller of the parsing function.
    fn handle(&mut self, arg: Arg) -> Result<()>;
}

impl<'a> fmt::Debug for dyn Handler + 'a {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Handler: {:p}", self)
    }
}

/// Details of a matched option, passed to the [Handler].
///
/// # Note
///
/// - All members are public for handler convenience.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct Arg {
    /// Short option character of the option.
    pub option: char,
    /// Long option name (empty if the option only has a short form).
    pub name: String,
    /// Value specified for this option.
    ///
    /// # Notes
    ///
    /// - This is equivalent to `getopt(3)`'s `optarg` value.
    /// - This will be [None] for flag options, and for options with an
    ///   optional value when no value was given.
    /// - Each value of a multi-valued option is handled separately.
    pub value: Option<String>,
    /// Number of times the option has been handled, including this time.
    pub count: usize,
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match &self.value {
            Some(value) => format!(" {:?}", value),
            None => "".into(),
        };

        if self.name.is_empty() {
            write!(f, "-{}{}", self.option, value)
        } else {
            write!(f, "--{}{}", self.name, value)
        }
    }
}

/// Settings used to control the parsers behaviour.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialOrd, Default, PartialEq)]
pub struct Settings {
    /// If set, ignore unknown (and ambiguous) options; by default they are
    /// considered an error.
    ignore_unknown_options: bool,

    /// If set, log and count parse errors rather than stopping at the
    /// first one.
    keep_going: bool,
}

impl Settings {
    /// Create a new settings object.
    pub fn new() -> Self {
        Settings::default()
    }

    /// Specify that unknown options should be silently ignored
    /// (by default, the first unknown option will generate an error).
    pub fn ignore_unknown_options(self) -> Self {
        Settings {
            ignore_unknown_options: true,
            ..self
        }
    }

    /// Specify that parsing should continue after a parse error.
    ///
    /// Each error is logged (at `warn` level, prefixed with the program name)
    /// and once all arguments have been parsed, [Error::ParseFailed] is
    /// returned with the number of errors.
    ///
    /// # Note
    ///
    /// Handler errors always stop the parse.
    pub fn keep_going(self) -> Self {
        Settings {
            keep_going: true,
            ..self
        }
    }
}

/// The main object used to represent the program.
///
/// All consumers of the crate need to create a
/// single object of this type.
#[derive(Clone, Default, Debug)]
pub struct App<'a> {
    name: String,
    settings: Settings,
    table: Table,
    handler: Option<Rc<RefCell<Box<dyn Handler + 'a>>>>,
}

impl<'a> App<'a> {
    /// Create a new application object.
    ///
    /// The name is only used in error messages.
    pub fn new(name: &str) -> Self {
        App::default().name(name)
    }

    /// Specify the name of the program.
    fn name(self, name: &str) -> Self {
        App {
            name: name.into(),
            ..self
        }
    }

    /// Specify the options to parse the command-line with.
    pub fn table(self, table: Table) -> Self {
        App { table, ..self }
    }

    /// Specify any settings for the program.
    pub fn settings(self, settings: Settings) -> Self {
        App { settings, ..self }
    }

    /// If set, don't error if unknown options are specified - just
    /// ignore them.
    ///
    /// # Note
    ///
    /// This is an alternative to calling the `settings()` method.
    pub fn ignore_unknown_options(self) -> Self {
        App {
            settings: self.settings.ignore_unknown_options(),
            ..self
        }
    }

    /// If set, count parse errors rather than stopping at the first one.
    ///
    /// See the [Settings] method of the same name for full details.
    ///
    /// # Note
    ///
    /// This is an alternative to calling the `settings()` method.
    pub fn keep_going(self) -> Self {
        App {
            settings: self.settings.keep_going(),
            ..self
        }
    }

    /// Specify the handler for the option which must implement the
    /// [Handler] trait.
    ///
    /// # Note
    ///
    /// If the handler needs to modify its own state when called,
    /// the specified boxed trait must provide a mutable reference.
    pub fn handler(self, boxed_handler: Box<dyn Handler + 'a>) -> Self {
        let boxed = Rc::new(RefCell::new(boxed_handler));

        App {
            handler: Some(boxed),
            ..self
        }
    }

    /// Parse a set of command line arguments (without the program name),
    /// calling the handler for each option found.
    ///
    /// # Arguments
    ///
    /// - `cli_args`: Vector of string arguments. Specify your own,
    ///    or call [get_args()].
    ///
    /// # Return value
    ///
    /// The positional arguments: everything after the last option (or
    /// after `--`).
    ///
    /// # Notes
    ///
    /// - The `cli_args` vector must _not_ specify the command name (which by default
    ///   is returned as the first element by `env::args().collect()` for example.
    ///   Use [get_args()] as this handles this for you.
    ///
    pub fn parse_with_args(&mut self, cli_args: Vec<String>) -> Result<Vec<String>> {
        let handler = self.handler.clone().ok_or(Error::NoHandler)?;

        let mut counts = HashMap::<(char, String), usize>::new();
        let mut errors = 0;

        let mut parser = Parser::new(&self.table, &cli_args);

        let residual = loop {
            let found = match parser.next_match() {
                Ok(Match::Opt(opt)) => opt,
                Ok(Match::End(residual)) => break residual,
                Err(e) if e.is_unmatched() && self.settings.ignore_unknown_options => {
                    debug!(program = %self.name, error = %e, "ignoring option");
                    continue;
                }
                Err(e) if self.settings.keep_going => {
                    warn!("{}: {}", self.name, e);
                    errors += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let count = counts
                .entry((found.option, found.name.clone()))
                .or_insert(0);
            *count += 1;

            let arg = Arg {
                option: found.option,
                name: found.name,
                value: found.value,
                count: *count,
            };

            debug!(program = %self.name, %arg, count = arg.count, "handling option");

            handler.borrow_mut().handle(arg)?;
        };

        if errors > 0 {
            return Err(Error::ParseFailed {
                program: self.name.clone(),
                errors,
            });
        }

        Ok(cli_args[residual..].to_vec())
    }

    /// Simplest interface to the parser.
    pub fn parse(&mut self) -> Result<Vec<String>> {
        let args = get_args();

        self.parse_with_args(args)
    }
}
