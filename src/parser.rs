// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::iter::FusedIterator;

use tracing::trace;

use crate::error::{Error, Result};
use crate::source::Source;
use crate::table::{
    Need, OptionDefinition, Table, END_OF_OPTIONS, LONG_OPT_PREFIX, LONG_VALUE_SEPARATOR,
    OPT_PREFIX,
};

/// A matched option.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Opt {
    /// Short option character of the matched definition. For long-only
    /// options this is whatever sentinel the descriptor used.
    pub option: char,
    /// Long name of the matched definition (empty if it has none).
    pub name: String,
    /// Value for the option, if any.
    ///
    /// Multi-valued options produce one [Opt] per value.
    pub value: Option<String>,
}

impl Opt {
    fn new(def: &OptionDefinition, value: Option<&str>) -> Self {
        Opt {
            option: def.short(),
            name: def.long().into(),
            value: value.map(String::from),
        }
    }
}

/// Result of a single step of the [Parser].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Match {
    /// An option was recognised.
    Opt(Opt),
    /// No more options. Positional arguments start at this index into the
    /// source (which may be the source length if there are none).
    End(usize),
}

/// A multi-valued option still collecting values.
#[derive(Clone, Debug, Eq, PartialEq)]
struct Pending {
    def: OptionDefinition,
    /// How the option was written (`-g` or `--groups`), for errors.
    display: String,
    values: usize,
}

/// Parser state carried between calls to [Parser::next_match()].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParseState {
    /// Index of the next unread token.
    cursor: usize,
    pending: Option<Pending>,
    /// Unread characters of a short option cluster (`g` after `-x` in `-xg`).
    cluster: Option<String>,
    seen_double_dash: bool,
    end: Option<usize>,
}

impl ParseState {
    /// Index of the next token to be read.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The multi-valued option currently collecting values, if any.
    pub fn pending(&self) -> Option<&OptionDefinition> {
        self.pending.as_ref().map(|p| &p.def)
    }

    /// Unprocessed remainder of a short option cluster.
    pub fn cluster(&self) -> Option<&str> {
        self.cluster.as_deref()
    }

    /// Returns `true` once `--` has been seen.
    pub fn seen_double_dash(&self) -> bool {
        self.seen_double_dash
    }

    /// Index of the first positional argument, once known.
    pub fn residual(&self) -> Option<usize> {
        self.end
    }
}

/// Matches command-line tokens against a [Table], one option at a time.
///
/// Call [Parser::next_match()] until it returns [Match::End], or use the
/// parser as an [Iterator] and call [Parser::residual()] afterwards.
///
/// Errors do not stop the parser: the offending token is consumed and the
/// next call carries on with the following one.
///
/// # Example
///
/// ```rust
/// # use tabopt::{Match, Parser, Table};
/// let table = Table::new(&["x|extra", "g+groups", "c:count"]).unwrap();
/// let args = ["-xg", "a", "b", "--count=3", "file"];
///
/// let mut parser = Parser::new(&table, &args);
///
/// let found: Vec<(char, Option<String>)> = parser
///     .by_ref()
///     .map(|r| r.map(|opt| (opt.option, opt.value)))
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(
///     found,
///     vec![
///         ('x', None),
///         ('g', Some("a".into())),
///         ('g', Some("b".into())),
///         ('c', Some("3".into())),
///     ]
/// );
/// assert_eq!(parser.residual(), Some(4));
/// assert_eq!(parser.next_match(), Ok(Match::End(4)));
/// ```
#[derive(Debug)]
pub struct Parser<'a, S: Source + ?Sized> {
    table: &'a Table,
    source: &'a S,
    state: ParseState,
}

impl<'a, S: Source + ?Sized> Parser<'a, S> {
    /// Create a parser for the specified tokens (which must not include
    /// the program name).
    pub fn new(table: &'a Table, source: &'a S) -> Self {
        Parser {
            table,
            source,
            state: ParseState::default(),
        }
    }

    /// The current parser state.
    pub fn state(&self) -> &ParseState {
        &self.state
    }

    /// Index of the first positional argument, once [Match::End] has been
    /// returned.
    pub fn residual(&self) -> Option<usize> {
        self.state.end
    }

    /// Match the next option.
    ///
    /// # Errors
    ///
    /// - [Error::UnknownOpt]: the token looks like an option but isn't one.
    /// - [Error::AmbiguousOpt]: a long option prefix matches several names.
    /// - [Error::MissingOptArg]: a required value is absent, or a
    ///   [Need::OneOrMore] option was given no values.
    /// - [Error::UnexpectedOptArg]: `--name=value` for an option that takes
    ///   no value.
    pub fn next_match(&mut self) -> Result<Match> {
        if let Some(end) = self.state.end {
            return Ok(Match::End(end));
        }

        if let Some(cluster) = self.state.cluster.take() {
            let mut chars = cluster.chars();

            if let Some(option) = chars.next() {
                return self.short_option(option, chars.as_str());
            }
        }

        if let Some(found) = self.continue_values()? {
            return Ok(found);
        }

        let source = self.source;
        let cursor = self.state.cursor;

        let token = match source.token(cursor) {
            Some(token) => token,
            None => return Ok(self.end(cursor)),
        };

        if token == END_OF_OPTIONS {
            self.state.seen_double_dash = true;
            return Ok(self.end(cursor + 1));
        }

        if self.state.seen_double_dash || token.len() < 2 || !token.starts_with(OPT_PREFIX) {
            return Ok(self.end(cursor));
        }

        self.state.cursor += 1;

        if let Some(rest) = token.strip_prefix(LONG_OPT_PREFIX) {
            trace!(token, "long option");
            return self.long_option(token, rest);
        }

        trace!(token, "short option cluster");

        let mut chars = token[OPT_PREFIX.len_utf8()..].chars();

        match chars.next() {
            Some(option) => self.short_option(option, chars.as_str()),
            None => Ok(self.end(cursor)),
        }
    }

    fn end(&mut self, residual: usize) -> Match {
        trace!(residual, "end of options");

        self.state.cursor = residual;
        self.state.end = Some(residual);

        Match::End(residual)
    }

    fn keep_cluster(&mut self, rest: &str) {
        if !rest.is_empty() {
            self.state.cluster = Some(rest.into());
        }
    }

    fn short_option(&mut self, option: char, rest: &str) -> Result<Match> {
        let table = self.table;
        let display = format!("{}{}", OPT_PREFIX, option);

        let def = match table.find_short(option) {
            Some(def) => def,
            None => {
                self.keep_cluster(rest);
                return Err(Error::UnknownOpt(display));
            }
        };

        trace!(option = ?option, needs = ?def.needs(), rest, "matched short option");

        match def.needs() {
            Need::Nothing => {
                self.keep_cluster(rest);
                Ok(Match::Opt(Opt::new(def, None)))
            }
            Need::Optional | Need::Argument if !rest.is_empty() => {
                Ok(Match::Opt(Opt::new(def, Some(rest))))
            }
            Need::Optional => Ok(Match::Opt(Opt::new(def, None))),
            Need::Argument => self.required_value(def, display),
            Need::ZeroOrMore | Need::OneOrMore => {
                let first = if rest.is_empty() { None } else { Some(rest) };
                self.start_values(def, display, first)
            }
        }
    }

    fn long_option(&mut self, token: &str, rest: &str) -> Result<Match> {
        let table = self.table;

        let (name, inline) = match rest.split_once(LONG_VALUE_SEPARATOR) {
            Some((name, value)) => (name, Some(value)),
            None => (rest, None),
        };

        // Errors name the token as typed, including any "=value".
        let def = table.find_long(name).map_err(|e| match e {
            Error::UnknownOpt(_) => Error::UnknownOpt(token.into()),
            Error::AmbiguousOpt { candidates, .. } => Error::AmbiguousOpt {
                token: token.into(),
                candidates,
            },
            e => e,
        })?;
        let display = def.to_string();

        trace!(name, long = def.long(), needs = ?def.needs(), "matched long option");

        match (def.needs(), inline) {
            (Need::Nothing, Some(_)) => Err(Error::UnexpectedOptArg(display)),
            (Need::Nothing, None) | (Need::Optional, _) => Ok(Match::Opt(Opt::new(def, inline))),
            (Need::Argument, Some(_)) => Ok(Match::Opt(Opt::new(def, inline))),
            (Need::Argument, None) => self.required_value(def, display),
            (Need::ZeroOrMore, _) | (Need::OneOrMore, _) => self.start_values(def, display, inline),
        }
    }

    /// Consume the next token whole as the value for `def`, unless it is
    /// missing or is itself an option.
    fn required_value(&mut self, def: &OptionDefinition, display: String) -> Result<Match> {
        let source = self.source;

        match source.token(self.state.cursor) {
            Some(value) if !self.table.looks_like_option(value) => {
                self.state.cursor += 1;
                Ok(Match::Opt(Opt::new(def, Some(value))))
            }
            _ => Err(Error::MissingOptArg(display)),
        }
    }

    fn start_values(
        &mut self,
        def: &OptionDefinition,
        display: String,
        first: Option<&str>,
    ) -> Result<Match> {
        let mut pending = Pending {
            def: def.clone(),
            display,
            values: 0,
        };

        if let Some(value) = first {
            pending.values = 1;
            self.state.pending = Some(pending);

            return Ok(Match::Opt(Opt::new(def, Some(value))));
        }

        self.state.pending = Some(pending);

        // With no values yet, continue_values() always reports something.
        self.continue_values()
            .map(|found| found.unwrap_or_else(|| Match::Opt(Opt::new(def, None))))
    }

    /// Take the next token as another value for the pending multi-valued
    /// option. Returns `None` once the option has no more values (or
    /// there is no pending option).
    fn continue_values(&mut self) -> Result<Option<Match>> {
        let mut pending = match self.state.pending.take() {
            Some(pending) => pending,
            None => return Ok(None),
        };

        if let Some(value) = self.take_extra_value() {
            pending.values += 1;

            let found = Match::Opt(Opt::new(&pending.def, Some(value)));
            self.state.pending = Some(pending);

            return Ok(Some(found));
        }

        trace!(option = %pending.display, values = pending.values, "end of values");

        match (pending.values, pending.def.needs()) {
            (0, Need::OneOrMore) => Err(Error::MissingOptArg(pending.display)),
            (0, _) => Ok(Some(Match::Opt(Opt::new(&pending.def, None)))),
            _ => Ok(None),
        }
    }

    /// A token is another value for a multi-valued option only if it is a
    /// lone `-` or does not start with a dash at all.
    fn take_extra_value(&mut self) -> Option<&'a str> {
        let source = self.source;
        let value = source.token(self.state.cursor)?;

        let dashed = value != "-" && value.starts_with(OPT_PREFIX);

        if dashed || self.table.looks_like_option(value) {
            return None;
        }

        self.state.cursor += 1;

        Some(value)
    }
}

impl<'a, S: Source + ?Sized> Iterator for Parser<'a, S> {
    type Item = Result<Opt>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_match() {
            Ok(Match::Opt(opt)) => Some(Ok(opt)),
            Ok(Match::End(_)) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<'a, S: Source + ?Sized> FusedIterator for Parser<'a, S> {}
