// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use thiserror::Error;

/// The error type.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum Error {
    //------------------------------
    // Option table errors (programmer error)
    //------------------------------
    /// Descriptor is empty or stops before the short option character.
    #[error("malformed option descriptor {descriptor:?}: {reason}")]
    Malformed {
        /// The offending descriptor.
        descriptor: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// The character after the short option is not one of `|?:*+`.
    #[error("invalid argument policy {policy:?} in option descriptor {descriptor:?}")]
    BadPolicy {
        /// The offending descriptor.
        descriptor: String,
        /// The unrecognised policy character.
        policy: char,
    },

    /// Two descriptors use the same printable short option.
    #[error("duplicate short option '-{option}' in option descriptor {descriptor:?}")]
    DuplicateShort {
        /// The second descriptor using the option.
        descriptor: String,
        /// The repeated option character.
        option: char,
    },

    /// Two descriptors use the same long option (ignoring case).
    #[error("duplicate long option '--{name}' in option descriptor {descriptor:?}")]
    DuplicateLong {
        /// The second descriptor using the name.
        descriptor: String,
        /// The repeated long name, as written in the second descriptor.
        name: String,
    },

    //------------------------------
    // Runtime errors (user error)
    //------------------------------
    /// User specified an unknown option.
    #[error("unknown option '{0}'")]
    UnknownOpt(String),

    /// User specified a long option prefix shared by more than one option.
    #[error("option '{token}' is ambiguous; possibilities: {}", .candidates.join(" "))]
    AmbiguousOpt {
        /// The token as given on the command line.
        token: String,
        /// Long names (with `--` prefix) the token could refer to.
        candidates: Vec<String>,
    },

    /// Option argument was not specified.
    #[error("option '{0}' requires an argument")]
    MissingOptArg(String),

    /// Option argument was specified for an option that takes none.
    #[error("option '{0}' doesn't allow an argument")]
    UnexpectedOptArg(String),

    //------------------------------
    // Driver errors
    //------------------------------
    /// No handler means nothing will happen.
    #[error("no handler specified")]
    NoHandler,

    /// Returned by handlers when none of the other errors fit.
    #[error("handler error: {0}")]
    HandlerError(String),

    /// Parse errors were counted rather than returned immediately.
    #[error("{program}: {errors} error(s) parsing command line")]
    ParseFailed {
        /// Display name of the program.
        program: String,
        /// Number of errors found.
        errors: usize,
    },
}

impl Error {
    /// Returns `true` for errors found while matching tokens (as opposed to
    /// errors building the option table or raised by a handler).
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownOpt(_)
                | Error::AmbiguousOpt { .. }
                | Error::MissingOptArg(_)
                | Error::UnexpectedOptArg(_)
        )
    }

    /// Returns `true` if the token did not resolve to exactly one option.
    pub fn is_unmatched(&self) -> bool {
        matches!(self, Error::UnknownOpt(_) | Error::AmbiguousOpt { .. })
    }
}

/// Convenience type that allows a function to be defined as returning a
/// [Result], but which only requires the success type to be specified,
/// defaulting the error type to this crates `Error` type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
