// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::env;

/// An ordered, indexable, read-only sequence of command-line tokens.
///
/// The [crate::Parser] keeps its own cursor and only ever reads through
/// this trait.
pub trait Source {
    /// Returns the token at `index`, or `None` past the end.
    fn token(&self, index: usize) -> Option<&str>;

    /// Returns the number of tokens.
    fn len(&self) -> usize;

    /// Returns `true` if there are no tokens.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: AsRef<str>> Source for [T] {
    fn token(&self, index: usize) -> Option<&str> {
        self.get(index).map(|t| t.as_ref())
    }

    fn len(&self) -> usize {
        <[T]>::len(self)
    }
}

impl<T: AsRef<str>> Source for Vec<T> {
    fn token(&self, index: usize) -> Option<&str> {
        self.as_slice().token(index)
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl<T: AsRef<str>, const N: usize> Source for [T; N] {
    fn token(&self, index: usize) -> Option<&str> {
        self[..].token(index)
    }

    fn len(&self) -> usize {
        N
    }
}

/// Get a list of all command-line arguments specified to the program with
/// the program name (the first argument) removed.
///
/// # Note
///
/// Used with [crate::App::parse_with_args()]. However, this isn't usually
/// required: just call [crate::App::parse()].
pub fn get_args() -> Vec<String> {
    env::args().skip(1).collect()
}
