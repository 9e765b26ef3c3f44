// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

#![deny(missing_docs)]
#![forbid(unsafe_code)]

//! Table-driven, `getopt`-style parsing of command-line arguments.
//!
//! If you want lots of extra features, you should consider the excellent
//! [`clap`](https://crates.io/crates/clap) crate instead.
//!
//! ---
//!
//! Table of contents:
//!
//! * [Overview](#overview)
//! * [Option descriptors](#option-descriptors)
//! * [Quickstart](#quickstart)
//! * [Details](#details)
//! * [Logging](#logging)
//! * [Limitations](#limitations)
//!
//! ---
//!
//! # Overview
//!
//! Options are declared as a list of compact descriptor strings which are
//! compiled once into a [Table]. A [Parser] then matches command-line tokens
//! against the table one option at a time, in order, and reports where the
//! positional arguments start.
//!
//! For a callback style interface, an [App] drives the [Parser] and calls a
//! [Handler] for every option found.
//!
//! # Option descriptors
//!
//! ```text
//! [-]<short>[<policy>[<long>[ <value name>]]]
//! ```
//!
//! - A leading `-` hides the option from usage output
//!   (see [Table::visible()]). Hidden options are still matched.
//! - `<short>` is the short option character. Use a space (or any other
//!   whitespace or control character) for an option with no short form.
//! - `<policy>` specifies the option's value (see [Need]):
//!
//!   | Character | [Need]               | Example command lines                |
//!   |-----------|----------------------|--------------------------------------|
//!   | `\|`      | [Need::Nothing]      | `-v`, `--verbose`                    |
//!   | `?`       | [Need::Optional]     | `-s`, `-s10`, `--size=10`            |
//!   | `:`       | [Need::Argument]     | `-c 5`, `-c5`, `--count 5`, `--count=5` |
//!   | `*`       | [Need::ZeroOrMore]   | `-z`, `-z a b`                       |
//!   | `+`       | [Need::OneOrMore]    | `-g a b`, `-ga b`, `--groups=a b`    |
//!
//!   If the descriptor stops after the short option, the option is a flag
//!   with no long form.
//! - `<long>` is the long option name: it may be abbreviated on the
//!   command line to any unambiguous prefix and is matched ignoring case.
//! - `<value name>` is the name of the value in usage output
//!   (default: [DEFAULT_VALUE_NAME]).
//!
//! # Quickstart
//!
//! ```rust
//! use tabopt::{Match, Parser, Result, Table};
//!
//! fn main() -> Result<()> {
//!     let table = Table::new(&[
//!         "v|verbose",
//!         "c:count n",
//!         "g+groups group",
//!         "- |debug",
//!     ])?;
//!
//!     let args = ["-vc3", "--gro", "wheel", "adm", "--", "-file-"];
//!
//!     let mut parser = Parser::new(&table, &args);
//!
//!     loop {
//!         match parser.next_match()? {
//!             Match::Opt(opt) => println!("{:?} {:?}", opt.option, opt.value),
//!             Match::End(i) => {
//!                 assert_eq!(&args[i..], &["-file-"]);
//!                 break;
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! Or, with a handler:
//!
//! ```rust
//! use tabopt::{App, Arg, Handler, Result, Table};
//!
//! #[derive(Clone, Debug, Default)]
//! struct MyHandler {
//!     verbose: usize,
//!     groups: Vec<String>,
//! }
//!
//! impl Handler for &mut MyHandler {
//!     fn handle(&mut self, arg: Arg) -> Result<()> {
//!         match arg.option {
//!             'v' => self.verbose += 1,
//!             'g' => self.groups.extend(arg.value),
//!             _ => (),
//!         }
//!
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let mut handler = MyHandler::default();
//!
//!     let mut app = App::new("my app")
//!         .table(Table::new(&["v|verbose", "g+groups"])?)
//!         .handler(Box::new(&mut handler));
//!
//!     let cli_args = vec!["-vv", "-g", "a", "b", "--", "file"];
//!
//!     let posn_args = app.parse_with_args(cli_args.iter().map(|a| a.to_string()).collect())?;
//!
//!     // Return ownership of the handler.
//!     drop(app);
//!
//!     assert_eq!(posn_args, vec!["file".to_string()]);
//!     assert_eq!(handler.verbose, 2);
//!     assert_eq!(handler.groups, vec!["a".to_string(), "b".to_string()]);
//!
//!     Ok(())
//! }
//! ```
//!
//! For further examples, try out the programs in the `demos/` directory:
//!
//! ```bash
//! $ cargo run --example simple -- -d -c 3 --verb -dd
//! $ cargo run --example multi-values -- -g wheel adm -x --groups=audio video -- file
//! $ cargo run --example option-and-positional-args -- -d --count=7 "posn 1" "posn 2"
//! $ RUST_LOG=tabopt=trace cargo run --example error-handler -- -aeiou -x --bogus
//! ```
//!
//! # Details
//!
//! > **Note:** For further details, see `getopt(3)` and `getopt_long(3)`.
//!
//! - Arguments are matched strictly in order and never permuted: the first
//!   argument that is not an option ends option processing.
//! - The special argument `--` ends option processing and is consumed: all
//!   arguments that follow are positional, even if they start with a dash.
//! - A lone `-` is a positional argument (conventionally "standard input").
//! - Flags can be bundled: `-abc` is the same as `-a -b -c`.
//! - If a short option takes a value, the rest of a bundle is the value:
//!   `-c5` and `-ac5` both give `c` the value `5`.
//! - A value for a [Need::Argument] option can be the next argument,
//!   provided that argument isn't itself an option (see
//!   [Table::looks_like_option()]). So `-c -5` works, but `-c -v` reports
//!   [Error::MissingOptArg] when `-v` is an option.
//! - An optional value must be in the same argument as its option: `-s-1`
//!   gives `s` the value `-1`, whereas `-s -1` does not.
//! - A long option value is either the next argument or is specified after
//!   an `=`: `--count=5`. Note that `--count5` is _not_ supported.
//! - A multi-valued option takes every following argument up to the first
//!   one that starts with a dash (a lone `-` is still a value). Each value
//!   is reported as a separate match, so these are equivalent:
//!
//!   ```bash
//!   $ prog -g a b -x
//!   $ prog -ga b -x
//!   $ prog --groups=a b -x
//!   ```
//! - Parse errors do not stop the [Parser]; the offending argument is
//!   skipped and the next call carries on.
//!
//! # Logging
//!
//! The crate logs using the [`tracing`](https://crates.io/crates/tracing)
//! facade (table compilation and options handled by [App] at `debug`,
//! argument classification at `trace`). Nothing is logged unless the
//! program installs a subscriber.
//!
//! # Limitations
//!
//! - Usage statements are not generated. [Table::visible()] provides the
//!   options a usage statement should show.
//! - Options cannot be marked as mandatory: check in your handler.

mod args;
mod error;
mod parser;
mod source;
mod table;

pub use error::{Error, Result};

pub use args::{App, Arg, Handler, Settings};
pub use parser::{Match, Opt, ParseState, Parser};
pub use source::{get_args, Source};
pub use table::{is_printable, Need, OptionDefinition, Table, DEFAULT_VALUE_NAME};
