// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// An example showing how to return an error from the handler and how
/// to count parse errors rather than stopping at the first.
use tabopt::{App, Arg, Error, Handler, Result, Table};

/// The type we will use to handle CLI parsing for this program.
#[derive(Clone, Debug, Default)]
struct MyHandler {}

impl Handler for &mut MyHandler {
    /// Handler function for handling all CLI arguments this program supports.
    ///
    /// The handler must return `Ok(())` on success, or one of the crates
    /// Error::* values on error. If the parsing errors defined are not
    /// appropriate, use `Error::HandlerError(string)` to return a more
    /// specific handler error.
    fn handle(&mut self, arg: Arg) -> Result<()> {
        match arg.option {
            // Only accept each vowel once.
            'a' | 'e' | 'i' | 'o' | 'u' if arg.count == 1 => Ok(()),

            // Reject repeats.
            _ => Err(Error::HandlerError(format!(
                "option {:?} specified {} times",
                arg.option, arg.count
            ))),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut my_handler = MyHandler::default();

    let table = Table::new(&["a", "e", "i", "o", "u"])?;

    // Unknown options are logged and counted.
    let mut app = App::new("error-handler")
        .table(table)
        .keep_going()
        .handler(Box::new(&mut my_handler));

    // Parse the command-line
    app.parse().map(|_| ())
}
