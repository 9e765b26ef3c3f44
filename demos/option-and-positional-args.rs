// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// An example showing how to handle positional arguments and options.
use tabopt::{App, Arg, Handler, Result, Table};

#[derive(Clone, Debug, Default)]
struct PositionalHandler {
    debug: bool,
    count: usize,
}

impl Handler for &mut PositionalHandler {
    fn handle(&mut self, arg: Arg) -> Result<()> {
        println!("INFO: PositionalHandler: arg: {:?}", arg);

        match arg.option {
            'd' => self.debug = true,
            'c' => {
                let value = arg.value.unwrap_or_default();

                self.count = value
                    .parse()
                    .map_err(|e| tabopt::Error::HandlerError(format!("{:?}: {}", value, e)))?;
            }
            _ => (),
        };

        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut posn_handler = PositionalHandler::default();

    let table = Table::new(&["d|debug", "c:count n"])?;

    let mut app = App::new("option-and-positional-args")
        .table(table)
        .handler(Box::new(&mut posn_handler));

    // Parse the command-line
    let posn_args = app.parse()?;

    // XXX: essential!
    drop(app);

    println!("INFO: Final value of handler: {:?}", posn_handler);

    for (i, posn) in posn_args.iter().enumerate() {
        println!("INFO: positional argument {}: {:?}", i + 1, posn);
    }

    Ok(())
}
