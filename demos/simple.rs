// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// A simple example showing how to handle flags and options that need values.
use tabopt::{App, Arg, Handler, Result, Table};

/// The type we will use to handle CLI parsing for this program.
#[derive(Clone, Debug, Default)]
struct MyHandler {
    // Let's keep track of the number of times particular options are
    // specified on the command-line.
    d_count: usize,
    v_count: usize,

    count: Option<String>,
}

impl Handler for &mut MyHandler {
    /// Handler function for handling all CLI arguments this program supports.
    fn handle(&mut self, arg: Arg) -> Result<()> {
        println!("INFO: MyHandler: arg: {} (count: {})", arg, arg.count);

        match arg.option {
            'd' => self.d_count += 1,
            'v' => self.v_count += 1,
            'c' => self.count = arg.value,
            _ => (),
        };

        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut my_handler = MyHandler::default();

    let table = Table::new(&[
        // Support "-d" flag option (no long form).
        "d",
        // Support "-v" and "--verbose".
        "v|verbose",
        // Support "-c <n>", "-c<n>", "--count <n>" and "--count=<n>".
        "c:count n",
    ])?;

    let mut app = App::new("simple")
        .table(table)
        .handler(Box::new(&mut my_handler));

    // Parse the command-line
    let result = app.parse();

    // XXX: essential!
    drop(app);

    println!("INFO: Final value of my handler: {:?}", my_handler);

    let posn_args = result?;

    println!("INFO: positional arguments: {:?}", posn_args);

    Ok(())
}
