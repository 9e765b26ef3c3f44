// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// An example driving the parser directly to handle options with
/// several values.
use tabopt::{Match, Parser, Result, Table};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let table = Table::new(&[
        "g+groups group",
        "z*zones zone",
        "x|extra",
        // Hidden, long-only option.
        "- |secret",
    ])?;

    println!("INFO: visible options:");

    for def in table.visible() {
        println!("INFO:     {} <{}> ({:?})", def, def.value_name(), def.needs());
    }

    let args = tabopt::get_args();

    let mut parser = Parser::new(&table, &args);
    let mut groups = Vec::<String>::new();

    loop {
        match parser.next_match() {
            Ok(Match::Opt(opt)) if opt.option == 'g' => groups.extend(opt.value),
            Ok(Match::Opt(opt)) => println!("INFO: option: {:?}", opt),
            Ok(Match::End(i)) => {
                println!("INFO: positional arguments: {:?}", &args[i..]);
                break;
            }
            Err(e) => println!("ERROR: {}", e),
        }
    }

    println!("INFO: groups: {:?}", groups);

    Ok(())
}
