// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::process::exit;

use clap::{Arg, ArgAction};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use suite_reporter::commands::{APP_NAME, APP_VERSION, ERROR_STATUS_CODE, VERBOSE};
use suite_reporter::utils::get_reporter_commands;
use suite_reporter::utils::reader::{ReadBuffer, Reader};
use suite_reporter::utils::writer::Writer;
use suite_reporter::Error;

fn main() -> Result<(), Error> {
    let mut app = clap::Command::new(APP_NAME)
        .version(APP_VERSION)
        .about(
            r#"
  Streams the lifecycle of a test suite to a remote collector as JSON reports,
  batching per-case updates so the collector is not flooded, and optionally
  writes a JUnit XML report next to other CI artifacts."#,
        )
        .arg(
            Arg::new(VERBOSE.0)
                .long(VERBOSE.0)
                .short(VERBOSE.1)
                .help("Log debug output to stderr")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg_required_else_help(true);

    let commands = get_reporter_commands();

    let mappings = commands.iter().map(|s| (s.name(), s)).fold(
        HashMap::with_capacity(commands.len()),
        |mut map, entry| {
            map.insert(entry.0, entry.1.as_ref());
            map
        },
    );

    for each in &commands {
        app = app.subcommand(each.command());
    }

    let help = app.render_usage();
    let app = app.get_matches();

    let level = if app.get_flag(VERBOSE.0) {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("unable to initialize logging: {e}");
    }

    match app.subcommand() {
        Some((name, value)) => {
            if let Some(command) = mappings.get(name) {
                let mut output_writer = Writer::default();

                match (*command).execute(
                    value,
                    &mut output_writer,
                    &mut Reader::new(ReadBuffer::Stdin(std::io::stdin())),
                ) {
                    Err(e) => {
                        output_writer.write_err(format!("Error occurred {e}"))?;
                        exit(ERROR_STATUS_CODE);
                    }
                    Ok(code) => exit(code),
                }
            } else {
                println!("{}", help);
            }
        }
        None => {
            println!("{}", help);
        }
    }

    Ok(())
}
