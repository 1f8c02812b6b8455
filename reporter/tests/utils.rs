// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread::JoinHandle;
use std::time::Duration;

use serde_json::Value;
use suite_reporter::utils;
use suite_reporter::utils::reader::Reader;
use suite_reporter::utils::writer::Writer;

#[non_exhaustive]
pub struct StatusCode;

const REPORTER_TEST_APP_NAME: &str = "suite-reporter-test";
const RECV_TIMEOUT: Duration = Duration::from_secs(10);

#[allow(dead_code)]
impl StatusCode {
    pub const SUCCESS: i32 = 0;
    pub const INTERNAL_FAILURE: i32 = -1;
    pub const PREPROCESSOR_ERROR: i32 = -3;
    pub const PARSING_ERROR: i32 = 5;
}

#[allow(dead_code)]
pub fn get_full_path_for_resource_file(path: &str) -> String {
    let mut resource = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    resource.push(path);
    resource.display().to_string()
}

#[allow(dead_code)]
pub fn compare_write_buffer_with_string(expected_output: &str, actual_output_writer: Writer) {
    let actual_output = actual_output_writer.stripped().unwrap();
    assert_eq!(expected_output, actual_output)
}

#[macro_export]
macro_rules! assert_output_from_str_eq {
    ($expected_output: expr, $actual_output_writer: expr) => {
        $crate::utils::compare_write_buffer_with_string($expected_output, $actual_output_writer)
    };
}

pub trait CommandTestRunner {
    fn build_args(&self) -> Vec<String>;

    fn run(&self, writer: &mut Writer, reader: &mut Reader) -> i32 {
        let mut app = clap::Command::new(REPORTER_TEST_APP_NAME);

        let args = self.build_args();

        let command_options =
            args.iter()
                .fold(vec![String::from(REPORTER_TEST_APP_NAME)], |mut res, arg| {
                    res.push(arg.to_string());
                    res
                });

        let commands = utils::get_reporter_commands();

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

        let app = app.get_matches_from(command_options);

        match app.subcommand() {
            Some((name, value)) => {
                if let Some(command) = mappings.get(name) {
                    match (*command).execute(value, writer, reader) {
                        Err(e) => {
                            writer
                                .write_err(format!("Error occurred {e}"))
                                .expect("failed to write to stderr");

                            StatusCode::INTERNAL_FAILURE
                        }
                        Ok(code) => code,
                    }
                } else {
                    StatusCode::PREPROCESSOR_ERROR
                }
            }

            None => StatusCode::PREPROCESSOR_ERROR,
        }
    }
}

/// What the collector saw for one request.
#[allow(dead_code)]
#[derive(Debug)]
pub struct Received {
    pub method: String,
    pub url: String,
    pub content_type: Option<String>,
    pub body: Value,
}

/// A local collector answering each request with the next status in
/// `replies`. It stops listening once every reply has been used.
#[allow(dead_code)]
pub struct Collector {
    pub addr: SocketAddr,
    pub received: Receiver<Received>,
    handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl Collector {
    pub fn start(replies: Vec<u16>) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("failed to bind collector");
        let addr = server.server_addr();
        let (sender, received) = channel();

        let handle = std::thread::spawn(move || {
            let expected = replies.len();
            for (idx, status) in replies.into_iter().enumerate() {
                let mut request = match server.recv_timeout(RECV_TIMEOUT) {
                    Ok(Some(request)) => request,
                    Ok(None) => panic!(
                        "collector received {idx} of {expected} expected requests"
                    ),
                    Err(e) => panic!("collector failed to receive: {e}"),
                };

                let mut body = String::new();
                request
                    .as_reader()
                    .read_to_string(&mut body)
                    .expect("failed to read request body");
                let content_type = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Content-Type"))
                    .map(|h| h.value.as_str().to_string());

                let seen = Received {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    content_type,
                    body: serde_json::from_str(&body).unwrap_or(Value::Null),
                };
                request
                    .respond(tiny_http::Response::empty(tiny_http::StatusCode(status)))
                    .expect("failed to respond");

                if sender.send(seen).is_err() {
                    return;
                }
            }
        });

        Collector {
            addr,
            received,
            handle,
        }
    }

    pub fn addr(&self) -> String {
        self.addr.to_string()
    }

    /// Waits for the collector to use up its replies and returns every
    /// request it saw, in order. Fails if fewer requests arrive than replies
    /// were configured.
    pub fn finish(self) -> Vec<Received> {
        self.handle.join().expect("collector thread panicked");
        self.received.try_iter().collect()
    }
}
