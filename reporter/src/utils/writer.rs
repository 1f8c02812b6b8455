// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::io::{Stderr, Stdout, Write};
use std::string::FromUtf8Error;

/// Regular output plus a side channel for diagnostics.
pub struct Writer {
    buffer: WriteBuffer,
    err: WriteBuffer,
}

impl Default for Writer {
    fn default() -> Self {
        Writer::new(
            WriteBuffer::Stdout(std::io::stdout()),
            WriteBuffer::Stderr(std::io::stderr()),
        )
    }
}

impl Writer {
    pub fn new(buffer: WriteBuffer, err: WriteBuffer) -> Self {
        Self { buffer, err }
    }

    /// Captures both channels in memory.
    pub fn in_memory() -> Self {
        Writer::new(WriteBuffer::Vec(vec![]), WriteBuffer::Vec(vec![]))
    }

    /// Writes one line to the diagnostics channel.
    pub fn write_err(&mut self, line: String) -> std::io::Result<()> {
        writeln!(self.err, "{line}")
    }

    pub fn into_string(self) -> Result<String, FromUtf8Error> {
        self.buffer.into_string()
    }

    pub fn stripped(self) -> Result<String, FromUtf8Error> {
        self.buffer.stripped()
    }

    pub fn err_to_stripped(self) -> Result<String, FromUtf8Error> {
        self.err.stripped()
    }
}

impl Write for Writer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.buffer.flush()
    }
}

pub enum WriteBuffer {
    Stdout(Stdout),
    Stderr(Stderr),
    Vec(Vec<u8>),
}

impl WriteBuffer {
    fn contents(self) -> Vec<u8> {
        match self {
            WriteBuffer::Stdout(..) | WriteBuffer::Stderr(..) => vec![],
            WriteBuffer::Vec(vec) => vec,
        }
    }

    fn into_string(self) -> Result<String, FromUtf8Error> {
        String::from_utf8(self.contents())
    }

    fn stripped(self) -> Result<String, FromUtf8Error> {
        String::from_utf8(strip_ansi_escapes::strip(self.contents()).unwrap_or_default())
    }
}

impl Write for WriteBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            WriteBuffer::Stdout(stdout) => stdout.write(buf),
            WriteBuffer::Stderr(stderr) => stderr.write(buf),
            WriteBuffer::Vec(vec) => vec.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            WriteBuffer::Stdout(stdout) => stdout.flush(),
            WriteBuffer::Stderr(stderr) => stderr.flush(),
            WriteBuffer::Vec(vec) => vec.flush(),
        }
    }
}
