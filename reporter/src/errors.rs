// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

use crate::status::SuiteAction;

pub type Result<R> = std::result::Result<R, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error serializing JSON payload {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("I/O error when reading or writing {0}")]
    IoError(#[from] std::io::Error),
    #[error("Formatting error when writing {0}")]
    FormatError(#[from] std::fmt::Error),
    #[error("Unable to post request {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Error writing XML report {0}")]
    XmlError(#[from] quick_xml::Error),
    #[error("server did not accept {action} request: {status:?}")]
    Rejected { action: SuiteAction, status: String },
    #[error("Parser Error when parsing `{0}`")]
    ParseError(String),
    #[error("Lifecycle events out of order: {0}")]
    OrderError(String),
    #[error("{0}")]
    IllegalArguments(String),
}
