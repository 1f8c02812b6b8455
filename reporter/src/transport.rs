// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use crate::errors::{Error, Result};
use crate::status::SuiteMessage;

pub const REPORT_PATH: &str = "report-suite";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Delivers a serialized envelope to the collector and hands back the
/// response status. Response bodies are never inspected.
pub trait Transport {
    fn post(&mut self, body: Vec<u8>) -> Result<StatusCode>;
}

/// POSTs JSON to `http://<addr>/report-suite`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(addr: &str, timeout: Duration) -> Result<Self> {
        if addr.trim().is_empty() {
            return Err(Error::IllegalArguments(
                "a collector address in host:port form is required".to_string(),
            ));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(HttpTransport {
            client,
            url: format!("http://{addr}/{REPORT_PATH}"),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for HttpTransport {
    fn post(&mut self, body: Vec<u8>) -> Result<StatusCode> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;

        Ok(response.status())
    }
}

/// Serializes `message`, sends it, and succeeds only when the collector
/// answered OK, Created or Accepted.
pub fn deliver<T: Transport + ?Sized>(transport: &mut T, message: &SuiteMessage<'_>) -> Result<()> {
    let body = serde_json::to_vec(message)?;
    let status = transport.post(body)?;

    match status {
        StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED => Ok(()),
        status => Err(Error::Rejected {
            action: message.action,
            status: status.to_string(),
        }),
    }
}
