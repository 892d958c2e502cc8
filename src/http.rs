// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::error::Error;

/// How a request is sent to the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    /// Plain `GET` without a body
    Get,
    /// `POST` with a JSON body
    Json,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Json => "JSON",
        }
    }
}

impl FromStr for RequestMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Self::Get),
            "JSON" => Ok(Self::Json),
            other => Err(Error::InvalidArgument(format!(
                "unknown request method '{other}'"
            ))),
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built API request, ready to be handed to an [`HttpClient`]
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    pub method: RequestMethod,
    pub url: Url,
    /// Bearer token for the `Authorization` header
    pub bearer: Option<String>,
    /// JSON body, only set for [`RequestMethod::Json`]
    pub body: Option<serde_json::Value>,
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .field("body", &self.body.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

/// HTTP client abstraction for testability
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send the request and return the whole response body.
    ///
    /// Non-success HTTP statuses are reported as errors.
    async fn execute(&self, request: ApiRequest) -> Result<Bytes, reqwest::Error>;
}

/// Default HTTP client implementation using reqwest
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new ReqwestClient with default settings
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a new ReqwestClient with a custom reqwest::Client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn execute(&self, request: ApiRequest) -> Result<Bytes, reqwest::Error> {
        let mut builder = match request.method {
            RequestMethod::Get => self.client.get(request.url),
            RequestMethod::Json => {
                let body = request
                    .body
                    .unwrap_or_else(|| serde_json::Value::Object(Default::default()));
                self.client.post(request.url).json(&body)
            }
        };

        if let Some(token) = request.bearer {
            builder = builder.bearer_auth(token);
        }

        builder.send().await?.error_for_status()?.bytes().await
    }
}
