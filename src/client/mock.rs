// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use super::Client;
use crate::config::ClientOptions;
use crate::http::{ApiRequest, HttpClient};

pub const TEST_TOKEN: &str = "test-token";

/// Serves canned responses by exact URL path and records every request
#[derive(Clone, Default)]
pub struct MockHttpClient {
    routes: Vec<(String, u16, String)>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_login() -> Self {
        Self::new().route(
            "/user/login",
            format!(r#"{{"token": "{TEST_TOKEN}", "uuid": "user-uuid"}}"#),
        )
    }

    pub fn route(self, path: &str, body: impl Into<String>) -> Self {
        self.route_status(path, 200, body)
    }

    /// Answer `path` with an HTTP `status` instead of 200
    pub fn route_status(mut self, path: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes.push((path.to_string(), status, body.into()));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests made after login
    pub fn api_requests(&self) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.path() != "/user/login")
            .collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.url.path() == path)
            .count()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: ApiRequest) -> Result<Bytes, reqwest::Error> {
        let path = request.url.path().to_string();
        self.requests.lock().unwrap().push(request);

        let (status, body) = self
            .routes
            .iter()
            .find(|(route, _, _)| *route == path)
            .map(|(_, status, body)| (*status, body.clone()))
            .unwrap_or_else(|| panic!("unexpected request to {path}"));

        // Same path through `error_for_status` as the real transport
        let response = http::Response::builder()
            .status(status)
            .body(body)
            .unwrap();
        let response = reqwest::Response::from(response).error_for_status()?;
        response.bytes().await
    }
}

pub fn mock_options() -> ClientOptions {
    ClientOptions::with_base("https://mock.pocketcasts.test/").unwrap()
}

pub async fn logged_in(mock: &MockHttpClient) -> Client<MockHttpClient> {
    Client::login_with(mock.clone(), mock_options(), "user@example.com", "hunter2")
        .await
        .unwrap()
}

/// Podcast detail body for `uuid` whose own uuid field differs from it
pub fn podcast_detail(uuid: &str, title: &str) -> String {
    format!(
        r#"{{
            "podcast": {{
                "uuid": "payload-{uuid}",
                "title": "{title}",
                "author": "Author of {title}",
                "description": "About {title}",
                "url": "https://example.com/{uuid}",
                "episodes": [
                    {{
                        "uuid": "{uuid}-e1",
                        "title": "First",
                        "url": "https://cdn.example.com/{uuid}/1.mp3",
                        "file_type": "audio/mpeg",
                        "file_size": 1000,
                        "duration": 600,
                        "published": "2020-01-01T10:00:00Z"
                    }},
                    {{
                        "uuid": "{uuid}-e3",
                        "title": "Third",
                        "url": "https://cdn.example.com/{uuid}/3.mp3",
                        "file_type": "audio/mpeg",
                        "file_size": "3000",
                        "duration": "1800",
                        "published": "2020-03-01T10:00:00Z"
                    }},
                    {{
                        "uuid": "{uuid}-e2",
                        "title": "Second",
                        "url": "https://cdn.example.com/{uuid}/2.mp3",
                        "file_type": "audio/mpeg",
                        "file_size": 2000,
                        "duration": 1200,
                        "published": "2020-02-01T10:00:00Z"
                    }}
                ]
            }}
        }}"#
    )
}

pub fn podcast_path(uuid: &str) -> String {
    format!("/podcast/full/{uuid}/0/3/2000")
}
