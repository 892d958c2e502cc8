// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod catalog;
mod library;
mod sync;

#[cfg(test)]
mod mock;

use log::{debug, info, trace};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use url::Url;

use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::http::{ApiRequest, HttpClient, ReqwestClient, RequestMethod};

/// Protocol version sent in every JSON body as `v`
const PROTOCOL_VERSION: u32 = 1;

/// An authenticated Pocket Casts session
///
/// A client is created by logging in and holds the bearer token for its
/// whole lifetime. There is no token refresh: once the token expires, calls
/// fail with [`Error::Transport`].
///
/// Every method issues its requests one after another and only returns once
/// all of them completed. Nothing is cached between calls.
pub struct Client<C: HttpClient = ReqwestClient> {
    http: C,
    options: ClientOptions,
    token: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
}

impl Client<ReqwestClient> {
    /// Log in against the production service
    pub async fn login(email: &str, password: &str) -> Result<Self> {
        Self::login_with(ReqwestClient::new(), ClientOptions::default(), email, password).await
    }
}

impl<C: HttpClient> Client<C> {
    /// Log in using a custom transport and set of hosts
    ///
    /// Fails with [`Error::Authentication`] when the server refuses the
    /// credentials or answers without a token. Connection failures are
    /// reported as [`Error::Transport`].
    pub async fn login_with(
        http: C,
        options: ClientOptions,
        email: &str,
        password: &str,
    ) -> Result<Self> {
        let mut client = Self {
            http,
            options,
            token: String::new(),
        };

        client.authenticate(email, password).await?;
        Ok(client)
    }

    async fn authenticate(&mut self, email: &str, password: &str) -> Result<()> {
        let url = self.api_url("user/login")?;
        let body = json!({ "email": email, "password": password });

        let response = match self
            .request::<LoginResponse>(RequestMethod::Json, url, Some(body))
            .await
        {
            Ok(response) => response,
            Err(Error::Transport(e)) if e.status().is_some() => {
                return Err(Error::Authentication(e.to_string()));
            }
            Err(Error::Decode { source, .. }) => {
                return Err(Error::Authentication(format!(
                    "unreadable login response: {source}"
                )));
            }
            Err(e) => return Err(e),
        };

        match response.token.filter(|token| !token.is_empty()) {
            Some(token) => {
                info!("Logged in as {email}");
                self.token = token;
                Ok(())
            }
            None => Err(Error::Authentication(
                "no token in login response".to_string(),
            )),
        }
    }

    /// The bearer token obtained at login
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The hosts this client talks to
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Build a request for `url`
    ///
    /// The bearer token is attached once logged in. JSON requests always
    /// carry `v: 1`; a payload that is not a JSON object is replaced by an
    /// empty one.
    pub fn build_request(
        &self,
        method: RequestMethod,
        url: Url,
        payload: Option<Value>,
    ) -> ApiRequest {
        let bearer = Some(self.token.clone()).filter(|token| !token.is_empty());

        let body = match method {
            RequestMethod::Get => None,
            RequestMethod::Json => {
                let mut body = match payload {
                    Some(Value::Object(map)) => map,
                    _ => Map::new(),
                };
                body.insert("v".to_string(), Value::from(PROTOCOL_VERSION));
                Some(Value::Object(body))
            }
        };

        ApiRequest {
            method,
            url,
            bearer,
            body,
        }
    }

    /// Send a request and decode the JSON response into `T`
    ///
    /// This is the building block of all endpoint methods and can be used
    /// for endpoints that have no dedicated method.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: RequestMethod,
        url: Url,
        payload: Option<Value>,
    ) -> Result<T> {
        let url_str = url.to_string();
        let bytes = self.execute(method, url, payload).await?;

        serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
            url: url_str,
            source,
        })
    }

    /// Send a request whose response body carries nothing to check
    async fn send(&self, method: RequestMethod, url: Url, payload: Option<Value>) -> Result<()> {
        self.execute(method, url, payload).await.map(drop)
    }

    async fn execute(
        &self,
        method: RequestMethod,
        url: Url,
        payload: Option<Value>,
    ) -> Result<bytes::Bytes> {
        let request = self.build_request(method, url, payload);
        debug!("{} {}", request.method, request.url);

        let url = request.url.clone();
        let bytes = self.http.execute(request).await?;
        trace!("{url}: {} bytes", bytes.len());

        Ok(bytes)
    }

    fn api_url(&self, path: &str) -> Result<Url> {
        Ok(self.options.api_base.join(path)?)
    }

    fn lists_url(&self, path: &str) -> Result<Url> {
        Ok(self.options.lists_base.join(path)?)
    }

    fn podcast_api_url(&self, path: &str) -> Result<Url> {
        Ok(self.options.podcast_api_base.join(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{MockHttpClient, TEST_TOKEN, logged_in, mock_options};
    use super::*;

    #[tokio::test]
    async fn login_stores_token() {
        let mock = MockHttpClient::with_login();
        let client = logged_in(&mock).await;

        assert_eq!(client.token(), TEST_TOKEN);
        assert!(!client.token().is_empty());
    }

    #[tokio::test]
    async fn login_sends_credentials_without_bearer() {
        let mock = MockHttpClient::with_login();
        let _client = logged_in(&mock).await;

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);

        let login = &requests[0];
        assert_eq!(login.method, RequestMethod::Json);
        assert_eq!(login.url.path(), "/user/login");
        assert!(login.bearer.is_none());

        let body = login.body.as_ref().unwrap();
        assert_eq!(body["email"], "user@example.com");
        assert_eq!(body["password"], "hunter2");
        assert_eq!(body["v"], 1);
    }

    #[tokio::test]
    async fn login_without_token_fails() {
        let mock = MockHttpClient::new().route("/user/login", r#"{"errorMessage": "bad"}"#);

        let result =
            Client::login_with(mock.clone(), mock_options(), "user@example.com", "wrong").await;

        assert!(matches!(result, Err(Error::Authentication(_))));
    }

    #[tokio::test]
    async fn login_with_empty_token_fails() {
        let mock = MockHttpClient::new().route("/user/login", r#"{"token": ""}"#);

        let result =
            Client::login_with(mock.clone(), mock_options(), "user@example.com", "wrong").await;

        assert!(matches!(result, Err(Error::Authentication(_))));
    }

    #[tokio::test]
    async fn login_with_garbage_response_fails() {
        let mock = MockHttpClient::new().route("/user/login", "<html>oops</html>");

        let result =
            Client::login_with(mock.clone(), mock_options(), "user@example.com", "hunter2").await;

        assert!(matches!(result, Err(Error::Authentication(_))));
    }

    #[tokio::test]
    async fn build_request_attaches_bearer_and_version() {
        let mock = MockHttpClient::with_login();
        let client = logged_in(&mock).await;
        let url = Url::parse("https://api.pocketcasts.com/user/starred").unwrap();

        let request = client.build_request(RequestMethod::Json, url, Some(json!({"a": 1})));

        assert_eq!(request.bearer.as_deref(), Some(TEST_TOKEN));
        assert_eq!(request.body, Some(json!({"a": 1, "v": 1})));
    }

    #[tokio::test]
    async fn build_request_replaces_non_object_payload() {
        let mock = MockHttpClient::with_login();
        let client = logged_in(&mock).await;
        let url = Url::parse("https://api.pocketcasts.com/user/starred").unwrap();

        let request = client.build_request(RequestMethod::Json, url, Some(json!([1, 2])));

        assert_eq!(request.body, Some(json!({"v": 1})));
    }

    #[tokio::test]
    async fn build_request_get_has_no_body() {
        let mock = MockHttpClient::with_login();
        let client = logged_in(&mock).await;
        let url = Url::parse("https://lists.pocketcasts.com/popular.json").unwrap();

        let request = client.build_request(RequestMethod::Get, url, Some(json!({"a": 1})));

        assert!(request.body.is_none());
        assert_eq!(request.bearer.as_deref(), Some(TEST_TOKEN));
    }

    #[tokio::test]
    async fn invalid_method_selector_sends_nothing() {
        let mock = MockHttpClient::with_login();
        let client = logged_in(&mock).await;
        let before = mock.requests().len();

        let url = client.api_url("user/starred").unwrap();
        let result = match "PATCH".parse::<RequestMethod>() {
            Ok(method) => client.request::<Value>(method, url, None).await,
            Err(e) => Err(e),
        };

        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert_eq!(mock.requests().len(), before);
    }

    #[tokio::test]
    async fn request_reports_decode_errors_with_url() {
        let mock = MockHttpClient::with_login().route("/user/starred", "not json");
        let client = logged_in(&mock).await;

        let result = client
            .request::<Value>(
                RequestMethod::Json,
                client.api_url("user/starred").unwrap(),
                None,
            )
            .await;

        match result {
            Err(Error::Decode { url, .. }) => assert!(url.ends_with("/user/starred")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_refused_with_status_is_an_authentication_error() {
        let mock = MockHttpClient::new().route_status(
            "/user/login",
            401,
            r#"{"errorMessage": "Incorrect email or password"}"#,
        );

        let result =
            Client::login_with(mock.clone(), mock_options(), "user@example.com", "wrong").await;

        assert!(matches!(result, Err(Error::Authentication(_))));
    }

    #[tokio::test]
    async fn expired_token_is_a_transport_error() {
        let mock = MockHttpClient::with_login().route_status("/user/starred", 401, "");
        let client = logged_in(&mock).await;

        let result = client
            .request::<Value>(
                RequestMethod::Json,
                client.api_url("user/starred").unwrap(),
                None,
            )
            .await;

        match result {
            Err(Error::Transport(e)) => {
                assert_eq!(e.status().map(|s| s.as_u16()), Some(401));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
