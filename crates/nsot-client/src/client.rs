//! Blocking NSoT client and the request pipeline behind every operation.
//!
//! Each call runs the same steps: fetch a token, build the request, send it,
//! check the HTTP status, decode the envelope and unwrap its `data`.

use crate::auth;
use nsot_core::client::ClientConfig;
use nsot_core::{Envelope, Error, NsotConfig, Result};
use reqwest::blocking::{Client, ClientBuilder, RequestBuilder, Response};
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

const USER_AGENT: &str = concat!("nsot-client/", env!("CARGO_PKG_VERSION"));

const JSON: &str = "application/json";

/// Builder for [`NsotClient`].
#[derive(Debug, Clone)]
pub struct NsotClientBuilder {
    config: NsotConfig,
    http_config: ClientConfig,
}

impl NsotClientBuilder {
    /// Create a new builder from validated connection settings.
    #[must_use]
    pub fn new(config: NsotConfig) -> Self {
        Self {
            config,
            http_config: ClientConfig::new(),
        }
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Build the client instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<NsotClient> {
        let mut builder = ClientBuilder::new()
            .timeout(self.http_config.timeout)
            .user_agent(USER_AGENT)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .connect_timeout(self.http_config.connect_timeout);

        if !self.http_config.enable_compression {
            builder = builder.no_gzip();
        }

        let http = builder
            .build()
            .map_err(|err| Error::Config(format!("Failed to build NSoT HTTP client: {err}")))?;

        Ok(NsotClient {
            http,
            config: Arc::new(self.config),
        })
    }
}

/// Blocking client for the NSoT sites and networks API.
///
/// Holds no per-call state, so clones share one connection pool and may be
/// used from several threads at once.
#[derive(Debug, Clone)]
pub struct NsotClient {
    http: Client,
    config: Arc<NsotConfig>,
}

impl NsotClient {
    /// Construct with default transport settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: NsotConfig) -> Result<Self> {
        NsotClientBuilder::new(config).build()
    }

    /// Construct from `NSOT_URL`, `NSOT_EMAIL` and `NSOT_SECRET`.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment is incomplete or invalid.
    pub fn from_env() -> Result<Self> {
        Self::new(NsotConfig::from_env()?)
    }

    /// Start a builder for custom transport settings.
    #[must_use]
    pub fn builder(config: NsotConfig) -> NsotClientBuilder {
        NsotClientBuilder::new(config)
    }

    /// Access the connection settings.
    #[must_use]
    pub fn config(&self) -> &NsotConfig {
        &self.config
    }

    /// Base URL requests are issued against, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Authenticate and assemble a request for `resource_path`.
    ///
    /// `resource_path` is appended verbatim, query string included.
    pub(crate) fn build_request<B>(
        &self,
        method: Method,
        resource_path: &str,
        body: Option<&B>,
    ) -> Result<RequestBuilder>
    where
        B: Serialize + ?Sized,
    {
        let token = auth::authenticate(&self.http, &self.config)
            .map_err(|err| err.context(format!("crafting request for `{resource_path}`")))?;

        let url = endpoint(self.config.base_url(), resource_path)?;
        let mut authorization = HeaderValue::from_str(&token.header_value(self.config.email()))
            .map_err(|err| Error::Build(format!("invalid Authorization header: {err}")))?;
        authorization.set_sensitive(true);

        let mut request = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON);

        if let Some(payload) = body {
            let text = serde_json::to_string(payload)
                .map_err(|err| Error::Build(format!("failed to serialize request body: {err}")))?;
            request = request.body(text);
        }

        Ok(request)
    }

    pub(crate) fn get_data<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.send_data::<(), R>(Method::GET, path, None)
    }

    pub(crate) fn send_data<B, R>(&self, method: Method, path: &str, body: Option<&B>) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.send(method, path, body)?;
        decode_body(path, response)
    }

    /// Send a request whose response body is not needed.
    pub(crate) fn send_empty(&self, method: Method, path: &str) -> Result<()> {
        self.send::<()>(method, path, None).map(|_| ())
    }

    fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let request = self.build_request(method.clone(), path, body)?;
        info!(%method, path, "NSoT request");
        check_response(request.send())
    }
}

/// Join the base URL and a resource path as `{base}/{path}`.
pub(crate) fn endpoint(base: &str, path: &str) -> Result<Url> {
    let raw = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&raw).map_err(|err| Error::InvalidEndpoint(format!("`{raw}`: {err}")))
}

/// Accept 200, 201 and 204; turn every other status into [`Error::Api`].
///
/// A transport failure from `send` is converted once and returned as is.
pub(crate) fn check_response(result: reqwest::Result<Response>) -> Result<Response> {
    let response = result?;
    let status = response.status();

    match status {
        StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(response),
        _ => {
            let url = response.url().path().to_string();
            let message = api_message(status, response.text().map_err(Error::from));
            warn!(status = status.as_u16(), path = %url, %message, "NSoT request failed");

            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Status line, followed by the trimmed body when there is one.
///
/// A body that cannot be read is noted in the message instead of dropped.
fn api_message(status: StatusCode, body: Result<String>) -> String {
    match body {
        Ok(text) if text.trim().is_empty() => status.to_string(),
        Ok(text) => format!("{status}: {}", text.trim()),
        Err(err) => format!("{status} (body unreadable: {err})"),
    }
}

/// Read the whole body and unwrap its envelope into `R`.
pub(crate) fn decode_body<R>(path: &str, response: Response) -> Result<R>
where
    R: DeserializeOwned,
{
    let bytes = response.bytes().map_err(|err| {
        Error::Decode(format!("Failed to read NSoT response body for `{path}`: {err}"))
    })?;
    decode_envelope(path, &bytes)
}

/// Decode the envelope, check its status, then decode `data` into `R`.
///
/// A non-`ok` status is reported as [`Error::Domain`] whatever shape the
/// payload has.
pub(crate) fn decode_envelope<R>(path: &str, bytes: &[u8]) -> Result<R>
where
    R: DeserializeOwned,
{
    let envelope: Envelope = serde_json::from_slice(bytes).map_err(|err| {
        Error::Decode(format!("Failed to parse NSoT response for `{path}`: {err}"))
    })?;

    envelope.into_data().map_err(|err| match err {
        Error::Decode(reason) => {
            Error::Decode(format!("Unexpected NSoT payload for `{path}`: {reason}"))
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SitePayload;
    use nsot_core::{AuthFailure, SiteId};
    use serde_json::{json, Value};
    use std::net::TcpListener;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const EMAIL: &str = "admin@example.com";

    // reqwest's blocking client owns a runtime, so it is built, used and
    // dropped on the blocking pool rather than on the test's async thread.
    async fn with_client<T, F>(server: &MockServer, f: F) -> T
    where
        F: FnOnce(&NsotClient) -> T + Send + 'static,
        T: Send + 'static,
    {
        let uri = server.uri();
        tokio::task::spawn_blocking(move || {
            let config = NsotConfig::new(uri, EMAIL, "s3cret").unwrap();
            f(&NsotClient::new(config).unwrap())
        })
        .await
        .unwrap()
    }

    /// Address nothing is listening on.
    fn closed_port_uri() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    async fn mount_auth(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/authenticate/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "data": { "auth_token": "tok123" }
            })))
            .mount(server)
            .await;
    }

    async fn raw_status(server: &MockServer, status: u16) -> Result<Response> {
        Mock::given(method("GET"))
            .and(path(format!("/status/{status}").as_str()))
            .respond_with(ResponseTemplate::new(status).set_body_string("boom"))
            .mount(server)
            .await;

        let url = format!("{}/status/{status}", server.uri());
        tokio::task::spawn_blocking(move || check_response(Client::new().get(url).send()))
            .await
            .unwrap()
    }

    #[test]
    fn endpoint_joins_with_single_slash() {
        let url = endpoint("http://nsot.local/api/", "/sites/").unwrap();
        assert_eq!(url.as_str(), "http://nsot.local/api/sites/");

        let url = endpoint("http://nsot.local", "networks/?network_address=10.0.0.0/24").unwrap();
        assert_eq!(url.path(), "/networks/");
        assert_eq!(url.query(), Some("network_address=10.0.0.0/24"));
    }

    #[test]
    fn endpoint_rejects_garbage_base() {
        let err = endpoint("nsot.local", "sites/").unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[tokio::test]
    async fn check_response_accepts_success_statuses() {
        let server = MockServer::start().await;
        for status in [200_u16, 201, 204] {
            let response = raw_status(&server, status).await.unwrap();
            assert_eq!(response.status().as_u16(), status);
        }
    }

    #[tokio::test]
    async fn check_response_rejects_other_statuses() {
        let server = MockServer::start().await;
        for status in [400_u16, 404, 500] {
            let err = raw_status(&server, status).await.unwrap_err();
            match &err {
                Error::Api { status: code, message } => {
                    assert_eq!(*code, status);
                    assert!(message.starts_with(&status.to_string()), "{message}");
                    assert!(message.ends_with("boom"), "{message}");
                }
                other => panic!("unexpected error for {status}: {other:?}"),
            }
            assert!(err.to_string().contains(&status.to_string()));
        }
    }

    #[test]
    fn check_response_passes_transport_errors_through() {
        let url = format!("{}/gone", closed_port_uri());
        let err = check_response(Client::new().get(url).send()).unwrap_err();
        assert!(matches!(err, Error::Transport(_) | Error::Timeout(_)), "{err:?}");
    }

    #[test]
    fn api_message_keeps_unreadable_body_reason() {
        assert_eq!(
            api_message(StatusCode::NOT_FOUND, Ok(" \n".to_string())),
            "404 Not Found"
        );
        assert_eq!(
            api_message(StatusCode::BAD_REQUEST, Ok(" bad name\n".to_string())),
            "400 Bad Request: bad name"
        );

        let message = api_message(
            StatusCode::BAD_GATEWAY,
            Err(Error::Transport("connection reset".to_string())),
        );
        assert!(message.starts_with("502 Bad Gateway (body unreadable:"), "{message}");
        assert!(message.contains("connection reset"), "{message}");
    }

    #[test]
    fn error_envelope_without_data_is_domain_error() {
        let bytes = include_bytes!("../tests/fixtures/error_no_data.json");
        let err = decode_envelope::<SitePayload>("sites/9/", bytes).unwrap_err();
        assert_eq!(err, Error::Domain("error".to_string()));
    }

    #[test]
    fn error_envelope_with_null_data_is_domain_error() {
        let bytes = include_bytes!("../tests/fixtures/error_envelope.json");
        let err = decode_envelope::<SitePayload>("sites/9/", bytes).unwrap_err();
        assert_eq!(err, Error::Domain("error".to_string()));
    }

    #[test]
    fn ok_envelope_decodes_typed_payload() {
        let bytes = include_bytes!("../tests/fixtures/site_detail.json");
        let payload = decode_envelope::<SitePayload>("sites/1/", bytes).unwrap();
        assert_eq!(payload.site.id, SiteId::new(1));

        let err = decode_envelope::<SitePayload>("sites/1/", br#"{"status":"ok"}"#).unwrap_err();
        match err {
            Error::Decode(message) => assert!(message.contains("`sites/1/`"), "{message}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn requests_carry_token_and_json_headers() {
        let server = MockServer::start().await;
        mount_auth(&server).await;
        Mock::given(method("GET"))
            .and(path("/sites/"))
            .and(query_param("name", "edge"))
            .and(header("Authorization", "AuthToken admin@example.com:tok123"))
            .and(header("Content-Type", "application/json"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "data": { "sites": [] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let data = with_client(&server, |client| {
            client.get_data::<Value>("sites/?name=edge")
        })
        .await
        .unwrap();
        assert_eq!(data, json!({ "sites": [] }));
    }

    #[tokio::test]
    async fn domain_status_is_not_a_transport_error() {
        let server = MockServer::start().await;
        mount_auth(&server).await;
        Mock::given(method("GET"))
            .and(path("/sites/3/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "error",
                "error": { "code": 400, "message": "nope" }
            })))
            .mount(&server)
            .await;

        let err = with_client(&server, |client| client.get_data::<SitePayload>("sites/3/"))
            .await
            .unwrap_err();
        assert_eq!(err, Error::Domain("error".to_string()));
    }

    #[tokio::test]
    async fn malformed_json_is_decode_error() {
        let server = MockServer::start().await;
        mount_auth(&server).await;
        Mock::given(method("GET"))
            .and(path("/sites/3/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = with_client(&server, |client| client.get_data::<Value>("sites/3/"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn auth_failure_is_wrapped_with_request_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/authenticate/"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = with_client(&server, |client| {
            client
                .build_request::<()>(Method::GET, "sites/", None)
                .map(|_| ())
        })
        .await
        .unwrap_err();

        assert!(err.to_string().starts_with("crafting request for `sites/`"));
        assert!(matches!(
            err.root_cause(),
            Error::Auth(AuthFailure::UnexpectedStatus(_))
        ));
    }

    #[test]
    fn builder_accepts_custom_transport() {
        let config = NsotConfig::new("http://nsot.local/api/", EMAIL, "s3cret").unwrap();
        let client = NsotClient::builder(config)
            .with_http_config(ClientConfig::new().without_timeout().with_compression(false))
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://nsot.local/api");
        assert_eq!(client.config().email(), EMAIL);
    }
}
