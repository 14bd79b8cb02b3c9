//! `MovieClient` - letflix backend client implementation.

use std::convert::identity;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::api::LocalMovieApi;
use crate::error::{ApiResult, RequestFailed};
use crate::path::build_path;
use crate::token::{MemoryTokenStore, TokenStore};
use crate::types::{
    Credentials, Director, FavoriteEntry, Genre, LoginResponse, MessageResponse, Movie,
    Registration, User, UserUpdate,
};

/// Default base URL of the letflix backend.
pub const DEFAULT_BASE_URL: &str = "https://letflixnow.netlify.app/";

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Whether an endpoint expects the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    /// Sent without credentials.
    None,
    /// Sent with `Authorization: Bearer <token>` when a token is stored.
    Bearer,
}

/// letflix backend client.
///
/// Holds no mutable state of its own. The bearer token is read from the
/// configured [`TokenStore`] on every authorized call.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct MovieClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests (always ends with `/`).
    base_url: Url,
    /// Source of the bearer token.
    token_store: Arc<dyn TokenStore>,
}

/// Builder for `MovieClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct MovieClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    token_store: Option<Arc<dyn TokenStore>>,
    timeout: Option<Duration>,
}

impl MovieClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            token_store: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the token store (default: an empty in-memory store).
    #[must_use]
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Sets the per-request timeout (default: 30s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<MovieClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let mut base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };
        // Relative joins replace the last path segment unless it ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let token_store = self
            .token_store
            .unwrap_or_else(|| Arc::new(MemoryTokenStore::new()));

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(MovieClient {
            http_client,
            base_url,
            token_store,
        })
    }
}

impl MovieClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> MovieClientBuilder {
        MovieClientBuilder::new()
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends one request and decodes the JSON reply.
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        auth: Auth,
        prepare: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> ApiResult<T> {
        let result = self
            .request(method.clone(), segments, auth, prepare)
            .await
            .and_then(|body| decode_body(&body));
        collapse(&method, segments, result)
    }

    /// Sends one request whose reply may be a JSON object or plain text.
    async fn send_message(
        &self,
        method: Method,
        segments: &[&str],
        auth: Auth,
        prepare: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> ApiResult<MessageResponse> {
        let result = self
            .request(method.clone(), segments, auth, prepare)
            .await
            .map(|body| decode_message(&body));
        collapse(&method, segments, result)
    }

    /// Performs the HTTP round-trip and returns the body of a 2xx reply.
    async fn request(
        &self,
        method: Method,
        segments: &[&str],
        auth: Auth,
        prepare: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<String> {
        let path = build_path(segments)?;
        let url = self
            .base_url
            .join(&path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let mut builder = prepare(self.http_client.request(method, url));
        if auth == Auth::Bearer {
            if let Some(token) = self.token_store.token() {
                builder = builder.bearer_auth(token);
            } else {
                tracing::warn!(path = %path, "No session token stored; sending request unauthenticated");
            }
        }
        let request = builder
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(method = %request.method(), url = %request.url(), "letflix API request");

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            bail!("letflix API error (HTTP {status}): {body}");
        }

        response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))
    }
}

/// Logs the cause of a failed request and replaces it with `RequestFailed`.
fn collapse<T>(method: &Method, segments: &[&str], result: Result<T>) -> ApiResult<T> {
    result.map_err(|err| {
        tracing::error!(method = %method, path = ?segments, "letflix API request failed: {err:#}");
        RequestFailed
    })
}

/// Decodes a JSON body, treating an empty body as `{}`.
fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    let raw_result: std::result::Result<T, _> = serde_json::from_str(body);
    raw_result.context("failed to decode JSON response")
}

/// Decodes a reply that is a JSON object, a JSON string, or plain text.
fn decode_message(body: &str) -> MessageResponse {
    if let Ok(message) = decode_body::<MessageResponse>(body) {
        return message;
    }
    let text = serde_json::from_str::<String>(body).unwrap_or_else(|_| String::from(body.trim()));
    MessageResponse {
        message: Some(text),
        ..MessageResponse::default()
    }
}

impl LocalMovieApi for MovieClient {
    #[instrument(skip_all)]
    async fn register(&self, registration: &Registration) -> ApiResult<MessageResponse> {
        self.send_message(Method::POST, &["users"], Auth::None, |req| {
            req.json(registration)
        })
        .await
    }

    #[instrument(skip_all)]
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        self.send(Method::POST, &["login"], Auth::None, |req| {
            req.query(credentials)
        })
        .await
    }

    #[instrument(skip_all)]
    async fn all_movies(&self) -> ApiResult<Vec<Movie>> {
        self.send(Method::GET, &["movies"], Auth::Bearer, identity)
            .await
    }

    #[instrument(skip_all, fields(title = %title))]
    async fn movie_by_title(&self, title: &str) -> ApiResult<Movie> {
        self.send(Method::GET, &["movies", title], Auth::None, identity)
            .await
    }

    #[instrument(skip_all)]
    async fn director(&self, name: &str) -> ApiResult<Director> {
        self.send(Method::GET, &["directors", name], Auth::None, identity)
            .await
    }

    #[instrument(skip_all)]
    async fn genre(&self, name: &str) -> ApiResult<Genre> {
        self.send(
            Method::GET,
            &["movies", "genres", name],
            Auth::None,
            identity,
        )
        .await
    }

    #[instrument(skip_all, fields(username = %username))]
    async fn user(&self, username: &str) -> ApiResult<User> {
        self.send(Method::GET, &["users", username], Auth::Bearer, identity)
            .await
    }

    #[instrument(skip_all)]
    async fn favorite_movies(&self, user: &str) -> ApiResult<Vec<FavoriteEntry>> {
        self.send(
            Method::GET,
            &["users", user, "favorites"],
            Auth::None,
            identity,
        )
        .await
    }

    #[instrument(skip_all)]
    async fn add_favorite_movie(&self, username: &str, movie_id: &str) -> ApiResult<User> {
        self.send(
            Method::POST,
            &["users", username, "movies", movie_id],
            Auth::Bearer,
            identity,
        )
        .await
    }

    #[instrument(skip_all)]
    async fn remove_favorite_movie(&self, username: &str, movie_id: &str) -> ApiResult<User> {
        self.send(
            Method::DELETE,
            &["users", username, "movies", movie_id],
            Auth::Bearer,
            identity,
        )
        .await
    }

    #[instrument(skip_all)]
    async fn update_user(&self, user_id: &str, update: &UserUpdate) -> ApiResult<User> {
        self.send(Method::PUT, &["users", user_id], Auth::Bearer, |req| {
            req.json(update)
        })
        .await
    }

    #[instrument(skip_all)]
    async fn delete_user(&self, user_id: &str) -> ApiResult<MessageResponse> {
        self.send_message(Method::DELETE, &["users", user_id], Auth::Bearer, identity)
            .await
    }
}
