//! A [`PublicKeyFetcher`] that retrieves the webhook public key from the
//! service over HTTP.
//!
//! [`PublicKeyClient`] calls `GET /v2/public-key?limit=1` and returns the PEM
//! text of the newest key. The request is signed as the resolved [`User`]
//! (explicit, else the process-wide default); with no user it is sent
//! anonymously to the client's configured [`Environment`].
//!
//! ## Error Handling
//!
//! [`PublicKeyClientError`] captures the failure context:
//! - URL construction
//! - HTTP transport failures and timeouts
//! - JSON deserialization errors
//! - Unexpected HTTP status responses
//!
//! It converts into [`FetchError`] for the webhook parser, with 401 and 403
//! mapped to [`FetchError::Authentication`].

use std::fmt::Display;
use std::time::Duration;

use http::{HeaderMap, HeaderValue, StatusCode, header};
use reqwest::Client;
use serde::Deserialize;
use serde_with::{VecSkipError, serde_as};
use starkbank::fetcher::BoxFuture;
use starkbank::user::resolve_user;
use starkbank::{Environment, FetchError, PublicKeyFetcher, User};
use url::Url;

#[cfg(feature = "telemetry")]
use tracing::{Span, instrument};

use crate::auth::{AccessTime, access_headers};
use crate::constants::{DEFAULT_LANGUAGE, PUBLIC_KEY_PATH, USER_AGENT};
use crate::error::HttpError;

/// Client for the service's public key listing.
#[derive(Clone, Debug)]
pub struct PublicKeyClient {
    client: Client,
    base_url: Option<Url>,
    environment: Environment,
    headers: HeaderMap,
    timeout: Option<Duration>,
    language: HeaderValue,
}

impl Default for PublicKeyClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur while retrieving the public key.
#[derive(Debug, thiserror::Error)]
pub enum PublicKeyClientError {
    /// URL parse error.
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        /// Human-readable context.
        context: &'static str,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },
    /// The signed request headers could not be built.
    #[error("failed to sign request: {0}")]
    Signing(#[source] HttpError),
    /// HTTP transport error.
    #[error("HTTP error: {context}: {source}")]
    Http {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// JSON deserialization error.
    #[error("Failed to deserialize JSON: {context}: {source}")]
    JsonDeserialization {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// Unexpected HTTP status code.
    #[error("Unexpected HTTP status {status}: {context}: {body}")]
    HttpStatus {
        /// Human-readable context.
        context: &'static str,
        /// The HTTP status code.
        status: StatusCode,
        /// The response body.
        body: String,
    },
    /// Failed to read response body.
    #[error("Failed to read response body as text: {context}: {source}")]
    ResponseBodyRead {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// The listing holds no usable key.
    #[error("no public key in response: {0}")]
    NoPublicKey(&'static str),
}

impl From<PublicKeyClientError> for FetchError {
    fn from(err: PublicKeyClientError) -> Self {
        match err {
            PublicKeyClientError::UrlParse { context, source } => Self::network(context, source),
            PublicKeyClientError::Signing(source) => Self::network("sign request", source),
            PublicKeyClientError::Http { context, source }
            | PublicKeyClientError::ResponseBodyRead { context, source } => {
                Self::network(context, source)
            }
            PublicKeyClientError::HttpStatus { status, body, .. }
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                Self::Authentication {
                    status: status.as_u16(),
                    body,
                }
            }
            PublicKeyClientError::HttpStatus { status, body, .. } => Self::Status {
                status: status.as_u16(),
                body,
            },
            PublicKeyClientError::JsonDeserialization { source, .. } => {
                Self::InvalidResponse(source.to_string())
            }
            PublicKeyClientError::NoPublicKey(reason) => Self::InvalidResponse(reason.to_owned()),
        }
    }
}

/// One page of the public key listing.
#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicKeyPage {
    #[serde(default)]
    #[serde_as(as = "VecSkipError<_>")]
    public_keys: Vec<PublicKeyEntry>,
}

#[derive(Debug, Deserialize)]
struct PublicKeyEntry {
    content: String,
}

impl PublicKeyPage {
    /// PEM of the first well-formed entry.
    fn into_first_pem(self) -> Option<String> {
        self.public_keys
            .into_iter()
            .map(|entry| entry.content)
            .find(|content| !content.trim().is_empty())
    }
}

impl PublicKeyClient {
    /// Creates a client targeting the resolved user's environment, or
    /// sandbox for anonymous requests.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: None,
            environment: Environment::default(),
            headers: HeaderMap::new(),
            timeout: None,
            language: HeaderValue::from_static(DEFAULT_LANGUAGE),
        }
    }

    /// Returns the base URL override, if any.
    pub const fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Returns the environment used when no user resolves.
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns any custom headers configured on the client.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the configured timeout, if any.
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Sends requests to `base_url` instead of the environment's API host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Parses and sets the base URL override, normalizing the trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`PublicKeyClientError::UrlParse`] if `base_url` is not a URL.
    pub fn try_with_base_url(self, base_url: &str) -> Result<Self, PublicKeyClientError> {
        let mut normalized = base_url.trim_end_matches('/').to_owned();
        normalized.push('/');
        let url = Url::parse(&normalized).map_err(|source| PublicKeyClientError::UrlParse {
            context: "Failed to parse base url",
            source,
        })?;
        Ok(self.with_base_url(url))
    }

    /// Sets the environment anonymous requests are sent to.
    ///
    /// A resolved user always targets its own environment.
    #[must_use]
    pub const fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Attaches custom headers to all future requests.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets a timeout for all future requests.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the `Accept-Language` sent with every request.
    #[must_use]
    pub fn with_language(mut self, language: HeaderValue) -> Self {
        self.language = language;
        self
    }

    fn environment_for(&self, user: Option<&User>) -> Environment {
        user.map_or(self.environment, User::environment)
    }

    fn public_key_url(&self, environment: Environment) -> Result<Url, PublicKeyClientError> {
        let base = match &self.base_url {
            Some(url) => url.clone(),
            None => Url::parse(environment.base_url()).map_err(|source| {
                PublicKeyClientError::UrlParse {
                    context: "Failed to parse environment url",
                    source,
                }
            })?,
        };
        let mut url = base
            .join(PUBLIC_KEY_PATH)
            .map_err(|source| PublicKeyClientError::UrlParse {
                context: "Failed to construct ./v2/public-key URL",
                source,
            })?;
        url.query_pairs_mut().append_pair("limit", "1");
        Ok(url)
    }

    /// Sends `GET /v2/public-key?limit=1` and returns the newest key's PEM.
    ///
    /// # Errors
    ///
    /// Returns [`PublicKeyClientError`] if the request fails, the service
    /// answers with a non-200 status, or the listing holds no key.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "starkbank.public_key_client.fetch", skip_all, err)
    )]
    pub async fn fetch(&self, user: Option<&User>) -> Result<String, PublicKeyClientError> {
        let context = "GET /v2/public-key";
        let user = resolve_user(user);
        let url = self.public_key_url(self.environment_for(user.as_deref()))?;

        let mut req = self.client.get(url).headers(self.headers.clone());
        req = req
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT_LANGUAGE, self.language.clone())
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(user) = &user {
            let signed =
                access_headers(user, AccessTime::now(), "").map_err(PublicKeyClientError::Signing)?;
            req = req.headers(signed);
        }
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        let http_response = req
            .send()
            .await
            .map_err(|source| PublicKeyClientError::Http { context, source })?;

        let result = if http_response.status() == StatusCode::OK {
            http_response
                .json::<PublicKeyPage>()
                .await
                .map_err(|source| PublicKeyClientError::JsonDeserialization { context, source })
                .and_then(|page| {
                    page.into_first_pem()
                        .ok_or(PublicKeyClientError::NoPublicKey("empty publicKeys list"))
                })
        } else {
            let status = http_response.status();
            let body = http_response
                .text()
                .await
                .map_err(|source| PublicKeyClientError::ResponseBodyRead { context, source })?;
            Err(PublicKeyClientError::HttpStatus {
                context,
                status,
                body,
            })
        };

        record_result_on_span(&result);

        result
    }
}

impl PublicKeyFetcher for PublicKeyClient {
    fn fetch_public_key_pem<'a>(
        &'a self,
        user: Option<&'a User>,
    ) -> BoxFuture<'a, Result<String, FetchError>> {
        Box::pin(async move { self.fetch(user).await.map_err(FetchError::from) })
    }
}

/// Records the outcome of a request on a tracing span, including status and errors.
#[cfg(feature = "telemetry")]
fn record_result_on_span<R, E: Display>(result: &Result<R, E>) {
    let span = Span::current();
    match result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", tracing::field::display(err));
            tracing::event!(tracing::Level::ERROR, error = %err, "Public key request failed");
        }
    }
}

/// Records the outcome of a request on a tracing span.
/// Noop if telemetry feature is off.
#[cfg(not(feature = "telemetry"))]
fn record_result_on_span<R, E: Display>(_result: &Result<R, E>) {}
