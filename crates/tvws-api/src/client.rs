// Spectrum Service HTTP client
//
// Wraps `reqwest::Client` with base-URL construction, bearer-token
// attachment, and `{detail}` error-envelope parsing. Endpoint groups
// (auth, catalog, spectrum) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use std::sync::RwLock;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Error envelope used by the service for every failure response.
#[derive(serde::Deserialize)]
struct DetailEnvelope {
    detail: Option<String>,
}

/// Raw HTTP client for the Remote Spectrum Service.
///
/// Holds at most one bearer token; the token slot is written only by the
/// Session Gate in `tvws-core` and read by every outbound request. All
/// methods surface the service's `{detail}` message verbatim on failure.
pub struct SpectrumClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl SpectrumClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` should be the service root, e.g.
    /// `https://tvws-geolocation-api.onrender.com`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            token: RwLock::new(None),
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (tests).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Token slot ───────────────────────────────────────────────────

    /// Install a bearer token; attached to every subsequent request.
    pub fn set_token(&self, token: String) {
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    /// Remove the bearer token; subsequent requests go out unauthenticated.
    pub fn clear_token(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }

    /// Whether a bearer token is currently installed.
    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    /// Attach the bearer token to a request builder when present.
    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().expect("token lock poisoned");
        match guard.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL from fixed path segments.
    ///
    /// Segments are pushed individually so user-supplied values (region
    /// names with spaces, etc.) are percent-encoded correctly.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .expect("service base URL is always a valid base");
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        url
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authorized GET request and parse the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self
            .authorize(self.http.get(url))
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_response(resp).await
    }

    /// Send an authorized POST request with a JSON body and parse the
    /// JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self
            .authorize(self.http.post(url).json(body))
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_response(resp).await
    }

    /// Send an unauthorized POST (login) and parse the JSON response.
    pub(crate) async fn post_anonymous<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {} (anonymous)", url);
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_response(resp).await
    }

    /// Parse a response: success bodies deserialize to `T`, failures
    /// surface the `{detail}` message verbatim when present.
    ///
    /// HTTP 401 always maps to [`Error::Authentication`] so callers can
    /// distinguish an expired session from an ordinary rejection.
    async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<DetailEnvelope>(&body)
                .ok()
                .and_then(|e| e.detail)
                .unwrap_or_else(|| format!("HTTP {status}"));

            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(Error::Authentication { message: detail });
            }
            return Err(Error::Api {
                status: status.as_u16(),
                message: detail,
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| {
            // Char-wise truncation: a byte slice could split a multi-byte
            // character and panic.
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}
