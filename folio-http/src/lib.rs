//! Minimal HTTP client for fetching binary resources with safe logging.
//!
//! - Per-request options: headers, timeout and a body size cap
//! - Shared connection pool across clones of [`HttpClient`]
//! - Non-success statuses surface as [`HttpError::Api`], never as bodies
//! - Optional *raw* request/response logging via `FOLIO_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), folio_http::HttpError> {
//! let client = folio_http::HttpClient::new()?;
//! let got = client
//!     .get_bytes("https://media.example.com/logo.png", folio_http::RequestOpts::default())
//!     .await?;
//! println!("{} bytes of {:?}", got.body.len(), got.content_type);
//! # Ok(()) }
//! ```
//!
//! Requests are one-shot: there is no retry loop. Callers that need a
//! fallback decide it themselves from the returned error.
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, final errors, and (optionally) raw request/response
//! lines (target `http.raw`) when `FOLIO_HTTP_RAW=1`.

use bytes::{Bytes, BytesMut};
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::{Client, StatusCode, Url};
use std::env;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use thiserror::Error;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "FOLIO_HTTP_RAW";
const SNIPPET_MAX: usize = 500;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug, with secrets redacted.
fn make_curl(url: &Url, headers: &HeaderMap) -> String {
    let mut parts = vec!["curl".to_string(), "-XGET".to_string()];
    for (name, val) in redact_headers(headers) {
        parts.push(format!("-H '{}: {}'", name, val.replace('\'', r"'\''")));
    }
    parts.push(format!("'{}'", url.as_str()));
    parts.join(" ")
}

/// Redact sensitive headers for logging
fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if key.eq_ignore_ascii_case("authorization")
                || key.eq_ignore_ascii_case("cookie")
                || key.eq_ignore_ascii_case("set-cookie")
            {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned error {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("response body exceeds {limit} bytes")]
    TooLarge { limit: u64 },
}

impl HttpError {
    /// Status code for [`HttpError::Api`], if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ==============================
// Request options & response
// ==============================

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use folio_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(3)),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 3);
/// assert!(opts.headers.is_none());
/// assert!(opts.max_body_bytes.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts {
    pub timeout: Option<Duration>,
    pub headers: Option<HeaderMap>,
    /// Reject bodies larger than this, whether declared or streamed.
    pub max_body_bytes: Option<u64>,
}

/// A successful (2xx) response, fully buffered.
#[derive(Clone, Debug)]
pub struct Fetched {
    pub status: StatusCode,
    /// Declared media type without parameters (`image/png; q=1` -> `image/png`).
    pub content_type: Option<String>,
    pub body: Bytes,
}

// ==============================
// Client
// ==============================

#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client with a pooled connector.
    ///
    /// ```no_run
    /// use folio_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new()?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new() -> Result<Self, HttpError> {
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .pool_max_idle_per_host(8)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            inner,
            default_timeout: Duration::from_secs(15),
        })
    }

    /// Override the default timeout returned by [`HttpClient::new`].
    ///
    /// ```no_run
    /// use folio_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new()?.with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Duration::from_secs(2));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// GET an absolute URL and buffer the body.
    ///
    /// Any non-2xx status is returned as [`HttpError::Api`]; a body over
    /// `opts.max_body_bytes` as [`HttpError::TooLarge`].
    pub async fn get_bytes(&self, url: &str, opts: RequestOpts) -> Result<Fetched, HttpError> {
        let url = Url::parse(url).map_err(|e| HttpError::Url(e.to_string()))?;
        let timeout = opts.timeout.unwrap_or(self.default_timeout);

        let mut rb = self.inner.get(url.clone()).timeout(timeout);
        if let Some(hdrs) = &opts.headers {
            rb = rb.headers(hdrs.clone());
        }

        let req_id = format!(
            "r{:x}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );

        tracing::debug!(
            req_id=%req_id,
            host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            timeout_ms=timeout.as_millis() as u64,
            "http.request.start"
        );

        if raw_enabled() {
            let curl = make_curl(&url, opts.headers.as_ref().unwrap_or(&HeaderMap::new()));
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        let t0 = Instant::now();
        let resp = rb.send().await.map_err(|err| {
            let e = classify_send_error(err, timeout);
            tracing::warn!(req_id=%req_id, error=%e, "http.network_error.send");
            e
        })?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = read_body(resp, opts.max_body_bytes, timeout)
            .await
            .inspect_err(|e| {
                tracing::warn!(req_id=%req_id, %status, error=%e, "http.network_error.body");
            })?;
        let dur_ms = t0.elapsed().as_millis() as u64;
        let content_type = media_type(&headers);

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=body.len(),
            content_type=?content_type,
            "http.response.headers"
        );

        if raw_enabled() {
            tracing::info!(
                target: "http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                headers=?redact_headers(&headers),
                body_len=body.len()
            );
        }

        if status.is_success() {
            return Ok(Fetched {
                status,
                content_type,
                body,
            });
        }

        let message = snip_body(&body);
        tracing::warn!(req_id=%req_id, %status, body_snippet=%message, "http.error");
        Err(HttpError::Api { status, message })
    }
}

// ==============================
// Helpers
// ==============================

fn classify_send_error(err: reqwest::Error, timeout: Duration) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout(timeout)
    } else if err.is_builder() {
        HttpError::Build(err.to_string())
    } else {
        HttpError::Network(err.to_string())
    }
}

/// Buffer the body, stopping as soon as it is known to exceed `limit`.
async fn read_body(
    mut resp: reqwest::Response,
    limit: Option<u64>,
    timeout: Duration,
) -> Result<Bytes, HttpError> {
    let Some(limit) = limit else {
        return resp
            .bytes()
            .await
            .map_err(|err| classify_send_error(err, timeout));
    };
    if resp.content_length().is_some_and(|len| len > limit) {
        return Err(HttpError::TooLarge { limit });
    }

    let mut buf = BytesMut::new();
    while let Some(chunk) = resp
        .chunk()
        .await
        .map_err(|err| classify_send_error(err, timeout))?
    {
        if (buf.len() + chunk.len()) as u64 > limit {
            return Err(HttpError::TooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

fn media_type(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    let essence = raw.split(';').next().unwrap_or("").trim();
    (!essence.is_empty()).then(|| essence.to_ascii_lowercase())
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn media_type_drops_parameters() {
        let mut h = HeaderMap::new();
        h.insert(CONTENT_TYPE, HeaderValue::from_static("Image/PNG; charset=binary"));
        assert_eq!(media_type(&h).as_deref(), Some("image/png"));
        assert_eq!(media_type(&HeaderMap::new()), None);
    }

    #[test]
    fn curl_redacts_cookies() {
        let mut h = HeaderMap::new();
        h.insert("cookie", HeaderValue::from_static("li_at=secret"));
        let url = Url::parse("https://media.example.com/a.png").unwrap();
        let curl = make_curl(&url, &h);
        assert!(curl.contains("<redacted>"));
        assert!(!curl.contains("secret"));
    }

    #[test]
    fn snippet_truncates_on_char_boundary() {
        let body = "é".repeat(400);
        let s = snip_body(body.as_bytes());
        assert!(s.ends_with("..."));
    }

    #[tokio::test]
    async fn returns_body_and_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/logo.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(vec![1u8, 2, 3]),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let got = client
            .get_bytes(&format!("{}/logo.png", server.uri()), RequestOpts::default())
            .await
            .unwrap();
        assert_eq!(got.content_type.as_deref(), Some("image/png"));
        assert_eq!(&got.body[..], &[1, 2, 3]);
    }

    #[tokio::test]
    async fn non_success_is_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let err = client
            .get_bytes(&format!("{}/missing.png", server.uri()), RequestOpts::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn slow_responses_time_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let opts = RequestOpts {
            timeout: Some(Duration::from_millis(50)),
            ..Default::default()
        };
        let err = client
            .get_bytes(&format!("{}/slow.png", server.uri()), opts)
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Timeout(_)));
    }

    #[tokio::test]
    async fn oversized_bodies_are_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 4096]))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/huge.png", server.uri());
        let capped = |limit| RequestOpts {
            max_body_bytes: Some(limit),
            ..Default::default()
        };

        let err = client.get_bytes(&url, capped(1024)).await.unwrap_err();
        assert!(matches!(err, HttpError::TooLarge { limit: 1024 }));

        let got = client.get_bytes(&url, capped(4096)).await.unwrap();
        assert_eq!(got.status, StatusCode::OK);
        assert_eq!(got.body.len(), 4096);
    }

    #[tokio::test]
    async fn rejects_relative_urls() {
        let client = HttpClient::new().unwrap();
        let err = client
            .get_bytes("/relative/logo.png", RequestOpts::default())
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Url(_)));
    }
}
