use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use serde::Serialize;
use std::fmt;
use url::Url;

/// Identity of a cached request: method plus normalized URL.
///
/// `Url` parsing already normalizes scheme/host case, default ports and
/// percent-encoding; fragments never reach the network so they are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub method: Method,
    pub url: Url,
}

impl RequestKey {
    pub fn new(method: Method, mut url: Url) -> Self {
        url.set_fragment(None);
        Self { method, url }
    }

    /// Shorthand for a `GET` identity.
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Buffered HTTP response snapshot.
///
/// The body is held as `Bytes`, so cloning a response (once for the cache,
/// once for the caller) does not copy the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Build a JSON response with `Content-Type: application/json`.
    pub fn json<T: Serialize + ?Sized>(
        status: StatusCode,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        let mut response = Self::new(status, body);
        response.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Ok(response)
    }

    pub fn with_header(mut self, name: header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Only exact `200 OK` responses are eligible for caching.
    pub fn is_cacheable(&self) -> bool {
        self.status == StatusCode::OK
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Body decoded as UTF-8, lossy.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
