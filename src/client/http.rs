use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::domain::Password;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Failure reported by an [`HttpTransport`] (connect, TLS, timeout, body read).
pub type TransportFailure = Box<dyn StdError + Send + Sync>;

/// Outbound request as it travels through the middleware pipeline.
///
/// `target` starts empty and is resolved to an absolute URL by the base-URI
/// stage; `query` holds the decoded parameters in wire order.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: reqwest::Method,
    pub target: String,
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(target: impl Into<String>, query: Vec<(String, String)>) -> Self {
        Self {
            method: reqwest::Method::GET,
            target: target.into(),
            query,
        }
    }

    /// First value of a query parameter.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Full request URI: the target followed by the encoded query string.
    pub fn uri(&self) -> String {
        join_query(
            &self.target,
            self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }

    /// Same as [`HttpRequest::uri`] with the password value masked, for logs and errors.
    pub fn redacted_uri(&self) -> String {
        join_query(
            &self.target,
            self.query.iter().map(|(k, v)| {
                if k == Password::FIELD {
                    (k.as_str(), "***")
                } else {
                    (k.as_str(), v.as_str())
                }
            }),
        )
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("uri", &self.redacted_uri())
            .finish()
    }
}

fn join_query<'a>(target: &str, pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    if query.is_empty() {
        target.to_owned()
    } else {
        format!("{target}?{query}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Executes exactly one HTTP request.
///
/// Timeouts, pooling and TLS belong to the implementation; any failure it
/// reports is passed to the caller untranslated.
pub trait HttpTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportFailure>>;
}

/// Default transport backed by [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportFailure>> {
        Box::pin(async move {
            let uri = request.uri();
            let response = self.client.request(request.method, uri).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}
