use std::error::Error as StdError;
use std::fmt;

use crate::client::http::{HttpRequest, HttpResponse, TransportFailure};
use crate::domain::ValidationError;

/// HTTP statuses the gateway documents as request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayErrorKind {
    /// `400`: malformed or missing required parameters.
    BadRequest,
    /// `401`: invalid user name or password.
    Unauthorized,
    /// `404`: no message with this id for this user.
    NotFound,
}

impl GatewayErrorKind {
    /// Map an HTTP status to a gateway failure; every other status is not one.
    pub fn from_status(status: u16) -> Option<Self> {
        Some(match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            404 => Self::NotFound,
            _ => return None,
        })
    }

    pub fn status(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::NotFound => 404,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Self::BadRequest => {
                "request parameters are malformed or required parameters are missing"
            }
            Self::Unauthorized => "invalid user name or password",
            Self::NotFound => "no message with the given id was found for this user",
        }
    }
}

impl fmt::Display for GatewayErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BadRequest => "bad request",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not found",
        };
        f.write_str(name)
    }
}

/// The request that failed, with the password masked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSnapshot {
    pub method: reqwest::Method,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSnapshot {
    pub status: u16,
    /// Plain-text reason sent by the gateway.
    pub body: String,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {message} (HTTP {})", .response.status)]
/// A documented failure status returned by the gateway.
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
    pub request: RequestSnapshot,
    pub response: ResponseSnapshot,
}

impl GatewayError {
    pub(crate) fn new(
        kind: GatewayErrorKind,
        request: &HttpRequest,
        response: HttpResponse,
    ) -> Self {
        Self {
            kind,
            message: kind.message().to_owned(),
            request: RequestSnapshot {
                method: request.method.clone(),
                uri: request.redacted_uri(),
            },
            response: ResponseSnapshot {
                status: response.status,
                body: response.body,
            },
        }
    }
}

/// Pass `response` through unless its status is 400, 401 or 404.
pub(crate) fn translate_status(
    request: &HttpRequest,
    response: HttpResponse,
) -> Result<HttpResponse, GatewayError> {
    match GatewayErrorKind::from_status(response.status) {
        Some(kind) => Err(GatewayError::new(kind, request, response)),
        None => Ok(response),
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SmsGateClient`](crate::SmsGateClient).
///
/// Callers that need to tell an empty answer from a failed request should
/// match on this type: an `Ok` with no records is never an error.
pub enum SmsGateError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] TransportFailure),

    /// The gateway answered 400, 401 or 404.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// A parsed record could not be read as the expected line type.
    #[error("decode error: {0}")]
    Decode(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl SmsGateError {
    pub fn gateway_kind(&self) -> Option<GatewayErrorKind> {
        match self {
            Self::Gateway(err) => Some(err.kind),
            _ => None,
        }
    }
}
