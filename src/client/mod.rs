//! Client layer: composes the request pipeline and maps records ↔ domain.

mod error;
mod http;
mod pipeline;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{Login, MessageStatus, QueryStatus, SendSms, SentMessage, ValidationError};
use crate::transport::{
    ApiParameters, ResponseRecord, SEND_COMMAND, STATUS_COMMAND, decode_send_records,
    decode_status_records, encode_send_params, encode_status_params, parse_records,
};

pub use error::{GatewayError, GatewayErrorKind, RequestSnapshot, ResponseSnapshot, SmsGateError};
pub use http::{
    BoxFuture, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportFailure,
};
pub use pipeline::{Credentials, DEFAULT_API_PATH, Endpoint, Middleware};

use pipeline::Pipeline;

/// Query parameter selecting the API command.
const COMMAND_FIELD: &str = "cmd";

/// Environment variable holding the gateway host for [`SmsGateClientBuilder::from_env`].
pub const ENV_HOST: &str = "SMSGATE_HOST";
/// Environment variable holding the account user name.
pub const ENV_USER: &str = "SMSGATE_USER";
/// Environment variable holding the account password (may be unset for no password).
pub const ENV_PASSWORD: &str = "SMSGATE_PASSWORD";

#[derive(Clone)]
/// Builder for [`SmsGateClient`].
///
/// Use this when you need extra middleware, a custom transport, or a
/// timeout/user-agent for the default reqwest transport.
pub struct SmsGateClientBuilder {
    credentials: Credentials,
    endpoint: Option<Endpoint>,
    host: Option<String>,
    path: Option<String>,
    middleware: Vec<Arc<dyn Middleware>>,
    transport: Option<Arc<dyn HttpTransport>>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl SmsGateClientBuilder {
    /// Create a builder with no host, no extra middleware and the default transport.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: None,
            host: None,
            path: None,
            middleware: Vec::new(),
            transport: None,
            timeout: None,
            user_agent: None,
        }
    }

    /// Read credentials and the optional host from `SMSGATE_*` environment variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ValidationError> {
        let user = lookup(ENV_USER).ok_or(ValidationError::Empty {
            field: Login::FIELD,
        })?;
        let password = lookup(ENV_PASSWORD).unwrap_or_default();

        let mut builder = Self::new(Credentials::new(user, password)?);
        if let Some(host) = lookup(ENV_HOST).filter(|host| !host.trim().is_empty()) {
            builder = builder.host(host);
        }
        Ok(builder)
    }

    /// Gateway host, e.g. `https://192.168.0.1:8080`.
    ///
    /// Without a host, request targets stay relative and the transport must
    /// resolve them itself.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self.endpoint = None;
        self
    }

    /// Use an already validated [`Endpoint`]; replaces an earlier [`host`](Self::host).
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self.host = None;
        self
    }

    /// Override the API path appended to the host (default `/rest.api`).
    ///
    /// Applies to an [`Endpoint`] set through [`endpoint`](Self::endpoint) as well.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Register a middleware; it runs before the built-in stages on the way out.
    pub fn middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Use a custom transport instead of the default reqwest one.
    ///
    /// `timeout` and `user_agent` only apply to the default transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`SmsGateClient`].
    pub fn build(self) -> Result<SmsGateClient, SmsGateError> {
        let endpoint = match (self.endpoint, self.host) {
            (Some(endpoint), _) => Some(endpoint),
            (None, Some(host)) => Some(Endpoint::new(host)?),
            (None, None) => None,
        };
        let endpoint = match self.path {
            Some(path) => endpoint.map(|endpoint| endpoint.with_path(path)),
            None => endpoint,
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }
                let client = builder
                    .build()
                    .map_err(|err| SmsGateError::Transport(Box::new(err)))?;
                Arc::new(ReqwestTransport::new(client))
            }
        };

        Ok(SmsGateClient {
            pipeline: Arc::new(Pipeline::new(
                self.credentials,
                endpoint,
                self.middleware,
                transport,
            )),
        })
    }
}

#[derive(Clone)]
/// High-level gateway client.
///
/// Every call issues exactly one `GET {host}/rest.api?cmd=...` request with the
/// credentials attached, translates 400/401/404 into [`GatewayError`], and
/// parses the line-oriented answer. The client holds only immutable
/// configuration and can be shared across tasks.
pub struct SmsGateClient {
    pipeline: Arc<Pipeline>,
}

impl SmsGateClient {
    /// Create a client for `host` with the default transport.
    ///
    /// For more customization, use [`SmsGateClient::builder`].
    pub fn new(host: impl Into<String>, credentials: Credentials) -> Result<Self, SmsGateError> {
        Self::builder(credentials).host(host).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> SmsGateClientBuilder {
        SmsGateClientBuilder::new(credentials)
    }

    /// Run an arbitrary command and return the parsed answer lines.
    ///
    /// Absent and empty parameters are dropped; a `cmd` entry in `params` is
    /// ignored in favor of `command`.
    ///
    /// Only a `200` answer is parsed. Any other status that is not a documented
    /// failure yields an empty list without an error, so an empty result does not
    /// by itself mean the command succeeded.
    ///
    /// Errors:
    /// - [`SmsGateError::Gateway`] for 400/401/404,
    /// - [`SmsGateError::Transport`] when the transport fails.
    #[tracing::instrument(skip(self, params))]
    pub async fn api_call(
        &self,
        command: &str,
        params: ApiParameters,
    ) -> Result<Vec<ResponseRecord>, SmsGateError> {
        let mut params = params;
        params.remove(COMMAND_FIELD);

        let mut query = vec![(COMMAND_FIELD.to_owned(), command.to_owned())];
        query.extend(params.to_query_pairs());

        let response = self.pipeline.send(HttpRequest::get("", query)).await?;
        if response.status != 200 {
            warn!(
                status = response.status,
                "unexpected HTTP status from gateway, returning no records"
            );
            return Ok(Vec::new());
        }

        let records = parse_records(&response.body);
        debug!(records = records.len(), "parsed gateway response");
        Ok(records)
    }

    /// Queue a message for one or many recipients (`cmd=send`).
    ///
    /// The result has one entry per recipient, in the order the gateway listed
    /// them (the request order). A line without `phone` or `id` is reported as
    /// [`SmsGateError::Decode`].
    pub async fn send(&self, request: SendSms) -> Result<Vec<SentMessage>, SmsGateError> {
        let records = self
            .api_call(SEND_COMMAND, encode_send_params(&request))
            .await?;
        decode_send_records(&records).map_err(|err| SmsGateError::Decode(Box::new(err)))
    }

    /// Look up the processing state of a sent message (`cmd=msg`).
    ///
    /// Errors:
    /// - [`SmsGateError::Gateway`] with [`GatewayErrorKind::NotFound`] when the id
    ///   is unknown for this user.
    pub async fn query_status(
        &self,
        request: QueryStatus,
    ) -> Result<Vec<MessageStatus>, SmsGateError> {
        let records = self
            .api_call(STATUS_COMMAND, encode_status_params(&request))
            .await?;
        decode_status_records(&records).map_err(|err| SmsGateError::Decode(Box::new(err)))
    }
}
