//! Middleware stages around the [`HttpTransport`].
//!
//! Stages run in registration order on the way out and in reverse order on
//! the way back. The built-in order is: caller middleware, error translation,
//! credentials, base URI. Error translation therefore inspects the raw
//! transport response first, and caller middleware only sees responses that
//! passed it.

use std::sync::Arc;

use tracing::debug;

use crate::client::error::{SmsGateError, translate_status};
use crate::client::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::domain::{Login, Password, ValidationError};

/// Default location of the gateway API below the host.
pub const DEFAULT_API_PATH: &str = "/rest.api";

/// Caller-supplied pipeline stage.
pub trait Middleware: Send + Sync {
    /// Adjust the outbound request.
    fn transform_request(&self, _request: &mut HttpRequest) {}

    /// Inspect the response on the way back; returning `Err` aborts the call.
    fn inspect_response(
        &self,
        _request: &HttpRequest,
        response: HttpResponse,
    ) -> Result<HttpResponse, SmsGateError> {
        Ok(response)
    }
}

#[derive(Debug, Clone)]
/// Gateway account credentials, sent as `user` and `pswd` on every request.
pub struct Credentials {
    login: Login,
    password: Password,
}

impl Credentials {
    pub fn new(
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            login: Login::new(login)?,
            password: Password::new(password),
        })
    }

    pub fn login(&self) -> &Login {
        &self.login
    }

    /// Credentials replace any `user` / `pswd` already on the request, so each
    /// appears exactly once.
    fn apply(&self, request: &mut HttpRequest) {
        request
            .query
            .retain(|(key, _)| key != Login::FIELD && key != Password::FIELD);
        request
            .query
            .push((Login::FIELD.to_owned(), self.login.as_str().to_owned()));
        request.query.push((
            Password::FIELD.to_owned(),
            self.password.as_str().to_owned(),
        ));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Gateway host plus the API path (`/rest.api` unless overridden).
pub struct Endpoint {
    host: String,
    path: String,
}

impl Endpoint {
    /// `host` must be an absolute URL such as `https://192.168.0.1:8080`.
    pub fn new(host: impl Into<String>) -> Result<Self, ValidationError> {
        let host = host.into();
        let trimmed = host.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "host" });
        }

        let parsed = url::Url::parse(trimmed).map_err(|err| ValidationError::InvalidHost {
            input: host.clone(),
            reason: err.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ValidationError::InvalidHost {
                input: host.clone(),
                reason: "expected an absolute URL like http://host:port".to_owned(),
            });
        }

        Ok(Self {
            host: trimmed.to_owned(),
            path: DEFAULT_API_PATH.to_owned(),
        })
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = path.trim().trim_end_matches('/');
        self.path = if path.is_empty() || path.starts_with('/') {
            path.to_owned()
        } else {
            format!("/{path}")
        };
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// `host` + `path`, e.g. `https://192.168.0.1:8080/rest.api`.
    pub fn base_uri(&self) -> String {
        format!("{}{}", self.host, self.path)
    }

    /// Absolute targets are left alone. A relative target that already starts
    /// with the API path only gets the host.
    fn apply(&self, request: &mut HttpRequest) {
        let target = request.target.trim();
        if url::Url::parse(target).is_ok() {
            return;
        }

        let rest = if self.path.is_empty() {
            target
        } else {
            target.strip_prefix(self.path.as_str()).unwrap_or(target)
        };
        let separator = if rest.is_empty() || rest.starts_with('/') {
            ""
        } else {
            "/"
        };
        request.target = format!("{}{separator}{rest}", self.base_uri());
    }
}

enum Stage {
    Custom(Arc<dyn Middleware>),
    TranslateErrors,
    Auth(Credentials),
    BaseUri(Endpoint),
}

impl Stage {
    fn transform_request(&self, request: &mut HttpRequest) {
        match self {
            Self::Custom(middleware) => middleware.transform_request(request),
            Self::TranslateErrors => {}
            Self::Auth(credentials) => credentials.apply(request),
            Self::BaseUri(endpoint) => endpoint.apply(request),
        }
    }

    fn inspect_response(
        &self,
        request: &HttpRequest,
        response: HttpResponse,
    ) -> Result<HttpResponse, SmsGateError> {
        match self {
            Self::Custom(middleware) => middleware.inspect_response(request, response),
            Self::TranslateErrors => translate_status(request, response).map_err(|err| {
                debug!(
                    kind = %err.kind,
                    status = err.response.status,
                    "gateway rejected request"
                );
                SmsGateError::Gateway(err)
            }),
            Self::Auth(_) | Self::BaseUri(_) => Ok(response),
        }
    }
}

/// The composed "send one request" capability used by the client.
pub(crate) struct Pipeline {
    stages: Vec<Stage>,
    transport: Arc<dyn HttpTransport>,
}

impl Pipeline {
    pub(crate) fn new(
        credentials: Credentials,
        endpoint: Option<Endpoint>,
        middleware: Vec<Arc<dyn Middleware>>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let mut stages: Vec<Stage> = middleware.into_iter().map(Stage::Custom).collect();
        stages.push(Stage::TranslateErrors);
        stages.push(Stage::Auth(credentials));
        if let Some(endpoint) = endpoint {
            stages.push(Stage::BaseUri(endpoint));
        }
        Self { stages, transport }
    }

    pub(crate) async fn send(
        &self,
        mut request: HttpRequest,
    ) -> Result<HttpResponse, SmsGateError> {
        for stage in &self.stages {
            stage.transform_request(&mut request);
        }
        debug!(
            method = %request.method,
            uri = %request.redacted_uri(),
            "sending gateway request"
        );

        let mut response = self
            .transport
            .send(request.clone())
            .await
            .map_err(SmsGateError::Transport)?;
        debug!(status = response.status, "gateway responded");

        for stage in self.stages.iter().rev() {
            response = stage.inspect_response(&request, response)?;
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::client::error::GatewayErrorKind;
    use crate::client::http::{BoxFuture, TransportFailure};

    use super::*;

    struct EchoTransport {
        status: u16,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl EchoTransport {
        fn new(status: u16) -> Arc<Self> {
            Arc::new(Self {
                status,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> HttpRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl HttpTransport for EchoTransport {
        fn send<'a>(
            &'a self,
            request: HttpRequest,
        ) -> BoxFuture<'a, Result<HttpResponse, TransportFailure>> {
            Box::pin(async move {
                self.seen.lock().unwrap().push(request);
                Ok(HttpResponse {
                    status: self.status,
                    body: "body".to_owned(),
                })
            })
        }
    }

    /// Adds `lang=ru` and records every status it is shown.
    #[derive(Default)]
    struct Recorder {
        statuses: Mutex<Vec<u16>>,
    }

    impl Middleware for Recorder {
        fn transform_request(&self, request: &mut HttpRequest) {
            request.query.push(("lang".to_owned(), "ru".to_owned()));
        }

        fn inspect_response(
            &self,
            _request: &HttpRequest,
            response: HttpResponse,
        ) -> Result<HttpResponse, SmsGateError> {
            self.statuses.lock().unwrap().push(response.status);
            Ok(response)
        }
    }

    fn credentials() -> Credentials {
        Credentials::new("SMS", "123").unwrap()
    }

    fn endpoint() -> Endpoint {
        Endpoint::new("https://192.168.0.1:8080/").unwrap()
    }

    fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn endpoint_validates_host() {
        assert_eq!(endpoint().host(), "https://192.168.0.1:8080");
        assert_eq!(endpoint().base_uri(), "https://192.168.0.1:8080/rest.api");
        assert!(matches!(
            Endpoint::new("  "),
            Err(ValidationError::Empty { field: "host" })
        ));
        assert!(matches!(
            Endpoint::new("not a url"),
            Err(ValidationError::InvalidHost { .. })
        ));
        assert!(matches!(
            Endpoint::new("mailto:gate@example.com"),
            Err(ValidationError::InvalidHost { .. })
        ));
    }

    #[test]
    fn endpoint_path_override_is_normalized() {
        let endpoint = endpoint().with_path("api/rest.api/");
        assert_eq!(endpoint.path(), "/api/rest.api");
        assert_eq!(endpoint.base_uri(), "https://192.168.0.1:8080/api/rest.api");
    }

    #[test]
    fn base_uri_resolves_empty_target() {
        let mut request = HttpRequest::get("", Vec::new());
        endpoint().apply(&mut request);
        assert_eq!(request.target, "https://192.168.0.1:8080/rest.api");
    }

    #[test]
    fn base_uri_does_not_double_append_path() {
        let mut request = HttpRequest::get("/rest.api", Vec::new());
        endpoint().apply(&mut request);
        assert_eq!(request.target, "https://192.168.0.1:8080/rest.api");
    }

    #[test]
    fn base_uri_leaves_absolute_targets() {
        let mut request = HttpRequest::get("http://other.example/rest.api", Vec::new());
        endpoint().apply(&mut request);
        assert_eq!(request.target, "http://other.example/rest.api");
    }

    #[test]
    fn credentials_are_appended_and_replace_collisions() {
        let mut request = HttpRequest::get(
            "",
            query(&[("cmd", "send"), ("user", "intruder"), ("phones", "7900")]),
        );
        credentials().apply(&mut request);
        assert_eq!(
            request.query,
            query(&[
                ("cmd", "send"),
                ("phones", "7900"),
                ("user", "SMS"),
                ("pswd", "123"),
            ])
        );
    }

    #[test]
    fn empty_password_is_still_sent() {
        let mut request = HttpRequest::get("", Vec::new());
        Credentials::new("SMS", "").unwrap().apply(&mut request);
        assert_eq!(request.query_value("pswd"), Some(""));
        assert_eq!(request.uri(), "?user=SMS&pswd=");
    }

    #[tokio::test]
    async fn pipeline_applies_all_request_stages() {
        let transport = EchoTransport::new(200);
        let pipeline = Pipeline::new(
            credentials(),
            Some(endpoint()),
            Vec::new(),
            transport.clone(),
        );

        let response = pipeline
            .send(HttpRequest::get("", query(&[("cmd", "msg"), ("id", "abc-1")])))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(
            transport.last().uri(),
            "https://192.168.0.1:8080/rest.api?cmd=msg&id=abc-1&user=SMS&pswd=123"
        );
    }

    #[tokio::test]
    async fn pipeline_without_endpoint_keeps_relative_target() {
        let transport = EchoTransport::new(200);
        let pipeline = Pipeline::new(credentials(), None, Vec::new(), transport.clone());

        pipeline
            .send(HttpRequest::get("", query(&[("cmd", "msg")])))
            .await
            .unwrap();
        assert_eq!(transport.last().uri(), "?cmd=msg&user=SMS&pswd=123");
    }

    #[tokio::test]
    async fn pipeline_translates_error_statuses() {
        for (status, kind) in [
            (400, GatewayErrorKind::BadRequest),
            (401, GatewayErrorKind::Unauthorized),
            (404, GatewayErrorKind::NotFound),
        ] {
            let pipeline = Pipeline::new(
                credentials(),
                Some(endpoint()),
                Vec::new(),
                EchoTransport::new(status),
            );
            let err = pipeline
                .send(HttpRequest::get("", Vec::new()))
                .await
                .unwrap_err();
            assert_eq!(err.gateway_kind(), Some(kind));
        }
    }

    #[tokio::test]
    async fn custom_middleware_runs_outermost() {
        let recorder = Arc::new(Recorder::default());
        let transport = EchoTransport::new(500);
        let pipeline = Pipeline::new(
            credentials(),
            Some(endpoint()),
            vec![recorder.clone() as Arc<dyn Middleware>],
            transport.clone(),
        );

        let response = pipeline
            .send(HttpRequest::get("", query(&[("cmd", "msg")])))
            .await
            .unwrap();
        assert_eq!(response.status, 500);
        assert_eq!(transport.last().query_value("lang"), Some("ru"));
        assert_eq!(*recorder.statuses.lock().unwrap(), vec![500]);
    }

    #[tokio::test]
    async fn custom_middleware_does_not_see_translated_errors() {
        let recorder = Arc::new(Recorder::default());
        let pipeline = Pipeline::new(
            credentials(),
            Some(endpoint()),
            vec![recorder.clone() as Arc<dyn Middleware>],
            EchoTransport::new(401),
        );

        let err = pipeline
            .send(HttpRequest::get("", Vec::new()))
            .await
            .unwrap_err();
        assert_eq!(err.gateway_kind(), Some(GatewayErrorKind::Unauthorized));
        assert!(recorder.statuses.lock().unwrap().is_empty());
    }
}
