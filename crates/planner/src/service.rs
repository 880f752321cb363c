//! The planning service seam.
//!
//! [`PlannerService`] is what the orchestrators talk to. Methods return
//! boxed futures so the trait stays dyn-compatible and can be shared as
//! `Arc<dyn PlannerService>`.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::protocol::{
    AdminObstacles, ConfirmObstaclesRequest, DeleteObstacleRequest, ObstaclesRequest,
    ObstaclesResponse, RouteRequest, RouteResponse,
};

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Header carrying the moderator credential.
pub const ADMIN_SECRET_HEADER: &str = "ADMIN_SECRET";

/// Opaque moderator credential, forwarded verbatim.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminSecret(String);

impl AdminSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminSecret(***)")
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// The request never produced a response.
    Transport,
    /// Non-success HTTP status.
    Status(u16),
    /// The response body did not match the expected shape.
    Decode,
}

/// Error type for service calls.
#[derive(Debug)]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        kind: ServiceErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn status(code: u16, endpoint: &str) -> Self {
        Self::new(
            ServiceErrorKind::Status(code),
            format!("{endpoint} returned HTTP {code}"),
        )
    }

    /// The credential was rejected.
    pub fn is_forbidden(&self) -> bool {
        matches!(self.kind, ServiceErrorKind::Status(401 | 403))
    }
}

/// Remote route planning and obstacle moderation.
pub trait PlannerService: Send + Sync {
    /// `POST /route`.
    fn plan_route(&self, request: RouteRequest) -> BoxFuture<'_, Result<RouteResponse, ServiceError>>;

    /// `POST /obstacles`: saves the given points (if any) and returns the
    /// full server-side set.
    fn sync_obstacles(
        &self,
        request: ObstaclesRequest,
    ) -> BoxFuture<'_, Result<ObstaclesResponse, ServiceError>>;

    /// `GET /get-obstacles`.
    fn list_obstacles(&self, secret: AdminSecret) -> BoxFuture<'_, Result<AdminObstacles, ServiceError>>;

    /// `POST /confirm-obstacles`.
    fn confirm_obstacles(
        &self,
        secret: AdminSecret,
        request: ConfirmObstaclesRequest,
    ) -> BoxFuture<'_, Result<(), ServiceError>>;

    /// `POST /delete-obstacle`.
    fn delete_obstacle(
        &self,
        secret: AdminSecret,
        request: DeleteObstacleRequest,
    ) -> BoxFuture<'_, Result<(), ServiceError>>;
}

/// Connection settings for the HTTP adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("exodus/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn build_client(&self) -> Result<reqwest::Client, ServiceError> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(|e| {
                ServiceError::with_source(ServiceErrorKind::Transport, "failed to build HTTP client", e)
            })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// [`PlannerService`] over JSON/HTTP.
pub struct HttpPlannerService {
    config: ServiceConfig,
    client: reqwest::Client,
}

impl HttpPlannerService {
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let client = config.build_client()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        secret: Option<&AdminSecret>,
    ) -> reqwest::RequestBuilder {
        let mut req = self.client.post(self.config.url(path)).json(body);
        if let Some(secret) = secret {
            req = req.header(ADMIN_SECRET_HEADER, secret.expose());
        }
        req
    }

    async fn send(
        &self,
        req: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<reqwest::Response, ServiceError> {
        let resp = req.send().await.map_err(|e| {
            ServiceError::with_source(
                ServiceErrorKind::Transport,
                format!("{endpoint} request failed"),
                e,
            )
        })?;

        let status = resp.status();
        debug!(endpoint, status = status.as_u16(), "planner response");
        if !status.is_success() {
            return Err(ServiceError::status(status.as_u16(), endpoint));
        }
        Ok(resp)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<T, ServiceError> {
        let resp = self.send(req, endpoint).await?;
        resp.json::<T>().await.map_err(|e| {
            ServiceError::with_source(
                ServiceErrorKind::Decode,
                format!("{endpoint} returned an unexpected body"),
                e,
            )
        })
    }
}

impl PlannerService for HttpPlannerService {
    fn plan_route(&self, request: RouteRequest) -> BoxFuture<'_, Result<RouteResponse, ServiceError>> {
        Box::pin(async move {
            let req = self.post("route", &request, None);
            self.send_json(req, "POST /route").await
        })
    }

    fn sync_obstacles(
        &self,
        request: ObstaclesRequest,
    ) -> BoxFuture<'_, Result<ObstaclesResponse, ServiceError>> {
        Box::pin(async move {
            let req = self.post("obstacles", &request, None);
            self.send_json(req, "POST /obstacles").await
        })
    }

    fn list_obstacles(&self, secret: AdminSecret) -> BoxFuture<'_, Result<AdminObstacles, ServiceError>> {
        Box::pin(async move {
            let req = self
                .client
                .get(self.config.url("get-obstacles"))
                .header(ADMIN_SECRET_HEADER, secret.expose());
            self.send_json(req, "GET /get-obstacles").await
        })
    }

    fn confirm_obstacles(
        &self,
        secret: AdminSecret,
        request: ConfirmObstaclesRequest,
    ) -> BoxFuture<'_, Result<(), ServiceError>> {
        Box::pin(async move {
            let req = self.post("confirm-obstacles", &request, Some(&secret));
            self.send(req, "POST /confirm-obstacles").await.map(|_| ())
        })
    }

    fn delete_obstacle(
        &self,
        secret: AdminSecret,
        request: DeleteObstacleRequest,
    ) -> BoxFuture<'_, Result<(), ServiceError>> {
        Box::pin(async move {
            let req = self.post("delete-obstacle", &request, Some(&secret));
            self.send(req, "POST /delete-obstacle").await.map(|_| ())
        })
    }
}
