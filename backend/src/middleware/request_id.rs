//! Request identifiers and the per-request log line.
//!
//! [`RequestTracing`] gives every payments request a [`RequestId`], keeps it
//! in task-local storage while the handler runs and returns it in the
//! `request-id` header. A caller that already sent a UUID `request-id` keeps
//! it. Work spawned onto other tasks must re-enter [`RequestId::scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tokio::task_local;
use tracing::{info, warn};
use uuid::Uuid;

/// Header read from requests and written to responses.
pub const REQUEST_ID_HEADER: &str = "request-id";

task_local! {
    static REQUEST_ID: RequestId;
}

/// Identifier correlating the log lines of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(Uuid);

impl RequestId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reuse a well-formed identifier sent by the caller, or mint one.
    fn for_request(req: &ServiceRequest) -> Self {
        req.headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or_else(Self::generate)
    }

    /// The identifier of the request being served, if any.
    pub fn current() -> Option<Self> {
        REQUEST_ID.try_with(|id| *id).ok()
    }

    /// Run `fut` with `request_id` as the current identifier.
    ///
    /// ```
    /// use payments::middleware::RequestId;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let id: RequestId = "6f2c1a7e-0b9d-4c55-8a51-3d0c2f6e9b14".parse().expect("uuid");
    /// assert_eq!(RequestId::scope(id, async { RequestId::current() }).await, Some(id));
    /// # });
    /// ```
    pub async fn scope<Fut>(request_id: RequestId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        REQUEST_ID.scope(request_id, fut).await
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Middleware wrapping the payments API.
///
/// ```
/// use actix_web::App;
/// use payments::middleware::RequestTracing;
///
/// let app = App::new().wrap(RequestTracing);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestTracing;

impl<S, B> Transform<S, ServiceRequest> for RequestTracing
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTracingMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTracingMiddleware { service }))
    }
}

pub struct RequestTracingMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTracingMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = RequestId::for_request(&req);
        let method = req.method().clone();
        let path = req.path().to_owned();
        let started = Instant::now();
        let fut = self.service.call(req);

        Box::pin(RequestId::scope(request_id, async move {
            let latency_ms = |started: Instant| started.elapsed().as_millis();
            match fut.await {
                Ok(mut res) => {
                    info!(
                        %request_id,
                        %method,
                        %path,
                        status = res.status().as_u16(),
                        latency_ms = latency_ms(started),
                        "request completed"
                    );
                    // A hyphenated UUID is always a valid header value.
                    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                        res.headers_mut()
                            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                    }
                    Ok(res)
                }
                Err(err) => {
                    warn!(
                        %request_id,
                        %method,
                        %path,
                        status = err.as_response_error().status_code().as_u16(),
                        latency_ms = latency_ms(started),
                        error = %err,
                        "request failed"
                    );
                    Err(err)
                }
            }
        }))
    }
}
