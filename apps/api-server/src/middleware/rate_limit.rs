//! Rate limiting middleware.

use actix_web::{
    Error, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use diner_core::ports::RateLimiter;

use super::error::AppError;

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Rate limiting middleware factory, keyed by client address.
pub struct RateLimitMiddleware {
    limiter: Arc<dyn RateLimiter>,
    advisory: Arc<str>,
    trust_proxy: bool,
}

impl RateLimitMiddleware {
    /// With `trust_proxy` off the key is the socket peer's IP and forwarding
    /// headers are ignored.
    pub fn new(
        limiter: Arc<dyn RateLimiter>,
        advisory: impl Into<Arc<str>>,
        trust_proxy: bool,
    ) -> Self {
        Self {
            limiter,
            advisory: advisory.into(),
            trust_proxy,
        }
    }
}

fn client_key(req: &ServiceRequest, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(addr) = req.connection_info().realip_remote_addr() {
            return addr.to_string();
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            advisory: self.advisory.clone(),
            trust_proxy: self.trust_proxy,
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: Arc<dyn RateLimiter>,
    advisory: Arc<str>,
    trust_proxy: bool,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limiter = self.limiter.clone();
        let advisory = self.advisory.clone();

        let key = client_key(&req, self.trust_proxy);

        Box::pin(async move {
            match limiter.check(&key).await {
                Ok(result) if !result.allowed => {
                    tracing::warn!(client = %key, "Order rate limit exceeded");

                    let error = AppError::RateLimited {
                        message: advisory.to_string(),
                        retry_after: result.reset_after,
                    };
                    let mut response = error.error_response();
                    response.headers_mut().insert(
                        HeaderName::from_static(LIMIT_HEADER),
                        HeaderValue::from(result.limit),
                    );

                    let (http_req, _payload) = req.into_parts();
                    Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                }
                Ok(result) => {
                    let mut res = service.call(req).await?;
                    let headers = res.headers_mut();
                    headers.insert(
                        HeaderName::from_static(LIMIT_HEADER),
                        HeaderValue::from(result.limit),
                    );
                    headers.insert(
                        HeaderName::from_static(REMAINING_HEADER),
                        HeaderValue::from(result.remaining),
                    );
                    Ok(res.map_into_left_body())
                }
                Err(e) => {
                    // Fail open
                    tracing::error!(error = %e, "Rate limiter error, admitting request");
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
            }
        })
    }
}
