//! API Middleware
//!
//! Request context and request logging.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    async_trait,
    body::Body,
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::domain::{OperationContext, CORRELATION_ID_HEADER};

// =========================================================================
// Request context
// =========================================================================

fn context_from_headers(headers: &HeaderMap) -> OperationContext {
    OperationContext::from_header(
        headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok()),
    )
}

/// Attach an [`OperationContext`] to every request and echo its correlation
/// id back to the client
pub async fn context_middleware(mut request: Request<Body>, next: Next) -> Response {
    let mut context = context_from_headers(request.headers());
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        context = context.with_client_ip(addr.ip());
    }

    let correlation_id = context.correlation_id;
    request.extensions_mut().insert(context);

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&correlation_id.to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(CORRELATION_ID_HEADER), value);
    }
    response
}

/// Handlers take the context set by [`context_middleware`]. Routers mounted
/// without it still get one built from the request headers.
#[async_trait]
impl<S> FromRequestParts<S> for OperationContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(context) = parts.extensions.get::<OperationContext>() {
            return Ok(context.clone());
        }
        Ok(context_from_headers(&parts.headers))
    }
}

// =========================================================================
// mask_headers_for_logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "proxy-authorization",
    "cookie",
    "set-cookie",
];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let masked_value = if SENSITIVE_HEADERS.contains(&name.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

// =========================================================================
// Request Logging Middleware
// =========================================================================

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let headers = mask_headers_for_logging(request.headers());
    let correlation_id = request
        .extensions()
        .get::<OperationContext>()
        .map(|ctx| ctx.correlation_id);

    let start = std::time::Instant::now();

    tracing::debug!(
        method = %method,
        uri = %uri,
        correlation_id = ?correlation_id,
        headers = ?headers,
        "Incoming request"
    );

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = %start.elapsed().as_millis(),
        correlation_id = ?correlation_id,
        "Request completed"
    );

    response
}
