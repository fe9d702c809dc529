//! Operation Context
//!
//! Per-request metadata used to correlate log lines and spans.

use std::net::IpAddr;

use serde::Serialize;
use uuid::Uuid;

/// Header carrying the correlation id in both directions
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Context for one request
#[derive(Debug, Clone, Serialize)]
pub struct OperationContext {
    /// Correlation ID for request tracing
    pub correlation_id: Uuid,

    /// Client IP address, when the transport knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<IpAddr>,
}

impl OperationContext {
    /// Fresh context with a random correlation id
    pub fn new() -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            client_ip: None,
        }
    }

    /// Reuse an upstream correlation id when it parses, otherwise start a new one
    pub fn from_header(value: Option<&str>) -> Self {
        let correlation_id = value
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .unwrap_or_else(Uuid::new_v4);

        Self {
            correlation_id,
            client_ip: None,
        }
    }

    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header_reuses_valid_id() {
        let id = Uuid::new_v4();
        let context = OperationContext::from_header(Some(&id.to_string()));
        assert_eq!(context.correlation_id, id);
    }

    #[test]
    fn test_from_header_replaces_invalid_id() {
        let context = OperationContext::from_header(Some("not-a-uuid"));
        assert!(!context.correlation_id.is_nil());

        let a = OperationContext::from_header(None);
        let b = OperationContext::from_header(None);
        assert_ne!(a.correlation_id, b.correlation_id);
    }

    #[test]
    fn test_with_client_ip() {
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        let context = OperationContext::new().with_client_ip(ip);
        assert_eq!(context.client_ip, Some(ip));
    }
}
