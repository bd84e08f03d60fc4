//! Audit trail for mutating requests.
//!
//! Events go to the `audit` tracing target so they can be routed separately.
//!
//! ```ignore
//! use axum_helpers::audit::{AuditContext, AuditEvent, AuditOutcome};
//!
//! AuditEvent::new("product.delete", AuditOutcome::Denied)
//!     .with_resource(format!("product:{id}"))
//!     .with_context(&ctx)
//!     .with_details(json!({ "reason": "invalid token" }))
//!     .log();
//! ```

use crate::http::client_ip;
use axum::{
    extract::FromRequestParts,
    http::{header::USER_AGENT, request::Parts},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::convert::Infallible;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    Success,
    /// Rejected input or a store failure
    Failure,
    /// Missing or invalid credentials
    Denied,
}

/// Who sent a request, captured for audit events.
///
/// Extraction never fails; unknown values are `None`.
#[derive(Debug, Clone, Default)]
pub struct AuditContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl<S> FromRequestParts<S> for AuditContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            ip_address: client_ip(&parts.headers, &parts.extensions).map(|ip| ip.to_string()),
            user_agent: parts
                .headers
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AuditEvent {
    /// Dotted action name, e.g. `product.update`
    pub action: String,
    /// e.g. `product:0190…`
    pub resource: Option<String>,
    pub outcome: AuditOutcome,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(action: impl Into<String>, outcome: AuditOutcome) -> Self {
        Self {
            action: action.into(),
            resource: None,
            outcome,
            ip_address: None,
            user_agent: None,
            timestamp: Utc::now(),
            details: None,
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_context(mut self, context: &AuditContext) -> Self {
        self.ip_address = context.ip_address.clone();
        self.user_agent = context.user_agent.clone();
        self
    }

    pub fn with_details(mut self, details: impl Serialize) -> Self {
        self.details = serde_json::to_value(details).ok();
        self
    }

    pub fn log(self) {
        tracing::info!(
            target: "audit",
            action = %self.action,
            resource = self.resource,
            outcome = ?self.outcome,
            ip = self.ip_address,
            user_agent = self.user_agent,
            details = ?self.details,
            "{}",
            serde_json::to_string(&self).unwrap_or_else(|_| "Failed to serialize audit event".to_string())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_serialization() {
        let context = AuditContext {
            ip_address: Some("203.0.113.9".into()),
            user_agent: Some("curl/8.0".into()),
        };
        let event = AuditEvent::new("product.create", AuditOutcome::Denied)
            .with_resource("product")
            .with_context(&context)
            .with_details(json!({ "reason": "missing token" }));

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["outcome"], "denied");
        assert_eq!(value["ip_address"], "203.0.113.9");
        assert_eq!(value["details"]["reason"], "missing token");
        assert!(value["timestamp"].is_i64());
    }

    #[tokio::test]
    async fn test_context_extraction() {
        let request = axum::http::Request::builder()
            .header("x-real-ip", "198.51.100.4")
            .header("user-agent", "integration-test")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let context = AuditContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(context.ip_address.as_deref(), Some("198.51.100.4"));
        assert_eq!(context.user_agent.as_deref(), Some("integration-test"));
    }
}
