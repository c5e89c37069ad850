//! Audit sink for deployments without dedicated audit storage.
//! Persisting audit events is outside the authorization core.

use async_trait::async_trait;
use tracing::info;

use tradecore_application::{AuditEvent, AuditRepository};
use tradecore_core::AppResult;

/// Audit repository that writes events to tracing output.
#[derive(Clone)]
pub struct TracingAuditRepository;

impl TracingAuditRepository {
    /// Creates a new tracing-backed audit repository.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingAuditRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditRepository for TracingAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        info!(
            user_id = %event.user_id,
            action = event.action.as_str(),
            detail = event.detail.as_deref().unwrap_or_default(),
            "audit event"
        );
        Ok(())
    }
}
