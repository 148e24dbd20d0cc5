use std::sync::Arc;

use tracing::{error, info};

use crate::api::AlertService;
use crate::entities::Alert;
use crate::error::FetchError;

/// In-memory alert list. Every refresh replaces the whole list; nothing is
/// cached across restarts.
pub struct AlertList {
    service: Arc<dyn AlertService>,
    alerts: Vec<Alert>,
    error: Option<String>,
}

impl AlertList {
    pub fn new(service: Arc<dyn AlertService>) -> Self {
        Self {
            service,
            alerts: Vec::new(),
            error: None,
        }
    }

    /// Initial load and pull-to-refresh. On failure the list is cleared and
    /// a non-blocking error message is kept for display.
    pub async fn refresh(&mut self) -> Result<usize, FetchError> {
        match self.service.list_alerts().await {
            Ok(alerts) => {
                info!(count = alerts.len(), "alerts loaded");
                crate::metrics::increment_alerts_fetched(alerts.len());
                self.alerts = alerts;
                self.error = None;
                Ok(self.alerts.len())
            }
            Err(e) => {
                error!(error = %e, "failed to load alerts");
                crate::metrics::increment_fetch_failures("alerts");
                self.alerts.clear();
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn find(&self, alert_id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == alert_id)
    }
}
