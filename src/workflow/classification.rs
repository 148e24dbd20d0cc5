use tracing::{debug, warn};

use crate::api::AlertService;
use crate::entities::{Alert, Classification, CorrectiveAction};
use crate::error::FetchError;

/// Classification id ⇄ label lookup, loaded once and shared by detail views.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassificationTable {
    entries: Vec<Classification>,
}

impl ClassificationTable {
    pub fn new(entries: Vec<Classification>) -> Self {
        Self { entries }
    }

    pub async fn fetch(service: &dyn AlertService) -> Result<Self, FetchError> {
        Ok(Self::new(service.classifications().await?))
    }

    /// Like [`ClassificationTable::fetch`], but a failure yields an empty
    /// table so corrective actions fall back to the generic list.
    pub async fn fetch_or_empty(service: &dyn AlertService) -> Self {
        match Self::fetch(service).await {
            Ok(table) => table,
            Err(e) => {
                warn!(error = %e, "classification table unavailable");
                crate::metrics::increment_fetch_failures("classifications");
                Self::default()
            }
        }
    }

    /// Resolves an alert's classification reference, which may be either the
    /// id or the label, to the classification id.
    pub fn id_for(&self, reference: &str) -> Option<&str> {
        let reference = reference.trim();
        self.entries
            .iter()
            .find(|c| c.key == reference)
            .or_else(|| self.entries.iter().find(|c| c.value.trim() == reference))
            .map(|c| c.key.as_str())
    }

    pub fn label_for(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|c| c.key == id)
            .map(|c| c.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Corrective actions offered for an alert. Never empty: an unknown
/// classification, an empty server list or a failed fetch all yield
/// [`CorrectiveAction::fallback_list`].
pub async fn resolve_corrective_actions(
    service: &dyn AlertService,
    table: &ClassificationTable,
    alert: &Alert,
) -> Vec<CorrectiveAction> {
    if alert.classification_refs().next().is_none() {
        return fallback(&alert.id, "no_classification");
    }
    let Some(classification_id) = alert.classification_refs().find_map(|r| table.id_for(r)) else {
        return fallback(&alert.id, "unknown_classification");
    };

    match service.corrective_actions(classification_id).await {
        Ok(actions) if !actions.is_empty() => {
            debug!(alert_id = %alert.id, classification_id, count = actions.len(), "corrective actions loaded");
            actions
        }
        Ok(_) => fallback(&alert.id, "empty"),
        Err(e) => {
            warn!(alert_id = %alert.id, classification_id, error = %e, "corrective actions unavailable");
            crate::metrics::increment_fetch_failures("corrective_actions");
            fallback(&alert.id, "fetch_error")
        }
    }
}

fn fallback(alert_id: &str, reason: &str) -> Vec<CorrectiveAction> {
    debug!(alert_id, reason, "using generic corrective actions");
    crate::metrics::increment_action_fallbacks(reason);
    CorrectiveAction::fallback_list()
}
