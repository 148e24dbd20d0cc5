use std::collections::BTreeMap;

use serde::Serialize;

use crate::entities::Alert;

/// Statuses that no longer need a response. Anything else counts as open.
pub const CLOSED_STATUSES: &[&str] = &["Aprovado"];

/// Summary cards derived from the currently loaded alert list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub open: usize,
    pub by_status: BTreeMap<String, usize>,
}

impl DashboardSummary {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let mut by_status = BTreeMap::new();
        for alert in alerts {
            *by_status.entry(alert.status.clone()).or_insert(0) += 1;
        }
        let open = alerts
            .iter()
            .filter(|a| !CLOSED_STATUSES.contains(&a.status.as_str()))
            .count();
        Self {
            total: alerts.len(),
            open,
            by_status,
        }
    }

    /// Share of alerts already closed, as a whole percentage.
    pub fn closed_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (((self.total - self.open) * 100) / self.total) as u8
    }
}
