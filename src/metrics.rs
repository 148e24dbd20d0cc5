//! Counters and histograms for the alert workflows. No-ops unless a recorder
//! is installed (the `mipi` binary installs a Prometheus one).

pub fn increment_alerts_fetched(count: usize) {
    metrics::counter!("mipi_alerts_fetched_total").increment(count as u64);
}

pub fn increment_fetch_failures(resource: &str) {
    metrics::counter!("mipi_fetch_failures_total", "resource" => resource.to_string()).increment(1);
}

pub fn increment_action_fallbacks(reason: &str) {
    metrics::counter!("mipi_corrective_action_fallbacks_total", "reason" => reason.to_string())
        .increment(1);
}

pub fn increment_justifications_submitted() {
    metrics::counter!("mipi_justifications_submitted_total").increment(1);
}

pub fn increment_justifications_failed(reason: &str) {
    metrics::counter!("mipi_justifications_failed_total", "reason" => reason.to_string())
        .increment(1);
}

pub fn record_submit_duration(seconds: f64) {
    metrics::histogram!("mipi_justification_submit_duration_seconds").record(seconds);
}
