//! Metrics for upload verification and login tracking.
//!
//! # Metrics
//! - `reception_upload_validations_total` (counter): by extension, outcome
//! - `reception_login_attempts_total` (counter): recorded attempts
//! - `reception_login_tracked_keys` (gauge): records currently stored
//! - `reception_login_evictions_total` (counter): expired records removed

pub fn record_validation(extension: &str, valid: bool) {
    let outcome = if valid { "match" } else { "mismatch" };
    metrics::counter!(
        "reception_upload_validations_total",
        "extension" => extension.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_login_attempt() {
    metrics::counter!("reception_login_attempts_total").increment(1);
}

pub fn record_tracked_keys(count: usize) {
    metrics::gauge!("reception_login_tracked_keys").set(count as f64);
}

pub fn record_evictions(count: usize) {
    metrics::counter!("reception_login_evictions_total").increment(count as u64);
}
