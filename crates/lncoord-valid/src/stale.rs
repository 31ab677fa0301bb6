//! The staleness predicate shared by validation, sanitization, and the
//! background sweeper.

use lncoord_types::PairData;

/// Returns true if the record's most recent observation is older than the
/// threshold, measured against the supplied current time.
///
/// A record with no observations at all (`last_observed() == 0`) is stale
/// for any sane threshold.
pub fn is_history_stale(history: &PairData, threshold_secs: i64, now: i64) -> bool {
    history.last_observed() < now - threshold_secs
}

/// Render a duration in seconds as a compact human-readable string, e.g.
/// `90` becomes `1m30s` and `3600` becomes `1h`. Used in operator-facing
/// log lines and error messages.
pub fn format_duration(secs: i64) -> String {
    if secs <= 0 {
        return format!("{}s", secs);
    }

    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    if seconds > 0 || out.is_empty() {
        out.push_str(&format!("{}s", seconds));
    }
    out
}
