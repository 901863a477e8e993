//! Time formatting helpers.

use std::time::Duration;

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// "in 3d 4h", or "now" once the duration has elapsed.
pub fn format_eta(remaining: Duration) -> String {
    match remaining.as_secs() {
        0 => "now".to_string(),
        secs => format!("in {}", format_duration(secs)),
    }
}
