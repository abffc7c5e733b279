/// Text formatting shared by the gallery and history projections

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Labels longer than this are cut in list views
pub const LABEL_LIMIT: usize = 30;
const ELLIPSIS: &str = "...";

/// Keep the first `LABEL_LIMIT` characters, marking the cut with an ellipsis
pub fn truncate_label(label: &str) -> String {
    match label.char_indices().nth(LABEL_LIMIT) {
        Some((cut, _)) => format!("{}{}", &label[..cut], ELLIPSIS),
        None => label.to_string(),
    }
}

/// Turn the server's compact "YYYYMMDD_HHMMSS" capture time into
/// "YYYY-MM-DD HH:MM:SS" by fixed positions. Anything too short to slice
/// is returned as-is.
pub fn format_capture_time(timestamp: &str) -> String {
    let parts = (
        timestamp.get(0..4),
        timestamp.get(4..6),
        timestamp.get(6..8),
        timestamp.get(9..11),
        timestamp.get(11..13),
        timestamp.get(13..15),
    );

    match parts {
        (Some(y), Some(mo), Some(d), Some(h), Some(mi), Some(s)) => {
            format!("{y}-{mo}-{d} {h}:{mi}:{s}")
        }
        _ => timestamp.to_string(),
    }
}

/// Date part of a location's last-used time.
///
/// Accepts RFC 3339, ISO-8601 without offset, a bare date, or the compact
/// capture format.
pub fn format_last_used(last_used: Option<&str>) -> String {
    let Some(raw) = last_used.map(str::trim).filter(|s| !s.is_empty()) else {
        return "never".to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format("%Y-%m-%d").to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }

    // Compact form: slice the date out like capture times
    let compact_date = raw.get(0..8).filter(|d| d.bytes().all(|b| b.is_ascii_digit()));
    match compact_date {
        Some(d) => format!("{}-{}-{}", &d[0..4], &d[4..6], &d[6..8]),
        None => raw.to_string(),
    }
}

pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    format!("{latitude:.6}, {longitude:.6}")
}
