use chrono::{DateTime, Local, TimeZone};

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human-readable byte count using binary (1024) units. Values under one
/// kilobyte render without a decimal place.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// Relative date for file listings: time-of-day today, "Yesterday", the
/// weekday name within a week, otherwise a full date.
pub fn format_date(timestamp_ms: i64) -> String {
    let date: DateTime<Local> = Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .unwrap_or_else(Local::now);

    let elapsed_ms = Local::now().timestamp_millis() - date.timestamp_millis();
    let elapsed_days = elapsed_ms / (1000 * 60 * 60 * 24);

    match elapsed_days {
        0 => date.format("%H:%M").to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => date.format("%A").to_string(),
        _ => date.format("%b %d, %Y").to_string(),
    }
}
