/// mm:ss timer display, zero-padded.
pub fn format_mm_ss(total_seconds: u64) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Human-readable total ("3 minutes 7 seconds"), singular where it applies.
pub fn format_time_taken(elapsed_ms: i64) -> String {
    let total_seconds = (elapsed_ms / 1000).max(0);
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!(
        "{} minute{} {} second{}",
        minutes,
        if minutes == 1 { "" } else { "s" },
        seconds,
        if seconds == 1 { "" } else { "s" }
    )
}
