/// Minutes with one decimal, e.g. `90` seconds is `1.5`.
#[must_use]
pub fn format_minutes(secs: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let minutes = secs as f64 / 60.0;
    format!("{:.1}", (minutes * 10.0).round() / 10.0)
}

/// `<minutes> min (<seconds> sec)`.
#[must_use]
pub fn format_duration(secs: u64) -> String {
    format!("{} min ({secs} sec)", format_minutes(secs))
}
