use store::model::HolidayMode;

/// Whether holiday mode suppresses all materialization for `today`.
///
/// `today` must be `YYYY-MM-DD`. Fixed-width zero-padded dates make plain
/// string comparison equivalent to date comparison, so the window check
/// needs no parsing. The window is inclusive on both ends; a half-set
/// window never suppresses.
pub fn is_suppressed(holiday_mode: &HolidayMode, today: &str) -> bool {
    if !holiday_mode.enabled {
        return false;
    }

    match (&holiday_mode.start_date, &holiday_mode.end_date) {
        (Some(start), Some(end)) => start.as_str() <= today && today <= end.as_str(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(enabled: bool, start: Option<&str>, end: Option<&str>) -> HolidayMode {
        HolidayMode {
            enabled,
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
            ..HolidayMode::default()
        }
    }

    #[test]
    fn disabled_mode_never_suppresses() {
        let mode = window(false, Some("2025-06-01"), Some("2025-06-30"));
        assert!(!is_suppressed(&mode, "2025-06-15"));
    }

    #[test]
    fn half_set_window_never_suppresses() {
        assert!(!is_suppressed(
            &window(true, Some("2025-06-01"), None),
            "2025-06-15"
        ));
        assert!(!is_suppressed(
            &window(true, None, Some("2025-06-30")),
            "2025-06-15"
        ));
        assert!(!is_suppressed(&window(true, None, None), "2025-06-15"));
    }

    #[test]
    fn inside_window_suppresses() {
        let mode = window(true, Some("2025-06-01"), Some("2025-06-30"));
        assert!(is_suppressed(&mode, "2025-06-15"));
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let mode = window(true, Some("2025-06-01"), Some("2025-06-30"));
        assert!(is_suppressed(&mode, "2025-06-01"));
        assert!(is_suppressed(&mode, "2025-06-30"));
    }

    #[test]
    fn outside_window_does_not_suppress() {
        let mode = window(true, Some("2025-06-01"), Some("2025-06-30"));
        assert!(!is_suppressed(&mode, "2025-05-31"));
        assert!(!is_suppressed(&mode, "2025-07-01"));
    }
}
