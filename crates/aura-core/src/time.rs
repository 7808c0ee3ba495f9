//! Clock-time helpers.
//!
//! Time anchors in settings are stored as milliseconds from midnight;
//! event timestamps and contract dates are epoch-milliseconds.

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Format milliseconds-from-midnight as `HH:MM`, wrapping at 24 hours.
pub fn ms_to_hhmm(ms: i64) -> String {
    let total_min = ms / MS_PER_MINUTE;
    let hh = (total_min / 60).rem_euclid(24);
    let mm = total_min % 60;
    format!("{:02}:{:02}", hh, mm)
}

/// Parse an `HH:MM` string into milliseconds from midnight.
///
/// # Errors
///
/// Returns an error message for anything that is not two colon-separated
/// integer fields.
pub fn hhmm_to_ms(hhmm: &str) -> std::result::Result<i64, String> {
    let (h, m) = hhmm
        .split_once(':')
        .ok_or_else(|| format!("Expected HH:MM, got \"{}\"", hhmm))?;
    let h: i64 = h
        .trim()
        .parse()
        .map_err(|_| format!("Invalid hour in \"{}\"", hhmm))?;
    let m: i64 = m
        .trim()
        .parse()
        .map_err(|_| format!("Invalid minute in \"{}\"", hhmm))?;
    Ok((h * 60 + m) * MS_PER_MINUTE)
}

/// Whole days between two epoch-ms timestamps (order-insensitive, floored).
pub fn days_between(a: i64, b: i64) -> i64 {
    (b - a).abs() / MS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_hhmm_formats_and_wraps() {
        assert_eq!(ms_to_hhmm(0), "00:00");
        assert_eq!(ms_to_hhmm(4 * 60 * 60 * 1000), "04:00");
        assert_eq!(ms_to_hhmm(13 * 60 * 60 * 1000 + 30 * 60 * 1000), "13:30");
        // 25:15 wraps to 01:15
        assert_eq!(ms_to_hhmm(25 * 60 * 60 * 1000 + 15 * 60 * 1000), "01:15");
    }

    #[test]
    fn test_hhmm_to_ms_round_trip() {
        let ms = hhmm_to_ms("04:00").unwrap();
        assert_eq!(ms, 4 * 60 * 60 * 1000);
        assert_eq!(ms_to_hhmm(ms), "04:00");

        assert_eq!(hhmm_to_ms("21:00").unwrap(), 21 * 60 * 60 * 1000);
    }

    #[test]
    fn test_hhmm_to_ms_rejects_garbage() {
        assert!(hhmm_to_ms("noon").is_err());
        assert!(hhmm_to_ms("12").is_err());
        assert!(hhmm_to_ms("a:b").is_err());
    }

    #[test]
    fn test_days_between_floors_and_ignores_order() {
        let day = 24 * 60 * 60 * 1000;
        assert_eq!(days_between(0, day - 1), 0);
        assert_eq!(days_between(0, day), 1);
        assert_eq!(days_between(3 * day, 0), 3);
        assert_eq!(days_between(0, 90 * day + 12 * 60 * 60 * 1000), 90);
    }
}
