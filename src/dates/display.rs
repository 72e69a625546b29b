use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

/// `YYYY-MM-DD` → `DD-MM-YYYY`. Empty input stays empty.
pub fn format_for_display(date: &str) -> String {
    if date.is_empty() {
        return String::new();
    }
    let day = day_key(date);
    let mut parts = day.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(y), Some(m), Some(d)) => format!("{}-{}-{}", d, m, y),
        _ => day.to_string(),
    }
}

/// True for anything that reads as a real calendar day: plain `YYYY-MM-DD`,
/// RFC 3339, or a zone-less ISO date-time.
pub fn is_valid_date(date: &str) -> bool {
    let s = date.trim();
    if s.is_empty() {
        return false;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

/// Day part of a server timestamp (`2024-01-01T00:00:00.000Z` → `2024-01-01`).
pub fn day_key(server_date: &str) -> &str {
    server_date.split('T').next().unwrap_or(server_date)
}

/// The `n` calendar days ending at `today`, oldest first.
pub fn last_n_days(today: NaiveDate, n: usize) -> Vec<String> {
    (0..n)
        .rev()
        .map(|back| (today - Duration::days(back as i64)).format("%Y-%m-%d").to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_flips_iso_days() {
        assert_eq!(format_for_display("2024-03-15"), "15-03-2024");
        assert_eq!(format_for_display("2024-03-15T00:00:00.000Z"), "15-03-2024");
        assert_eq!(format_for_display(""), "");
    }

    #[test]
    fn validity() {
        assert!(is_valid_date("2024-02-29"));
        assert!(is_valid_date("2024-01-01T10:00:00.000Z"));
        assert!(is_valid_date("2024-01-01T10:00:00"));
        assert!(!is_valid_date("2023-02-29"));
        assert!(!is_valid_date("2024-13-01"));
        assert!(!is_valid_date(""));
        assert!(!is_valid_date("soon"));
    }

    #[test]
    fn day_key_strips_time() {
        assert_eq!(day_key("2024-01-01T05:30:00.000Z"), "2024-01-01");
        assert_eq!(day_key("2024-01-01"), "2024-01-01");
    }

    #[test]
    fn last_days_end_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        assert_eq!(
            last_n_days(today, 3),
            vec!["2024-02-29", "2024-03-01", "2024-03-02"]
        );
        assert!(last_n_days(today, 0).is_empty());
    }
}
