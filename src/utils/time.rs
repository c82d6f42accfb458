use chrono::{Local, NaiveDate};
use std::cmp::Ordering;

/// Date format used on assignments (DD/MM/YYYY)
pub const FRENCH_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a date in DD/MM/YYYY format
pub fn parse_french_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), FRENCH_DATE_FORMAT).ok()
}

/// Format a date as DD/MM/YYYY
pub fn format_french_date(date: NaiveDate) -> String {
    date.format(FRENCH_DATE_FORMAT).to_string()
}

/// Today's local date as DD/MM/YYYY
pub fn today_french() -> String {
    format_french_date(Local::now().date_naive())
}

/// Order two DD/MM/YYYY strings newest first. Unparseable dates go last.
pub fn cmp_french_dates_desc(a: &str, b: &str) -> Ordering {
    match (parse_french_date(a), parse_french_date(b)) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_french_date() {
        // Valid cases
        assert_eq!(
            parse_french_date("05/03/2025"),
            NaiveDate::from_ymd_opt(2025, 3, 5)
        );
        assert_eq!(
            parse_french_date(" 31/12/2024 "),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );

        // Invalid cases
        assert_eq!(parse_french_date("2025-03-05"), None);
        assert_eq!(parse_french_date("32/01/2025"), None);
        assert_eq!(parse_french_date(""), None);
    }

    #[test]
    fn test_format_french_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 7).unwrap();
        assert_eq!(format_french_date(date), "07/01/2025");
    }

    #[test]
    fn test_cmp_french_dates_desc() {
        let mut dates = vec!["01/02/2025", "invalid", "15/01/2025", "03/02/2025"];
        dates.sort_by(|a, b| cmp_french_dates_desc(a, b));
        assert_eq!(dates, vec!["03/02/2025", "01/02/2025", "15/01/2025", "invalid"]);
    }
}
