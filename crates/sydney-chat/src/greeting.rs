//! Greeting of the Day
//!
//! A user sees the same greeting phrasing for a whole calendar day: the
//! variant index derives from a hash of (day-of-year, user-name length),
//! not from wall-clock randomness.

use chrono::{DateTime, Datelike, Local, Timelike};

const GREETING_TEMPLATES: &[&str] = &[
    "How's your trading going today?",
    "Ready to analyze some trades?",
    "What's on your trading radar today?",
    "Any exciting market moves catching your eye?",
];

/// Compose the greeting for a user at a given local time
pub fn greeting(user_name: Option<&str>, now: DateTime<Local>) -> String {
    let time_greeting = match now.hour() {
        0..12 => "Good morning",
        12..17 => "Good afternoon",
        _ => "Good evening",
    };

    let holiday_greeting = match (now.month(), now.day()) {
        (12, 25) => "🎄 Merry Christmas! ",
        (1, 1) => "🎉 Happy New Year! ",
        (10, 31) => "🎃 Happy Halloween! ",
        _ => "",
    };

    let name = user_name.map(|n| format!(" {n}")).unwrap_or_default();
    let seed = now.ordinal() as usize * 31 + user_name.map_or(0, str::len);
    let template = GREETING_TEMPLATES[seed % GREETING_TEMPLATES.len()];

    format!("{holiday_greeting}{time_greeting}{name}! {template}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stable_within_a_day() {
        let morning = Local.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let later = Local.with_ymd_and_hms(2025, 3, 10, 11, 45, 0).unwrap();
        assert_eq!(greeting(Some("Alex"), morning), greeting(Some("Alex"), later));
    }

    #[test]
    fn test_time_of_day_salutation() {
        let evening = Local.with_ymd_and_hms(2025, 3, 10, 19, 0, 0).unwrap();
        assert!(greeting(None, evening).starts_with("Good evening!"));
    }

    #[test]
    fn test_holiday_prefix() {
        let christmas = Local.with_ymd_and_hms(2025, 12, 25, 9, 0, 0).unwrap();
        assert!(greeting(Some("Alex"), christmas).starts_with("🎄 Merry Christmas! Good morning Alex!"));
    }

    #[test]
    fn test_name_embedded() {
        let now = Local.with_ymd_and_hms(2025, 3, 10, 14, 0, 0).unwrap();
        assert!(greeting(Some("Priya"), now).contains("Good afternoon Priya!"));
    }
}
