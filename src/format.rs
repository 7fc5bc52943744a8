//! Small text helpers shared by the list/detail views and the Markdown export.

use chrono::{DateTime, Datelike, Utc};

/// Render a timestamp as `January 2nd, 2006`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    let day = date.day();
    let suffix = match day {
        11..=13 => "th",
        _ if day % 10 == 1 => "st",
        _ if day % 10 == 2 => "nd",
        _ if day % 10 == 3 => "rd",
        _ => "th",
    };
    format!("{} {day}{suffix}, {}", date.format("%B"), date.year())
}

/// Shorten notes for list previews. When a space falls within the last 20
/// characters of the cut, the cut moves back to it so words stay whole.
pub fn truncate_notes(notes: &str, max_chars: usize) -> String {
    if notes.chars().count() <= max_chars {
        return notes.to_string();
    }

    let mut truncated: String = notes.chars().take(max_chars).collect();
    if let Some(last_space) = truncated.rfind(' ') {
        let space_at = truncated[..last_space].chars().count();
        if space_at + 20 > max_chars {
            truncated.truncate(last_space);
        }
    }
    truncated.push_str(" . . .");
    truncated
}

/// True when two timestamps fall on different calendar days.
pub fn different_day(a: &DateTime<Utc>, b: &DateTime<Utc>) -> bool {
    a.date_naive() != b.date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(format_date(&day(1)), "March 1st, 2024");
        assert_eq!(format_date(&day(2)), "March 2nd, 2024");
        assert_eq!(format_date(&day(3)), "March 3rd, 2024");
        assert_eq!(format_date(&day(4)), "March 4th, 2024");
        assert_eq!(format_date(&day(11)), "March 11th, 2024");
        assert_eq!(format_date(&day(12)), "March 12th, 2024");
        assert_eq!(format_date(&day(13)), "March 13th, 2024");
        assert_eq!(format_date(&day(21)), "March 21st, 2024");
        assert_eq!(format_date(&day(22)), "March 22nd, 2024");
        assert_eq!(format_date(&day(31)), "March 31st, 2024");
    }

    #[test]
    fn short_notes_are_untouched() {
        assert_eq!(truncate_notes("short", 60), "short");
    }

    #[test]
    fn long_notes_cut_on_word_boundary() {
        let notes = "a".repeat(50) + " bbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
        let out = truncate_notes(&notes, 60);
        assert_eq!(out, format!("{} . . .", "a".repeat(50)));
    }

    #[test]
    fn long_word_is_hard_cut() {
        let notes = "x".repeat(80);
        assert_eq!(truncate_notes(&notes, 60), format!("{} . . .", "x".repeat(60)));
    }

    #[test]
    fn different_day_ignores_time_of_day() {
        let morning = Utc.with_ymd_and_hms(2024, 3, 5, 1, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 3, 5, 23, 0, 0).unwrap();
        assert!(!different_day(&morning, &evening));
        assert!(different_day(&morning, &day(6)));
    }
}
