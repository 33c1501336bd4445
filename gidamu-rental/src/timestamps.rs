//! Parsing for the timestamp strings shown on notification rows.

use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Absolute form used for older entries, e.g. `2025년 6월 22일 14:00`.
const ABSOLUTE_FORMAT: &str = "%Y년 %m월 %d일 %H:%M";

static RELATIVE: OnceLock<Regex> = OnceLock::new();

fn relative_pattern() -> &'static Regex {
    RELATIVE.get_or_init(|| Regex::new(r"^(\d+)\s*(분|시간|일) 전$").expect("static pattern"))
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized timestamp `{0}`")]
pub struct TimeParseError(pub String);

/// Parse a notification timestamp as displayed on the page.
///
/// Fresh entries carry relative forms (`방금 전`, `N분 전`, `N시간 전`,
/// `N일 전`), resolved against `now`; older entries carry the absolute
/// form, taken in local time.
pub fn parse_notification_time(
    text: &str,
    now: DateTime<Local>,
) -> Result<DateTime<Local>, TimeParseError> {
    let text = text.trim();

    if text == "방금 전" {
        return Ok(now);
    }

    if let Some(caps) = relative_pattern().captures(text) {
        let count: i64 = caps[1]
            .parse()
            .map_err(|_| TimeParseError(text.to_string()))?;
        let delta = match caps.get(2).map(|m| m.as_str()) {
            Some("분") => Duration::minutes(count),
            Some("시간") => Duration::hours(count),
            Some("일") => Duration::days(count),
            _ => return Err(TimeParseError(text.to_string())),
        };
        return Ok(now - delta);
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(text, ABSOLUTE_FORMAT) {
        // `earliest` resolves the ambiguous hour around DST transitions.
        return Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| TimeParseError(text.to_string()));
    }

    Err(TimeParseError(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn now() -> DateTime<Local> {
        Local::now()
    }

    #[test]
    fn parses_the_absolute_form() {
        let parsed = parse_notification_time("2025년 6월 22일 14:00", now()).unwrap();
        assert_eq!(parsed.hour(), 14);
        assert_eq!(parsed.minute(), 0);
    }

    #[test]
    fn parses_relative_minutes_hours_and_days() {
        let now = now();
        assert_eq!(
            parse_notification_time("30분 전", now).unwrap(),
            now - Duration::minutes(30)
        );
        assert_eq!(
            parse_notification_time("2시간 전", now).unwrap(),
            now - Duration::hours(2)
        );
        assert_eq!(
            parse_notification_time("1일 전", now).unwrap(),
            now - Duration::days(1)
        );
    }

    #[test]
    fn just_now_resolves_to_now() {
        let now = now();
        assert_eq!(parse_notification_time("방금 전", now).unwrap(), now);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let now = now();
        assert_eq!(
            parse_notification_time("  5분 전 ", now).unwrap(),
            now - Duration::minutes(5)
        );
    }

    #[test]
    fn rejects_unknown_forms() {
        let now = now();
        assert!(parse_notification_time("", now).is_err());
        assert!(parse_notification_time("어제", now).is_err());
        assert!(parse_notification_time("3주 전", now).is_err());
        assert!(parse_notification_time("2025-06-22 14:00", now).is_err());
    }
}
