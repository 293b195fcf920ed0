use anyhow::{Context, Result, bail};
use chrono::{Local, LocalResult, NaiveDate, TimeZone};
use serde::Serialize;

pub(crate) fn parse_date(date_str: Option<String>) -> Result<NaiveDate> {
    match date_str {
        None => Ok(Local::now().date_naive()),
        Some(s) => match s.as_str() {
            "today" => Ok(Local::now().date_naive()),
            "yesterday" => Ok(Local::now().date_naive() - chrono::Duration::days(1)),
            _ => NaiveDate::parse_from_str(&s, "%Y-%m-%d").with_context(|| {
                format!("Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday")
            }),
        },
    }
}

/// RFC 3339 "eaten at" timestamp for a meal logged on `date`: the current
/// instant when logging for today, local noon for any other day.
pub(crate) fn meal_timestamp(date: NaiveDate) -> Result<String> {
    let today = Local::now().date_naive();
    if date == today {
        return Ok(Local::now().to_rfc3339());
    }
    let noon = date.and_hms_opt(12, 0, 0).context("Invalid date")?;
    match Local.from_local_datetime(&noon) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.to_rfc3339()),
        LocalResult::None => bail!("Invalid local time for {date}"),
    }
}

/// Dedup key for foods within a meal: same name and brand count as the same
/// food no matter the id.
pub(crate) fn food_key(name: &str, brand: Option<&str>) -> String {
    format!(
        "{}|{}",
        name.to_lowercase(),
        brand.unwrap_or_default().to_lowercase()
    )
}

/// Validate a Nutri-Score grade and normalize it to its uppercase letter.
pub(crate) fn parse_nutriscore(grade: &str) -> Result<String> {
    let upper = grade.trim().to_uppercase();
    if matches!(upper.as_str(), "A" | "B" | "C" | "D" | "E") {
        Ok(upper)
    } else {
        bail!("Invalid Nutri-Score '{grade}'. Must be a letter from A to E")
    }
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutritrack_core::models::day_key;

    #[test]
    fn test_parse_date_none() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date(None).unwrap(), today);
    }

    #[test]
    fn test_parse_date_keywords() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date(Some("today".to_string())).unwrap(), today);
        assert_eq!(
            parse_date(Some("yesterday".to_string())).unwrap(),
            today - chrono::Duration::days(1)
        );
    }

    #[test]
    fn test_parse_date_iso() {
        let date = parse_date(Some("2024-01-15".to_string())).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date(Some("nope".to_string())).is_err());
    }

    #[test]
    fn test_meal_timestamp_round_trips_day() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let ts = meal_timestamp(date).unwrap();
        assert_eq!(day_key(&ts).as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn test_food_key() {
        assert_eq!(food_key("Pomme", None), "pomme|");
        assert_eq!(food_key("Pomme", Some("Bio")), "pomme|bio");
        assert_eq!(food_key("POMME", Some("bio")), food_key("pomme", Some("BIO")));
    }

    #[test]
    fn test_parse_nutriscore() {
        assert_eq!(parse_nutriscore("a").unwrap(), "A");
        assert_eq!(parse_nutriscore("E").unwrap(), "E");
        assert!(parse_nutriscore("f").is_err());
        assert!(parse_nutriscore("AB").is_err());
        assert!(parse_nutriscore("").is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world this is long", 10), "hello w...");
    }

    #[test]
    fn test_truncate_utf8() {
        // Should not panic on multi-byte characters
        assert_eq!(truncate("Crème fraîche", 10), "Crème f...");
        assert_eq!(truncate("Müsli", 10), "Müsli");
    }
}
