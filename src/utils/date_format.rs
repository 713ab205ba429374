use serde::{self, Deserialize, Deserializer, Serializer};
use time::{Date, macros::format_description};

/// Parses an ISO `YYYY-MM-DD` date. Timestamps such as
/// `2025-03-03T06:17:25Z` are accepted and truncated to their date part.
pub fn parse_iso_date(date_str: &str) -> Result<Date, String> {
    let format = format_description!("[year]-[month]-[day]");
    let date_part = date_str
        .split_once('T')
        .map_or(date_str, |(date, _)| date)
        .trim();
    Date::parse(date_part, &format).map_err(|e| format!("Failed to parse date '{date_str}': {e}"))
}

fn format_iso_date(date: Date) -> Result<String, time::error::Format> {
    date.format(&format_description!("[year]-[month]-[day]"))
}

// Serialization module for time::Date
pub mod iso_date {
    use super::{Date, Deserialize, Deserializer, Serializer, format_iso_date, parse_iso_date, serde};

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = format_iso_date(*date).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let date_str = String::deserialize(deserializer)?;
        parse_iso_date(&date_str).map_err(serde::de::Error::custom)
    }
}

// Optional date serialization module
pub mod iso_date_option {
    use super::{Date, Deserialize, Deserializer, Serializer, format_iso_date, parse_iso_date, serde};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => {
                let formatted = format_iso_date(*date).map_err(serde::ser::Error::custom)?;
                serializer.serialize_str(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if !s.trim().is_empty() => parse_iso_date(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parses_plain_and_timestamped_dates() {
        assert_eq!(parse_iso_date("2025-03-03"), Ok(date!(2025 - 03 - 03)));
        assert_eq!(
            parse_iso_date("2025-03-03T06:17:25.8448470"),
            Ok(date!(2025 - 03 - 03))
        );
        assert!(parse_iso_date("03/03/2025").is_err());
    }
}
