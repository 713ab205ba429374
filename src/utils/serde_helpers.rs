use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer};

/// Deserializes an optional value, treating empty strings as None.
///
/// Form inputs post `""` for a cleared discount or deposit field. Non-empty
/// strings are parsed with `FromStr`, anything else is deserialized directly.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrValue<T> {
        String(String),
        Value(T),
    }

    match Option::<StringOrValue<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrValue::String(s)) if s.trim().is_empty() => Ok(None),
        Some(StringOrValue::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid value {s:?}: {e}"))),
        Some(StringOrValue::Value(v)) => Ok(Some(v)),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "super::empty_string_as_none")]
        discount: Option<Decimal>,
    }

    fn parse(json: &str) -> Option<Decimal> {
        serde_json::from_str::<Form>(json)
            .expect("form should deserialize")
            .discount
    }

    #[test]
    fn empty_and_missing_are_none() {
        assert_eq!(parse(r#"{"discount": ""}"#), None);
        assert_eq!(parse(r#"{"discount": "  "}"#), None);
        assert_eq!(parse(r#"{"discount": null}"#), None);
        assert_eq!(parse("{}"), None);
    }

    #[test]
    fn strings_and_numbers_are_parsed() {
        assert_eq!(parse(r#"{"discount": "12.5"}"#), Some(dec!(12.5)));
        assert_eq!(parse(r#"{"discount": 10}"#), Some(dec!(10)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(serde_json::from_str::<Form>(r#"{"discount": "dix"}"#).is_err());
    }
}
