use serde::{de::Error, Deserialize, Deserializer};
use time::{format_description::well_known::Rfc3339, Date, OffsetDateTime};

/// Accepts RFC 3339 timestamps and bare `DD.MM.YYYY` dates (taken as midnight UTC).
pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid release date '{raw}'")))
}

fn parse(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(timestamp) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(timestamp);
    }

    Date::parse(raw, time::macros::format_description!("[day].[month].[year]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn dotted_date() {
        assert_eq!(parse("16.07.2006"), Some(datetime!(2006-07-16 0:00 UTC)));
    }

    #[test]
    fn rfc3339_keeps_offset() {
        assert_eq!(
            parse("2006-07-16T12:30:00+03:00"),
            Some(datetime!(2006-07-16 12:30 +3))
        );
    }

    #[test]
    fn garbage() {
        assert_eq!(parse("July 16th"), None);
        assert_eq!(parse("32.01.2006"), None);
    }
}
