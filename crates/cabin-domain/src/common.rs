//! Shared identifiers, traits, and date serialization helpers.

/// Identifier of a persisted booking.
pub type BookingId = u64;
/// Identifier of a cabin in the catalogue.
pub type CabinId = u64;
/// Identifier of a registered guest.
pub type GuestId = u64;

/// Exposes a stable identifier for entities stored by the data service.
pub trait Identifiable {
    fn id(&self) -> u64;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Calendar dates exchanged as ISO-8601 UTC timestamps at midnight,
/// e.g. `2024-01-01T00:00:00.000Z`.
///
/// Deserialization also accepts any RFC 3339 timestamp and bare
/// `YYYY-MM-DD` dates.
pub mod iso_date {
    use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
    const DATE_FORMAT: &str = "%Y-%m-%d";

    pub fn format(date: NaiveDate) -> String {
        date.and_time(NaiveTime::MIN)
            .format(TIMESTAMP_FORMAT)
            .to_string()
    }

    pub fn parse(value: &str) -> Option<NaiveDate> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(timestamp.with_timezone(&Utc).date_naive());
        }
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()
    }

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date `{raw}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::iso_date;
    use chrono::NaiveDate;

    #[test]
    fn formats_midnight_utc_timestamp() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
        assert_eq!(iso_date::format(date), "2024-01-04T00:00:00.000Z");
    }

    #[test]
    fn parses_timestamps_and_bare_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(iso_date::parse("2024-03-09"), Some(expected));
        assert_eq!(iso_date::parse("2024-03-09T00:00:00.000Z"), Some(expected));
        assert_eq!(iso_date::parse(" 2024-03-09T00:00:00+00:00 "), Some(expected));
        assert_eq!(iso_date::parse("09/03/2024"), None);
        assert_eq!(iso_date::parse(""), None);
    }
}
