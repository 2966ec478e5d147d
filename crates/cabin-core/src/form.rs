//! Normalization of raw booking form values into a typed input.

use cabin_domain::{iso_date, CabinId, GuestId};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::ValidationError;

/// Raw values as captured by the booking creation form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingForm {
    pub start_date: String,
    pub end_date: String,
    pub num_guests: String,
    pub cabin_id: String,
    pub guest_id: String,
    pub observations: String,
    pub has_breakfast: bool,
    pub is_paid: bool,
}

/// Strictly typed booking request. Business rules only ever see this type.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Kept signed so out-of-range counts reach the guest-count rule intact.
    pub num_guests: i64,
    pub cabin_id: CabinId,
    pub guest_id: GuestId,
    pub has_breakfast: bool,
    pub is_paid: bool,
    pub observations: String,
}

impl BookingInput {
    /// Coerces form strings into typed values.
    pub fn from_form(form: &BookingForm) -> Result<Self, ValidationError> {
        Ok(Self {
            start_date: parse_date("start date", &form.start_date)?,
            end_date: parse_date("end date", &form.end_date)?,
            num_guests: parse_count("numGuests", &form.num_guests)?,
            cabin_id: parse_reference("cabinId", &form.cabin_id)?,
            guest_id: parse_reference("guestId", &form.guest_id)?,
            has_breakfast: form.has_breakfast,
            is_paid: form.is_paid,
            observations: form.observations.trim().to_string(),
        })
    }
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    iso_date::parse(raw).ok_or_else(|| ValidationError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

fn parse_count(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

/// Parses a record id; zero, negative and non-numeric values are rejected.
pub fn parse_reference(field: &'static str, raw: &str) -> Result<u64, ValidationError> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidReference {
            field,
            value: raw.to_string(),
        }),
    }
}
