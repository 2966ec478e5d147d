//! Booking records, drafts, patches, and lifecycle status.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
/// Enumerates the lifecycle state of a booking.
pub enum BookingStatus {
    Unconfirmed,
    CheckedIn,
    CheckedOut,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 3] = [
        BookingStatus::Unconfirmed,
        BookingStatus::CheckedIn,
        BookingStatus::CheckedOut,
    ];

    /// Wire representation used by the data service.
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Unconfirmed => "unconfirmed",
            BookingStatus::CheckedIn => "checked-in",
            BookingStatus::CheckedOut => "checked-out",
        }
    }

    /// Human label shown on status tags ("checked in").
    pub fn label(self) -> String {
        self.as_str().replace('-', " ")
    }

    pub fn tag_color(self) -> TagColor {
        match self {
            BookingStatus::Unconfirmed => TagColor::Blue,
            BookingStatus::CheckedIn => TagColor::Green,
            BookingStatus::CheckedOut => TagColor::Silver,
        }
    }

    /// Parses wire values as well as the spaced/underscored variants users type.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == '_' || c == ' ' { '-' } else { c })
            .collect();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Tag colors used when rendering a booking status.
pub enum TagColor {
    Blue,
    Green,
    Silver,
}

impl fmt::Display for TagColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TagColor::Blue => "blue",
            TagColor::Green => "green",
            TagColor::Silver => "silver",
        };
        f.write_str(label)
    }
}

/// Persisted booking as exchanged with the data service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub end_date: NaiveDate,
    pub num_nights: u32,
    pub num_guests: u32,
    pub cabin_id: CabinId,
    pub guest_id: GuestId,
    pub cabin_price: f64,
    pub extras_price: f64,
    pub total_price: f64,
    pub has_breakfast: bool,
    pub is_paid: bool,
    pub status: BookingStatus,
    #[serde(default)]
    pub observations: String,
}

impl Booking {
    /// True when the stored total equals cabin price plus extras.
    pub fn is_total_consistent(&self) -> bool {
        (self.cabin_price + self.extras_price - self.total_price).abs() < f64::EPSILON
    }
}

impl Identifiable for Booking {
    fn id(&self) -> u64 {
        self.id
    }
}

impl Displayable for Booking {
    fn display_label(&self) -> String {
        format!("booking #{} [{}]", self.id, self.status)
    }
}

/// A validated, priced booking that has not been persisted yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub end_date: NaiveDate,
    pub num_nights: u32,
    pub num_guests: u32,
    pub cabin_id: CabinId,
    pub guest_id: GuestId,
    pub cabin_price: f64,
    pub extras_price: f64,
    pub total_price: f64,
    pub has_breakfast: bool,
    pub is_paid: bool,
    pub status: BookingStatus,
    pub observations: String,
}

impl NewBooking {
    /// Materializes the draft once the data service has assigned an identity.
    pub fn into_booking(self, id: BookingId, created_at: DateTime<Utc>) -> Booking {
        Booking {
            id,
            created_at,
            start_date: self.start_date,
            end_date: self.end_date,
            num_nights: self.num_nights,
            num_guests: self.num_guests,
            cabin_id: self.cabin_id,
            guest_id: self.guest_id,
            cabin_price: self.cabin_price,
            extras_price: self.extras_price,
            total_price: self.total_price,
            has_breakfast: self.has_breakfast,
            is_paid: self.is_paid,
            status: self.status,
            observations: self.observations,
        }
    }
}

/// Partial update sent to the data service by lifecycle actions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_paid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_breakfast: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
}

impl BookingPatch {
    pub fn status(status: BookingStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply_to(&self, booking: &mut Booking) {
        if let Some(status) = self.status {
            booking.status = status;
        }
        if let Some(is_paid) = self.is_paid {
            booking.is_paid = is_paid;
        }
        if let Some(has_breakfast) = self.has_breakfast {
            booking.has_breakfast = has_breakfast;
        }
        if let Some(extras) = self.extras_price {
            booking.extras_price = extras;
        }
        if let Some(total) = self.total_price {
            booking.total_price = total;
        }
    }
}
