//! Booking policy constants shared by every booking.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Singleton policy record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub min_booking_length: u32,
    pub max_booking_length: u32,
    pub max_guests_per_booking: u32,
    /// Price per guest per night.
    pub breakfast_price: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_booking_length: 3,
            max_booking_length: 90,
            max_guests_per_booking: 8,
            breakfast_price: 15.0,
        }
    }
}

impl Settings {
    /// Returns every inconsistency found in the policy record.
    pub fn issues(&self) -> Vec<SettingsIssue> {
        let mut issues = Vec::new();
        if self.min_booking_length == 0 {
            issues.push(SettingsIssue::ZeroMinimumLength);
        }
        if self.min_booking_length > self.max_booking_length {
            issues.push(SettingsIssue::MinimumExceedsMaximum {
                min: self.min_booking_length,
                max: self.max_booking_length,
            });
        }
        if self.max_guests_per_booking == 0 {
            issues.push(SettingsIssue::ZeroMaxGuests);
        }
        if self.breakfast_price < 0.0 {
            issues.push(SettingsIssue::NegativeBreakfastPrice);
        }
        issues
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Problems that make a [`Settings`] record unusable for pricing.
pub enum SettingsIssue {
    ZeroMinimumLength,
    MinimumExceedsMaximum { min: u32, max: u32 },
    ZeroMaxGuests,
    NegativeBreakfastPrice,
}

impl fmt::Display for SettingsIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsIssue::ZeroMinimumLength => {
                f.write_str("minimum booking length must be at least 1")
            }
            SettingsIssue::MinimumExceedsMaximum { min, max } => write!(
                f,
                "minimum booking length {min} exceeds maximum booking length {max}"
            ),
            SettingsIssue::ZeroMaxGuests => {
                f.write_str("max guests per booking must be at least 1")
            }
            SettingsIssue::NegativeBreakfastPrice => {
                f.write_str("breakfast price cannot be negative")
            }
        }
    }
}

impl std::error::Error for SettingsIssue {}
