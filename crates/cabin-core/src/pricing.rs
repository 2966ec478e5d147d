//! Booking validation and price computation.
//!
//! Everything here is a pure function of its inputs plus the injected clock.

use cabin_domain::{BookingStatus, Cabin, CabinId, NewBooking, Settings};
use chrono::NaiveDate;

use crate::{form::BookingInput, time::Clock, ValidationError};

/// Nightly count and monetary fields derived for a booking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown {
    pub num_nights: u32,
    pub cabin_price: f64,
    pub extras_price: f64,
    pub total_price: f64,
}

/// Stateless pricing and validation rules.
pub struct PricingEngine;

impl PricingEngine {
    /// Whole-day difference between `end` and `start`.
    pub fn nights_between(start: NaiveDate, end: NaiveDate) -> i64 {
        (end - start).num_days()
    }

    /// Breakfast cost for the whole party over the stay.
    pub fn breakfast_extras(settings: &Settings, num_nights: u32, num_guests: u32) -> f64 {
        settings.breakfast_price * f64::from(num_nights) * f64::from(num_guests)
    }

    pub fn price(
        cabin: &Cabin,
        settings: &Settings,
        num_nights: u32,
        num_guests: u32,
        has_breakfast: bool,
    ) -> PriceBreakdown {
        let cabin_price = cabin.effective_rate() * f64::from(num_nights);
        let extras_price = if has_breakfast {
            Self::breakfast_extras(settings, num_nights, num_guests)
        } else {
            0.0
        };
        PriceBreakdown {
            num_nights,
            cabin_price,
            extras_price,
            total_price: cabin_price + extras_price,
        }
    }

    /// Picks the cabin a draft refers to from the loaded catalogue.
    pub fn resolve_cabin(cabins: &[Cabin], id: CabinId) -> Option<&Cabin> {
        cabins.iter().find(|cabin| cabin.id == id)
    }

    /// Runs the ordered booking rules and returns the night and guest counts.
    ///
    /// Rules run in a fixed order and the first failure wins:
    /// range, minimum length, maximum length, start date, guest count.
    pub fn check_rules(
        input: &BookingInput,
        settings: &Settings,
        clock: &dyn Clock,
    ) -> Result<(u32, u32), ValidationError> {
        let nights = Self::nights_between(input.start_date, input.end_date);
        if nights < 1 {
            return Err(ValidationError::InvalidRange { nights });
        }
        let num_nights = u32::try_from(nights).unwrap_or(u32::MAX);

        if num_nights < settings.min_booking_length {
            return Err(ValidationError::TooShort {
                min: settings.min_booking_length,
                nights: num_nights,
            });
        }
        if num_nights > settings.max_booking_length {
            return Err(ValidationError::TooLong {
                max: settings.max_booking_length,
                nights: num_nights,
            });
        }

        let today = clock.today();
        if input.start_date < today {
            return Err(ValidationError::PastStartDate {
                start: input.start_date,
                today,
            });
        }

        let max_guests = settings.max_guests_per_booking;
        match u32::try_from(input.num_guests) {
            Ok(count) if (1..=max_guests).contains(&count) => Ok((num_nights, count)),
            _ => Err(ValidationError::GuestCountOutOfRange {
                max: max_guests,
                requested: input.num_guests,
            }),
        }
    }

    /// Validates a booking request and prices it.
    ///
    /// Absent cabin or settings are reported as [`ValidationError::NotReady`]
    /// before any rule runs. References and the cabin rate are checked after
    /// [`PricingEngine::check_rules`].
    pub fn validate_and_price(
        input: &BookingInput,
        cabin: Option<&Cabin>,
        settings: Option<&Settings>,
        clock: &dyn Clock,
    ) -> Result<NewBooking, ValidationError> {
        let settings = settings.ok_or(ValidationError::NotReady("settings"))?;
        let cabin = cabin.ok_or(ValidationError::NotReady("cabin"))?;
        let (num_nights, num_guests) = Self::check_rules(input, settings, clock)?;

        if input.guest_id == 0 {
            return Err(ValidationError::InvalidReference {
                field: "guestId",
                value: input.guest_id.to_string(),
            });
        }
        if input.cabin_id == 0 || cabin.id != input.cabin_id {
            return Err(ValidationError::InvalidReference {
                field: "cabinId",
                value: input.cabin_id.to_string(),
            });
        }
        if !cabin.has_valid_rate() {
            return Err(ValidationError::InvalidCabinRate { cabin_id: cabin.id });
        }

        let price = Self::price(cabin, settings, num_nights, num_guests, input.has_breakfast);
        Ok(NewBooking {
            start_date: input.start_date,
            end_date: input.end_date,
            num_nights: price.num_nights,
            num_guests,
            cabin_id: input.cabin_id,
            guest_id: input.guest_id,
            cabin_price: price.cabin_price,
            extras_price: price.extras_price,
            total_price: price.total_price,
            has_breakfast: input.has_breakfast,
            is_paid: input.is_paid,
            status: BookingStatus::Unconfirmed,
            observations: input.observations.clone(),
        })
    }
}
