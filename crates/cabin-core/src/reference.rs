//! Reference data (cabins, guests, settings) the booking form depends on.

use cabin_domain::{Cabin, CabinId, Guest, GuestId, NewBooking, Settings};
use tracing::warn;

use crate::{
    form::{BookingForm, BookingInput},
    pricing::PricingEngine,
    service::{DataService, Table},
    settings_provider::SettingsProvider,
    time::Clock,
    ServiceError, ValidationError,
};

/// Collections loaded for the booking screens. `None` means "not loaded".
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub cabins: Option<Vec<Cabin>>,
    pub guests: Option<Vec<Guest>>,
    pub settings: Option<Settings>,
}

impl ReferenceData {
    /// Loads every table independently; a failing table stays unloaded and
    /// its error is returned alongside whatever did load.
    pub fn load(service: &dyn DataService) -> (Self, Vec<ServiceError>) {
        let mut errors = Vec::new();
        let cabins = keep(Table::Cabins, service.list_cabins(), &mut errors);
        let guests = keep(Table::Guests, service.list_guests(), &mut errors);
        let settings = keep(Table::Settings, SettingsProvider::load(service), &mut errors);
        (
            Self {
                cabins,
                guests,
                settings,
            },
            errors,
        )
    }

    pub fn is_ready(&self) -> bool {
        self.cabins.is_some() && self.guests.is_some() && self.settings.is_some()
    }

    pub fn cabin(&self, id: CabinId) -> Option<&Cabin> {
        self.cabins
            .as_deref()
            .and_then(|cabins| PricingEngine::resolve_cabin(cabins, id))
    }

    pub fn guest(&self, id: GuestId) -> Option<&Guest> {
        self.guests
            .as_deref()
            .and_then(|guests| guests.iter().find(|guest| guest.id == id))
    }

    /// Turns a raw form into a priced draft using the loaded reference data.
    ///
    /// Unknown guest or cabin ids are only reported once the booking rules pass.
    pub fn price_form(
        &self,
        form: &BookingForm,
        clock: &dyn Clock,
    ) -> Result<NewBooking, ValidationError> {
        let cabins = self.cabins.as_deref().ok_or(ValidationError::NotReady("cabins"))?;
        let guests = self.guests.as_deref().ok_or(ValidationError::NotReady("guests"))?;
        let settings = self
            .settings
            .as_ref()
            .ok_or(ValidationError::NotReady("settings"))?;

        let input = BookingInput::from_form(form)?;
        PricingEngine::check_rules(&input, settings, clock)?;

        if !guests.iter().any(|guest| guest.id == input.guest_id) {
            return Err(ValidationError::InvalidReference {
                field: "guestId",
                value: input.guest_id.to_string(),
            });
        }
        let cabin = PricingEngine::resolve_cabin(cabins, input.cabin_id).ok_or_else(|| {
            ValidationError::InvalidReference {
                field: "cabinId",
                value: input.cabin_id.to_string(),
            }
        })?;

        PricingEngine::validate_and_price(&input, Some(cabin), Some(settings), clock)
    }
}

fn keep<T>(
    table: Table,
    result: Result<T, ServiceError>,
    errors: &mut Vec<ServiceError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(source) => {
            warn!(%table, error = %source, "reference data failed to load");
            errors.push(ServiceError::Load {
                table,
                source: Box::new(source),
            });
            None
        }
    }
}
