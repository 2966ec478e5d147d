//! Booking lifecycle orchestration: create, check in, check out, delete.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use cabin_domain::{Booking, BookingId, BookingPatch, BookingStatus, NewBooking, Settings};
use tracing::{debug, info, warn};

use crate::{
    action::LifecycleAction,
    form::BookingForm,
    pricing::PricingEngine,
    reference::ReferenceData,
    service::{BookingFilter, DataService},
    time::Clock,
    transitions::ensure_transition,
    LifecycleError, ServiceError, ValidationError,
};

/// Extra choices offered on the check-in screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckInOptions {
    /// Adds breakfast for the whole stay if the booking did not include it.
    pub add_breakfast: bool,
    /// The user explicitly confirmed the guest has paid.
    pub confirm_paid: bool,
}

/// Per-operation "in flight" flags; the only concurrency control in the core.
#[derive(Debug, Default)]
struct InFlight {
    create: AtomicBool,
    check_in: AtomicBool,
    check_out: AtomicBool,
    delete: AtomicBool,
}

impl InFlight {
    fn flag(&self, action: LifecycleAction) -> &AtomicBool {
        match action {
            LifecycleAction::Create => &self.create,
            LifecycleAction::CheckIn => &self.check_in,
            LifecycleAction::CheckOut => &self.check_out,
            LifecycleAction::Delete => &self.delete,
        }
    }

    fn begin(&self, action: LifecycleAction) -> Result<InFlightGuard<'_>, LifecycleError> {
        let flag = self.flag(action);
        if flag.swap(true, Ordering::AcqRel) {
            return Err(LifecycleError::InFlight(action));
        }
        Ok(InFlightGuard { flag })
    }
}

/// Clears its flag on drop, so success, failure and early returns all release it.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Drives booking mutations through the data service.
pub struct LifecycleController {
    service: Arc<dyn DataService>,
    in_flight: InFlight,
}

impl LifecycleController {
    pub fn new(service: Arc<dyn DataService>) -> Self {
        Self {
            service,
            in_flight: InFlight::default(),
        }
    }

    pub fn service(&self) -> &dyn DataService {
        self.service.as_ref()
    }

    /// Whether the control for `action` should currently be disabled.
    pub fn is_in_flight(&self, action: LifecycleAction) -> bool {
        self.in_flight.flag(action).load(Ordering::Acquire)
    }

    pub fn bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, ServiceError> {
        self.service.list_bookings(filter)
    }

    pub fn booking(&self, id: BookingId) -> Result<Booking, ServiceError> {
        self.service.get_booking(id)
    }

    /// Persists a validated draft.
    pub fn create(&self, draft: &NewBooking) -> Result<Booking, LifecycleError> {
        let action = LifecycleAction::Create;
        let _guard = self.in_flight.begin(action)?;
        let booking = self
            .service
            .insert_booking(draft)
            .map_err(|source| service_failure(action, None, source))?;
        info!(booking_id = booking.id, total = booking.total_price, "booking created");
        Ok(booking)
    }

    /// Normalizes, validates and prices a raw form, then persists it.
    /// Validation failures never reach the data service.
    pub fn create_from_form(
        &self,
        form: &BookingForm,
        reference: &ReferenceData,
        clock: &dyn Clock,
    ) -> Result<Booking, LifecycleError> {
        let draft = reference.price_form(form, clock).map_err(|err| {
            debug!(error = %err, "booking form rejected");
            err
        })?;
        self.create(&draft)
    }

    pub fn check_in(&self, booking: &Booking) -> Result<Booking, LifecycleError> {
        self.check_in_with(booking, CheckInOptions::default(), None)
    }

    /// Checks a guest in, optionally adding breakfast and recording payment.
    ///
    /// `settings` is only consulted when breakfast is being added.
    pub fn check_in_with(
        &self,
        booking: &Booking,
        options: CheckInOptions,
        settings: Option<&Settings>,
    ) -> Result<Booking, LifecycleError> {
        let action = LifecycleAction::CheckIn;
        let target = self.guard(booking, action)?;
        let mut patch = BookingPatch::status(target);

        if options.add_breakfast && !booking.has_breakfast {
            let settings = settings.ok_or(ValidationError::NotReady("settings"))?;
            let extras =
                PricingEngine::breakfast_extras(settings, booking.num_nights, booking.num_guests);
            patch.has_breakfast = Some(true);
            patch.extras_price = Some(extras);
            patch.total_price = Some(booking.cabin_price + extras);
        }
        if options.confirm_paid {
            patch.is_paid = Some(true);
        }

        self.apply(action, booking.id, &patch)
    }

    pub fn check_out(&self, booking: &Booking) -> Result<Booking, LifecycleError> {
        let action = LifecycleAction::CheckOut;
        let target = self.guard(booking, action)?;
        self.apply(action, booking.id, &BookingPatch::status(target))
    }

    /// Irreversibly removes a booking. Callers confirm through
    /// [`crate::DeleteFlow`] before reaching this point.
    pub fn delete(&self, id: BookingId) -> Result<(), LifecycleError> {
        let action = LifecycleAction::Delete;
        let _guard = self.in_flight.begin(action)?;
        self.service
            .delete_booking(id)
            .map_err(|source| service_failure(action, Some(id), source))?;
        info!(booking_id = id, "booking deleted");
        Ok(())
    }

    fn guard(
        &self,
        booking: &Booking,
        action: LifecycleAction,
    ) -> Result<BookingStatus, LifecycleError> {
        ensure_transition(booking.status, action).map_err(|err| {
            warn!(
                booking_id = booking.id,
                status = %booking.status,
                %action,
                "transition rejected"
            );
            err
        })
    }

    fn apply(
        &self,
        action: LifecycleAction,
        id: BookingId,
        patch: &BookingPatch,
    ) -> Result<Booking, LifecycleError> {
        let _guard = self.in_flight.begin(action)?;
        let updated = self
            .service
            .update_booking(id, patch)
            .map_err(|source| service_failure(action, Some(id), source))?;
        info!(booking_id = id, status = %updated.status, "booking updated");
        Ok(updated)
    }
}

fn service_failure(
    action: LifecycleAction,
    id: Option<BookingId>,
    source: ServiceError,
) -> LifecycleError {
    warn!(?id, %action, error = %source, "data service call failed");
    LifecycleError::Service { action, source }
}
