//! In-process [`DataService`] used by tests and embedding callers.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use cabin_domain::{Booking, BookingId, BookingPatch, Cabin, Guest, NewBooking, Settings};
use chrono::Utc;

use crate::{
    service::{BookingFilter, DataService, Table},
    ServiceError,
};

#[derive(Debug, Default)]
struct MemoryState {
    bookings: BTreeMap<BookingId, Booking>,
    cabins: Vec<Cabin>,
    guests: Vec<Guest>,
    settings: Option<Settings>,
    next_id: BookingId,
    calls: usize,
    fail_next: Option<String>,
}

/// Keeps every table in memory behind a mutex.
#[derive(Debug, Default)]
pub struct MemoryDataService {
    state: Mutex<MemoryState>,
}

impl MemoryDataService {
    pub fn new(cabins: Vec<Cabin>, guests: Vec<Guest>, settings: Settings) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                cabins,
                guests,
                settings: Some(settings),
                next_id: 1,
                ..MemoryState::default()
            }),
        }
    }

    /// Seeds an existing booking, keeping its id.
    pub fn with_booking(self, booking: Booking) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.next_id = state.next_id.max(booking.id + 1);
            state.bookings.insert(booking.id, booking);
        }
        self
    }

    /// Number of data service calls received so far.
    pub fn calls(&self) -> usize {
        self.state.lock().map(|state| state.calls).unwrap_or(0)
    }

    /// Makes the next call fail with [`ServiceError::Unavailable`].
    pub fn fail_next(&self, message: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_next = Some(message.into());
        }
    }

    fn begin_call(&self) -> Result<MutexGuard<'_, MemoryState>, ServiceError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ServiceError::Unavailable("memory store poisoned".into()))?;
        state.calls += 1;
        if let Some(message) = state.fail_next.take() {
            return Err(ServiceError::Unavailable(message));
        }
        Ok(state)
    }
}

impl DataService for MemoryDataService {
    fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, ServiceError> {
        let state = self.begin_call()?;
        Ok(filter.apply(state.bookings.values()))
    }

    fn get_booking(&self, id: BookingId) -> Result<Booking, ServiceError> {
        let state = self.begin_call()?;
        state.bookings.get(&id).cloned().ok_or(ServiceError::NotFound {
            table: Table::Bookings,
            id,
        })
    }

    fn insert_booking(&self, draft: &NewBooking) -> Result<Booking, ServiceError> {
        let mut state = self.begin_call()?;
        let id = state.next_id.max(1);
        state.next_id = id + 1;
        let booking = draft.clone().into_booking(id, Utc::now());
        state.bookings.insert(id, booking.clone());
        Ok(booking)
    }

    fn update_booking(&self, id: BookingId, patch: &BookingPatch) -> Result<Booking, ServiceError> {
        let mut state = self.begin_call()?;
        let booking = state.bookings.get_mut(&id).ok_or(ServiceError::NotFound {
            table: Table::Bookings,
            id,
        })?;
        patch.apply_to(booking);
        Ok(booking.clone())
    }

    fn delete_booking(&self, id: BookingId) -> Result<(), ServiceError> {
        let mut state = self.begin_call()?;
        state
            .bookings
            .remove(&id)
            .map(|_| ())
            .ok_or(ServiceError::NotFound {
                table: Table::Bookings,
                id,
            })
    }

    fn list_guests(&self) -> Result<Vec<Guest>, ServiceError> {
        Ok(self.begin_call()?.guests.clone())
    }

    fn list_cabins(&self) -> Result<Vec<Cabin>, ServiceError> {
        Ok(self.begin_call()?.cabins.clone())
    }

    fn settings(&self) -> Result<Settings, ServiceError> {
        self.begin_call()?
            .settings
            .clone()
            .ok_or(ServiceError::NotFound {
                table: Table::Settings,
                id: 1,
            })
    }
}
