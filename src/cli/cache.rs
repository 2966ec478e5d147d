//! Cached booking queries for the shell, dropped per the action's
//! invalidation list.

use std::collections::HashMap;

use cabin_core::{BookingFilter, QueryKey};
use cabin_domain::{Booking, BookingId};
use tracing::debug;

#[derive(Debug, Default)]
pub struct QueryCache {
    list: Option<(BookingFilter, Vec<Booking>)>,
    details: HashMap<BookingId, Booking>,
}

impl QueryCache {
    pub fn bookings(&self, filter: &BookingFilter) -> Option<&[Booking]> {
        match &self.list {
            Some((cached, rows)) if cached == filter => Some(rows),
            _ => None,
        }
    }

    pub fn store_bookings(&mut self, filter: BookingFilter, rows: Vec<Booking>) {
        self.list = Some((filter, rows));
    }

    pub fn booking(&self, id: BookingId) -> Option<&Booking> {
        self.details.get(&id)
    }

    pub fn store_booking(&mut self, booking: Booking) {
        self.details.insert(booking.id, booking);
    }

    pub fn is_cached(&self, key: QueryKey) -> bool {
        match key {
            QueryKey::Bookings => self.list.is_some(),
            QueryKey::Booking(id) => self.details.contains_key(&id),
        }
    }

    pub fn invalidate(&mut self, keys: &[QueryKey]) {
        for key in keys {
            debug!(%key, "invalidating cached query");
            match key {
                QueryKey::Bookings => self.list = None,
                QueryKey::Booking(id) => {
                    self.details.remove(id);
                }
            }
        }
    }
}
