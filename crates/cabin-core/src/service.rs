use std::{cmp::Ordering, fmt};

use cabin_domain::{
    Booking, BookingId, BookingPatch, BookingStatus, Cabin, CabinId, Guest, GuestId, NewBooking,
    Settings,
};

use crate::ServiceError;

/// Tables exposed by the data service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    Bookings,
    Guests,
    Cabins,
    Settings,
}

impl Table {
    /// Capitalized collection name used in load-failure notices.
    pub fn label(self) -> &'static str {
        match self {
            Table::Bookings => "Bookings",
            Table::Guests => "Guests",
            Table::Cabins => "Cabins",
            Table::Settings => "Settings",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Table::Bookings => "bookings",
            Table::Guests => "guests",
            Table::Cabins => "cabins",
            Table::Settings => "settings",
        };
        f.write_str(name)
    }
}

/// Table-oriented CRUD/query capability backing the dashboard.
///
/// Implementations own timeouts and write ordering; the core never retries.
pub trait DataService: Send + Sync {
    fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, ServiceError>;
    fn get_booking(&self, id: BookingId) -> Result<Booking, ServiceError>;
    fn insert_booking(&self, draft: &NewBooking) -> Result<Booking, ServiceError>;
    fn update_booking(&self, id: BookingId, patch: &BookingPatch)
        -> Result<Booking, ServiceError>;
    fn delete_booking(&self, id: BookingId) -> Result<(), ServiceError>;
    fn list_guests(&self) -> Result<Vec<Guest>, ServiceError>;
    fn list_cabins(&self) -> Result<Vec<Cabin>, ServiceError>;
    fn settings(&self) -> Result<Settings, ServiceError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    StartDate,
    TotalPrice,
    CreatedAt,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BookingSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl BookingSort {
    /// Parses `field-direction` values such as `startDate-desc` or `totalPrice-asc`.
    pub fn parse(value: &str) -> Option<Self> {
        let (field, direction) = value.trim().split_once('-')?;
        let field = match field.to_ascii_lowercase().as_str() {
            "startdate" | "start" => SortField::StartDate,
            "totalprice" | "total" => SortField::TotalPrice,
            "createdat" | "created" => SortField::CreatedAt,
            _ => return None,
        };
        let direction = match direction.to_ascii_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return None,
        };
        Some(Self { field, direction })
    }

    fn compare(&self, a: &Booking, b: &Booking) -> Ordering {
        let ordering = match self.field {
            SortField::StartDate => a.start_date.cmp(&b.start_date),
            SortField::TotalPrice => a
                .total_price
                .partial_cmp(&b.total_price)
                .unwrap_or(Ordering::Equal),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        }
        .then(a.id.cmp(&b.id));
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Query applied to the bookings table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub cabin_id: Option<CabinId>,
    pub guest_id: Option<GuestId>,
    pub sort: BookingSort,
}

impl BookingFilter {
    pub fn with_status(status: BookingStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        self.status.map_or(true, |status| booking.status == status)
            && self.cabin_id.map_or(true, |id| booking.cabin_id == id)
            && self.guest_id.map_or(true, |id| booking.guest_id == id)
    }

    /// Filters and sorts an unordered set of bookings.
    pub fn apply<'a, I>(&self, bookings: I) -> Vec<Booking>
    where
        I: IntoIterator<Item = &'a Booking>,
    {
        let mut rows: Vec<Booking> = bookings
            .into_iter()
            .filter(|booking| self.matches(booking))
            .cloned()
            .collect();
        rows.sort_by(|a, b| self.sort.compare(a, b));
        rows
    }
}
