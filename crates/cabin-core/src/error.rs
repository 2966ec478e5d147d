use std::io;

use cabin_domain::{BookingStatus, CabinId};
use chrono::NaiveDate;
use thiserror::Error;

use crate::{action::LifecycleAction, service::Table};

/// Rejections produced before any mutation is attempted. Messages are shown
/// inline next to the booking form.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Start date must be before end date")]
    InvalidRange { nights: i64 },
    #[error("Minimum number of nights must be {min}")]
    TooShort { min: u32, nights: u32 },
    #[error("Maximum number of nights must be {max}")]
    TooLong { max: u32, nights: u32 },
    #[error("You can't start a booking before today ({today})")]
    PastStartDate { start: NaiveDate, today: NaiveDate },
    #[error("Number of guests must be between 1 and {max}")]
    GuestCountOutOfRange { max: u32, requested: i64 },
    #[error("Invalid {field} reference `{value}`")]
    InvalidReference { field: &'static str, value: String },
    #[error("{0} not loaded yet")]
    NotReady(&'static str),
    #[error("You must choose a valid {field}")]
    InvalidDate { field: &'static str, value: String },
    #[error("{field} must be a whole number, got `{value}`")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Cabin {cabin_id} has a discount larger than its regular price")]
    InvalidCabinRate { cabin_id: CabinId },
}

/// Failures reported by the data service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{table} record {id} not found")]
    NotFound { table: Table, id: u64 },
    #[error("{} could not be loaded", .table.label())]
    Load {
        table: Table,
        #[source]
        source: Box<ServiceError>,
    },
    #[error("Invalid {table} record: {reason}")]
    InvalidRecord { table: Table, reason: String },
    #[error("Data service unavailable: {0}")]
    Unavailable(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        match self {
            ServiceError::NotFound { .. } => true,
            ServiceError::Load { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

/// Errors surfaced by the lifecycle controller.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Cannot {action} a booking that is {}", .from.label())]
    Transition {
        action: LifecycleAction,
        from: BookingStatus,
    },
    #[error("Booking {0} already in progress")]
    InFlight(LifecycleAction),
    #[error("{}", .action.failure_message())]
    Service {
        action: LifecycleAction,
        #[source]
        source: ServiceError,
    },
}

impl LifecycleError {
    /// The underlying data service failure, if any.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            LifecycleError::Service { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.service_error().is_some_and(ServiceError::is_not_found)
    }
}
