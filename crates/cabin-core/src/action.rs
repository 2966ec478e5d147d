//! Lifecycle actions, their user-facing notices, and the cached
//! collections each one invalidates.

use std::fmt;

use cabin_domain::BookingId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleAction {
    Create,
    CheckIn,
    CheckOut,
    Delete,
}

impl LifecycleAction {
    fn past_participle(self) -> &'static str {
        match self {
            LifecycleAction::Create => "created",
            LifecycleAction::CheckIn => "checked in",
            LifecycleAction::CheckOut => "checked out",
            LifecycleAction::Delete => "deleted",
        }
    }

    /// Generic notice shown when the data service rejects the action.
    pub fn failure_message(self) -> String {
        format!("Booking could not be {}", self.past_participle())
    }

    pub fn success_message(self, id: BookingId) -> String {
        format!("Booking #{} successfully {}", id, self.past_participle())
    }

    /// Collections a caller must re-fetch after the action succeeds.
    pub fn invalidates(self, id: BookingId) -> Vec<QueryKey> {
        match self {
            LifecycleAction::Create => vec![QueryKey::Bookings],
            LifecycleAction::CheckIn | LifecycleAction::CheckOut | LifecycleAction::Delete => {
                vec![QueryKey::Bookings, QueryKey::Booking(id)]
            }
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LifecycleAction::Create => "create",
            LifecycleAction::CheckIn => "check in",
            LifecycleAction::CheckOut => "check out",
            LifecycleAction::Delete => "delete",
        };
        f.write_str(label)
    }
}

/// Cached query collections owned by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Bookings,
    Booking(BookingId),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Bookings => f.write_str("bookings"),
            QueryKey::Booking(id) => write!(f, "booking/{id}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient user notification produced by an action outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(action: LifecycleAction, id: BookingId) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: action.success_message(id),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl From<&crate::LifecycleError> for Notice {
    fn from(err: &crate::LifecycleError) -> Self {
        Notice::error(err.to_string())
    }
}
