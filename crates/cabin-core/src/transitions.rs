//! Allowed booking status transitions.
//!
//! Both action availability and the lifecycle controller guards consult
//! [`ALLOWED_TRANSITIONS`], so the rule lives in exactly one place.

use cabin_domain::BookingStatus;

use crate::{action::LifecycleAction, LifecycleError};

pub const ALLOWED_TRANSITIONS: &[(BookingStatus, LifecycleAction, BookingStatus)] = &[
    (
        BookingStatus::Unconfirmed,
        LifecycleAction::CheckIn,
        BookingStatus::CheckedIn,
    ),
    (
        BookingStatus::CheckedIn,
        LifecycleAction::CheckOut,
        BookingStatus::CheckedOut,
    ),
];

/// Target status of `action` when performed from `from`, if allowed.
pub fn transition_target(from: BookingStatus, action: LifecycleAction) -> Option<BookingStatus> {
    ALLOWED_TRANSITIONS
        .iter()
        .find(|(source, candidate, _)| *source == from && *candidate == action)
        .map(|(_, _, target)| *target)
}

pub fn can_transition(from: BookingStatus, to: BookingStatus) -> bool {
    ALLOWED_TRANSITIONS
        .iter()
        .any(|(source, _, target)| *source == from && *target == to)
}

/// Actions a booking in `status` exposes. Delete is always offered.
pub fn available_actions(status: BookingStatus) -> Vec<LifecycleAction> {
    let mut actions: Vec<LifecycleAction> = ALLOWED_TRANSITIONS
        .iter()
        .filter(|(source, _, _)| *source == status)
        .map(|(_, action, _)| *action)
        .collect();
    actions.push(LifecycleAction::Delete);
    actions
}

/// Guard used before issuing a status change.
pub fn ensure_transition(
    from: BookingStatus,
    action: LifecycleAction,
) -> Result<BookingStatus, LifecycleError> {
    transition_target(from, action).ok_or(LifecycleError::Transition { action, from })
}
