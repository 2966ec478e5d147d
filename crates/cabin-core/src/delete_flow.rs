//! Two-phase, confirm-before-delete state machine.

use cabin_domain::BookingId;
use tracing::debug;
use uuid::Uuid;

use crate::{lifecycle::LifecycleController, LifecycleError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeleteState {
    #[default]
    Idle,
    /// Confirmation is open; only `ticket` may confirm it.
    ConfirmPending { booking_id: BookingId, ticket: Uuid },
    Executing { booking_id: BookingId },
    Done { booking_id: BookingId },
    Failed { booking_id: BookingId, message: String },
}

#[derive(Debug)]
pub enum DeleteOutcome {
    Deleted(BookingId),
    Failed(LifecycleError),
    /// Nothing was pending for this ticket; no call was made.
    Ignored,
}

#[derive(Debug, Default)]
pub struct DeleteFlow {
    state: DeleteState,
}

impl DeleteFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DeleteState {
        &self.state
    }

    pub fn pending_ticket(&self) -> Option<Uuid> {
        match self.state {
            DeleteState::ConfirmPending { ticket, .. } => Some(ticket),
            _ => None,
        }
    }

    /// Booking awaiting confirmation, if any.
    pub fn pending_booking(&self) -> Option<BookingId> {
        match self.state {
            DeleteState::ConfirmPending { booking_id, .. } => Some(booking_id),
            _ => None,
        }
    }

    /// Opens the confirmation for `booking_id`, replacing any earlier one.
    pub fn open(&mut self, booking_id: BookingId) -> Uuid {
        let ticket = Uuid::new_v4();
        debug!(booking_id, %ticket, "delete confirmation opened");
        self.state = DeleteState::ConfirmPending { booking_id, ticket };
        ticket
    }

    /// Closes a pending confirmation. Returns false when nothing was pending.
    pub fn cancel(&mut self) -> bool {
        if matches!(self.state, DeleteState::ConfirmPending { .. }) {
            self.state = DeleteState::Idle;
            true
        } else {
            false
        }
    }

    /// Executes the deletion once for the confirmation identified by `ticket`.
    pub fn confirm(&mut self, ticket: Uuid, controller: &LifecycleController) -> DeleteOutcome {
        let booking_id = match self.state {
            DeleteState::ConfirmPending {
                booking_id,
                ticket: expected,
            } if expected == ticket => booking_id,
            _ => {
                debug!(%ticket, state = ?self.state, "delete confirmation ignored");
                return DeleteOutcome::Ignored;
            }
        };

        self.state = DeleteState::Executing { booking_id };
        match controller.delete(booking_id) {
            Ok(()) => {
                self.state = DeleteState::Done { booking_id };
                DeleteOutcome::Deleted(booking_id)
            }
            Err(err) => {
                self.state = DeleteState::Failed {
                    booking_id,
                    message: err.to_string(),
                };
                DeleteOutcome::Failed(err)
            }
        }
    }

    /// Returns to idle after a finished run.
    pub fn reset(&mut self) {
        self.state = DeleteState::Idle;
    }
}
