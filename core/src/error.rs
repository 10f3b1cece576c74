//! Error types for the raffle state machines

use thiserror::Error;

/// Contract violations raised by the selection engine and the controllers.
///
/// None of these are recoverable by retrying; the shell is expected to stop
/// the session and surface the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RaffleError {
    #[error("cannot select from an empty participant pool")]
    EmptyPool,

    #[error("invalid transition: {operation} while {state}")]
    InvalidStateTransition {
        operation: &'static str,
        state: &'static str,
    },

    #[error("invalid prize {prize_id}: {reason}")]
    InvalidPrizeConfig { prize_id: u64, reason: String },
}

impl RaffleError {
    pub(crate) fn transition(operation: &'static str, state: &'static str) -> Self {
        RaffleError::InvalidStateTransition { operation, state }
    }
}
