//! Round status invariants observed by the client.
//!
//! The contract owns the lifecycle; the client only refuses to accept a record
//! that contradicts one it already holds.

use crate::errors::{ClientError, Result};
use crate::model::{Round, RoundStatus};

impl RoundStatus {
    /// Only forward transitions are allowed:
    ///   Active   -> Active | Finished
    ///   Finished -> Finished
    pub fn can_transition_to(&self, next: &RoundStatus) -> bool {
        matches!(
            (self, next),
            (RoundStatus::Active, _) | (RoundStatus::Finished, RoundStatus::Finished)
        )
    }
}

/// Check that `next` is a valid later observation of `previous`.
pub fn check_round_transition(previous: &Round, next: &Round) -> Result<()> {
    if previous.id != next.id {
        return Err(ClientError::MalformedResult(format!(
            "expected round {}, got round {}",
            previous.id, next.id
        )));
    }
    if !previous.status.can_transition_to(&next.status) {
        return Err(ClientError::MalformedResult(format!(
            "round {} went from {:?} back to {:?}",
            next.id, previous.status, next.status
        )));
    }
    Ok(())
}
