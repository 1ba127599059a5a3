//! Execution outcomes and result extraction.
//!
//! An [`ExecutionOutcome`] is the node's record of a finalized transaction. The
//! raw invocation form hands it back untouched; the extracting form pulls the
//! return value of the last executed receipt out of it with [`ExecutionOutcome::extract`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ClientError, Result};
use crate::types::{Amount, Base64Args};

/// Final status of the whole transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinalExecutionStatus {
    NotStarted,
    Started,
    /// The node's failure description, kept as sent.
    Failure(Value),
    SuccessValue(Base64Args),
}

/// Status of a single transaction or receipt outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    Unknown,
    Failure(Value),
    SuccessValue(Base64Args),
    SuccessReceiptId(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeDetail {
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub receipt_ids: Vec<String>,
    #[serde(default)]
    pub gas_burnt: u64,
    #[serde(default)]
    pub tokens_burnt: Option<Amount>,
    #[serde(default)]
    pub executor_id: Option<String>,
    pub status: ExecutionStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcomeWithId {
    pub id: String,
    pub outcome: OutcomeDetail,
}

/// Full outcome of a finalized transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: FinalExecutionStatus,
    pub transaction_outcome: ExecutionOutcomeWithId,
    #[serde(default)]
    pub receipts_outcome: Vec<ExecutionOutcomeWithId>,
}

impl ExecutionOutcome {
    pub fn transaction_hash(&self) -> &str {
        &self.transaction_outcome.id
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, FinalExecutionStatus::SuccessValue(_))
    }

    /// Logs of the transaction and every receipt, in execution order.
    pub fn logs(&self) -> Vec<&str> {
        std::iter::once(&self.transaction_outcome)
            .chain(self.receipts_outcome.iter())
            .flat_map(|o| o.outcome.logs.iter().map(String::as_str))
            .collect()
    }

    /// Raw bytes returned by the last executed receipt.
    ///
    /// A failed transaction is a [`ClientError::RemoteExecution`] carrying the
    /// failure verbatim. Without a final value, the last receipt that finished
    /// with a value or a failure decides; receipts that only scheduled further
    /// receipts are skipped. A transaction with neither is a
    /// [`ClientError::MalformedResult`].
    pub fn last_value(&self) -> Result<&[u8]> {
        match &self.status {
            FinalExecutionStatus::Failure(failure) => {
                Err(ClientError::RemoteExecution(failure.to_string()))
            }
            FinalExecutionStatus::SuccessValue(value) => Ok(value.as_bytes()),
            FinalExecutionStatus::NotStarted | FinalExecutionStatus::Started => {
                let last = self.receipts_outcome.iter().rev().find(|r| {
                    matches!(
                        r.outcome.status,
                        ExecutionStatus::SuccessValue(_) | ExecutionStatus::Failure(_)
                    )
                });
                match last.map(|r| &r.outcome.status) {
                    Some(ExecutionStatus::SuccessValue(value)) => Ok(value.as_bytes()),
                    Some(ExecutionStatus::Failure(failure)) => {
                        Err(ClientError::RemoteExecution(failure.to_string()))
                    }
                    _ => Err(ClientError::MalformedResult(format!(
                        "transaction {} has no return value (status {:?})",
                        self.transaction_hash(),
                        self.status
                    ))),
                }
            }
        }
    }

    /// Decode the last receipt's return value as `T`. Repeated calls on the same
    /// outcome always yield the same value.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T> {
        decode_value(self.last_value()?)
    }
}

/// Decode a JSON return value. An empty payload reads as `null`, which is what
/// methods returning nothing produce.
pub fn decode_value<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let bytes: &[u8] = if bytes.is_empty() { b"null" } else { bytes };
    serde_json::from_slice(bytes).map_err(|e| {
        ClientError::MalformedResult(format!(
            "{e} in payload {:?}",
            String::from_utf8_lossy(bytes)
        ))
    })
}
