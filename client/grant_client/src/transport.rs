//! Transport and wallet boundary.
//!
//! The client shapes calls; it never holds keys, signs, or retries submissions.
//! Those belong to the [`Wallet`] (identity and signing, driven by whatever
//! sign-in flow the host application uses) and the [`Transport`] (network).

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, Result};
use crate::outcome::ExecutionOutcome;
use crate::types::{AccountId, Amount, Base64Args, Gas, PublicKey};

/// A single function call against the receiver contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallAction {
    pub method_name: String,
    pub args: Base64Args,
    pub gas: Gas,
    pub deposit: Amount,
}

/// Unsubmitted description of one step of a transaction. Several actions can be
/// combined into one transaction by an external composer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    FunctionCall(FunctionCallAction),
}

impl Action {
    /// Canonical JSON bytes of the action.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Transaction before signing. Nonce and block reference are added by the wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub signer_id: AccountId,
    pub receiver_id: AccountId,
    pub actions: Vec<Action>,
}

/// Transaction as produced by a wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub public_key: PublicKey,
    /// Base64 of the signed transaction bytes, ready for broadcast.
    pub encoded: String,
}

/// Network boundary.
///
/// `query` is read-only and may be issued concurrently. `submit` suspends until
/// the transaction is final; a timeout does not mean the transaction did not
/// execute, so callers must not blindly resubmit.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn query(&self, contract_id: &AccountId, method: &str, args: &[u8]) -> Result<Vec<u8>>;

    async fn submit(&self, transaction: SignedTransaction) -> Result<ExecutionOutcome>;
}

/// Identity used for change calls.
///
/// Reusing one wallet for sequential calls is fine. Concurrent change calls from
/// the same identity need outside coordination.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// The signed-in account, if any.
    fn account_id(&self) -> Option<AccountId>;

    fn is_authorized(&self) -> bool {
        self.account_id().is_some()
    }

    async fn sign(&self, transaction: Transaction) -> Result<SignedTransaction>;
}

/// Wallet with nobody signed in. View calls work; change calls fail with
/// [`ClientError::Authorization`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SignedOutWallet;

#[async_trait]
impl Wallet for SignedOutWallet {
    fn account_id(&self) -> Option<AccountId> {
        None
    }

    async fn sign(&self, _transaction: Transaction) -> Result<SignedTransaction> {
        Err(ClientError::Authorization("no account is signed in".to_string()))
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn query(&self, contract_id: &AccountId, method: &str, args: &[u8]) -> Result<Vec<u8>> {
        (**self).query(contract_id, method, args).await
    }

    async fn submit(&self, transaction: SignedTransaction) -> Result<ExecutionOutcome> {
        (**self).submit(transaction).await
    }
}

#[async_trait]
impl<W: Wallet + ?Sized> Wallet for Arc<W> {
    fn account_id(&self) -> Option<AccountId> {
        (**self).account_id()
    }

    fn is_authorized(&self) -> bool {
        (**self).is_authorized()
    }

    async fn sign(&self, transaction: Transaction) -> Result<SignedTransaction> {
        (**self).sign(transaction).await
    }
}
