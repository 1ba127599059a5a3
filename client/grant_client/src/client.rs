//! Invocation engine.
//!
//! One dispatcher, [`GrantClient::dispatch`], sits under every binding. It is
//! surfaced in four forms:
//!
//! | Form              | Kind   | Suspends | Returns                 |
//! |-------------------|--------|----------|-------------------------|
//! | [`view`]          | VIEW   | yes      | typed result            |
//! | [`call`]          | CHANGE | yes      | typed last-receipt value|
//! | [`call_raw`]      | CHANGE | yes      | [`ExecutionOutcome`]    |
//! | [`action`]        | CHANGE | no       | [`Action`], nothing sent|
//!
//! Each form also has a by-name variant over `serde_json::Value` for callers that
//! pick the method at run time.
//!
//! Change calls are submitted at most once. A timeout while waiting for finality
//! says nothing about whether the call executed; check state before retrying.
//!
//! [`view`]: GrantClient::view
//! [`call`]: GrantClient::call
//! [`call_raw`]: GrantClient::call_raw
//! [`action`]: GrantClient::action

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::errors::{ClientError, Result};
use crate::methods::{
    encode_args, lookup, CallDescriptor, CallKind, CallOptions, ChangeMethod, ResolvedOptions,
    ViewMethod,
};
use crate::outcome::{decode_value, ExecutionOutcome};
use crate::transport::{Action, SignedOutWallet, Transaction, Transport, Wallet};
use crate::types::{AccountId, Base64Args, Gas, DEFAULT_FUNCTION_CALL_GAS};

/// What the dispatcher produced for a descriptor's kind.
enum Dispatched {
    Queried(Vec<u8>),
    Executed(ExecutionOutcome),
}

/// Client bound to one deployed grant contract.
///
/// Holds no state besides its configuration; any number of view calls may run
/// concurrently through a shared reference.
pub struct GrantClient<T, W = SignedOutWallet> {
    transport: T,
    wallet: W,
    contract_id: AccountId,
    default_gas: Gas,
}

impl<T: Transport> GrantClient<T, SignedOutWallet> {
    /// Read-only client: change calls fail with an authorization error.
    pub fn read_only(transport: T, contract_id: AccountId) -> Self {
        Self::new(transport, SignedOutWallet, contract_id)
    }
}

impl<T: Transport, W: Wallet> GrantClient<T, W> {
    pub fn new(transport: T, wallet: W, contract_id: AccountId) -> Self {
        Self {
            transport,
            wallet,
            contract_id,
            default_gas: DEFAULT_FUNCTION_CALL_GAS,
        }
    }

    pub fn from_config(config: &ClientConfig, transport: T, wallet: W) -> Self {
        Self::new(transport, wallet, config.contract_id.clone())
            .with_default_gas(config.default_gas)
    }

    pub fn with_default_gas(mut self, gas: Gas) -> Self {
        self.default_gas = gas;
        self
    }

    pub fn contract_id(&self) -> &AccountId {
        &self.contract_id
    }

    pub fn default_gas(&self) -> Gas {
        self.default_gas
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ── Typed forms ──────────────────────────────────────────────────

    /// Query a view method.
    pub async fn view<M: ViewMethod>(&self, args: &M::Args) -> Result<M::Output> {
        let bytes = self.query_bytes(&M::DESCRIPTOR, args).await?;
        decode_for(&M::DESCRIPTOR, &bytes)
    }

    /// Submit a change method, wait for finality and return its value.
    pub async fn call<M: ChangeMethod>(
        &self,
        args: &M::Args,
        options: CallOptions,
    ) -> Result<M::Output> {
        let outcome = self.call_raw::<M>(args, options).await?;
        extract_for(&M::DESCRIPTOR, &outcome)
    }

    /// Submit a change method, wait for finality and return the whole outcome.
    pub async fn call_raw<M: ChangeMethod>(
        &self,
        args: &M::Args,
        options: CallOptions,
    ) -> Result<ExecutionOutcome> {
        let args = encode_args(args)?;
        match self.dispatch(&M::DESCRIPTOR, args, &options).await? {
            Dispatched::Executed(outcome) => Ok(outcome),
            Dispatched::Queried(_) => Err(kind_mismatch(&M::DESCRIPTOR)),
        }
    }

    /// Build the action for a change method without sending anything.
    pub fn action<M: ChangeMethod>(&self, args: &M::Args, options: CallOptions) -> Result<Action> {
        M::DESCRIPTOR.action(encode_args(args)?, &options, self.default_gas)
    }

    // ── By-name forms ────────────────────────────────────────────────

    /// Invoke any registered method by name. View methods are queried, change
    /// methods are executed and their last value is returned.
    pub async fn invoke_by_name(
        &self,
        method_name: &str,
        args: &Value,
        options: CallOptions,
    ) -> Result<Value> {
        let descriptor = descriptor(method_name)?;
        match self.dispatch(descriptor, encode_args(args)?, &options).await? {
            Dispatched::Queried(bytes) => decode_for(descriptor, &bytes),
            Dispatched::Executed(outcome) => extract_for(descriptor, &outcome),
        }
    }

    pub async fn call_raw_by_name(
        &self,
        method_name: &str,
        args: &Value,
        options: CallOptions,
    ) -> Result<ExecutionOutcome> {
        let descriptor = descriptor(method_name)?;
        if descriptor.kind != CallKind::Change {
            return Err(kind_mismatch(descriptor));
        }
        match self.dispatch(descriptor, encode_args(args)?, &options).await? {
            Dispatched::Executed(outcome) => Ok(outcome),
            Dispatched::Queried(_) => Err(kind_mismatch(descriptor)),
        }
    }

    pub fn action_by_name(
        &self,
        method_name: &str,
        args: &Value,
        options: CallOptions,
    ) -> Result<Action> {
        descriptor(method_name)?.action(encode_args(args)?, &options, self.default_gas)
    }

    // ── Dispatcher ───────────────────────────────────────────────────

    async fn query_bytes<A: Serialize + ?Sized>(
        &self,
        descriptor: &CallDescriptor,
        args: &A,
    ) -> Result<Vec<u8>> {
        match self.dispatch(descriptor, encode_args(args)?, &CallOptions::new()).await? {
            Dispatched::Queried(bytes) => Ok(bytes),
            Dispatched::Executed(_) => Err(kind_mismatch(descriptor)),
        }
    }

    /// Route one call by its descriptor's kind.
    async fn dispatch(
        &self,
        descriptor: &CallDescriptor,
        args: Base64Args,
        options: &CallOptions,
    ) -> Result<Dispatched> {
        match descriptor.resolve(options, self.default_gas)? {
            ResolvedOptions::View => {
                debug!(method = descriptor.method_name, kind = %CallKind::View, "query");
                let bytes = self
                    .transport
                    .query(&self.contract_id, descriptor.method_name, args.as_bytes())
                    .await?;
                Ok(Dispatched::Queried(bytes))
            }
            ResolvedOptions::Change { gas, deposit } => {
                let signer_id = self
                    .wallet
                    .account_id()
                    .filter(|_| self.wallet.is_authorized())
                    .ok_or_else(|| {
                        ClientError::Authorization(format!(
                            "{} needs a signed-in account",
                            descriptor.method_name
                        ))
                    })?;
                let action = descriptor.action(args, options, self.default_gas)?;
                debug!(
                    method = descriptor.method_name,
                    kind = %CallKind::Change,
                    %gas,
                    %deposit,
                    "change call"
                );

                let transaction = Transaction {
                    signer_id,
                    receiver_id: self.contract_id.clone(),
                    actions: vec![action],
                };
                let signed = self.wallet.sign(transaction).await?;
                info!(
                    "Submitting {} to {} as {}",
                    descriptor.method_name, self.contract_id, signed.transaction.signer_id
                );
                let outcome = self.transport.submit(signed).await?;
                info!(
                    "Transaction {} final (success={})",
                    outcome.transaction_hash(),
                    outcome.is_success()
                );
                Ok(Dispatched::Executed(outcome))
            }
        }
    }
}

fn descriptor(method_name: &str) -> Result<&'static CallDescriptor> {
    lookup(method_name).ok_or_else(|| {
        ClientError::InvalidOptions(format!("{method_name} is not a grant contract method"))
    })
}

fn kind_mismatch(descriptor: &CallDescriptor) -> ClientError {
    ClientError::InvalidOptions(format!(
        "{} is a {} method",
        descriptor.method_name, descriptor.kind
    ))
}

fn decode_for<O: serde::de::DeserializeOwned>(
    descriptor: &CallDescriptor,
    bytes: &[u8],
) -> Result<O> {
    decode_value(bytes).map_err(|e| with_method(descriptor, e))
}

fn extract_for<O: serde::de::DeserializeOwned>(
    descriptor: &CallDescriptor,
    outcome: &ExecutionOutcome,
) -> Result<O> {
    outcome.extract().map_err(|e| with_method(descriptor, e))
}

fn with_method(descriptor: &CallDescriptor, err: ClientError) -> ClientError {
    match err {
        ClientError::MalformedResult(msg) => ClientError::MalformedResult(format!(
            "{} should return {}: {msg}",
            descriptor.method_name, descriptor.result
        )),
        other => other,
    }
}
