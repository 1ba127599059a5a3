//! # Method registry
//!
//! Every remote grant method is declared once, in the table at the bottom of this
//! file. The table yields:
//!
//! - a zero-sized marker type per method implementing [`ViewMethod`] or
//!   [`ChangeMethod`], carrying the argument and result shapes as types;
//! - the static [`REGISTRY`] of [`CallDescriptor`]s, looked up by name with
//!   [`lookup`] for callers that only know the method at run time.
//!
//! All four invocation forms of a method share its descriptor.
//!
//! ## Call options
//!
//! | Kind   | gas                            | deposit            |
//! |--------|--------------------------------|--------------------|
//! | VIEW   | must be absent                 | must be absent     |
//! | CHANGE | caller value, else default gas | caller value, else 0 |
//!
//! A VIEW call given options fails fast with [`ClientError::InvalidOptions`].
//! The typed VIEW entry points take no options, so only by-name calls can hit it.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, Result};
use crate::model::{Config, Grant, Project, ProjectId, Round, RoundStatus, RoundWithProjectCount};
use crate::transport::{Action, FunctionCallAction};
use crate::types::{AccountId, Amount, Base64Args, Duration, Gas, RoundId, Timestamp};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    /// Read-only query; no transaction.
    View,
    /// State-mutating call; signed transaction with gas and deposit.
    Change,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View => f.write_str("view"),
            Self::Change => f.write_str("change"),
        }
    }
}

/// Immutable description of one remote method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallDescriptor {
    pub method_name: &'static str,
    pub kind: CallKind,
    /// Rust type of the argument record.
    pub args: &'static str,
    /// Rust type of the return value.
    pub result: &'static str,
}

/// Caller-supplied options; every field optional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallOptions {
    pub gas: Option<Gas>,
    pub attached_deposit: Option<Amount>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gas(mut self, gas: Gas) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn with_deposit(mut self, deposit: Amount) -> Self {
        self.attached_deposit = Some(deposit);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.gas.is_none() && self.attached_deposit.is_none()
    }
}

/// Effective options after defaults are applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedOptions {
    View,
    Change { gas: Gas, deposit: Amount },
}

impl CallDescriptor {
    /// Apply the kind's option rules. Pure.
    pub fn resolve(&self, options: &CallOptions, default_gas: Gas) -> Result<ResolvedOptions> {
        match self.kind {
            CallKind::View if !options.is_empty() => Err(ClientError::InvalidOptions(format!(
                "{} is a view method and takes no gas or deposit",
                self.method_name
            ))),
            CallKind::View => Ok(ResolvedOptions::View),
            CallKind::Change => Ok(ResolvedOptions::Change {
                gas: options.gas.unwrap_or(default_gas),
                deposit: options.attached_deposit.unwrap_or(Amount::ZERO),
            }),
        }
    }

    /// Build the function-call action for already serialized arguments. Pure:
    /// no network access, identical inputs give identical actions.
    pub fn action(
        &self,
        args: Base64Args,
        options: &CallOptions,
        default_gas: Gas,
    ) -> Result<Action> {
        match self.resolve(options, default_gas)? {
            ResolvedOptions::View => Err(ClientError::InvalidOptions(format!(
                "{} is a view method and cannot be sent as an action",
                self.method_name
            ))),
            ResolvedOptions::Change { gas, deposit } => {
                Ok(Action::FunctionCall(FunctionCallAction {
                    method_name: self.method_name.to_string(),
                    args,
                    gas,
                    deposit,
                }))
            }
        }
    }
}

/// A remote method with typed arguments and result.
pub trait Method {
    const DESCRIPTOR: CallDescriptor;
    type Args: Serialize + Send + Sync;
    type Output: DeserializeOwned;
}

/// Marker for read-only methods.
pub trait ViewMethod: Method {}

/// Marker for state-mutating methods.
pub trait ChangeMethod: Method {}

/// Serialize a method's arguments to their wire bytes.
pub fn encode_args<A: Serialize + ?Sized>(args: &A) -> Result<Base64Args> {
    Ok(Base64Args::new(serde_json::to_vec(args)?))
}

pub fn lookup(method_name: &str) -> Option<&'static CallDescriptor> {
    REGISTRY.iter().find(|d| d.method_name == method_name)
}

// ── Argument records ─────────────────────────────────────────────────

/// Arguments of methods that take none. Serializes as `{}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoArgs {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectsForOwnerArgs {
    pub owner_id: AccountId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectIdArgs {
    pub project_id: ProjectId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundArgs {
    pub round_id: RoundId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProjectArgs {
    pub name: String,
    pub description: String,
    pub external_url: String,
    pub image: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteArgs {
    pub project_id: ProjectId,
    pub votes: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawArgs {
    pub project_id: ProjectId,
    pub amount: Amount,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SudoConfigArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_point: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_duration: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_vote_cost: Option<Amount>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetOwnerArgs {
    pub new_owner_id: AccountId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorsArgs {
    pub operators: Vec<AccountId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoundArgs {
    pub start_at: Timestamp,
    pub end_at: Timestamp,
}

/// `danger` must be `true` or the contract refuses the update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCurrentRoundArgs {
    pub danger: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RoundStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<Timestamp>,
}

// ── Method table ─────────────────────────────────────────────────────

macro_rules! grant_methods {
    (@kind View $marker:ident) => {
        impl ViewMethod for $marker {}
    };
    (@kind Change $marker:ident) => {
        impl ChangeMethod for $marker {}
    };
    ($(
        $(#[$doc:meta])*
        $kind:ident $marker:ident = $name:literal ($args:ty) -> $output:ty;
    )*) => {
        $(
            $(#[$doc])*
            #[derive(Clone, Copy, Debug, Default)]
            pub struct $marker;

            impl Method for $marker {
                const DESCRIPTOR: CallDescriptor = CallDescriptor {
                    method_name: $name,
                    kind: CallKind::$kind,
                    args: stringify!($args),
                    result: stringify!($output),
                };
                type Args = $args;
                type Output = $output;
            }

            grant_methods!(@kind $kind $marker);
        )*

        /// Every grant method, in declaration order.
        pub static REGISTRY: &[CallDescriptor] = &[$(<$marker as Method>::DESCRIPTOR),*];
    };
}

grant_methods! {
    View GetConfig = "config" (NoArgs) -> Config;
    View Operators = "operators" (NoArgs) -> Vec<AccountId>;
    /// `(withdrawable, granted)` for a project.
    View GrantFor = "grant_for" (ProjectIdArgs) -> Grant;
    /// `None` for an unknown project id.
    View GetProject = "project" (ProjectIdArgs) -> Option<Project>;
    View Projects = "projects" (PageArgs) -> Vec<Project>;
    View ProjectsForOwner = "projects_for_owner" (ProjectsForOwnerArgs) -> Vec<Project>;
    /// `None` for an unknown round id.
    View GetRound = "round" (RoundArgs) -> Option<Round>;
    View Rounds = "rounds" (PageArgs) -> Vec<RoundWithProjectCount>;

    /// One-time bootstrap; the caller becomes owner.
    Change Init = "init" (NoArgs) -> ();
    Change SudoConfig = "sudo_config" (SudoConfigArgs) -> ();
    Change SetOwner = "set_owner" (SetOwnerArgs) -> ();
    /// Owner only.
    Change ExtendOperators = "extend_operators" (OperatorsArgs) -> ();
    /// Owner only.
    Change RemoveOperators = "remove_operators" (OperatorsArgs) -> ();
    Change NewProject = "new_project" (NewProjectArgs) -> Project;
    /// Needs a deposit covering the quadratic vote cost plus storage.
    Change Vote = "vote" (VoteArgs) -> Project;
    /// Project owner only.
    Change Withdraw = "withdraw" (WithdrawArgs) -> ();
    /// The attached deposit goes to the current round's support pool.
    Change Donate = "donate" (NoArgs) -> Round;
    Change SudoNewRound = "sudo_new_round" (NewRoundArgs) -> Round;
    Change SudoNewDefaultRound = "sudo_new_default_round" (NoArgs) -> Round;
    Change SudoUpdateCurrentRound = "sudo_update_current_round" (UpdateCurrentRoundArgs) -> Round;
    Change SudoFinishCurrentRound = "sudo_finish_current_round" (NoArgs) -> Round;
}
