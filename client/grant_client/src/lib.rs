//! # Grant client
//!
//! Typed client for the quadratic-funding grant contract. Every remote method is
//! reachable through [`GrantClient`] in the form its kind allows:
//!
//! | Kind   | Entry point(s)                                         |
//! |--------|--------------------------------------------------------|
//! | VIEW   | [`GrantClient::view`], `config`, `round`, `projects`…  |
//! | CHANGE | [`GrantClient::call`], [`GrantClient::call_raw`], [`GrantClient::action`] |
//! | either | [`GrantClient::invoke_by_name`]                        |
//!
//! ## Architecture
//!
//! The method table lives in [`methods`]. Networking is behind [`Transport`]
//! ([`JsonRpcTransport`] talks to a NEAR JSON-RPC node) and identity behind
//! [`Wallet`]. The client itself keeps no state between calls.

pub mod client;
pub mod config;
pub mod errors;
pub mod grant;
pub mod invariants;
pub mod methods;
pub mod model;
pub mod outcome;
pub mod rpc;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_views;

pub use client::GrantClient;
pub use config::{ClientConfig, Network};
pub use errors::{ClientError, ErrorKind, Result};
pub use methods::{CallDescriptor, CallKind, CallOptions, ResolvedOptions};
pub use model::{Config, Grant, Project, ProjectId, Round, RoundStatus};
pub use outcome::ExecutionOutcome;
pub use rpc::JsonRpcTransport;
pub use transport::{Action, SignedOutWallet, Transport, Wallet};
pub use types::{AccountId, Amount, Gas, Timestamp};
