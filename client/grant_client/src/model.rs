//! # Domain model
//!
//! Records returned by the grant contract. The client never holds an
//! authoritative copy: every value here is the result of a fresh query or the
//! return value of a change call.
//!
//! ## Round lifecycle
//!
//! ```text
//! sudo_new_round / sudo_new_default_round
//!            │
//!            ▼
//!         Active ──► Finished      (sudo_finish_current_round)
//! ```
//!
//! `donate`, `vote` and `new_project` are only accepted while the current round
//! is `Active`. `Finished` is terminal; see [`crate::invariants`].
//!
//! ## Unknown fields
//!
//! Extra fields on any record are ignored on input so that a newer contract
//! version can add fields without breaking older clients. Missing optional
//! fields (`Config::current_round`) default to `None`.

use serde::{Deserialize, Serialize};

use crate::types::{AccountId, Amount, Duration, RoundId, Timestamp};

/// Lifecycle status of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    /// Accepting projects, votes and donations.
    Active,
    /// Closed; grants can be withdrawn.
    Finished,
}

/// A funding epoch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub created_at: Timestamp,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub status: RoundStatus,
    /// Matching pool after the platform fee.
    pub support_pool: Amount,
    /// Matching pool as donated, before the fee.
    pub pure_support_pool: Amount,
    /// Sum of the projects' quadratic support areas.
    pub support_area: u64,
    /// Price of one unit of vote weight.
    pub vote_cost: Amount,
}

impl Round {
    /// Whether the round accepts projects, votes and donations at `now`: its status
    /// is `Active` and `now` lies within `[start_at, end_at]`.
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.status == RoundStatus::Active && self.start_at <= now && now <= self.end_at
    }

    pub fn is_finished(&self) -> bool {
        self.status == RoundStatus::Finished
    }

    /// Deposit needed to add `votes` on a project the caller has already given
    /// `already_voted` votes in this round.
    ///
    /// The contract charges quadratic weight `votes*(votes+1)/2 + votes*already_voted`
    /// times `vote_cost`, plus storage. Storage is not included here, and the
    /// client never adjusts a deposit on its own.
    pub fn vote_cost_for(&self, votes: u64, already_voted: u64) -> Option<Amount> {
        let votes = u128::from(votes);
        let weight = votes
            .checked_mul(votes.checked_add(1)?)?
            .checked_div(2)?
            .checked_add(votes.checked_mul(u128::from(already_voted))?)?;
        self.vote_cost.checked_mul(weight)
    }
}

/// A project is keyed by the round it was registered in and its owner.
pub type ProjectId = (RoundId, AccountId);

/// A funded initiative within one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub external_url: String,
    pub image: String,
    pub owner: AccountId,
    pub round_id: RoundId,
    pub created_at: Timestamp,
    pub total_votes: u64,
    /// Direct contributions from votes, after the platform fee.
    pub grants: Amount,
    /// Quadratic-funding share computed by the contract. Displayed, never recomputed.
    pub support_area: u64,
    pub withdrawn: Amount,
}

impl Project {
    pub fn id(&self) -> ProjectId {
        (self.round_id, self.owner.clone())
    }
}

/// Contract-wide settings as reported by the `config` view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    pub owner_id: AccountId,
    /// Allow-list for `sudo_*` methods. Enforced by the contract, not here.
    pub operators: Vec<AccountId>,
    /// The round the contract currently points at, if any.
    #[serde(default)]
    pub current_round: Option<Round>,
    /// Platform fee in basis points (500 = 5.00%).
    pub fee_point: u32,
    pub default_duration: Duration,
    pub default_vote_cost: Amount,
    /// Fees accrued by the platform.
    pub fee_amount: Amount,
    pub motivation: String,
}

impl Config {
    pub fn is_operator(&self, account: &AccountId) -> bool {
        self.operators.contains(account)
    }

    pub fn is_owner_or_operator(&self, account: &AccountId) -> bool {
        &self.owner_id == account || self.is_operator(account)
    }
}

/// Result of `grant_for`: what the owner can still withdraw, and the total
/// granted so far. Both are zero while the project's round is current and active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(Amount, Amount)", into = "(Amount, Amount)")]
pub struct Grant {
    pub withdrawable: Amount,
    pub granted: Amount,
}

impl From<(Amount, Amount)> for Grant {
    fn from((withdrawable, granted): (Amount, Amount)) -> Self {
        Self {
            withdrawable,
            granted,
        }
    }
}

impl From<Grant> for (Amount, Amount) {
    fn from(grant: Grant) -> Self {
        (grant.withdrawable, grant.granted)
    }
}

/// One entry of the `rounds` view: a round and how many projects it holds.
pub type RoundWithProjectCount = (Round, u32);
