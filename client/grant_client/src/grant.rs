//! Typed bindings for the grant contract surface.
//!
//! Thin wrappers over the generic forms in [`crate::client`]. Pagination is left
//! to the caller: `limit`/`offset` are passed through as given.

use crate::client::GrantClient;
use crate::errors::{ClientError, Result};
use crate::invariants::check_round_transition;
use crate::methods::*;
use crate::model::{Config, Grant, Project, ProjectId, Round, RoundWithProjectCount};
use crate::outcome::ExecutionOutcome;
use crate::transport::{Action, Transport, Wallet};
use crate::types::{AccountId, Amount, RoundId, Timestamp};

impl<T: Transport, W: Wallet> GrantClient<T, W> {
    // ── Views ────────────────────────────────────────────────────────

    pub async fn config(&self) -> Result<Config> {
        self.view::<GetConfig>(&NoArgs {}).await
    }

    pub async fn operators(&self) -> Result<Vec<AccountId>> {
        self.view::<Operators>(&NoArgs {}).await
    }

    pub async fn grant_for(&self, project_id: ProjectId) -> Result<Grant> {
        self.view::<GrantFor>(&ProjectIdArgs { project_id }).await
    }

    /// `None` when no project has that id.
    pub async fn project(&self, project_id: ProjectId) -> Result<Option<Project>> {
        self.view::<GetProject>(&ProjectIdArgs { project_id }).await
    }

    pub async fn projects(&self, limit: Option<u32>, offset: Option<u32>) -> Result<Vec<Project>> {
        self.view::<Projects>(&PageArgs { limit, offset }).await
    }

    pub async fn projects_for_owner(
        &self,
        owner_id: AccountId,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<Project>> {
        self.view::<ProjectsForOwner>(&ProjectsForOwnerArgs {
            owner_id,
            limit,
            offset,
        })
        .await
    }

    /// `None` when no round has that id.
    pub async fn round(&self, round_id: RoundId) -> Result<Option<Round>> {
        self.view::<GetRound>(&RoundArgs { round_id }).await
    }

    pub async fn rounds(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<RoundWithProjectCount>> {
        self.view::<Rounds>(&PageArgs { limit, offset }).await
    }

    /// Re-read a round the caller already holds.
    ///
    /// Fails with [`ClientError::MalformedResult`] if the contract now reports
    /// the round as missing, or in a status it cannot have moved back to.
    pub async fn refresh_round(&self, previous: &Round) -> Result<Round> {
        let next = self.round(previous.id).await?.ok_or_else(|| {
            ClientError::MalformedResult(format!("round {} disappeared", previous.id))
        })?;
        check_round_transition(previous, &next)?;
        Ok(next)
    }

    /// The contract's current round, checked against `previous` when given.
    pub async fn current_round(&self, previous: Option<&Round>) -> Result<Option<Round>> {
        let current = self.config().await?.current_round;
        if let (Some(previous), Some(current)) = (previous, current.as_ref()) {
            if previous.id == current.id {
                check_round_transition(previous, current)?;
            }
        }
        Ok(current)
    }

    // ── Changes ──────────────────────────────────────────────────────

    pub async fn init(&self, options: CallOptions) -> Result<()> {
        self.call::<Init>(&NoArgs {}, options).await
    }

    pub async fn sudo_config(&self, args: SudoConfigArgs, options: CallOptions) -> Result<()> {
        self.call::<SudoConfig>(&args, options).await
    }

    pub async fn set_owner(&self, new_owner_id: AccountId, options: CallOptions) -> Result<()> {
        self.call::<SetOwner>(&SetOwnerArgs { new_owner_id }, options)
            .await
    }

    pub async fn extend_operators(
        &self,
        operators: Vec<AccountId>,
        options: CallOptions,
    ) -> Result<()> {
        self.call::<ExtendOperators>(&OperatorsArgs { operators }, options)
            .await
    }

    pub async fn remove_operators(
        &self,
        operators: Vec<AccountId>,
        options: CallOptions,
    ) -> Result<()> {
        self.call::<RemoveOperators>(&OperatorsArgs { operators }, options)
            .await
    }

    pub async fn new_project(&self, args: NewProjectArgs, options: CallOptions) -> Result<Project> {
        self.call::<NewProject>(&args, options).await
    }

    /// The attached deposit is sent as given; see [`Round::vote_cost_for`] to
    /// estimate it.
    pub async fn vote(
        &self,
        project_id: ProjectId,
        votes: u64,
        options: CallOptions,
    ) -> Result<Project> {
        self.call::<Vote>(&VoteArgs { project_id, votes }, options)
            .await
    }

    pub async fn withdraw(
        &self,
        project_id: ProjectId,
        amount: Amount,
        options: CallOptions,
    ) -> Result<()> {
        self.call::<Withdraw>(&WithdrawArgs { project_id, amount }, options)
            .await
    }

    /// Donate the attached deposit to the current round's pool.
    pub async fn donate(&self, options: CallOptions) -> Result<Round> {
        self.call::<Donate>(&NoArgs {}, options).await
    }

    pub async fn sudo_new_round(
        &self,
        start_at: Timestamp,
        end_at: Timestamp,
        options: CallOptions,
    ) -> Result<Round> {
        self.call::<SudoNewRound>(&NewRoundArgs { start_at, end_at }, options)
            .await
    }

    pub async fn sudo_new_default_round(&self, options: CallOptions) -> Result<Round> {
        self.call::<SudoNewDefaultRound>(&NoArgs {}, options).await
    }

    /// Owner only. The contract refuses the call unless `args.danger` is set.
    pub async fn sudo_update_current_round(
        &self,
        args: UpdateCurrentRoundArgs,
        options: CallOptions,
    ) -> Result<Round> {
        self.call::<SudoUpdateCurrentRound>(&args, options).await
    }

    pub async fn sudo_finish_current_round(&self, options: CallOptions) -> Result<Round> {
        self.call::<SudoFinishCurrentRound>(&NoArgs {}, options)
            .await
    }

    // ── Raw outcomes and actions for the common change calls ─────────

    pub async fn vote_raw(
        &self,
        project_id: ProjectId,
        votes: u64,
        options: CallOptions,
    ) -> Result<ExecutionOutcome> {
        self.call_raw::<Vote>(&VoteArgs { project_id, votes }, options)
            .await
    }

    pub async fn donate_raw(&self, options: CallOptions) -> Result<ExecutionOutcome> {
        self.call_raw::<Donate>(&NoArgs {}, options).await
    }

    pub fn vote_action(
        &self,
        project_id: ProjectId,
        votes: u64,
        options: CallOptions,
    ) -> Result<Action> {
        self.action::<Vote>(&VoteArgs { project_id, votes }, options)
    }

    pub fn donate_action(&self, options: CallOptions) -> Result<Action> {
        self.action::<Donate>(&NoArgs {}, options)
    }
}
