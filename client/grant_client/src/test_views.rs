use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::{ClientError, ErrorKind, Result};
use crate::methods::{CallOptions, GetRound, RoundArgs};
use crate::model::{Grant, Round, RoundStatus};
use crate::outcome::ExecutionOutcome;
use crate::testing::*;
use crate::transport::{SignedOutWallet, SignedTransaction, Transport};
use crate::types::{AccountId, Amount, Gas, Timestamp, ONE_NEAR};
use crate::GrantClient;

fn setup(fixture: FixtureContract) -> (Arc<FixtureContract>, GrantClient<Arc<FixtureContract>>) {
    let fixture = Arc::new(fixture);
    let client = GrantClient::read_only(fixture.clone(), contract());
    (fixture, client)
}

fn finished_round_3() -> Round {
    Round {
        id: 3,
        created_at: Timestamp::from_secs(1_652_797_280),
        start_at: Timestamp::from_secs(1_652_800_000),
        end_at: Timestamp::from_secs(1_655_478_400),
        status: RoundStatus::Finished,
        support_pool: Amount::from_yocto(95 * ONE_NEAR / 10),
        pure_support_pool: Amount::from_yocto(10 * ONE_NEAR),
        support_area: 42,
        vote_cost: Amount::from_yocto(ONE_NEAR / 10),
    }
}

#[tokio::test]
async fn test_finished_round_is_returned_unchanged() {
    let expected = finished_round_3();
    let (_, client) = setup(FixtureContract::new().with_round(expected.clone()));

    let round = client.round(3).await.unwrap();
    assert_eq!(round, Some(expected.clone()));

    // Same record through the by-name path: only round fields, nothing added.
    let raw = client
        .invoke_by_name("round", &json!({ "round_id": 3 }), CallOptions::new())
        .await
        .unwrap();
    assert_eq!(raw, serde_json::to_value(&expected).unwrap());
    assert_eq!(raw["status"], "Finished");
    assert_eq!(raw["support_pool"], "9500000000000000000000000");
}

#[tokio::test]
async fn test_projects_for_owner_respects_limit() {
    let mut fixture = FixtureContract::new();
    for round_id in 1..=5 {
        fixture = fixture
            .with_round(round(round_id, RoundStatus::Finished))
            .with_project(project(round_id, "alice.near", &format!("alice-{round_id}")));
    }
    fixture = fixture.with_project(project(2, "bob.near", "bob-2"));
    let (fixture, client) = setup(fixture);

    let alice = account("alice.near");
    let first = client
        .projects_for_owner(alice.clone(), Some(2), Some(0))
        .await
        .unwrap();
    let names: Vec<_> = first.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["alice-1", "alice-2"]);

    // Identical calls are not cached or merged; each one goes out.
    let second = client
        .projects_for_owner(alice.clone(), Some(2), Some(0))
        .await
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(fixture.queries(), vec!["projects_for_owner", "projects_for_owner"]);

    let rest = client
        .projects_for_owner(alice, None, Some(2))
        .await
        .unwrap();
    assert_eq!(rest.len(), 3);
    assert!(rest.iter().all(|p| p.owner.as_str() == "alice.near"));
}

#[tokio::test]
async fn test_unknown_project_is_none() {
    let (_, client) = setup(
        FixtureContract::new()
            .with_round(round(1, RoundStatus::Active))
            .with_project(project(1, "alice.near", "alice-1")),
    );

    assert_eq!(client.project((9, account("alice.near"))).await.unwrap(), None);
    assert_eq!(client.project((1, account("bob.near"))).await.unwrap(), None);
    assert_eq!(client.round(9).await.unwrap(), None);

    let found = client.project((1, account("alice.near"))).await.unwrap().unwrap();
    assert_eq!(found.id(), (1, account("alice.near")));
}

#[tokio::test]
async fn test_projects_and_rounds_pagination() {
    let (_, client) = setup(
        FixtureContract::new()
            .with_round(round(1, RoundStatus::Finished))
            .with_round(round(2, RoundStatus::Active))
            .with_project(project(1, "alice.near", "a"))
            .with_project(project(1, "bob.near", "b"))
            .with_project(project(2, "carol.near", "c")),
    );

    let all = client.projects(None, None).await.unwrap();
    assert_eq!(all.len(), 3);
    let tail = client.projects(Some(10), Some(1)).await.unwrap();
    assert_eq!(tail, all[1..].to_vec());
    assert!(client.projects(None, Some(3)).await.unwrap().is_empty());

    let rounds = client.rounds(None, None).await.unwrap();
    let counts: Vec<_> = rounds.iter().map(|(r, n)| (r.id, *n)).collect();
    assert_eq!(counts, vec![(1, 2), (2, 1)]);
    assert_eq!(client.rounds(Some(1), Some(1)).await.unwrap()[0].0.id, 2);
}

#[tokio::test]
async fn test_config_and_operators() {
    let (_, client) = setup(
        FixtureContract::new()
            .with_operator("ops.testnet")
            .with_round(round(4, RoundStatus::Active)),
    );

    let config = client.config().await.unwrap();
    assert_eq!(config.owner_id.as_str(), OWNER);
    assert_eq!(config.fee_point, 500);
    assert_eq!(config.current_round.as_ref().map(|r| r.id), Some(4));
    assert!(config.is_operator(&account("ops.testnet")));
    assert!(config.is_owner_or_operator(&account(OWNER)));

    assert_eq!(client.operators().await.unwrap(), vec![account("ops.testnet")]);
}

#[tokio::test]
async fn test_grant_for() {
    let mut finished = round(1, RoundStatus::Finished);
    finished.support_pool = Amount::from_yocto(10 * ONE_NEAR);
    finished.support_area = 4;
    let mut funded = project(1, "alice.near", "alice-1");
    funded.grants = Amount::from_yocto(2 * ONE_NEAR);
    funded.support_area = 1;
    funded.withdrawn = Amount::from_yocto(ONE_NEAR);

    let (_, client) = setup(
        FixtureContract::new()
            .with_round(finished)
            .with_project(funded)
            .with_round(round(2, RoundStatus::Active))
            .with_project(project(2, "bob.near", "bob-2")),
    );

    // 2 NEAR direct + 1/4 of the 10 NEAR pool, 1 NEAR already withdrawn.
    let grant = client.grant_for((1, account("alice.near"))).await.unwrap();
    assert_eq!(
        grant,
        Grant {
            withdrawable: Amount::from_yocto(35 * ONE_NEAR / 10),
            granted: Amount::from_yocto(45 * ONE_NEAR / 10),
        }
    );

    // Nothing is withdrawable while the round is running.
    let running = client.grant_for((2, account("bob.near"))).await.unwrap();
    assert!(running.withdrawable.is_zero() && running.granted.is_zero());

    let err = client.grant_for((7, account("bob.near"))).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Remote);
    assert!(err.to_string().contains("ERR_PROJECT_NOT_FOUND"));
}

#[tokio::test]
async fn test_view_by_name_rejects_options() {
    let (fixture, client) = setup(FixtureContract::new().with_round(finished_round_3()));

    let err = client
        .invoke_by_name(
            "round",
            &json!({ "round_id": 3 }),
            CallOptions::new().with_gas(Gas::from_tgas(10)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidOptions(_)));
    assert!(fixture.queries().is_empty());

    let err = client
        .invoke_by_name("transfer", &json!({}), CallOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidOptions(_)));

    let err = client
        .call_raw_by_name("round", &json!({ "round_id": 3 }), CallOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidOptions(_)));
    assert!(fixture.queries().is_empty());
}

#[tokio::test]
async fn test_bad_arguments_surface_as_remote_query_errors() {
    let (_, client) = setup(FixtureContract::new());
    let err = client
        .invoke_by_name("round", &json!({ "round": "three" }), CallOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::RemoteQuery(ref m) if m.contains("Failed to deserialize")));
}

#[tokio::test]
async fn test_refresh_round_detects_regression() {
    let (fixture, client) = setup(FixtureContract::new().with_round(finished_round_3()));

    let held = client.round(3).await.unwrap().unwrap();
    assert_eq!(client.refresh_round(&held).await.unwrap(), held);

    let mut reopened = held.clone();
    reopened.status = RoundStatus::Active;
    fixture.overwrite_round(reopened);
    let err = client.refresh_round(&held).await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedResult(_)));

    let err = client.current_round(Some(&held)).await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedResult(_)));
}

#[tokio::test]
async fn test_current_round_moves_forward() {
    let (fixture, client) = setup(FixtureContract::new().with_round(round(5, RoundStatus::Active)));

    let active = client.current_round(None).await.unwrap().unwrap();
    assert!(active.is_active(Timestamp::from_secs(NOW)));
    // Active status alone is not enough once the window has closed.
    assert!(!active.is_active(Timestamp::from_secs(active.end_at.as_secs() + 1)));

    let mut finished = active.clone();
    finished.status = RoundStatus::Finished;
    fixture.overwrite_round(finished);
    let now = client.current_round(Some(&active)).await.unwrap().unwrap();
    assert!(now.is_finished());
}

#[tokio::test]
async fn test_concurrent_views() {
    let (fixture, client) = setup(
        FixtureContract::new()
            .with_round(finished_round_3())
            .with_project(project(3, "alice.near", "alice-3")),
    );

    let args = RoundArgs { round_id: 3 };
    let (config, round, projects) = tokio::join!(
        client.config(),
        client.view::<GetRound>(&args),
        client.projects(None, None),
    );
    assert_eq!(config.unwrap().current_round, Some(finished_round_3()));
    assert_eq!(round.unwrap(), Some(finished_round_3()));
    assert_eq!(projects.unwrap().len(), 1);
    assert_eq!(fixture.queries().len(), 3);
}

/// Transport that answers every query with the same bytes.
struct Canned(&'static str);

#[async_trait]
impl Transport for Canned {
    async fn query(&self, _contract: &AccountId, _method: &str, _args: &[u8]) -> Result<Vec<u8>> {
        Ok(self.0.as_bytes().to_vec())
    }

    async fn submit(&self, _transaction: SignedTransaction) -> Result<ExecutionOutcome> {
        Err(ClientError::RemoteExecution("read-only".to_string()))
    }
}

#[tokio::test]
async fn test_mismatched_shape_is_malformed() {
    let client: GrantClient<Canned, SignedOutWallet> =
        GrantClient::read_only(Canned(r#"{"id":"three"}"#), contract());
    let err = client.round(3).await.unwrap_err();
    match err {
        ClientError::MalformedResult(msg) => assert!(msg.starts_with("round should return")),
        other => panic!("unexpected {other:?}"),
    }

    // An empty payload is `null`, which is a valid "no such round".
    let client = GrantClient::read_only(Canned(""), contract());
    assert_eq!(client.round(3).await.unwrap(), None);

    let client = GrantClient::read_only(Canned("[1,2]"), contract());
    let value: Value = client
        .invoke_by_name("operators", &json!({}), CallOptions::new())
        .await
        .unwrap();
    assert_eq!(value, json!([1, 2]));
}
