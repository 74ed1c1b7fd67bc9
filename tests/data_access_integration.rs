//! Retry, reconnect and cache fail-open behaviour through the public API.

mod common;

use common::{closed, data_access, system_context, ScriptedClient, ScriptedOperation};
use quest_core::cache::{CacheOptions, DomainCacheManager, TaggedCache};
use quest_core::config::CacheConfig;
use quest_core::database::{ClientError, ClientErrorCode};
use quest_core::resilience::DataAccessError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_test::{assert_err, assert_ok};

#[tokio::test(start_paused = true)]
async fn closed_then_success_returns_after_two_invocations() {
    let client = ScriptedClient::new();
    let access = data_access(client.clone());
    let operation = ScriptedOperation::new(vec![Err(closed()), Ok("ada")]);

    let user = access
        .execute_with_retry("loading user", || operation.run())
        .await;

    assert_eq!(assert_ok!(user), "ada");
    assert_eq!(operation.calls(), 2);
    assert_eq!(client.disconnects(), 1);
    assert_eq!(client.connects(), 1);
}

#[tokio::test(start_paused = true)]
async fn always_closed_fails_after_three_invocations() {
    let client = ScriptedClient::new();
    let access = data_access(client.clone());
    let operation: ScriptedOperation<()> =
        ScriptedOperation::new(vec![Err(closed()), Err(closed()), Err(closed())]);
    let started = Instant::now();

    let error = assert_err!(
        access
            .execute_with_retry("loading user", || operation.run())
            .await
    );

    assert_eq!(
        error.to_string(),
        "Failed loading user after 3 attempts: Connection is closed"
    );
    assert_eq!(operation.calls(), 3);
    // fixed 1s delay between attempts, no backoff
    assert_eq!(started.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn business_error_fails_after_one_invocation() {
    let client = ScriptedClient::new();
    let access = data_access(client.clone());
    let operation: ScriptedOperation<()> = ScriptedOperation::new(vec![Err(ClientError::new(
        "Record to update not found.",
    )
    .with_code("P2025"))]);

    let error = assert_err!(
        access
            .execute_with_retry("updating submission", || operation.run())
            .await
    );

    assert!(matches!(error, DataAccessError::Query(_)));
    assert_eq!(error.to_string(), "Record to update not found.");
    assert_eq!(operation.calls(), 1);
    assert_eq!(client.connects(), 0);
}

#[tokio::test(start_paused = true)]
async fn unreachable_server_code_is_retried() {
    let client = ScriptedClient::new();
    let access = data_access(client.clone());
    let operation = ScriptedOperation::new(vec![
        Err(ClientError::cannot_reach_server("db.internal:5432")),
        Ok(7u32),
    ]);

    let count = access
        .execute_with_retry("counting badges", || operation.run())
        .await
        .unwrap();

    assert_eq!(count, 7);
    assert_eq!(operation.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn concurrent_callers_share_a_reconnect() {
    let client = ScriptedClient::new();
    let access = data_access(client.clone());
    let first = ScriptedOperation::new(vec![Err(closed()), Ok(1)]);
    let second = ScriptedOperation::new(vec![
        Err(ClientError::new("pool timed out").with_code(ClientErrorCode::CONNECTION_TIMED_OUT)),
        Ok(2),
    ]);

    let (a, b) = tokio::join!(
        access.execute_with_retry("first", || first.run()),
        access.execute_with_retry("second", || second.run()),
    );

    assert_eq!(a.unwrap(), 1);
    assert_eq!(b.unwrap(), 2);
    assert_eq!(client.connects(), 1);
    assert_eq!(access.reconnect_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_retrying() {
    let client = ScriptedClient::new();
    let access = data_access(client.clone());
    let operation: ScriptedOperation<()> =
        ScriptedOperation::new(vec![Err(closed()), Err(closed()), Err(closed())]);

    let result = access
        .execute_with_retry_until(
            "loading leaderboard",
            || operation.run(),
            tokio::time::sleep(Duration::from_millis(500)),
        )
        .await;

    assert!(matches!(
        result,
        Err(DataAccessError::Cancelled { attempts: 1, .. })
    ));
    assert_eq!(operation.calls(), 1);
    assert_eq!(client.connects(), 0);
}

#[tokio::test(start_paused = true)]
async fn domain_cache_fetches_through_data_access_once() {
    let client = ScriptedClient::new();
    let context = system_context(client.clone()).await;
    let challenges = context.domain_cache("challenges");
    let operation = ScriptedOperation::new(vec![Err(closed()), Ok(vec!["streak", "marathon"])]);

    for _ in 0..3 {
        let titles: Result<Vec<String>, DataAccessError> = challenges
            .get_or_set(
                "active",
                || async {
                    let titles = context
                        .data_access
                        .execute_with_retry("listing active challenges", || operation.run())
                        .await?;
                    Ok(titles.into_iter().map(String::from).collect())
                },
                CacheOptions::new().with_tag(challenges.entity_tag("active")),
            )
            .await;
        assert_eq!(titles.unwrap(), vec!["streak", "marathon"]);
    }

    assert_eq!(operation.calls(), 2);
    assert_eq!(context.cache.get_stats().hits, 2);

    challenges.invalidate_all();
    assert!(challenges.get::<Vec<String>>("active").unwrap().is_none());

    context.shutdown().await.unwrap();
}

#[tokio::test]
async fn get_or_set_fails_open_on_unreadable_entry() {
    let cache = Arc::new(TaggedCache::new());
    let users = DomainCacheManager::new("users", cache.clone());
    users.set("42", &"not a number", CacheOptions::new()).unwrap();
    let fetches = AtomicUsize::new(0);

    let points: Result<u32, ClientError> = users
        .get_or_set(
            "42",
            || async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok(1_250)
            },
            CacheOptions::new(),
        )
        .await;

    assert_eq!(points.unwrap(), 1_250);
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn get_or_set_fails_open_when_full() {
    let cache = TaggedCache::from_config(&CacheConfig {
        max_entries: 1,
        ..CacheConfig::default()
    });
    cache.set("users:1", &1, &CacheOptions::new()).unwrap();

    let value: Result<u32, ClientError> = cache
        .get_or_set("users:2", || async { Ok(2) }, &CacheOptions::new())
        .await;

    assert_eq!(value.unwrap(), 2);
    assert!(cache.get::<u32>("users:2").unwrap().is_none());
}

#[tokio::test]
async fn disabled_cache_always_fetches() {
    let cache = TaggedCache::from_config(&CacheConfig {
        enabled: false,
        ..CacheConfig::default()
    });
    let fetches = AtomicUsize::new(0);

    for _ in 0..3 {
        let value: Result<String, ClientError> = cache
            .get_or_set(
                "badges:all",
                || async {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok("gold".to_string())
                },
                &CacheOptions::new(),
            )
            .await;
        assert_eq!(value.unwrap(), "gold");
    }

    assert_eq!(fetches.load(Ordering::SeqCst), 3);
    assert!(cache.is_empty());
}
