//! Tests for cache freshness and key spaces.

use chrono::{DateTime, TimeDelta, Utc};
use rstest::{fixture, rstest};

use super::{CacheEntry, CacheStore, Freshness};
use crate::github::models::test_support::{pull_request, repository};

#[fixture]
fn epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).expect("timestamp in range")
}

#[rstest]
#[case::just_fetched(0, Freshness::Fresh)]
#[case::one_second_before_timeout(299, Freshness::Fresh)]
#[case::at_timeout(300, Freshness::Stale)]
#[case::long_after(10_000, Freshness::Stale)]
fn freshness_flips_exactly_at_the_timeout(
    epoch: DateTime<Utc>,
    #[case] age_seconds: i64,
    #[case] expected: Freshness,
) {
    let entry = CacheEntry {
        value: (),
        fetched_at: epoch,
    };

    let now = epoch + TimeDelta::seconds(age_seconds);

    assert_eq!(entry.freshness(now, TimeDelta::seconds(300)), expected);
}

#[rstest]
fn zero_timeout_never_serves_fresh(epoch: DateTime<Utc>) {
    let entry = CacheEntry {
        value: (),
        fetched_at: epoch,
    };

    assert_eq!(entry.freshness(epoch, TimeDelta::zero()), Freshness::Stale);
}

#[rstest]
fn stale_entries_remain_readable(epoch: DateTime<Utc>) {
    let mut cache = CacheStore::new();
    cache
        .repositories_mut()
        .put("octo/widgets", repository("octo/widgets"), epoch);

    let later = epoch + TimeDelta::hours(2);
    let (value, freshness) = cache
        .repositories()
        .get("octo/widgets", later, TimeDelta::minutes(5))
        .expect("stale entry should still be returned");

    assert_eq!(value.full_name, "octo/widgets");
    assert_eq!(freshness, Freshness::Stale);
}

#[rstest]
fn namespaces_are_independent(epoch: DateTime<Utc>) {
    let mut cache = CacheStore::new();
    cache
        .repositories_mut()
        .put("octo/widgets", repository("octo/widgets"), epoch);

    assert!(
        cache
            .pull_requests()
            .get("octo/widgets", epoch, TimeDelta::minutes(5))
            .is_none(),
        "a repository snapshot must not satisfy a pull request lookup"
    );

    cache.pull_requests_mut().put(
        "octo/widgets",
        vec![pull_request("octo/widgets", 1)],
        epoch,
    );
    assert_eq!(cache.len(), 2);
}

#[rstest]
fn put_replaces_the_previous_entry(epoch: DateTime<Utc>) {
    let mut cache = CacheStore::new();
    let prs = cache.pull_requests_mut();
    prs.put("o/r", vec![pull_request("o/r", 1)], epoch);
    prs.put("o/r", Vec::new(), epoch + TimeDelta::seconds(10));

    let (value, freshness) = cache
        .pull_requests()
        .get("o/r", epoch + TimeDelta::seconds(10), TimeDelta::seconds(5))
        .expect("entry present");

    assert!(value.is_empty());
    assert!(freshness.is_fresh());
    assert_eq!(cache.len(), 1);
}

#[rstest]
fn invalidate_all_clears_both_namespaces(epoch: DateTime<Utc>) {
    let mut cache = CacheStore::new();
    cache.repositories_mut().put("o/r", repository("o/r"), epoch);
    cache.pull_requests_mut().put("o/r", Vec::new(), epoch);

    cache.invalidate_all();

    assert!(cache.is_empty());
    assert_eq!(cache.len(), 0);
}
