use super::*;
use crate::test_support::{sample_request, FakeApi, SCHOOL_ID};

fn ids(aggregator: &DashboardAggregator) -> Vec<&str> {
    aggregator
        .requests()
        .iter()
        .map(|request| request.id.as_str())
        .collect()
}

fn school_id() -> SchoolId {
    SchoolId::new(SCHOOL_ID)
}

#[test]
fn counts_are_zero_for_empty_list() {
    assert_eq!(
        DashboardAggregator::new().status_counts(),
        StatusCounts {
            pending: 0,
            moved: 0,
            allocated: 0
        }
    );
}

#[test]
fn counts_one_of_each_status_and_ignores_unknown() {
    let mut aggregator = DashboardAggregator::new();
    for (id, status) in [
        ("a", "allocated"),
        ("b", "moved"),
        ("c", "pending"),
        ("d", "rejected"),
    ] {
        aggregator.on_request_created(sample_request(id, status));
    }
    let before = aggregator.requests().to_vec();

    let counts = aggregator.status_counts();

    assert_eq!(
        counts,
        StatusCounts {
            pending: 1,
            moved: 1,
            allocated: 1
        }
    );
    assert_eq!(counts.total(), 3);
    assert_eq!(aggregator.requests(), before.as_slice());
}

#[test]
fn created_record_goes_to_the_top() {
    let mut aggregator = DashboardAggregator::new();
    aggregator.on_request_created(sample_request("old", "moved"));
    aggregator.on_request_created(sample_request("new", "pending"));

    assert_eq!(ids(&aggregator), vec!["new", "old"]);
    assert_eq!(aggregator.status_counts().pending, 1);
}

#[test]
fn update_replaces_matching_entry_in_place() {
    let mut aggregator = DashboardAggregator::new();
    for id in ["c", "b", "a"] {
        aggregator.on_request_created(sample_request(id, "pending"));
    }

    let mut moved = sample_request("b", "moved");
    moved.quantity = 99;
    assert!(aggregator.on_request_updated(moved.clone()));

    assert_eq!(ids(&aggregator), vec!["a", "b", "c"]);
    assert_eq!(aggregator.requests()[1], moved);
    assert_eq!(
        aggregator.status_counts(),
        StatusCounts {
            pending: 2,
            moved: 1,
            allocated: 0
        }
    );
}

#[test]
fn update_for_unknown_id_leaves_list_unchanged() {
    let mut aggregator = DashboardAggregator::new();
    aggregator.on_request_created(sample_request("a", "pending"));
    aggregator.on_request_created(sample_request("b", "moved"));
    let before = aggregator.requests().to_vec();

    assert!(!aggregator.on_request_updated(sample_request("zzz", "allocated")));
    assert_eq!(aggregator.requests(), before.as_slice());
}

#[test]
fn attach_proof_sets_reference_on_matching_record() {
    let mut aggregator = DashboardAggregator::new();
    aggregator.on_request_created(sample_request("a", "allocated"));

    assert!(aggregator.attach_proof(&RequestId::new("a"), "proofs/a.jpg"));
    assert!(!aggregator.attach_proof(&RequestId::new("missing"), "proofs/x.jpg"));
    assert_eq!(
        aggregator.requests()[0].proof.as_deref(),
        Some("proofs/a.jpg")
    );
}

#[test]
fn apply_routes_events() {
    let mut aggregator = DashboardAggregator::new();
    aggregator.apply(DashboardEvent::RequestCreated(sample_request("a", "pending")));
    aggregator.apply(DashboardEvent::RequestUpdated(sample_request("a", "moved")));
    aggregator.apply(DashboardEvent::Error("boom".into()));

    assert_eq!(ids(&aggregator), vec!["a"]);
    assert_eq!(aggregator.status_counts().moved, 1);
}

#[tokio::test]
async fn load_initial_fetches_list_once() {
    let api = FakeApi::new().with_requests(vec![
        sample_request("b", "moved"),
        sample_request("a", "pending"),
    ]);
    let mut aggregator = DashboardAggregator::new();

    assert_eq!(aggregator.load_initial(&api, Some(&school_id())).await, 2);
    assert_eq!(aggregator.load_initial(&api, Some(&school_id())).await, 2);

    assert_eq!(api.list_calls(), 1);
    assert!(aggregator.is_loaded());
    assert_eq!(ids(&aggregator), vec!["b", "a"]);
}

#[tokio::test]
async fn failed_load_degrades_to_empty_list() {
    let api = FakeApi::new().failing_list("connection refused");
    let mut aggregator = DashboardAggregator::new();

    assert_eq!(aggregator.load_initial(&api, Some(&school_id())).await, 0);
    assert_eq!(aggregator.status_counts(), StatusCounts::default());
}

#[tokio::test]
async fn load_without_school_id_skips_fetch() {
    let api = FakeApi::new().with_requests(vec![sample_request("a", "pending")]);
    let mut aggregator = DashboardAggregator::new();

    assert_eq!(aggregator.load_initial(&api, None).await, 0);
    assert_eq!(api.list_calls(), 0);
}

#[tokio::test]
async fn records_created_before_load_stay_on_top() {
    let api = FakeApi::new().with_requests(vec![
        sample_request("known", "pending"),
        sample_request("older", "allocated"),
    ]);
    let mut aggregator = DashboardAggregator::new();
    aggregator.on_request_created(sample_request("known", "pending"));
    aggregator.on_request_created(sample_request("fresh", "pending"));

    aggregator.load_initial(&api, Some(&school_id())).await;

    assert_eq!(ids(&aggregator), vec!["fresh", "known", "older"]);
}
