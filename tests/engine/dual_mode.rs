//! Blocking and async forms drive the same fetch steps

use crate::common::*;
use futures::StreamExt;
use patent_client::{Error, QuerySet, TransportError};
use std::time::Duration;

fn blocking_calls(qs: &QuerySet<Item>) -> Vec<String> {
    let mut seen = vec![qs.count().unwrap().to_string(), qs.at(45).unwrap().id];
    seen.extend(qs.first().unwrap().map(|i| i.id));
    seen.push(qs.filter("parity", "odd").at(3).unwrap().id);
    seen.extend(ids(&qs.slice(10..13).to_vec().unwrap()));
    seen.push(qs.offset(100).exists().unwrap().to_string());
    seen
}

async fn async_calls(qs: &QuerySet<Item>) -> Vec<String> {
    let mut seen = vec![
        qs.count_async().await.unwrap().to_string(),
        qs.at_async(45).await.unwrap().id,
    ];
    seen.extend(qs.first_async().await.unwrap().map(|i| i.id));
    seen.push(qs.filter("parity", "odd").at_async(3).await.unwrap().id);
    seen.extend(ids(&qs.slice(10..13).to_vec_async().await.unwrap()));
    seen.push(qs.offset(100).exists_async().await.unwrap().to_string());
    seen
}

async fn assert_same_requests(provider: ScriptedProvider) {
    let (blocking, blocking_transport) = queryset(provider.clone());
    let (nonblocking, async_transport) = queryset(provider);

    let expected = blocking_calls(&blocking);
    let actual = async_calls(&nonblocking).await;

    assert_eq!(expected, actual);
    assert!(blocking_transport.request_count() > 0);
    assert_eq!(blocking_transport.requests(), async_transport.requests());
}

#[tokio::test]
async fn offset_paging_issues_identical_requests() {
    assert_same_requests(ScriptedProvider::offset(corpus(57), 20)).await;
}

#[tokio::test]
async fn cursor_paging_issues_identical_requests() {
    assert_same_requests(ScriptedProvider::cursor(corpus(57), 20)).await;
}

#[tokio::test]
async fn unreported_totals_issue_identical_requests() {
    assert_same_requests(ScriptedProvider::offset(corpus(57), 15).without_total()).await;
}

#[tokio::test]
async fn stream_yields_what_iter_yields() {
    let provider = ScriptedProvider::offset(corpus(33), 10);
    let (blocking, _) = queryset(provider.clone());
    let (nonblocking, _) = queryset(provider);

    let expected = blocking.filter("parity", "even").to_vec().unwrap();
    let streamed: Vec<Item> = nonblocking
        .filter("parity", "even")
        .stream()
        .map(|item| item.unwrap())
        .collect()
        .await;
    assert_eq!(expected, streamed);
}

#[tokio::test]
async fn dropping_a_stream_midway_keeps_fetched_pages() {
    let (qs, transport) = queryset(ScriptedProvider::offset(corpus(50), 10));
    let head: Vec<_> = qs.stream().take(12).collect().await;
    assert_eq!(head.len(), 12);
    assert_eq!(transport.request_count(), 2);

    assert_eq!(qs.cached_len(), 20);
    assert_eq!(qs.to_vec().unwrap().len(), 50);
    assert_eq!(requested_offsets(&transport), vec![0, 10, 20, 30, 40]);
}

#[tokio::test]
async fn cancelled_fetch_leaves_cache_intact() {
    let gate = Gate::new();
    let (qs, transport) = gated(ScriptedProvider::offset(corpus(57), 20), gate.clone());

    // the blocking transport is never gated
    assert_eq!(qs.at(0).unwrap().id, "item-0");

    let pending = tokio::time::timeout(Duration::from_millis(20), qs.at_async(30)).await;
    assert!(pending.is_err());
    assert_eq!(gate.arrivals(), 1);
    assert_eq!(qs.cached_len(), 20);
    assert_eq!(qs.pages_fetched(), 1);

    assert_eq!(qs.at(5).unwrap().id, "item-5");
    assert_eq!(transport.request_count(), 2);

    // the total learned before the cancel stands, without another request
    assert_eq!(qs.count().unwrap(), 57);
    assert_eq!(qs.count_async().await.unwrap(), 57);
    assert_eq!(transport.request_count(), 2);

    gate.open();
    assert_eq!(qs.at_async(30).await.unwrap().id, "item-30");
    assert_eq!(qs.cached_len(), 40);
    assert_eq!(requested_offsets(&transport), vec![0, 20, 20]);
}

#[tokio::test]
async fn concurrent_fetches_of_one_page_merge_cleanly() {
    let gate = Gate::new();
    let (qs, transport) = gated(ScriptedProvider::offset(corpus(57), 20), gate.clone());

    let opener = async {
        while gate.arrivals() < 2 {
            tokio::task::yield_now().await;
        }
        gate.open();
    };
    let (a, b, ()) = tokio::join!(qs.at_async(5), qs.at_async(7), opener);

    assert_eq!(a.unwrap().id, "item-5");
    assert_eq!(b.unwrap().id, "item-7");
    assert_eq!(requested_offsets(&transport), vec![0, 0]);
    assert_eq!(qs.cached_len(), 20);
    assert_eq!(qs.count_async().await.unwrap(), 57);
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn both_forms_surface_the_same_fault() {
    let (qs, transport) = queryset(ScriptedProvider::offset(corpus(10), 5));
    transport.fail_next(TransportError::Authentication { status: 401 });
    transport.fail_next(TransportError::Authentication { status: 401 });

    let blocking = qs.at(0).unwrap_err();
    let nonblocking = qs.at_async(0).await.unwrap_err();
    for err in [blocking, nonblocking] {
        assert!(matches!(
            err,
            Error::Transport {
                source: TransportError::Authentication { status: 401 },
                ..
            }
        ));
    }
    assert_eq!(qs.cached_len(), 0);
}

#[tokio::test]
async fn async_projection_matches_blocking() {
    let (qs, _) = queryset(ScriptedProvider::cursor(corpus(12), 5));
    let rows = qs.values_list(&["id", "parity"]).unwrap();
    assert_eq!(rows.to_vec().unwrap(), rows.to_vec_async().await.unwrap());
    let flat = qs.values("rank").unwrap();
    assert_eq!(flat.to_vec().unwrap(), flat.to_vec_async().await.unwrap());
}
