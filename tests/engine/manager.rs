//! Manager entry points

use crate::common::*;
use patent_client::Error;

#[test]
fn each_queryset_gets_its_own_cache() {
    let (items, transport) = manager(ScriptedProvider::offset(corpus(30), 10));
    assert_eq!(items.all().count().unwrap(), 30);
    assert_eq!(items.all().count().unwrap(), 30);
    assert_eq!(transport.request_count(), 2);
}

#[test]
fn get_resolves_exactly_one() {
    let (items, _) = manager(ScriptedProvider::offset(corpus(30), 10));
    assert_eq!(items.get("id", "item-12").unwrap().rank, 12);
    assert!(items.get("id", "item-99").unwrap_err().is_not_found());
    assert!(matches!(
        items.get("parity", "odd"),
        Err(Error::MultipleFound { .. })
    ));
}

#[test]
fn get_many_combines_criteria() {
    let (items, transport) = manager(ScriptedProvider::offset(corpus(30), 10));
    let item = items
        .get_many([("parity", "even"), ("id", "item-8")])
        .unwrap();
    assert_eq!(item.rank, 8);
    let request = &transport.requests()[0];
    assert_eq!(request.param_value("filter.parity"), Some("even"));
    assert_eq!(request.param_value("filter.id"), Some("item-8"));
}

#[test]
fn filter_helpers_build_the_same_spec() {
    let (items, transport) = manager(ScriptedProvider::unpaged(corpus(10)));
    let a = items.filter_any("rank", [1i64, 2]);
    let b = items.filter_many([("rank", vec![1i64, 2])]);
    assert_eq!(a, b);
    assert_eq!(a.count().unwrap(), 2);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn async_get_matches_blocking() {
    let (items, _) = manager(ScriptedProvider::cursor(corpus(30), 7));
    assert_eq!(
        items.get("id", "item-20").unwrap(),
        items.get_async("id", "item-20").await.unwrap()
    );
    assert!(items
        .get_many_async([("id", "item-3"), ("parity", "even")])
        .await
        .unwrap_err()
        .is_not_found());
}
