//! Query semantics of QuerySet: filtering, sorting, windows, projection,
//! error surfacing.

use crate::common::*;
use patent_client::{Error, FieldValue, TransportError};

#[test]
fn chaining_is_lazy() {
    let (qs, transport) = queryset(ScriptedProvider::offset(corpus(30), 10));
    let view = qs
        .filter("parity", "odd")
        .sort(["-rank"])
        .offset(3)
        .limit(4)
        .slice(1..3);
    assert_eq!(view.spec().offset_bound(), 4);
    assert_eq!(view.spec().limit_bound(), Some(2));
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn filter_and_sort_reach_the_provider() {
    let (qs, transport) = queryset(ScriptedProvider::offset(corpus(30), 10));
    let odd = qs.filter("parity", "odd").sort(["-rank"]);

    let items = odd.to_vec().unwrap();
    assert_eq!(items.len(), 15);
    assert_eq!(ids(&items[..3]), vec!["item-29", "item-27", "item-25"]);
    assert_eq!(requested_offsets(&transport), vec![0, 10]);
    for request in transport.requests() {
        assert_eq!(request.param_value("filter.parity"), Some("odd"));
        assert_eq!(request.param_value("sort"), Some("-rank"));
    }
}

#[test]
fn filter_any_is_or_within_a_field() {
    let (qs, _) = queryset(ScriptedProvider::unpaged(corpus(10)));
    let picked = qs.filter_any("rank", [2i64, 7]).to_vec().unwrap();
    assert_eq!(ids(&picked), vec!["item-2", "item-7"]);
}

#[test]
fn refiltering_replaces_values() {
    let (qs, _) = queryset(ScriptedProvider::unpaged(corpus(10)));
    let view = qs.filter("rank", 1i64).filter("rank", 4i64);
    assert_eq!(ids(&view.to_vec().unwrap()), vec!["item-4"]);
}

#[test]
fn offset_and_limit_window_the_view() {
    let (qs, transport) = queryset(ScriptedProvider::offset(corpus(50), 20));
    let window = qs.offset(15).limit(10);
    assert_eq!(ids(&window.to_vec().unwrap()), id_range(15, 25));
    assert_eq!(window.count().unwrap(), 10);
    assert_eq!(requested_offsets(&transport), vec![0, 20]);
}

#[test]
fn slice_is_relative_to_the_view() {
    let (qs, _) = queryset(ScriptedProvider::offset(corpus(50), 20));
    let view = qs.offset(10).slice(5..8);
    assert_eq!(ids(&view.to_vec().unwrap()), id_range(15, 18));
}

#[test]
fn windows_share_the_parent_cache() {
    let (qs, transport) = queryset(ScriptedProvider::offset(corpus(50), 20));
    qs.slice(10..15).to_vec().unwrap();
    assert_eq!(transport.request_count(), 1);
    assert_eq!(qs.at(3).unwrap().id, "item-3");
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn limit_zero_needs_no_io() {
    let (qs, transport) = queryset(ScriptedProvider::offset(corpus(50), 20));
    let none = qs.limit(0);
    assert_eq!(none.count().unwrap(), 0);
    assert!(none.to_vec().unwrap().is_empty());
    assert_eq!(none.first().unwrap(), None);
    assert!(!none.exists().unwrap());
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn offset_past_the_end_is_empty() {
    let (qs, transport) = queryset(ScriptedProvider::offset(corpus(10), 5));
    let beyond = qs.offset(20);
    assert!(beyond.to_vec().unwrap().is_empty());
    assert_eq!(beyond.count().unwrap(), 0);
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn out_of_range_after_count_needs_no_fetch() {
    let (qs, transport) = queryset(ScriptedProvider::offset(corpus(57), 20));
    assert_eq!(qs.count().unwrap(), 57);
    match qs.at(57) {
        Err(Error::OutOfRange { position, total }) => {
            assert_eq!(position, 57);
            assert_eq!(total, 57);
        }
        other => panic!("expected OutOfRange, got {:?}", other),
    }
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn empty_result_is_not_an_error() {
    let (qs, _) = queryset(ScriptedProvider::offset(corpus(10), 5));
    let nothing = qs.filter("parity", "neither");
    assert_eq!(nothing.count().unwrap(), 0);
    assert!(nothing.to_vec().unwrap().is_empty());
    assert!(nothing.only().unwrap_err().is_not_found());
}

#[test]
fn only_distinguishes_one_from_many() {
    let (qs, _) = queryset(ScriptedProvider::offset(corpus(10), 5));
    assert_eq!(qs.filter("rank", 6i64).only().unwrap().id, "item-6");
    assert!(matches!(
        qs.filter("parity", "even").only(),
        Err(Error::MultipleFound { model: "Item", .. })
    ));
}

#[test]
fn transport_failure_carries_context_and_keeps_cache() {
    let (qs, transport) = queryset(ScriptedProvider::offset(corpus(50), 20));
    qs.at(0).unwrap();
    transport.fail_next(TransportError::Timeout);

    match qs.at(25) {
        Err(Error::Transport {
            provider,
            position,
            source,
            ..
        }) => {
            assert_eq!(provider, "scripted");
            assert_eq!(position, 20);
            assert_eq!(source, TransportError::Timeout);
        }
        other => panic!("expected a transport error, got {:?}", other),
    }
    assert_eq!(qs.cached_len(), 20);
    assert_eq!(qs.at(25).unwrap().id, "item-25");
}

#[test]
fn unsupported_sort_surfaces_as_invalid_query() {
    let (qs, transport) = queryset(ScriptedProvider::offset(corpus(10), 5));
    let bad = qs.sort(["title"]);
    assert!(matches!(bad.first(), Err(Error::InvalidQuery { .. })));
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn values_project_declared_fields() {
    let (qs, _) = queryset(ScriptedProvider::offset(corpus(4), 3));
    let rows = qs.values_list(&["id", "rank"]).unwrap().to_vec().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(
        rows[3],
        vec![FieldValue::Str("item-3".into()), FieldValue::Int(3)]
    );

    let parity = qs.values("parity").unwrap().to_vec().unwrap();
    assert_eq!(parity[0], FieldValue::Str("even".into()));
    assert_eq!(parity[1], FieldValue::Str("odd".into()));

    assert!(matches!(
        qs.values("colour"),
        Err(Error::InvalidQuery { .. })
    ));
}

#[test]
fn projection_travels_with_the_spec() {
    let (qs, transport) = queryset(ScriptedProvider::offset(corpus(4), 3));
    assert!(matches!(
        qs.project(&["id", "colour"]),
        Err(Error::InvalidQuery { .. })
    ));
    assert!(matches!(qs.values_list(&[]), Err(Error::InvalidQuery { .. })));

    let projected = qs.project(&["parity", "id"]).unwrap();
    assert_eq!(projected.spec().projection(), &["parity".to_string(), "id".to_string()][..]);
    assert!(projected.spec().to_string().contains("fields=parity,id"));
    assert_eq!(transport.request_count(), 0);

    let rows = projected.values_list(&[]).unwrap().to_vec().unwrap();
    assert_eq!(
        rows[1],
        vec![FieldValue::Str("odd".into()), FieldValue::Str("item-1".into())]
    );
    // records stay whole, and the projected view shares the cache
    assert_eq!(projected.at(2).unwrap().title.as_deref(), Some("Title 2"));
    assert_eq!(qs.cached_len(), 4);
}

#[test]
fn clone_starts_a_fresh_cache() {
    let (qs, transport) = queryset(ScriptedProvider::offset(corpus(10), 5));
    qs.at(0).unwrap();
    let again = qs.clone();
    assert_eq!(again, qs);
    assert_eq!(again.cached_len(), 0);
    again.at(0).unwrap();
    assert_eq!(transport.request_count(), 2);
}
