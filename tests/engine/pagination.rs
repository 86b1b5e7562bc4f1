//! Page planning for the three paging idioms

use crate::common::*;

#[test]
fn random_access_fetches_only_the_covering_page() {
    let (qs, transport) = queryset(ScriptedProvider::offset(corpus(57), 20));
    assert_eq!(qs.at(55).unwrap().id, "item-55");
    assert_eq!(requested_offsets(&transport), vec![40]);

    assert_eq!(qs.at(41).unwrap().id, "item-41");
    assert_eq!(qs.count().unwrap(), 57);
    assert_eq!(transport.request_count(), 1);

    assert_eq!(qs.at(5).unwrap().id, "item-5");
    assert_eq!(requested_offsets(&transport), vec![40, 0]);
}

#[test]
fn forward_iteration_requests_in_order() {
    let (qs, transport) = queryset(ScriptedProvider::offset(corpus(57), 20));
    assert_eq!(qs.to_vec().unwrap().len(), 57);
    assert_eq!(requested_offsets(&transport), vec![0, 20, 40]);
    assert_eq!(qs.pages_fetched(), 3);
}

#[test]
fn rows_capped_by_the_server_are_all_delivered() {
    let (qs, transport) =
        queryset(ScriptedProvider::offset(corpus(57), 20).serving_at_most(10));
    assert_eq!(qs.count().unwrap(), 57);
    assert_eq!(ids(&qs.to_vec().unwrap()), id_range(0, 57));
    assert_eq!(qs.count().unwrap(), 57);
    assert_eq!(requested_offsets(&transport), vec![0, 10, 20, 30, 40, 50]);
}

#[test]
fn capped_rows_random_access_resumes_inside_the_page() {
    let (qs, transport) =
        queryset(ScriptedProvider::offset(corpus(57), 20).serving_at_most(10));
    assert_eq!(qs.at(55).unwrap().id, "item-55");
    assert_eq!(qs.at(45).unwrap().id, "item-45");
    assert_eq!(requested_offsets(&transport), vec![40, 50]);
    assert_eq!(qs.count().unwrap(), 57);
}

#[test]
fn count_without_total_scans_to_the_end() {
    let (qs, transport) = queryset(ScriptedProvider::offset(corpus(45), 20).without_total());
    assert_eq!(qs.count().unwrap(), 45);
    assert_eq!(requested_offsets(&transport), vec![0, 20, 40]);
    assert_eq!(qs.at(44).unwrap().id, "item-44");
    assert_eq!(transport.request_count(), 3);
}

#[test]
fn count_with_limit_stops_early_without_total() {
    let (qs, transport) = queryset(ScriptedProvider::offset(corpus(100), 20).without_total());
    assert_eq!(qs.limit(30).count().unwrap(), 30);
    assert_eq!(requested_offsets(&transport), vec![0, 20]);
}

#[test]
fn cursor_random_access_caches_intervening_pages() {
    let (qs, transport) = queryset(ScriptedProvider::cursor(corpus(50), 10));
    assert_eq!(qs.at(35).unwrap().id, "item-35");
    assert_eq!(transport.request_count(), 4);
    assert_eq!(qs.cached_len(), 40);

    let cursors: Vec<Option<String>> = transport
        .requests()
        .iter()
        .map(|r| r.param_value("cursor").map(str::to_string))
        .collect();
    assert_eq!(
        cursors,
        vec![None, Some("10".into()), Some("20".into()), Some("30".into())]
    );

    assert_eq!(qs.at(12).unwrap().id, "item-12");
    assert_eq!(transport.request_count(), 4);
}

#[test]
fn cursor_exhaustion_ends_iteration() {
    let (qs, transport) = queryset(ScriptedProvider::cursor(corpus(25), 10).without_total());
    assert_eq!(ids(&qs.to_vec().unwrap()), id_range(0, 25));
    assert_eq!(transport.request_count(), 3);
    assert_eq!(qs.count().unwrap(), 25);
    assert_eq!(transport.request_count(), 3);
}

#[test]
fn unpaged_provider_answers_in_one_request() {
    let (qs, transport) = queryset(ScriptedProvider::unpaged(corpus(7)));
    assert_eq!(qs.at(6).unwrap().id, "item-6");
    assert_eq!(qs.count().unwrap(), 7);
    assert_eq!(qs.to_vec().unwrap().len(), 7);
    assert!(qs.at(7).unwrap_err().is_out_of_range());
    assert_eq!(transport.request_count(), 1);
    assert_eq!(transport.requests()[0].param_value("offset"), None);
}

#[test]
fn view_offset_shifts_the_aligned_page() {
    let (qs, transport) = queryset(ScriptedProvider::offset(corpus(100), 25));
    assert_eq!(qs.offset(30).at(0).unwrap().id, "item-30");
    assert_eq!(requested_offsets(&transport), vec![25]);
}
