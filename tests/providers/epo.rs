//! EPO OPS search, family and bibliographic retrieval

use crate::common::*;
use futures::StreamExt;
use patent_client::core::{Request, Response};
use patent_client::{ClientConfig, Error, TransportError};
use serde_json::{json, Value};

const TOTAL: usize = 57;

fn publication(n: usize) -> Value {
    json!({
        "@family-id": format!("{}", 9000 + n / 3),
        "@system": "ops.epo.org",
        "document-id": {
            "@document-id-type": "docdb",
            "country": {"$": "EP"},
            "doc-number": {"$": format!("{}", 1_000_000 + n)},
            "kind": {"$": "A1"}
        }
    })
}

/// Answer a search request from its 1-based inclusive `Range` header
fn search(request: &Request) -> Result<Response, TransportError> {
    let range = request.header_value("Range").unwrap_or("1-25");
    let (first, last) = range.split_once('-').unwrap();
    let first: usize = first.parse().unwrap();
    let last: usize = last.parse::<usize>().unwrap().min(TOTAL);
    if first > TOTAL {
        return Ok(Response::new(404, "no results"));
    }
    let results: Vec<Value> = (first - 1..last).map(publication).collect();
    let body = json!({"ops:world-patent-data": {"ops:biblio-search": {
        "@total-result-count": TOTAL.to_string(),
        "ops:query": {"$": request.param_value("q").unwrap_or_default()},
        "ops:search-result": {"ops:publication-reference": results}
    }}});
    Ok(Response::json_body(&body))
}

fn small_pages() -> ClientConfig {
    let mut config = ClientConfig::default();
    config.epo.page_size = 20;
    config
}

#[test]
fn random_access_requests_one_range() {
    let (client, transport) = client_with(small_pages(), search);
    let tesla = client.inpadoc().filter("applicant", "Tesla");

    let hit = tesla.at(45).unwrap();
    assert_eq!(hit.docdb_number(), "EP1000045A1");
    assert_eq!(hit.id_type.as_deref(), Some("docdb"));
    assert_eq!(tesla.count().unwrap(), TOTAL);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].header_value("Range"), Some("41-60"));
    assert_eq!(requests[0].param_value("q"), Some("pa=Tesla"));
    assert_eq!(url_path(&requests[0]), "/3.2/rest-services/published-data/search");
}

#[test]
fn iteration_walks_consecutive_ranges() {
    let (client, transport) = client_with(small_pages(), search);
    let all = client
        .inpadoc()
        .filter_any("applicant", ["Tesla", "SpaceX"])
        .to_vec()
        .unwrap();
    assert_eq!(all.len(), TOTAL);
    assert_eq!(all[TOTAL - 1].doc_number.as_deref(), Some("1000056"));

    let ranges: Vec<_> = transport
        .requests()
        .iter()
        .map(|r| r.header_value("Range").unwrap_or_default().to_string())
        .collect();
    assert_eq!(ranges, vec!["1-20", "21-40", "41-60"]);
    assert_eq!(
        transport.requests()[0].param_value("q"),
        Some("(pa=Tesla or pa=SpaceX)")
    );
}

#[test]
fn not_found_means_no_results() {
    let (client, _) = client_fixed(Response::new(404, "<fault/>"));
    let none = client.inpadoc().filter("title", "perpetual motion");
    assert_eq!(none.count().unwrap(), 0);
    assert_eq!(none.first().unwrap(), None);
    assert!(none.only().unwrap_err().is_not_found());
}

#[test]
fn rejected_credentials_are_an_error() {
    let (client, _) = client_fixed(Response::new(403, "forbidden"));
    let err = client.inpadoc().filter("applicant", "Tesla").first().unwrap_err();
    assert!(matches!(
        err,
        Error::Transport {
            provider: "epo-search",
            source: TransportError::Authentication { status: 403 },
            ..
        }
    ));
}

#[test]
fn search_needs_a_criterion() {
    let (client, transport) = client_with(small_pages(), search);
    assert!(matches!(
        client.inpadoc().all().count(),
        Err(Error::InvalidQuery { .. })
    ));
    assert!(client.inpadoc().filter("applicant", "x").sort(["title"]).first().is_err());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn search_streams_asynchronously() {
    let (client, transport) = client_with(small_pages(), search);
    let numbers: Vec<String> = client
        .inpadoc()
        .filter("cpc", "H01M")
        .slice(18..23)
        .stream()
        .map(|item| item.unwrap().docdb_number())
        .collect()
        .await;
    assert_eq!(
        numbers,
        (18..23).map(|n| format!("EP{}A1", 1_000_000 + n)).collect::<Vec<_>>()
    );
    assert_eq!(transport.request_count(), 2);
}

fn family(request: &Request) -> Result<Response, TransportError> {
    if !request.url.ends_with("/family/publication/docdb/EP3082535A1") {
        return Ok(Response::new(404, ""));
    }
    let member = |number: &str, kind: &str, priority_active: &str| {
        json!({
            "@family-id": "54345678",
            "publication-reference": {"document-id": [
                {"@document-id-type": "docdb", "country": {"$": "EP"},
                 "doc-number": {"$": number}, "kind": {"$": kind}, "date": {"$": "20161026"}},
                {"@document-id-type": "epodoc", "doc-number": {"$": format!("EP{}", number)}}
            ]},
            "application-reference": {"document-id": {
                "@document-id-type": "docdb", "country": {"$": "EP"},
                "doc-number": {"$": "14830411"}, "kind": {"$": "A"}}},
            "priority-claim": {
                "@kind": "national", "@sequence": "1",
                "document-id": {"@document-id-type": "docdb", "country": {"$": "US"},
                    "doc-number": {"$": "201361916834"}, "kind": {"$": "P"}},
                "priority-active-indicator": {"$": priority_active}
            }
        })
    };
    let body = json!({"ops:world-patent-data": {"ops:patent-family": {
        "@family-id": "54345678",
        "ops:family-member": [member("3082535", "A1", "YES"), member("3082535", "B1", "NO")]
    }}});
    Ok(Response::json_body(&body))
}

#[test]
fn family_members_decode_nested_references() {
    let (client, transport) = client_with(ClientConfig::default(), family);
    let members = client
        .family()
        .filter("number", "EP3082535A1")
        .to_vec()
        .unwrap();

    assert_eq!(members.len(), 2);
    let numbers: Vec<_> = members.iter().filter_map(|m| m.publication_number()).collect();
    assert_eq!(numbers, vec!["EP3082535A1", "EP3082535B1"]);
    assert_eq!(members[0].publication_reference.len(), 2);
    assert_eq!(
        members[0].publication_reference[0].date,
        chrono::NaiveDate::from_ymd_opt(2016, 10, 26)
    );

    let claim = &members[0].priority_claims[0];
    assert_eq!(claim.application_number().as_deref(), Some("US201361916834P"));
    assert_eq!(claim.active, Some(true));
    assert_eq!(members[1].priority_claims[0].active, Some(false));
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn unknown_family_is_empty() {
    let (client, _) = client_with(ClientConfig::default(), family);
    let none = client.family().filter("number", "EP0000000A1");
    assert!(!none.exists().unwrap());
}

#[test]
fn family_needs_exactly_one_number() {
    let (client, transport) = client_with(ClientConfig::default(), family);
    assert!(matches!(
        client.family().all().first(),
        Err(Error::InvalidQuery { .. })
    ));
    assert!(client
        .family()
        .filter("number", ["EP1A1", "EP2A1"])
        .first()
        .is_err());
    assert_eq!(transport.request_count(), 0);
}

fn biblio(request: &Request) -> Result<Response, TransportError> {
    if !request
        .url
        .ends_with("/published-data/publication/docdb/EP3082535A1/biblio")
    {
        return Ok(Response::new(404, ""));
    }
    let body = json!({"ops:world-patent-data": {"exchange-documents": {"exchange-document": {
        "@country": "EP", "@doc-number": "3082535", "@kind": "A1", "@family-id": "54345678",
        "bibliographic-data": {
            "publication-reference": {"document-id": {
                "@document-id-type": "docdb", "country": {"$": "EP"},
                "doc-number": {"$": "3082535"}, "kind": {"$": "A1"}}},
            "classifications-ipcr": {"classification-ipcr": [
                {"text": {"$": "A47K   5/12        20060101AFI20160920BHEP"}},
                {"text": {"$": "B05B  11/00        20060101ALI20160920BHEP"}}
            ]},
            "invention-title": {"@lang": "en", "$": "AUTOMATIC FLUID DISPENSER"},
            "references-cited": {"citation": {
                "@cited-phase": "search", "@cited-by": "examiner",
                "patcit": {"document-id": {"@document-id-type": "docdb",
                    "country": {"$": "US"}, "doc-number": {"$": "2009166381"},
                    "kind": {"$": "A1"}}}}}
        }
    }}}});
    Ok(Response::json_body(&body))
}

#[test]
fn biblio_by_publication_number() {
    let (client, transport) = client_with(ClientConfig::default(), biblio);
    let doc = client.biblio().get("number", "EP3082535A1").unwrap();

    assert_eq!(doc.title(), Some("AUTOMATIC FLUID DISPENSER"));
    assert_eq!(doc.publication_number().as_deref(), Some("EP3082535A1"));
    assert_eq!(doc.intl_class(), vec!["A47K 5/12", "B05B 11/00"]);
    let cited: Vec<_> = doc.citations.iter().filter_map(|c| c.docdb_number()).collect();
    assert_eq!(cited, vec!["US2009166381.A1"]);
    assert_eq!(transport.request_count(), 1);
    assert_eq!(
        transport.requests()[0].header_value("Accept"),
        Some("application/json")
    );
}

#[test]
fn unknown_publication_has_no_biblio() {
    let (client, _) = client_with(ClientConfig::default(), biblio);
    let err = client.biblio().get("number", "EP0000000A1").unwrap_err();
    assert!(err.is_not_found());
    assert!(client.biblio().all().first().is_err());
}
