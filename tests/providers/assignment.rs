//! USPTO assignment search over Solr XML

use crate::common::*;
use chrono::NaiveDate;
use patent_client::core::{Request, Response};
use patent_client::{ClientConfig, Error, TransportError};

const FOUND: usize = 45;

fn doc(n: usize) -> String {
    format!(
        r#"<doc>
  <str name="id">{reel}-{n}</str>
  <str name="reelNo">{reel}</str>
  <str name="frameNo">{n}</str>
  <str name="conveyanceText">ASSIGNMENT OF ASSIGNORS INTEREST</str>
  <date name="recordedDate">2019-0{month}-15T00:00:00Z</date>
  <arr name="patAssignorName"><str>INVENTOR {n}</str></arr>
  <arr name="patAssignorExDate"><date>2019-0{month}-01T00:00:00Z</date></arr>
  <arr name="patAssigneeName"><str>ACME &amp; SONS</str><str>ROADRUNNER LLC</str></arr>
  <arr name="patNum"><str>{patent}</str></arr>
</doc>"#,
        reel = 50000,
        n = n,
        month = n % 9 + 1,
        patent = 10_000_000 + n
    )
}

fn lookup(request: &Request) -> Result<Response, TransportError> {
    let number = |name: &str| request.param_value(name).and_then(|v| v.parse::<usize>().ok());
    let start = number("start").unwrap_or(0);
    let rows = number("rows").unwrap_or(20);
    let docs: String = (start..(start + rows).min(FOUND)).map(doc).collect();
    Ok(Response::new(
        200,
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
  <lst name="responseHeader"><int name="status">0</int></lst>
  <result name="response" numFound="{}" start="{}">{}</result>
</response>"#,
            FOUND, start, docs
        ),
    ))
}

#[test]
fn owner_search_pages_with_start_and_rows() {
    let (client, transport) = client_with(ClientConfig::default(), lookup);
    let acme = client.assignments().filter("owner_name", "ACME & SONS");

    let late = acme.at(44).unwrap();
    assert_eq!(late.id, "50000-44");
    assert_eq!(late.patent_numbers, vec!["10000044"]);
    assert_eq!(late.assignees, vec!["ACME & SONS", "ROADRUNNER LLC"]);
    assert_eq!(late.recorded_date, NaiveDate::from_ymd_opt(2019, 9, 15));
    assert_eq!(
        late.assignor_execution_dates,
        vec![NaiveDate::from_ymd_opt(2019, 9, 1).unwrap()]
    );
    assert_eq!(
        late.pdf_url().as_deref(),
        Some("https://assignment-api.uspto.gov/patent/download/50000/44")
    );
    assert_eq!(acme.count().unwrap(), FOUND);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].param_value("filter"), Some("OwnerName"));
    assert_eq!(requests[0].param_value("query"), Some("ACME & SONS"));
    assert_eq!(requests[0].param_value("start"), Some("40"));
    assert_eq!(requests[0].param_value("rows"), Some("20"));
    assert_eq!(requests[0].param_value("sort"), Some("ExecutionDate+desc"));
}

#[test]
fn full_walk_and_projection() {
    let (client, transport) = client_with(ClientConfig::default(), lookup);
    let by_correspondent = client
        .assignments()
        .filter("correspondent_name", "SMITH")
        .sort(["execution_date"]);
    let frames: Vec<String> = by_correspondent
        .iter()
        .map(|a| a.unwrap().frame_no.unwrap_or_default())
        .collect();
    assert_eq!(frames.len(), FOUND);
    assert_eq!(frames[21], "21");
    let starts: Vec<_> = transport
        .requests()
        .iter()
        .map(|r| r.param_value("start").unwrap_or_default().to_string())
        .collect();
    assert_eq!(starts, vec!["0", "20", "40"]);
    assert!(transport
        .requests()
        .iter()
        .all(|r| r.param_value("sort") == Some("ExecutionDate+asc")));
}

#[test]
fn query_shape_is_checked_before_io() {
    let (client, transport) = client_with(ClientConfig::default(), lookup);
    let manager = client.assignments();
    let attempts = [
        manager.all(),
        manager.filter_many([("owner_name", "A"), ("patent_number", "1")]),
        manager.filter_any("patent_number", ["1", "2"]),
        manager.filter("owner_name", "A").sort(["recorded_date"]),
    ];
    for qs in attempts {
        assert!(matches!(qs.first(), Err(Error::InvalidQuery { .. })), "{:?}", qs);
    }
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn malformed_xml_is_a_transport_error() {
    let (client, _) = client_fixed(Response::new(200, "<response><result>"));
    let err = client
        .assignments()
        .filter("patent_number", "8830957")
        .first()
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Transport {
            source: TransportError::Malformed(_),
            ..
        }
    ));
}

#[test]
fn empty_result_set() {
    let (client, transport) = client_fixed(Response::new(
        200,
        r#"<response><result name="response" numFound="0" start="0"/></response>"#,
    ));
    let none = client.assignments().filter("reel_frame", "1-1");
    assert_eq!(none.count().unwrap(), 0);
    assert!(none.to_vec().unwrap().is_empty());
    assert_eq!(transport.request_count(), 1);
}
