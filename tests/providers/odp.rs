//! USPTO Open Data Portal applications and documents

use crate::common::*;
use patent_client::core::{Request, Response};
use patent_client::{ClientConfig, Error, FieldValue, TransportError};
use serde_json::{json, Value};

fn application(n: usize) -> Value {
    json!({
        "applicationNumberText": format!("{}", 16_000_000 + n),
        "applicationMetaData": {
            "inventionTitle": format!("Battery pack {}", n),
            "filingDate": "2019-03-01",
            "firstApplicantName": "Tesla Motors",
            "firstInventorToFileIndicator": if n % 2 == 0 { "Y" } else { "N" },
            "applicationStatusCode": 150,
            "cpcClassificationBag": ["H01M10/00"],
            "inventorBag": [{"firstName": "Ada", "lastName": "Lovelace"}]
        }
    })
}

/// Search endpoint serving 30 applications by `offset`/`limit`
fn search(request: &Request) -> Result<Response, TransportError> {
    let number = |name: &str| request.param_value(name).and_then(|v| v.parse::<usize>().ok());
    let offset = number("offset").unwrap_or(0);
    let limit = number("limit").unwrap_or(25);
    let bag: Vec<Value> = (offset..(offset + limit).min(30)).map(application).collect();
    Ok(Response::json_body(&json!({
        "count": 30,
        "patentFileWrapperDataBag": bag
    })))
}

fn keyed() -> ClientConfig {
    let mut config = ClientConfig::default();
    config.odp.api_key = Some("secret".into());
    config.odp.page_size = 10;
    config
}

#[test]
fn search_pages_by_offset_and_limit() {
    let (client, transport) = client_with(keyed(), search);
    let apps = client
        .applications()
        .filter("first_applicant_name", "Tesla Motors")
        .sort(["-app_filing_date"]);

    let app = apps.at(23).unwrap();
    assert_eq!(app.appl_id, "16000023");
    assert_eq!(app.aia_indicator, Some(false));
    assert_eq!(app.invention_title.as_deref(), Some("Battery pack 23"));
    assert_eq!(app.inventors[0].last_name.as_deref(), Some("Lovelace"));
    assert_eq!(apps.count().unwrap(), 30);

    let request = &transport.requests()[0];
    assert_eq!(url_path(request), "/api/v1/patent/applications/search");
    assert_eq!(request.param_value("offset"), Some("20"));
    assert_eq!(request.param_value("limit"), Some("10"));
    assert_eq!(
        request.param_value("q"),
        Some("applicationMetaData.firstApplicantName:\"Tesla Motors\"")
    );
    assert_eq!(
        request.param_value("sort"),
        Some("applicationMetaData.filingDate desc")
    );
    assert_eq!(request.header_value("X-API-KEY"), Some("secret"));
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn get_by_application_number() {
    let (client, transport) = client_fixed(Response::json_body(&json!({
        "count": 1,
        "patentFileWrapperDataBag": [application(7)]
    })));
    let app = client.applications().get("appl_id", "16000007").unwrap();
    assert_eq!(app.cpc_classifications, vec!["H01M10/00"]);
    assert_eq!(app.app_status_code, Some(150));
    assert_eq!(
        transport.requests()[0].param_value("q"),
        Some("applicationNumberText:16000007")
    );
}

#[test]
fn values_project_mapped_fields() {
    let (client, _) = client_with(keyed(), search);
    let titles = client
        .applications()
        .all()
        .limit(3)
        .values("invention_title")
        .unwrap()
        .to_vec()
        .unwrap();
    assert_eq!(titles.len(), 3);
    assert_eq!(titles[2], FieldValue::Str("Battery pack 2".into()));
}

#[test]
fn missing_application_number_fails_the_page() {
    let (client, _) = client_fixed(Response::json_body(&json!({
        "count": 1,
        "patentFileWrapperDataBag": [{"applicationMetaData": {"inventionTitle": "orphan"}}]
    })));
    let err = client.applications().all().first().unwrap_err();
    match err {
        Error::Decode(decode) => assert_eq!(decode.field, "appl_id"),
        other => panic!("expected a decode error, got {:?}", other),
    }
}

#[test]
fn unreadable_count_is_a_malformed_response() {
    let (client, _) = client_fixed(Response::json_body(&json!({
        "count": "about thirty",
        "patentFileWrapperDataBag": [application(0)]
    })));
    let err = client.applications().all().count().unwrap_err();
    assert!(matches!(
        err,
        Error::Transport {
            provider: "odp-applications",
            source: TransportError::Malformed(_),
            ..
        }
    ));
}

#[test]
fn rate_limit_is_surfaced() {
    let (client, _) = client_fixed(Response::new(429, "slow down").with_header("Retry-After", "30"));
    let err = client.applications().all().count().unwrap_err();
    assert!(matches!(
        err,
        Error::Transport {
            provider: "odp-applications",
            source: TransportError::RateLimited {
                retry_after: Some(30),
                ..
            },
            ..
        }
    ));
}

#[test]
fn documents_of_one_application() {
    let body = json!({
        "count": 2,
        "documentBag": [
            {
                "applicationNumberText": "16000007",
                "officialDate": "2020-04-01T00:00:00.000-0400",
                "documentIdentifier": "K8XQ1",
                "documentCode": "CTNF",
                "documentCodeDescriptionText": "Non-Final Rejection",
                "directionCategory": "OUTGOING",
                "downloadOptionBag": [
                    {"mimeTypeIdentifier": "PDF", "downloadUrl": "https://api.uspto.gov/download/K8XQ1.pdf", "pageTotalQuantity": 12},
                    {"mimeTypeIdentifier": "XML", "downloadUrl": "https://api.uspto.gov/download/K8XQ1.xml"}
                ]
            },
            {
                "applicationNumberText": "16000007",
                "documentCode": "N417",
                "downloadOptionBag": {"mimeTypeIdentifier": "PDF", "downloadUrl": "https://api.uspto.gov/download/N417.pdf"}
            }
        ]
    });
    let (client, transport) = client_fixed(Response::json_body(&body));
    let docs = client
        .documents()
        .filter("appl_id", "16000007")
        .to_vec()
        .unwrap();

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].document_code.as_deref(), Some("CTNF"));
    assert_eq!(
        docs[0].download_url("XML"),
        Some("https://api.uspto.gov/download/K8XQ1.xml")
    );
    assert_eq!(docs[0].download_options[0].pages, Some(12));
    assert_eq!(
        docs[0].mail_date.map(|d| d.format("%Y-%m-%d %z").to_string()).as_deref(),
        Some("2020-04-01 -0400")
    );
    assert_eq!(docs[1].download_options.len(), 1);
    assert_eq!(docs[1].mail_date, None);
    assert_eq!(
        url_path(&transport.requests()[0]),
        "/api/v1/patent/applications/16000007/documents"
    );
}

#[test]
fn unknown_application_has_no_documents() {
    let (client, _) = client_fixed(Response::new(404, "{}"));
    let docs = client.documents().filter("appl_id", "99999999");
    assert_eq!(docs.count().unwrap(), 0);
}

#[tokio::test]
async fn async_search_matches_blocking() {
    let (client, transport) = client_with(keyed(), search);
    let apps = client.applications().filter("app_status_code", 150i64);
    let blocking = apps.slice(5..15).to_vec().unwrap();
    let requests = transport.requests();
    transport.clear();

    let again = client.applications().filter("app_status_code", 150i64);
    let nonblocking = again.slice(5..15).to_vec_async().await.unwrap();
    assert_eq!(blocking, nonblocking);
    assert_eq!(requests, transport.requests());
}
