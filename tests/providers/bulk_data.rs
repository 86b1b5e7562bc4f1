//! USPTO bulk data catalog selectors

use crate::common::*;
use chrono::NaiveDate;
use patent_client::core::{Request, Response};
use patent_client::{ClientConfig, Error, TransportError};
use serde_json::json;

fn product(id: i64, short_name: &str) -> serde_json::Value {
    json!({
        "productId": id,
        "productIdentifier": short_name,
        "productTitle": format!("{} full text", short_name),
        "productFrequency": "WEEKLY",
        "productFromDate": "2002-01-01",
        "productToDate": "2024-02-27",
        "productFiles": [
            {"fileName": format!("{}_240101.zip", short_name.to_lowercase()),
             "fileSize": 123456,
             "fileDownloadUrl": format!("https://bulkdata.uspto.gov/data/{}.zip", short_name),
             "fileFromTime": "2024-01-01 00:00",
             "fileToTime": "2024-01-07 23:59",
             "fileType": "data"}
        ]
    })
}

fn catalog(request: &Request) -> Result<Response, TransportError> {
    let path = url_path(request);
    let body = if path.ends_with("/all/latest") {
        json!([product(1, "PTGRXML"), product(2, "APPXML")])
    } else if path.ends_with("/popular") {
        json!([product(2, "APPXML")])
    } else if path.ends_with("/byname/Patent%20Grant%20Full%20Text") {
        product(1, "PTGRXML")
    } else if path.ends_with("/PTGRXML") {
        product(1, "PTGRXML")
    } else {
        return Ok(Response::new(500, "unknown product"));
    };
    Ok(Response::json_body(&body))
}

#[test]
fn latest_lists_every_product() {
    let (client, transport) = client_with(ClientConfig::default(), catalog);
    let latest = client.products().filter("latest", true);
    let names: Vec<_> = latest
        .to_vec()
        .unwrap()
        .into_iter()
        .filter_map(|p| p.short_name)
        .collect();
    assert_eq!(names, vec!["PTGRXML", "APPXML"]);
    assert_eq!(latest.count().unwrap(), 2);
    assert_eq!(transport.request_count(), 1);
    assert_eq!(
        url_path(&transport.requests()[0]),
        "/BDSS-API/products/all/latest"
    );
}

#[test]
fn by_name_returns_one_product_with_files() {
    let (client, transport) = client_with(ClientConfig::default(), catalog);
    let grant = client
        .products()
        .get_many([
            ("name", patent_client::Criterion::from("Patent Grant Full Text")),
            ("from_date", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().into()),
        ])
        .unwrap();

    assert_eq!(grant.id, Some(1));
    assert_eq!(grant.to_date, NaiveDate::from_ymd_opt(2024, 2, 27));
    let file = &grant.files[0];
    assert_eq!(file.name.as_deref(), Some("ptgrxml_240101.zip"));
    assert_eq!(
        file.to_time.map(|t| t.format("%Y-%m-%d %H:%M").to_string()).as_deref(),
        Some("2024-01-07 23:59")
    );

    let request = &transport.requests()[0];
    assert_eq!(request.param_value("fromYear"), Some("2024"));
    assert_eq!(request.param_value("maxFiles"), Some("20"));
    assert_eq!(request.param_value("toYear"), None);
}

#[test]
fn short_name_and_popular() {
    let (client, _) = client_with(ClientConfig::default(), catalog);
    let product = client.products().get("short_name", "PTGRXML").unwrap();
    assert_eq!(product.frequency.as_deref(), Some("WEEKLY"));
    let popular = client.products().get("popular", true).unwrap();
    assert_eq!(popular.short_name.as_deref(), Some("APPXML"));
}

#[test]
fn selection_errors_precede_io() {
    let (client, transport) = client_with(ClientConfig::default(), catalog);
    let products = client.products();
    assert!(matches!(
        products.all().first(),
        Err(Error::InvalidQuery { .. })
    ));
    assert!(products
        .filter("short_name", "PTGRXML")
        .filter("max_files", 3i64)
        .first()
        .is_err());
    assert!(products.filter("latest", true).sort(["title"]).first().is_err());
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn server_error_surfaces_with_context() {
    let (client, _) = client_with(ClientConfig::default(), catalog);
    let err = client.products().get("short_name", "NOPE").unwrap_err();
    match err {
        Error::Transport {
            provider, source, ..
        } => {
            assert_eq!(provider, "uspto-bulk-data");
            assert!(matches!(source, TransportError::Status { status: 500, .. }));
        }
        other => panic!("expected a transport error, got {:?}", other),
    }
}
