#![allow(clippy::unwrap_used)]
// Integration tests for `CustomersClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use northgrid_api::{Address, BearerToken, CustomerRecord, CustomersClient, Error, FieldError};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CustomersClient) {
    let server = MockServer::start().await;
    let endpoint = format!("{}/customers", server.uri());
    let token = BearerToken::new(SecretString::from("test-token".to_string()));
    let client = CustomersClient::from_reqwest(&endpoint, reqwest::Client::new(), token).unwrap();
    (server, client)
}

fn alfki() -> CustomerRecord {
    CustomerRecord {
        customer_id: "ALFKI".into(),
        company_name: "Alfreds".into(),
        contact_name: "Maria Anders".into(),
        contact_title: "Sales Rep".into(),
        address: Address::city_country("Berlin", "Germany"),
    }
}

fn alfki_json() -> serde_json::Value {
    json!({
        "customerID": "ALFKI",
        "companyName": "Alfreds",
        "contactName": "Maria Anders",
        "contactTitle": "Sales Rep",
        "address": {
            "street": "",
            "city": "Berlin",
            "region": "",
            "postalCode": "",
            "country": "Germany",
            "phone": ""
        }
    })
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_customers() {
    let (server, client) = setup().await;

    let body = json!([
        alfki_json(),
        {
            "customerID": "ANATR",
            "companyName": "Ana Trujillo Emparedados y helados",
            "contactName": "Ana Trujillo",
            "contactTitle": "Owner",
            "address": { "city": "México D.F.", "country": "Mexico", "region": null }
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let customers = client.list().await.unwrap();

    assert_eq!(customers.len(), 2);
    assert_eq!(customers[0], alfki());
    assert_eq!(customers[1].customer_id, "ANATR");
    assert_eq!(customers[1].address.region, "");
}

#[tokio::test]
async fn test_list_sends_no_authorization() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client.list().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_create_posts_full_record_with_headers() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/customers"))
        .and(header("content-type", "application/json"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(alfki_json()))
        .respond_with(ResponseTemplate::new(201).set_body_json(alfki_json()))
        .expect(1)
        .mount(&server)
        .await;

    let created = client.create(&alfki()).await.unwrap();
    assert_eq!(created, alfki());
}

#[tokio::test]
async fn test_update_puts_to_collection() {
    let (server, client) = setup().await;

    let mut record = alfki();
    record.contact_title = "Owner".into();
    let mut expected = alfki_json();
    expected["contactTitle"] = json!("Owner");

    Mock::given(method("PUT"))
        .and(path("/customers"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(&expected))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client.update(&record).await.unwrap();
    assert_eq!(updated.contact_title, "Owner");
}

#[tokio::test]
async fn test_delete_by_id() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/customers/ALFKI"))
        .and(header("content-type", "application/json"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("deleted"))
        .expect(1)
        .mount(&server)
        .await;

    client.delete("ALFKI").await.unwrap();
}

#[tokio::test]
async fn test_trailing_slash_endpoint() {
    let server = MockServer::start().await;
    let endpoint = format!("{}/customers/", server.uri());
    let client =
        CustomersClient::from_reqwest(&endpoint, reqwest::Client::new(), BearerToken::none())
            .unwrap();

    Mock::given(method("DELETE"))
        .and(path("/customers/BONAP"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete("BONAP").await.unwrap();
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_structured_error_payload() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/customers"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "companyName": "Company name is required",
            "contactName": "Contact name is invalid"
        })))
        .mount(&server)
        .await;

    let err = client.create(&alfki()).await.unwrap_err();

    match err {
        Error::Api {
            status,
            field_errors,
            ..
        } => {
            assert_eq!(status, 400);
            assert_eq!(
                field_errors,
                vec![
                    FieldError::new("companyName", "Company name is required"),
                    FieldError::new("contactName", "Contact name is invalid"),
                ]
            );
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unstructured_error_payload() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/customers"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&server)
        .await;

    let err = client.update(&alfki()).await.unwrap_err();

    match err {
        Error::Api {
            status,
            message,
            field_errors,
        } => {
            assert_eq!(status, 500);
            assert_eq!(message, "database unavailable");
            assert!(field_errors.is_empty());
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_error_body_uses_status() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/customers/NOPE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.delete("NOPE").await.unwrap_err();

    assert!(
        matches!(&err, Error::Api { status: 404, message, .. } if message == "404 Not Found"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_invalid_json_success_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list().await;

    assert!(
        matches!(result, Err(Error::Deserialization { ref body, .. }) if body == "<html>oops</html>"),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/customers", listener.local_addr().unwrap());
    drop(listener);

    let client =
        CustomersClient::from_reqwest(&endpoint, reqwest::Client::new(), BearerToken::none())
            .unwrap();
    let result = client.list().await;

    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport error, got: {result:?}"
    );
}

#[test]
fn test_rejects_non_base_url() {
    let result =
        CustomersClient::from_reqwest("mailto:someone", reqwest::Client::new(), BearerToken::none());
    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}
