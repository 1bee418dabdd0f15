use std::net::SocketAddr;
use std::sync::mpsc;
use std::thread;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use crm_api::{
    load_customers, AdminAction, AdminClient, ApiError, ClientOptions, CustomerSource,
    FallbackPolicy, HttpCustomerSource, LoadOrigin,
};
use serde_json::{json, Value};
use url::Url;

fn spawn_server(router: Router) -> Url {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let (tx, rx) = mpsc::channel::<SocketAddr>();
    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind");
            tx.send(listener.local_addr().expect("addr"))
                .expect("send addr");
            let _ = axum::serve(listener, router).await;
        });
    });
    let addr = rx.recv().expect("server addr");
    Url::parse(&format!("http://{addr}/api/clientes/")).expect("url")
}

fn closed_port_url() -> Url {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    Url::parse(&format!("http://{addr}/api/clientes/")).expect("url")
}

async fn customers() -> Json<Value> {
    Json(json!([
        {
            "id": 10,
            "firstName": "Lucía",
            "lastName": "Fernández",
            "fullName": "Lucía Fernández",
            "company": "Acme Ibérica",
            "birthday": "1991-03-04",
            "lastInteraction": {"date": "2025-06-27T08:00:00Z", "type": "Email"}
        },
        {
            "id": 11,
            "firstName": "Pablo",
            "lastName": "Ruiz",
            "fullName": "Pablo Ruiz",
            "company": "Northwind",
            "birthday": "1979-11-30",
            "lastInteraction": {"date": "2025-06-21T17:30:00Z", "type": "LinkedIn"}
        }
    ]))
}

async fn duplicate_customers() -> Json<Value> {
    Json(json!([
        {"id": 1, "firstName": "A", "lastName": "One", "fullName": "A One", "company": "X"},
        {"id": 1, "firstName": "B", "lastName": "Two", "fullName": "B Two", "company": "Y"}
    ]))
}

async fn unavailable() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "maintenance")
}

async fn generate() -> Json<Value> {
    Json(json!({
        "message": "ok",
        "statistics": {"users": 3, "companies": 20, "customers": 1000, "interactions": 500000}
    }))
}

async fn reset() -> Json<Value> {
    Json(json!({"message": "database cleared"}))
}

fn backend() -> Router {
    Router::new()
        .route("/api/clientes/", get(customers))
        .route("/api/clientes/load_fake_data/", post(generate))
        .route("/api/clientes/reset_database/", post(reset))
}

#[test]
fn http_source_reads_customer_array() {
    let base = spawn_server(backend());
    let source = HttpCustomerSource::new(&ClientOptions::new(base)).expect("source");
    let customers = source.fetch_customers().expect("fetch");
    assert_eq!(customers.len(), 2);
    assert_eq!(customers[0].full_name, "Lucía Fernández");
    assert_eq!(customers[1].id.as_str(), "11");
    assert_eq!(customers[1].last_interaction.channel, "LinkedIn");
}

#[test]
fn load_uses_remote_collection_when_available() {
    let base = spawn_server(backend());
    let source = HttpCustomerSource::new(&ClientOptions::new(base)).expect("source");
    let outcome = load_customers(&source, FallbackPolicy::Fail).expect("load");
    assert_eq!(outcome.origin, LoadOrigin::Primary { source: "http" });
    assert_eq!(outcome.collection.len(), 2);
}

#[test]
fn error_status_is_typed_and_falls_back() {
    let base = spawn_server(Router::new().route("/api/clientes/", get(unavailable)));
    let source = HttpCustomerSource::new(&ClientOptions::new(base)).expect("source");

    let err = source.fetch_customers().unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 503, .. }));

    let outcome = load_customers(&source, FallbackPolicy::Fixtures).expect("load");
    assert!(outcome.is_fallback());
    assert_eq!(outcome.collection.as_slice()[0].full_name, "Ana García");
}

#[test]
fn duplicate_ids_from_backend_are_rejected() {
    let base = spawn_server(Router::new().route("/api/clientes/", get(duplicate_customers)));
    let source = HttpCustomerSource::new(&ClientOptions::new(base)).expect("source");
    let err = load_customers(&source, FallbackPolicy::Fail).unwrap_err();
    assert!(matches!(err, ApiError::Core(_)));
}

#[test]
fn unreachable_backend_is_an_http_error() {
    let source = HttpCustomerSource::new(&ClientOptions::new(closed_port_url())).expect("source");
    let err = load_customers(&source, FallbackPolicy::Fail).unwrap_err();
    assert!(matches!(err, ApiError::Http(_)));

    let outcome = load_customers(&source, FallbackPolicy::Fixtures).expect("load");
    assert_eq!(outcome.collection.len(), 5);
}

#[test]
fn admin_actions_report_status_lines() {
    let base = spawn_server(backend());
    let admin = AdminClient::new(&ClientOptions::new(base)).expect("admin");

    let report = admin.generate_data().expect("generate");
    assert_eq!(report.statistics.map(|s| s.customers), Some(1000));
    assert_eq!(
        admin.perform(AdminAction::GenerateData).expect("generate"),
        "Data loaded: 3 users, 20 companies, 1000 customers, 500000 interactions"
    );
    assert_eq!(
        admin.perform(AdminAction::ResetDatabase).expect("reset"),
        "Database cleaned successfully"
    );
}

#[test]
fn admin_failures_are_not_retried() {
    let base = spawn_server(
        Router::new()
            .route("/api/clientes/load_fake_data/", post(unavailable))
            .route("/api/clientes/reset_database/", post(unavailable)),
    );
    let admin = AdminClient::new(&ClientOptions::new(base)).expect("admin");

    let err = admin.perform(AdminAction::ResetDatabase).unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 503, .. }));
    let message = AdminAction::GenerateData.failure_message(&admin.generate_data().unwrap_err());
    assert!(message.starts_with("Error loading data: "));
    assert!(message.contains("503"));
}
