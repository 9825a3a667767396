#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::config::Config;
use crate::models::ExpenseForm;

const PATH: &str = "/api/expenses";

fn client_for(server: &MockServer) -> RestClient {
    let config = Config {
        api_url: format!("{}{PATH}/", server.uri()),
        ..Config::default()
    };
    RestClient::new(&config).unwrap()
}

fn draft() -> ExpenseDraft {
    ExpenseForm {
        title: "Lunch".into(),
        amount: "180".into(),
        category: "Food".into(),
        date: "2024-05-02".into(),
    }
    .validate()
    .unwrap()
}

#[tokio::test]
async fn test_list_decodes_records_in_server_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "title": "Bus", "amount": 40, "category": "Travel", "date": "2024-05-01"},
            {"id": 1, "title": "Rent", "amount": 15000.0, "category": "Housing", "date": "2024-05-01"}
        ])))
        .mount(&server)
        .await;

    let expenses = client_for(&server).list().await.unwrap();
    let ids: Vec<i64> = expenses.iter().map(|e| e.id.0).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(expenses[1].amount, dec!(15000));
}

#[tokio::test]
async fn test_list_skips_malformed_records_and_keeps_the_rest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Rent", "amount": 15000, "category": "Housing", "date": "2024-05-01"},
            {"id": 2, "title": "Ghost", "amount": 10, "category": "Food", "date": null},
            {"id": 3, "title": "Odd", "amount": "lots", "category": "Food", "date": "2024-05-02"},
            {"id": 4, "title": null, "amount": 40, "category": "Travel", "date": "2024-05-03"}
        ])))
        .mount(&server)
        .await;

    let expenses = client_for(&server).list().await.unwrap();
    let ids: Vec<i64> = expenses.iter().map(|e| e.id.0).collect();
    assert_eq!(ids, vec![1, 4]);
    assert_eq!(expenses[1].title, "");
}

#[test]
fn test_decode_records_with_null_date() {
    let values = vec![
        json!({"id": 7, "title": "Tea", "amount": 15, "category": "Food", "date": "2024-05-01"}),
        json!({"id": 8, "title": "Tea", "amount": 15, "category": "Food", "date": null}),
    ];
    let expenses = super::rest::decode_records(values);
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].id, ExpenseId(7));
}

#[tokio::test]
async fn test_list_failure_status_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = client_for(&server).list().await.unwrap_err();
    assert!(matches!(err, ApiError::Status(s) if s.as_u16() == 500));
}

#[tokio::test]
async fn test_create_posts_draft_and_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PATH))
        .and(body_json(json!({
            "title": "Lunch", "amount": 180.0, "category": "Food", "date": "2024-05-02"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("Expense added successfully! Current total: ₹180.0"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let message = client_for(&server).create(&draft()).await.unwrap();
    assert_eq!(message, "Expense added successfully! Current total: ₹180.0");
}

#[tokio::test]
async fn test_create_failure_status_ignores_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("looks fine to me"))
        .mount(&server)
        .await;

    assert!(client_for(&server).create(&draft()).await.is_err());
}

#[tokio::test]
async fn test_update_puts_to_record_path() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{PATH}/9")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).update(ExpenseId(9), &draft()).await.unwrap();
}

#[tokio::test]
async fn test_update_not_found_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{PATH}/9")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).update(ExpenseId(9), &draft()).await.unwrap_err();
    assert!(matches!(err, ApiError::Status(s) if s.as_u16() == 404));
}

#[tokio::test]
async fn test_delete_hits_record_path() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{PATH}/3")))
        .respond_with(ResponseTemplate::new(200).set_body_string("Expense with id 3 deleted successfully."))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).delete(ExpenseId(3)).await.unwrap();
}

#[tokio::test]
async fn test_get_empty_body_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{PATH}/77")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    assert!(client_for(&server).get(ExpenseId(77)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_returns_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{PATH}/5")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"id": 5, "title": "Gym", "amount": 999.99, "category": "Health", "date": "2024-04-30"}
        )))
        .mount(&server)
        .await;

    let expense = client_for(&server).get(ExpenseId(5)).await.unwrap().unwrap();
    assert_eq!(expense.title, "Gym");
    assert_eq!(expense.amount, dec!(999.99));
}

#[tokio::test]
async fn test_transport_failure_is_error() {
    let config = Config {
        api_url: "http://127.0.0.1:9/api/expenses".into(),
        ..Config::default()
    };
    let client = RestClient::new(&config).unwrap();
    assert!(matches!(client.list().await, Err(ApiError::Transport(_))));
}

#[tokio::test]
async fn test_execute_maps_request_to_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{PATH}/4")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let outcome = execute(&client, Request::Delete(ExpenseId(4))).await;
    assert!(matches!(outcome, Outcome::Deleted(ExpenseId(4), Err(_))));
    assert!(Request::Delete(ExpenseId(4)).is_mutation());
    assert!(!Request::List.is_mutation());
}
