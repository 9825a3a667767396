#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use reqwest::StatusCode;
use rust_decimal_macros::dec;

use super::app::{App, FormKind, InputMode};
use crate::api::{ApiError, Outcome, Request};
use crate::models::{Expense, ExpenseId, FormField};
use crate::session::{NoticeLevel, Session};

fn loaded_app() -> App {
    let mut app = App::new(Session::default());
    app.apply(Outcome::Listed(Ok(vec![
        Expense {
            id: ExpenseId(10),
            title: "Phone bill".into(),
            amount: dec!(499),
            category: "Utilities".into(),
            date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
        },
        Expense {
            id: ExpenseId(11),
            title: "Books".into(),
            amount: dec!(1200),
            category: "Education".into(),
            date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
        },
    ])));
    app
}

#[test]
fn test_listed_outcome_rebuilds_table() {
    let app = loaded_app();
    assert_eq!(app.table.len(), 2);
    assert_eq!(app.selected_id(), Some(ExpenseId(10)));
}

#[test]
fn test_fetch_failure_empties_table_and_clamps_cursor() {
    let mut app = loaded_app();
    app.expense_index = 1;
    app.apply(Outcome::Listed(Err(ApiError::Status(StatusCode::SERVICE_UNAVAILABLE))));
    assert!(app.table.is_empty());
    assert_eq!(app.expense_index, 0);
    assert!(app.session.cache().fetch_error().is_some());
    assert_eq!(app.status.level, NoticeLevel::Error);
}

#[test]
fn test_edit_form_stays_open_until_update_lands() {
    let mut app = loaded_app();
    app.open_edit_form(ExpenseId(11));
    assert_eq!(app.form_kind, Some(FormKind::Edit));
    assert_eq!(app.active_form().unwrap().title, "Books");

    app.active_form_mut().unwrap().amount = "1300".into();
    app.submit_form();
    assert_eq!(app.input_mode, InputMode::Form);
    let requests = app.take_requests();
    assert!(matches!(requests[0], Request::Update(ExpenseId(11), _)));

    app.apply(Outcome::Updated(ExpenseId(11), Ok(())));
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.form_kind, None);
    assert_eq!(app.take_requests(), vec![Request::List]);
}

#[test]
fn test_failed_update_keeps_form_open() {
    let mut app = loaded_app();
    app.open_edit_form(ExpenseId(11));
    app.submit_form();
    app.take_requests();
    app.apply(Outcome::Updated(
        ExpenseId(11),
        Err(ApiError::Status(StatusCode::NOT_FOUND)),
    ));
    assert_eq!(app.input_mode, InputMode::Form);
    assert!(app.session.edit().is_open());
    assert!(app.take_requests().is_empty());
}

#[test]
fn test_cancel_edit_closes_session() {
    let mut app = loaded_app();
    app.open_edit_form(ExpenseId(10));
    app.cancel_form();
    assert!(!app.session.edit().is_open());
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn test_invalid_entry_keeps_form_open() {
    let mut app = loaded_app();
    app.open_entry_form();
    assert_eq!(app.form_focus, FormField::Title);
    app.session.entry.title = "Snacks".into();
    app.session.entry.amount = "0".into();
    app.session.entry.category = "Food".into();
    app.submit_form();
    assert_eq!(app.input_mode, InputMode::Form);
    assert!(app.take_requests().is_empty());
    assert_eq!(app.status.level, NoticeLevel::Error);
}

#[test]
fn test_valid_entry_closes_form_and_queues_create() {
    let mut app = loaded_app();
    app.open_entry_form();
    app.session.entry.title = "Snacks".into();
    app.session.entry.amount = "60".into();
    app.session.entry.category = "Food".into();
    app.session.entry.date = "2024-09-03".into();
    app.submit_form();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(matches!(app.take_requests()[0], Request::Create(_)));
}

#[test]
fn test_confirmed_delete_queues_request() {
    let mut app = loaded_app();
    app.begin_delete(ExpenseId(10));
    assert_eq!(app.input_mode, InputMode::Confirm);
    app.answer_confirm(true);
    assert_eq!(app.take_requests(), vec![Request::Delete(ExpenseId(10))]);
}
