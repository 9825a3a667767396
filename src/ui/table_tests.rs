#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::table::*;
use crate::api::Outcome;
use crate::models::{Expense, ExpenseId};
use crate::session::{Notice, Notify, Session};

fn expense(id: i64, title: &str, amount: Decimal, category: &str) -> Expense {
    Expense {
        id: ExpenseId(id),
        title: title.into(),
        amount,
        category: category.into(),
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    }
}

#[derive(Default)]
struct Sink(Vec<Notice>);

impl Notify for Sink {
    fn notify(&mut self, notice: Notice) {
        self.0.push(notice);
    }
}

fn session_with(records: Vec<Expense>) -> Session {
    let mut session = Session::default();
    session.apply(Outcome::Listed(Ok(records)), &mut Sink::default());
    session
}

#[test]
fn test_rows_use_display_index_not_id() {
    let table = ExpenseTable::build(&[
        expense(40, "Rent", dec!(12000), "Housing"),
        expense(7, "Tea", dec!(15.5), "Food"),
    ]);
    let rows = table.rows();
    assert_eq!(rows[0].index, 1);
    assert_eq!(rows[0].id, ExpenseId(40));
    assert_eq!(rows[1].index, 2);
    assert_eq!(rows[1].amount, "₹15.50");
    assert_eq!(rows[1].date, "2024-06-01");
}

#[test]
fn test_total_covers_only_rows_given() {
    let table = ExpenseTable::build(&[
        expense(1, "Rent", dec!(12000), "Housing"),
        expense(2, "Tea", dec!(15.5), "Food"),
    ]);
    assert_eq!(table.total(), dec!(12015.5));
    assert_eq!(table.total_line(), "Total: ₹12015.50");
}

#[test]
fn test_build_does_not_panic_on_overflowing_total() {
    let table = ExpenseTable::build(&[
        expense(1, "Yacht", Decimal::MAX, "Toys"),
        expense(2, "Jet", Decimal::MAX, "Toys"),
    ]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.total(), Decimal::MAX);
}

#[test]
fn test_empty_table_totals_zero() {
    let table = ExpenseTable::build(&[]);
    assert!(table.is_empty());
    assert_eq!(table.total_line(), "Total: ₹0.00");
}

#[test]
fn test_resolve_maps_cursor_to_id() {
    let table = ExpenseTable::build(&[
        expense(40, "Rent", dec!(12000), "Housing"),
        expense(7, "Tea", dec!(15), "Food"),
    ]);
    assert_eq!(table.resolve(1), Some(ExpenseId(7)));
    assert_eq!(table.resolve(2), None);
}

#[test]
fn test_html_escapes_title_and_category() {
    let table = ExpenseTable::build(&[expense(1, "<script>alert(1)</script>", dec!(5), "\"A&B\"")]);
    let html = table.to_html();
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains("&quot;A&amp;B&quot;"));
}

#[test]
fn test_html_buttons_carry_record_id() {
    let table = ExpenseTable::build(&[expense(93, "Tea", dec!(15), "Food")]);
    let html = table.to_html();
    assert!(html.contains("<button data-action=\"edit\" data-id=\"93\">"));
    assert!(html.contains("<button data-action=\"delete\" data-id=\"93\">"));
    assert!(html.contains("Total: ₹15.00"));
}

#[test]
fn test_resolve_markup_reads_delegated_attributes() {
    assert_eq!(
        ExpenseTable::resolve_markup("delete", "93"),
        Some((RowAction::Delete, ExpenseId(93)))
    );
    assert_eq!(ExpenseTable::resolve_markup("archive", "93"), None);
    assert_eq!(ExpenseTable::resolve_markup("edit", "x"), None);
}

#[test]
fn test_dispatch_edit_opens_session_by_id() {
    let mut session = session_with(vec![expense(5, "Tea", dec!(15), "Food")]);
    let mut sink = Sink::default();
    let result = dispatch(&mut session, RowAction::Edit, ExpenseId(5), &mut sink);
    assert_eq!(result, Dispatched::EditOpened);
    assert_eq!(session.edit().target(), Some(ExpenseId(5)));
}

#[test]
fn test_dispatch_edit_of_missing_id_is_silent() {
    let mut session = session_with(vec![expense(5, "Tea", dec!(15), "Food")]);
    let mut sink = Sink::default();
    let result = dispatch(&mut session, RowAction::Edit, ExpenseId(6), &mut sink);
    assert_eq!(result, Dispatched::Ignored);
    assert!(sink.0.is_empty());
}

#[test]
fn test_dispatch_delete_asks_then_reports_stale() {
    let mut session = session_with(vec![expense(5, "Tea", dec!(15), "Food")]);
    let mut sink = Sink::default();
    let result = dispatch(&mut session, RowAction::Delete, ExpenseId(5), &mut sink);
    assert!(matches!(&result, Dispatched::ConfirmDelete(q) if q.contains("Tea")));
    let result = dispatch(&mut session, RowAction::Delete, ExpenseId(6), &mut sink);
    assert_eq!(result, Dispatched::Ignored);
    assert_eq!(sink.0.len(), 1);
}
