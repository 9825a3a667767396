#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;
use crate::models::ExpenseId;

fn records() -> Vec<Expense> {
    vec![
        Expense {
            id: ExpenseId(3),
            title: "Dinner, with \"friends\"".into(),
            amount: dec!(850.5),
            category: "Food".into(),
            date: NaiveDate::from_ymd_opt(2024, 7, 2).unwrap(),
        },
        Expense {
            id: ExpenseId(9),
            title: "Metro card".into(),
            amount: dec!(200),
            category: "Travel".into(),
            date: NaiveDate::from_ymd_opt(2024, 7, 3).unwrap(),
        },
    ]
}

#[test]
fn test_write_csv_has_header_and_quotes_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");

    let count = write_csv(&path, &records()).unwrap();
    assert_eq!(count, 2);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "id,title,amount,category,date");
    assert_eq!(lines[1], "3,\"Dinner, with \"\"friends\"\"\",850.5,Food,2024-07-02");
    assert_eq!(lines[2], "9,Metro card,200,Travel,2024-07-03");
}

#[test]
fn test_write_csv_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    write_csv(&path, &records()).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let titles: Vec<String> = rdr
        .records()
        .map(|r| r.unwrap().get(1).unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Dinner, with \"friends\"", "Metro card"]);
}

#[test]
fn test_write_csv_empty_projection_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    assert_eq!(write_csv(&path, &[]).unwrap(), 0);
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.trim_end(), "id,title,amount,category,date");
}

#[test]
fn test_write_csv_bad_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.csv");
    assert!(write_csv(&path, &records()).is_err());
}

#[test]
fn test_write_html_wraps_escaped_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.html");
    let table = ExpenseTable::build(&records());

    assert_eq!(write_html(&path, &table).unwrap(), 2);
    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Dinner, with &quot;friends&quot;"));
    assert!(html.contains("Total: ₹1050.50"));
}
