#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_fresh_database_has_current_version() {
    let db = Database::open_in_memory().unwrap();
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

#[test]
fn test_reopen_keeps_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expensetui.db");
    {
        let db = Database::open(&path).unwrap();
        db.set_setting("theme", "dark").unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.get_setting("theme").unwrap().as_deref(), Some("dark"));
}

// ── Settings ──────────────────────────────────────────────────

#[test]
fn test_missing_setting_is_none() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_setting("nope").unwrap().is_none());
}

#[test]
fn test_setting_overwrite() {
    let db = Database::open_in_memory().unwrap();
    db.set_setting("k", "1").unwrap();
    db.set_setting("k", "2").unwrap();
    assert_eq!(db.get_setting("k").unwrap().as_deref(), Some("2"));
}

// ── Monthly limit ─────────────────────────────────────────────

#[test]
fn test_monthly_limit_defaults_when_absent() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.monthly_limit().unwrap(), MonthlyLimit::default());
}

#[test]
fn test_monthly_limit_defaults_when_invalid() {
    let db = Database::open_in_memory().unwrap();
    for raw in ["abc", "", "-10", "0", "NaN"] {
        db.set_setting(MonthlyLimit::STORAGE_KEY, raw).unwrap();
        assert_eq!(
            db.monthly_limit().unwrap(),
            MonthlyLimit::default(),
            "stored {raw:?} should fall back to the default"
        );
    }
}

#[test]
fn test_monthly_limit_round_trip() {
    let db = Database::open_in_memory().unwrap();
    let limit = MonthlyLimit::parse("25000.5").unwrap();
    db.set_monthly_limit(limit).unwrap();
    assert_eq!(db.monthly_limit().unwrap().amount(), dec!(25000.5));
    assert_eq!(
        db.get_setting(MonthlyLimit::STORAGE_KEY).unwrap().as_deref(),
        Some("25000.5")
    );
}
