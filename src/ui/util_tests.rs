#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 5), "hell…");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_unicode() {
    assert_eq!(truncate("पेट्रोल खर्च", 4), "पेट…");
    assert_eq!(truncate("₹₹₹₹₹", 3), "₹₹…");
}

// ── format_money ──────────────────────────────────────────────

#[test]
fn test_format_money_two_places() {
    assert_eq!(format_money(dec!(15000), 2), "₹15000.00");
    assert_eq!(format_money(dec!(1.5), 2), "₹1.50");
}

#[test]
fn test_format_money_has_no_thousands_separator() {
    assert_eq!(format_money(dec!(1234567.89), 2), "₹1234567.89");
}

#[test]
fn test_format_money_zero_places() {
    assert_eq!(format_money(dec!(20000), 0), "₹20000");
    assert_eq!(format_money(dec!(25000.5), 0), "₹25001");
}

#[test]
fn test_format_money_rounds_half_away_from_zero() {
    assert_eq!(format_money(dec!(0.125), 2), "₹0.13");
    assert_eq!(format_money(dec!(2.675), 2), "₹2.68");
}

#[test]
fn test_format_money_zero_and_negative() {
    assert_eq!(format_money(dec!(0), 2), "₹0.00");
    assert_eq!(format_money(dec!(-0.001), 2), "₹0.00");
    assert_eq!(format_money(dec!(-42.5), 2), "-₹42.50");
}

// ── escape_markup ─────────────────────────────────────────────

#[test]
fn test_escape_markup_plain_text_unchanged() {
    assert_eq!(escape_markup("Groceries"), "Groceries");
}

#[test]
fn test_escape_markup_tags_and_quotes() {
    assert_eq!(
        escape_markup(r#"<script>alert("x")</script>"#),
        "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"
    );
    assert_eq!(escape_markup("Tom's"), "Tom&#39;s");
}

#[test]
fn test_escape_markup_ampersand_first() {
    assert_eq!(escape_markup("a &lt; b"), "a &amp;lt; b");
}

// ── cursor helpers ────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_window() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 10, 3);
    assert_eq!((index, scroll), (3, 1));
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (4, 2);
    scroll_down(&mut index, &mut scroll, 5, 3);
    assert_eq!((index, scroll), (4, 2));
}

#[test]
fn test_clamp_cursor_after_shrink() {
    let (mut index, mut scroll) = (8, 6);
    clamp_cursor(&mut index, &mut scroll, 3);
    assert_eq!((index, scroll), (2, 2));

    clamp_cursor(&mut index, &mut scroll, 0);
    assert_eq!((index, scroll), (0, 0));
}
