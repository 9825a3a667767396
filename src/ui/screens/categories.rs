use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::session::category_totals;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_money, truncate};

const BAR_WIDTH: usize = 30;

/// Filled share of `BAR_WIDTH` for `part` out of `whole`.
fn share_bar(part: Decimal, whole: Decimal) -> (String, Decimal) {
    if whole <= Decimal::ZERO {
        return (String::new(), Decimal::ZERO);
    }
    let pct = part
        .checked_div(whole)
        .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
        .round_dp(1);
    let filled = (pct.to_f64().unwrap_or(0.0) / 100.0 * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));
    (bar, pct)
}

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let totals = category_totals(app.session.cache().records());
    let grand_total = app.session.cache().total();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" Categories ({}) ", totals.len()),
            theme::title_style(),
        ));

    if totals.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No expenses to break down", theme::dim_style())),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let header_cells = ["Category", "Spent", "Share", ""]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = totals
        .iter()
        .enumerate()
        .map(|(i, (name, amount))| {
            let (bar, pct) = share_bar(*amount, grand_total);
            let selected = i == app.category_index;
            let is_filtered = app.session.filter.to_string() == *name;
            let name_style = if selected {
                theme::selected_style()
            } else if is_filtered {
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                theme::normal_style()
            };
            let label = if name.is_empty() { "(none)" } else { name.as_str() };

            Row::new(vec![
                Cell::from(Span::styled(truncate(label, 24), name_style)),
                Cell::from(Span::styled(format_money(*amount, 2), theme::amount_style())),
                Cell::from(format!("{pct:>5}%")),
                Cell::from(Span::styled(bar, Style::default().fg(theme::ACCENT))),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(26),
        Constraint::Length(16),
        Constraint::Length(8),
        Constraint::Min(10),
    ];

    f.render_widget(Table::new(rows, widths).header(header).block(block), area);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_share_bar_half() {
        let (bar, pct) = share_bar(dec!(50), dec!(100));
        assert_eq!(pct, dec!(50.0));
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), BAR_WIDTH / 2);
        assert_eq!(bar.chars().count(), BAR_WIDTH);
    }

    #[test]
    fn test_share_bar_zero_total() {
        let (bar, pct) = share_bar(dec!(10), Decimal::ZERO);
        assert!(bar.is_empty());
        assert_eq!(pct, Decimal::ZERO);
    }
}
