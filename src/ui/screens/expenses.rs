use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::session::CategoryFilter;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Limit or fetch-error banner
            Constraint::Min(3),    // Table
            Constraint::Length(1), // Totals line
        ])
        .split(area);

    render_banner(f, chunks[0], app);
    render_table(f, chunks[1], app);
    render_totals(f, chunks[2], app);
}

fn render_banner(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.session.cache().fetch_error() {
        Some(err) => Line::from(Span::styled(format!(" {err} "), theme::error_banner_style())),
        None => {
            let status = app.session.limit_status();
            Line::from(vec![
                Span::styled(format!(" {}", status.message()), theme::limit_banner_style(status.exceeded)),
                Span::styled(format!("   {}", status.label()), theme::dim_style()),
            ])
        }
    };
    f.render_widget(Paragraph::new(line), area);
}

fn table_title(app: &App) -> String {
    let filter = match &app.session.filter {
        CategoryFilter::All => String::new(),
        CategoryFilter::Only(c) => format!(" category: {c}"),
    };
    format!(
        " Expenses ({}){filter} sort: {} ",
        app.table.len(),
        app.session.sort
    )
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    if app.table.is_empty() {
        let msg = if app.session.cache().fetch_error().is_some() {
            vec![
                Line::from(""),
                Line::from(Span::styled("Could not load expenses", theme::dim_style())),
                Line::from(""),
                Line::from(Span::styled("Press r to try again", theme::dim_style())),
            ]
        } else if app.session.cache().is_empty() {
            vec![
                Line::from(""),
                Line::from(Span::styled("No expenses yet", theme::dim_style())),
                Line::from(""),
                Line::from(Span::styled(
                    "Press a to add one, or :add <date> <amount> <category> <title>",
                    theme::dim_style(),
                )),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("No expenses in category '{}'", app.session.filter),
                    theme::dim_style(),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press f to change the filter, or :filter all",
                    theme::dim_style(),
                )),
            ]
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(table_title(app), theme::title_style()));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["#", "Title", "Amount", "Category", "Date", "ID"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .table
        .rows()
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, row)| {
            let style = if i == app.expense_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            let amount = if i == app.expense_index {
                Span::raw(row.amount.clone())
            } else {
                Span::styled(row.amount.clone(), theme::amount_style())
            };

            Row::new(vec![
                Cell::from(row.index.to_string()),
                Cell::from(truncate(&row.title, 40)),
                Cell::from(amount),
                Cell::from(truncate(&row.category, 18)),
                Cell::from(row.date.clone()),
                Cell::from(Span::styled(row.id.to_string(), theme::dim_style())),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(20),
        Constraint::Length(14),
        Constraint::Length(18),
        Constraint::Length(12),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(table_title(app), theme::title_style())),
    );

    f.render_widget(table, area);
}

fn render_totals(f: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {}", app.table.total_line()),
            Style::default()
                .fg(theme::YELLOW)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   {} of {} records", app.table.len(), app.session.cache().len()),
            theme::dim_style(),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
