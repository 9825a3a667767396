use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::FormField;
use crate::ui::app::{App, FormKind};
use crate::ui::theme;

/// Modal entry or edit form, centered over the current screen.
pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let (Some(kind), Some(form)) = (app.form_kind, app.active_form()) else {
        return;
    };

    let title = match (kind, app.session.edit().target()) {
        (FormKind::Edit, Some(id)) => format!(" Edit expense {id} "),
        _ => " New expense ".to_string(),
    };

    let mut lines = vec![Line::from("")];
    for &field in FormField::all() {
        let focused = field == app.form_focus;
        let value = form.field(field);
        let label_style = if focused {
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            theme::dim_style()
        };
        let value_style = if focused {
            theme::selected_style()
        } else {
            theme::normal_style()
        };
        let hint = match field {
            FormField::Amount => "  ₹",
            FormField::Date => "  YYYY-MM-DD",
            _ => "",
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<10}", field.label()), label_style),
            Span::styled(format!(" {value} "), value_style),
            Span::styled(hint, theme::dim_style()),
        ]));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "  Tab/Shift-Tab field   Enter save   Esc cancel",
        theme::dim_style(),
    )));

    let popup_height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 64.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(popup, popup_area);
}
