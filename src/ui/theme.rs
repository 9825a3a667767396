use ratatui::style::{Color, Modifier, Style};

use crate::session::NoticeLevel;

pub(crate) const HEADER_BG: Color = Color::Rgb(30, 30, 46);
pub(crate) const HEADER_FG: Color = Color::Rgb(205, 214, 244);
pub(crate) const ACCENT: Color = Color::Rgb(137, 180, 250);
pub(crate) const GREEN: Color = Color::Rgb(166, 227, 161);
pub(crate) const RED: Color = Color::Rgb(243, 139, 168);
pub(crate) const YELLOW: Color = Color::Rgb(249, 226, 175);
pub(crate) const SURFACE: Color = Color::Rgb(49, 50, 68);
pub(crate) const TEXT: Color = Color::Rgb(205, 214, 244);
pub(crate) const TEXT_DIM: Color = Color::Rgb(127, 132, 156);
pub(crate) const OVERLAY: Color = Color::Rgb(69, 71, 90);
pub(crate) const COMMAND_BG: Color = Color::Rgb(24, 24, 37);

pub(crate) fn header_style() -> Style {
    Style::default()
        .fg(HEADER_FG)
        .bg(HEADER_BG)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn selected_style() -> Style {
    Style::default().fg(HEADER_BG).bg(ACCENT)
}

pub(crate) fn normal_style() -> Style {
    Style::default().fg(TEXT)
}

pub(crate) fn dim_style() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub(crate) fn amount_style() -> Style {
    Style::default().fg(YELLOW)
}

pub(crate) fn alt_row_style() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub(crate) fn command_bar_style() -> Style {
    Style::default().fg(TEXT).bg(COMMAND_BG)
}

pub(crate) fn status_bar_style() -> Style {
    Style::default().fg(TEXT_DIM).bg(SURFACE)
}

pub(crate) fn title_style() -> Style {
    Style::default().fg(TEXT_DIM).add_modifier(Modifier::BOLD)
}

/// Limit banner: red once spend passes the limit, green below it.
pub(crate) fn limit_banner_style(exceeded: bool) -> Style {
    let color = if exceeded { RED } else { GREEN };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub(crate) fn error_banner_style() -> Style {
    Style::default()
        .fg(HEADER_BG)
        .bg(RED)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn notice_style(level: NoticeLevel) -> Style {
    match level {
        NoticeLevel::Info => command_bar_style(),
        NoticeLevel::Success => Style::default().fg(GREEN).bg(COMMAND_BG),
        NoticeLevel::Warning => Style::default().fg(YELLOW).bg(COMMAND_BG),
        NoticeLevel::Error => Style::default()
            .fg(RED)
            .bg(COMMAND_BG)
            .add_modifier(Modifier::BOLD),
    }
}
