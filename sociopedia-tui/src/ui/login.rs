use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::modals::centered_rect;
use super::theme::get_theme_colors;
use crate::app::{App, LoginField};

pub fn render_login_screen(frame: &mut Frame, app: &App, area: Rect) {
    let theme = get_theme_colors(app.color_scheme);
    let state = &app.login_state;
    let modal_area = centered_rect(60, 50, area);
    frame.render_widget(Clear, modal_area);

    let field = |label: &str, value: String, focused: bool| {
        let marker = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        Line::from(vec![
            Span::styled(format!("{}{:<10}", marker, label), style),
            Span::styled(value, Style::default().fg(theme.text)),
        ])
    };

    let mut lines = vec![
        Line::from(""),
        field("Email", state.email.clone(), state.focused == LoginField::Email),
        Line::from(""),
        field(
            "Password",
            "*".repeat(state.password.chars().count()),
            state.focused == LoginField::Password,
        ),
        Line::from(""),
    ];

    if state.loading {
        lines.push(Line::from(Span::styled(
            "Logging in...",
            Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
        )));
    } else if let Some(error) = &state.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab: Switch field | Enter: Log in | Esc: Browse without an account",
        Style::default().fg(theme.text_dim),
    )));

    let form = Paragraph::new(lines).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Log in to Sociopedia ")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.background)),
    );
    frame.render_widget(form, modal_area);
}
