use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::super::theme::get_theme_colors;
use super::utils::centered_rect;
use crate::app::App;

type ShortcutGroup = (&'static str, Vec<(&'static str, &'static str)>);

/// Shortcut groups shown in the help modal
pub fn get_shortcuts() -> Vec<ShortcutGroup> {
    vec![
        (
            "Feed",
            vec![
                ("j / Down", "Next post"),
                ("k / Up", "Previous post"),
                ("r", "Refresh feed"),
                ("t", "Cycle color scheme"),
                ("L", "Log in"),
            ],
        ),
        (
            "Post",
            vec![
                ("l", "Like / unlike"),
                ("c", "Write a comment"),
                ("v / Enter", "View all comments"),
                ("b", "Bookmark"),
                ("f", "Follow / unfollow author"),
                ("o", "More options"),
                ("d", "Delete (your posts only)"),
            ],
        ),
        (
            "General",
            vec![("?", "Toggle this help"), ("Esc", "Close dialog"), ("q", "Quit")],
        ),
    ]
}

pub fn render_help_modal(frame: &mut Frame, app: &App, area: Rect) {
    let theme = get_theme_colors(app.color_scheme);

    let modal_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, modal_area);

    let mut lines = vec![Line::from("")];
    for (category, items) in get_shortcuts() {
        lines.push(Line::from(Span::styled(
            category,
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )));
        for (key, description) in items {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<12}", key), Style::default().fg(theme.success)),
                Span::styled(description, Style::default().fg(theme.text)),
            ]));
        }
        lines.push(Line::from(""));
    }

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
            .title(" Keyboard Shortcuts ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(theme.background)),
    );
    frame.render_widget(help, modal_area);
}
