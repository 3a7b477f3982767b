use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::super::theme::get_theme_colors;
use super::utils::centered_rect;
use crate::app::App;

/// Comment thread for the dialog's selected post
pub fn render_comment_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let Some(card) = app.comment_dialog_card() else {
        return;
    };
    let theme = get_theme_colors(app.color_scheme);

    let modal_area = centered_rect(70, 75, area);
    frame.render_widget(Clear, modal_area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                card.post.author_username().to_string(),
                Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", card.post.caption), Style::default().fg(theme.text)),
        ]),
        Line::from(""),
    ];

    if card.comments.is_empty() {
        lines.push(Line::from(Span::styled(
            "No comments yet. Press 'c' to add one.",
            Style::default().fg(theme.text_dim),
        )));
    }

    for comment in card.comments.iter().skip(app.comment_dialog.scroll) {
        let author = comment
            .author
            .as_ref()
            .map(|a| a.username.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("unknown");
        lines.push(Line::from(vec![
            Span::styled(
                author.to_string(),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", comment.text), Style::default().fg(theme.text)),
        ]));
    }

    let title = format!(" Comments ({}) ", card.comments.len());
    let dialog = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_alignment(Alignment::Center)
                .title_bottom(Line::from(" j/k: Scroll | c: Comment | Esc: Close ").centered())
                .border_style(Style::default().fg(theme.accent))
                .style(Style::default().bg(theme.background)),
        );
    frame.render_widget(dialog, modal_area);
}
