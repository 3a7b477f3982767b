use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::super::theme::get_theme_colors;
use super::utils::centered_rect;
use crate::app::App;
use crate::emoji::parse_emoji_shortcodes;

/// Comment composer for the card named by `app.composer.post_id`
pub fn render_comment_composer(frame: &mut Frame, app: &App, area: Rect) {
    let Some(card) = app.composer.post_id.as_deref().and_then(|id| app.card(id)) else {
        return;
    };
    let theme = get_theme_colors(app.color_scheme);

    let modal_area = centered_rect(70, 45, area);
    frame.render_widget(Clear, modal_area);

    let outer_block = Block::default()
        .title(" Add a comment ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(theme.background));
    let inner = outer_block.inner(modal_area);
    frame.render_widget(outer_block, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Context
            Constraint::Length(3), // Input
            Constraint::Min(0),    // Preview
            Constraint::Length(1), // Instructions
        ])
        .split(inner);

    let context = Paragraph::new(Line::from(vec![
        Span::styled("Commenting on ", Style::default().fg(theme.text_dim)),
        Span::styled(
            format!("@{}", card.post.author_username()),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", card.post.caption),
            Style::default().fg(theme.text_dim).add_modifier(Modifier::ITALIC),
        ),
    ]))
    .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(theme.border)));
    frame.render_widget(context, chunks[0]);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.primary));
    let input_area = input_block.inner(chunks[1]);
    frame.render_widget(input_block, chunks[1]);
    frame.render_widget(&app.composer.textarea, input_area);

    if card.can_submit_comment() {
        let expanded = parse_emoji_shortcodes(&card.comment_text);
        if expanded != card.comment_text {
            let preview = Paragraph::new(vec![
                Line::from(Span::styled("Preview", Style::default().fg(theme.text_dim))),
                Line::from(Span::styled(expanded, Style::default().fg(theme.text))),
            ])
            .wrap(Wrap { trim: false });
            frame.render_widget(preview, chunks[2]);
        }
    }

    let instructions = if card.can_submit_comment() {
        "Enter: Post | Esc: Close (keeps draft)"
    } else {
        "Type a comment | Esc: Close"
    };
    let instructions = Paragraph::new(instructions)
        .style(Style::default().fg(theme.text_dim))
        .alignment(Alignment::Center);
    frame.render_widget(instructions, chunks[3]);
}
