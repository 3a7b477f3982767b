use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::super::theme::get_theme_colors;
use super::utils::centered_rect;
use crate::app::{App, PostOption};

fn option_label(app: &App, post_id: &str, option: PostOption) -> &'static str {
    match option {
        PostOption::Follow => app
            .card(post_id)
            .map(|card| card.follow_label())
            .unwrap_or("Follow"),
        PostOption::Delete => "Delete",
        PostOption::Bookmark => "Bookmark",
        PostOption::Cancel => "Cancel",
    }
}

pub fn render_options_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let Some(dialog) = &app.options_dialog else {
        return;
    };
    let theme = get_theme_colors(app.color_scheme);

    let modal_area = centered_rect(40, 30, area);
    frame.render_widget(Clear, modal_area);

    let mut lines = vec![Line::from("")];
    for (i, option) in dialog.options.iter().enumerate() {
        let label = option_label(app, &dialog.post_id, *option);
        let color = match option {
            PostOption::Delete => theme.error,
            PostOption::Cancel => theme.text_dim,
            _ => theme.text,
        };
        let style = if i == dialog.selected {
            Style::default()
                .fg(color)
                .bg(theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        lines.push(Line::from(Span::styled(format!("  {}  ", label), style)));
    }

    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Options ")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.background)),
    );
    frame.render_widget(widget, modal_area);
}

pub fn render_delete_confirmation(frame: &mut Frame, app: &App, area: Rect) {
    if app.delete_confirmation.is_none() {
        return;
    }
    let theme = get_theme_colors(app.color_scheme);

    let modal_area = centered_rect(50, 25, area);
    frame.render_widget(Clear, modal_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Delete this post?",
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "This cannot be undone.",
            Style::default().fg(theme.text_dim),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.error).add_modifier(Modifier::BOLD)),
            Span::styled(": Delete   ", Style::default().fg(theme.text)),
            Span::styled("n/Esc", Style::default().fg(theme.success).add_modifier(Modifier::BOLD)),
            Span::styled(": Cancel", Style::default().fg(theme.text)),
        ]),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Confirm Delete ")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(theme.error))
            .style(Style::default().bg(theme.background)),
    );
    frame.render_widget(widget, modal_area);
}
