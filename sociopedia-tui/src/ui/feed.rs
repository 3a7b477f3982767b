use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use sociopedia_types::User;

use super::formatting::{
    avatar_badge, avatar_source, caption_lines, format_age, wrap_indented, BORDER_PADDING,
};
use super::theme::{get_theme_colors, ThemeColors};
use crate::app::App;
use crate::notify::ToastKind;
use crate::post_card::PostCard;

pub fn render_feed_screen(frame: &mut Frame, app: &mut App, area: Rect) {
    log_rendering!(app.log_config, "render_feed_screen: {} cards", app.cards.len());

    let theme = get_theme_colors(app.color_scheme);
    let toast = app.notifier().latest();

    let mut constraints = vec![Constraint::Length(3)];
    if toast.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_header(frame, app, chunks[0], &theme);

    let mut chunk_idx = 1;
    if let Some(toast) = toast {
        let color = match toast.kind {
            ToastKind::Success => theme.success,
            ToastKind::Error => theme.error,
        };
        let title = match toast.kind {
            ToastKind::Success => "Done",
            ToastKind::Error => "Error",
        };
        let banner = Paragraph::new(toast.message)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(color))
                    .style(Style::default().bg(theme.background)),
            );
        frame.render_widget(banner, chunks[chunk_idx]);
        chunk_idx += 1;
    }

    render_posts(frame, app, chunks[chunk_idx], &theme);

    let footer = Paragraph::new(
        "j/k: Navigate | l: Like | c: Comment | v: Comments | o: Options | b: Bookmark | r: Refresh | ?: Help | q: Quit",
    )
    .style(Style::default().fg(theme.text_dim))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[chunk_idx + 1]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect, theme: &ThemeColors) {
    let who = match app.viewer() {
        Some(user) => format!("@{}", user.username),
        None => "not logged in (L to log in)".to_string(),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Sociopedia",
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", who), Style::default().fg(theme.text_dim)),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(header, area);
}

fn render_posts(frame: &mut Frame, app: &mut App, area: Rect, theme: &ThemeColors) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Feed ")
        .border_style(Style::default().fg(theme.border));

    if app.cards.is_empty() {
        let lines = if app.feed_state.loading {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Loading posts...",
                    Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
                )),
            ]
        } else if let Some(error) = &app.feed_state.error {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    error.clone(),
                    Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled("Press 'r' to retry", Style::default().fg(theme.text_dim))),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No posts yet",
                    Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
                )),
            ]
        };
        let empty = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(BORDER_PADDING) as usize;
    let viewer = app.viewer();
    let view: &App = app;
    let items: Vec<ListItem> = view
        .cards
        .iter()
        .map(|card| ListItem::new(card_lines(view, card, viewer.as_ref(), width, theme)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(theme.highlight_bg));
    frame.render_stateful_widget(list, area, &mut app.feed_state.list_state);
}

fn card_lines(
    app: &App,
    card: &PostCard,
    viewer: Option<&User>,
    width: usize,
    theme: &ThemeColors,
) -> Vec<Line<'static>> {
    let post = &card.post;
    let username = post.author_username().to_string();
    let avatar = avatar_badge(post.author.as_ref());

    let mut header = vec![
        Span::styled(format!("{} ", avatar), Style::default().fg(theme.accent)),
        Span::styled(
            username.clone(),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        ),
    ];
    if card.is_own_post(viewer) {
        header.push(Span::styled(
            "  [Author]",
            Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
        ));
    } else if card.can_follow(viewer) {
        header.push(Span::styled(
            format!("  [{}]", card.follow_label()),
            Style::default().fg(theme.accent),
        ));
    }
    if let Some(created_at) = &post.created_at {
        header.push(Span::styled(
            format!("  · {}", format_age(created_at, Utc::now())),
            Style::default().fg(theme.text_dim),
        ));
    }

    let mut lines = vec![Line::from(header)];

    if let Some(source) = avatar_source(post.author.as_ref()) {
        lines.push(Line::from(Span::styled(source, Style::default().fg(theme.text_dim))));
    }

    if let Some(bio) = app.author_profile(card).and_then(|u| u.bio.as_deref()) {
        if !bio.trim().is_empty() {
            lines.extend(wrap_indented(bio, width, Style::default().fg(theme.text_dim)));
        }
    }

    if !post.image.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  [image] {}", post.image),
            Style::default().fg(theme.text_dim),
        )));
    }

    let heart = if card.liked {
        Span::styled("  ♥", Style::default().fg(theme.like).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("  ♡", Style::default().fg(theme.text))
    };
    lines.push(Line::from(vec![
        heart,
        Span::styled("  💬  🔖   ", Style::default().fg(theme.text)),
        Span::styled(
            card.likes_label(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ]));

    lines.extend(caption_lines(&username, &post.caption, width, theme));

    if let Some(summary) = card.comments_summary() {
        lines.push(Line::from(Span::styled(
            format!("  {}", summary),
            Style::default().fg(theme.text_dim),
        )));
    }

    if !card.comment_text.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  Draft: {}", card.comment_text),
            Style::default().fg(theme.text_dim).add_modifier(Modifier::ITALIC),
        )));
    }

    lines.push(Line::from(""));
    lines
}
