use chrono::{DateTime, Utc};
use sociopedia_types::Author;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use super::theme::ThemeColors;

/// Total horizontal padding from borders (2 per side)
pub const BORDER_PADDING: u16 = 4;

/// Short age of a post: "just now", "5m", "3h", "2d", then the date
pub fn format_age(timestamp: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(*timestamp);
    if age.num_minutes() < 1 {
        "just now".to_string()
    } else if age.num_hours() < 1 {
        format!("{}m", age.num_minutes())
    } else if age.num_days() < 1 {
        format!("{}h", age.num_hours())
    } else if age.num_days() < 7 {
        format!("{}d", age.num_days())
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}

/// Header badge: the username initial
pub fn avatar_badge(author: Option<&Author>) -> String {
    author
        .and_then(Author::initial)
        .map(|c| format!("({})", c.to_uppercase()))
        .unwrap_or_else(|| "(?)".to_string())
}

/// Line pointing at the author's uploaded picture, if there is one
pub fn avatar_source(author: Option<&Author>) -> Option<String> {
    author
        .and_then(Author::avatar_url)
        .map(|url| format!("  [avatar] {}", url))
}

/// Wrap `text` to `width`, indenting each line by two spaces
pub fn wrap_indented(text: &str, width: usize, style: Style) -> Vec<Line<'static>> {
    let wrap_width = width.saturating_sub(2).max(1);
    text.lines()
        .flat_map(|line| textwrap::wrap(line, wrap_width).into_iter().map(|l| l.into_owned()))
        .map(|line| Line::from(vec![Span::raw("  "), Span::styled(line, style)]))
        .collect()
}

/// "username caption" with the username in bold, wrapped
pub fn caption_lines(
    username: &str,
    caption: &str,
    width: usize,
    theme: &ThemeColors,
) -> Vec<Line<'static>> {
    if caption.trim().is_empty() {
        return Vec::new();
    }

    let wrap_width = width.saturating_sub(2).max(1);
    let combined = format!("{} {}", username, caption);
    let mut lines = Vec::new();

    for (i, wrapped) in textwrap::wrap(&combined, wrap_width).into_iter().enumerate() {
        let wrapped = wrapped.into_owned();
        if i == 0 && wrapped.starts_with(username) {
            let rest = wrapped[username.len()..].to_string();
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    username.to_string(),
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                ),
                Span::styled(rest, Style::default().fg(theme.text)),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(wrapped, Style::default().fg(theme.text)),
            ]));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn author(username: &str, picture: Option<&str>) -> Author {
        Author {
            id: "u2".to_string(),
            username: username.to_string(),
            profile_picture: picture.map(str::to_string),
        }
    }

    #[test]
    fn test_avatar_badge_and_source() {
        let with_picture = author("bob", Some("https://cdn.example.com/bob.png"));
        assert_eq!(avatar_badge(Some(&with_picture)), "(B)");
        assert_eq!(
            avatar_source(Some(&with_picture)).as_deref(),
            Some("  [avatar] https://cdn.example.com/bob.png")
        );

        // The backend stores "" when no picture was uploaded
        assert_eq!(avatar_source(Some(&author("bob", Some("")))), None);
        assert_eq!(avatar_badge(Some(&author("", None))), "(?)");
        assert_eq!(avatar_badge(None), "(?)");
        assert_eq!(avatar_source(None), None);
    }

    #[test]
    fn test_format_age() {
        let now = Utc::now();
        assert_eq!(format_age(&now, now), "just now");
        assert_eq!(format_age(&(now - Duration::minutes(5)), now), "5m");
        assert_eq!(format_age(&(now - Duration::hours(3)), now), "3h");
        assert_eq!(format_age(&(now - Duration::days(2)), now), "2d");

        let old = now - Duration::days(30);
        assert_eq!(format_age(&old, now), old.format("%Y-%m-%d").to_string());
    }

    #[test]
    fn test_wrap_indented() {
        let lines = wrap_indented("one two three four", 10, Style::default());
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|line| line.spans[0].content == "  "));
    }
}
