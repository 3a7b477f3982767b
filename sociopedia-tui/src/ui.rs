// UI module - split into cohesive submodules for maintainability
pub mod theme;
mod formatting;
mod feed;
mod login;
mod modals;

pub use self::render_main::render;

mod render_main {
    use ratatui::{
        layout::Alignment,
        style::{Modifier, Style},
        text::{Line, Span},
        widgets::{Block, Borders, Clear, Paragraph},
        Frame,
    };

    use super::feed::render_feed_screen;
    use super::login::render_login_screen;
    use super::modals::{
        render_comment_composer, render_comment_dialog, render_delete_confirmation,
        render_help_modal, render_options_dialog,
    };
    use super::theme::get_theme_colors;
    use crate::app::{App, Screen};

    const MIN_WIDTH: u16 = 50;
    const MIN_HEIGHT: u16 = 16;

    /// Render the UI
    pub fn render(app: &mut App, frame: &mut Frame) {
        let area = frame.area();
        let theme = get_theme_colors(app.color_scheme);

        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(Style::default().bg(theme.background)), area);

        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            let warning = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Terminal Too Small",
                    Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    format!("Minimum size: {}x{}", MIN_WIDTH, MIN_HEIGHT),
                    Style::default().fg(theme.text),
                )),
                Line::from(Span::styled(
                    format!("Current size: {}x{}", area.width, area.height),
                    Style::default().fg(theme.warning),
                )),
            ])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.error)),
            );
            frame.render_widget(warning, area);
            return;
        }

        match app.current_screen {
            Screen::Login => render_login_screen(frame, app, area),
            Screen::Feed => {
                render_feed_screen(frame, app, area);

                // Dialogs stack in the same order keys are routed
                render_comment_dialog(frame, app, area);
                render_options_dialog(frame, app, area);
                if app.composer.is_open() {
                    render_comment_composer(frame, app, area);
                }
                render_delete_confirmation(frame, app, area);
                if app.show_help {
                    render_help_modal(frame, app, area);
                }
            }
        }
    }
}
