use anyhow::Result;
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Switch to raw mode on the alternate screen.
///
/// A panic anywhere in the event loop restores the terminal before the
/// message is printed, otherwise it would land on the alternate screen.
pub fn init() -> Result<Tui> {
    install_panic_hook();

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;

    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    Ok(terminal)
}

/// Hand the terminal back to the shell
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    Ok(())
}

fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if let Err(e) = restore() {
            log::error!("Failed to restore terminal after panic: {}", e);
        }
        log::error!("Panic: {}", info);
        previous(info);
    }));
}
