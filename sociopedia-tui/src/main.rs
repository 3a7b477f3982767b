use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use sociopedia::api::ApiClient;
use sociopedia::app::{App, AppEvent, Screen};
use sociopedia::config::{ConfigManager, UserPreferences};
use sociopedia::follow_cache::FollowStatusCache;
use sociopedia::logging::{self, LogConfig};
use sociopedia::server_config::ServerConfigManager;
use sociopedia::session::SessionStore;
use sociopedia::storage::FileKeyValueStore;
use sociopedia::terminal::{self, Tui};
use sociopedia::ui;
use sociopedia_types::ColorScheme;

/// Sociopedia - browse, like and comment on the Sociopedia feed from your terminal
#[derive(Parser)]
#[command(name = "sociopedia")]
#[command(about = "A terminal client for the Sociopedia social feed")]
#[command(version)]
struct Cli {
    /// Server URL to connect to (remembered for later runs).
    /// `SOCIOPEDIA_SERVER_URL` applies to a single run when this is absent.
    #[arg(long, short)]
    server: Option<String>,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,

    /// Log in with this email on startup
    #[arg(long, env = "SOCIOPEDIA_EMAIL")]
    email: Option<String>,

    /// Password for --email
    #[arg(long, env = "SOCIOPEDIA_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Forget the saved session and exit
    #[arg(long)]
    logout: bool,

    /// Color scheme: default, dark, light or solarized
    #[arg(long)]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // SOCIOPEDIA_* settings may live in a .env file; clap reads the env
    // fallbacks while parsing, so this has to come first
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    logging::init_logging(&log_config)?;

    let config_manager = ConfigManager::new()?;
    let session_store = SessionStore::new(config_manager.session_file());

    if cli.logout {
        session_store.delete()?;
        println!("Logged out.");
        return Ok(());
    }

    let color_scheme = resolve_color_scheme(&config_manager, cli.theme.as_deref())?;

    let server_config = ServerConfigManager::new(config_manager.clone());
    let (server_url, source) = server_config.resolve(cli.server)?;
    log::info!(
        "Using {} at {} (from {:?})",
        ServerConfigManager::describe(&server_url),
        server_url,
        source
    );

    let follow_store = FileKeyValueStore::new(config_manager.local_storage_file());
    log::debug!("Follow status cache at {}", follow_store.path().display());
    let follow_cache = FollowStatusCache::new(Arc::new(follow_store));

    let mut app = App::new(ApiClient::new(server_url), follow_cache);
    app.log_config = log_config;
    app.color_scheme = color_scheme;
    app.config_manager = Some(config_manager);

    match (cli.email, cli.password) {
        (Some(email), Some(password)) => {
            app.open_login();
            app.login_state.email = email;
            app.login_state.password = password;
            app.login_state.pending_submit = true;
        }
        _ => match session_store.load() {
            Ok(Some(session)) => {
                app.restore_session(session);
                app.feed_state.pending_load = true;
            }
            Ok(None) => app.open_login(),
            Err(e) => {
                log::warn!("Could not read session: {}", e);
                app.open_login();
            }
        },
    }
    app.session_store = Some(session_store);

    let mut tui = terminal::init()?;
    let result = run(&mut tui, &mut app).await;
    terminal::restore()?;

    result
}

/// `--theme` wins and is remembered; otherwise the saved preference
fn resolve_color_scheme(config_manager: &ConfigManager, theme: Option<&str>) -> Result<ColorScheme> {
    if let Some(name) = theme {
        let color_scheme = ColorScheme::parse(name)
            .with_context(|| format!("Unknown theme '{}'", name))?;
        config_manager.save_preferences(&UserPreferences { color_scheme })?;
        return Ok(color_scheme);
    }

    match config_manager.load_preferences() {
        Ok(prefs) => Ok(prefs.unwrap_or_default().color_scheme),
        Err(e) => {
            log::warn!("Ignoring unreadable preferences: {}", e);
            Ok(ColorScheme::Default)
        }
    }
}

async fn run(tui: &mut Tui, app: &mut App) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    while app.running {
        // Card actions and profile fetches run in the background
        app.spawn_pending(&tx);
        while let Ok(event) = rx.try_recv() {
            app.handle_app_event(event);
        }
        app.sync_feed();
        app.clear_expired_toasts();

        // Show loading states before blocking on the request
        if app.login_state.pending_submit {
            app.login_state.loading = true;
        }
        if app.feed_state.pending_load && app.current_screen == Screen::Feed {
            app.feed_state.loading = true;
        }

        tui.draw(|frame| ui::render(app, frame))?;

        if app.login_state.pending_submit {
            app.login_state.pending_submit = false;
            app.login().await?;
        }

        if app.feed_state.pending_load && app.current_screen == Screen::Feed {
            app.feed_state.pending_load = false;
            app.load_posts().await?;
        }

        app.poll_event(Duration::from_millis(100))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_flag_is_not_filled_from_environment() {
        std::env::set_var(sociopedia::server_config::SERVER_URL_ENV, "http://env-only:9000");
        let cli = Cli::try_parse_from(["sociopedia"]).unwrap();
        std::env::remove_var(sociopedia::server_config::SERVER_URL_ENV);

        assert_eq!(cli.server, None);
    }

    #[test]
    fn test_server_flag_from_command_line() {
        let cli = Cli::try_parse_from(["sociopedia", "-s", "http://localhost:8000"]).unwrap();
        assert_eq!(cli.server.as_deref(), Some("http://localhost:8000"));
    }

    #[test]
    fn test_credentials_fall_back_to_environment() {
        std::env::set_var("SOCIOPEDIA_EMAIL", "alice@example.com");
        let cli = Cli::try_parse_from(["sociopedia"]).unwrap();
        std::env::remove_var("SOCIOPEDIA_EMAIL");

        assert_eq!(cli.email.as_deref(), Some("alice@example.com"));
    }
}
