use std::collections::{HashMap, HashSet};

use ratatui::widgets::ListState;
use sociopedia_types::{ColorScheme, Post, User};
use tui_textarea::TextArea;

use crate::actions::{ActionOutcome, ActionRequest, PostActions};
use crate::api::{ApiClient, ApiResult};
use crate::config::ConfigManager;
use crate::post_card::PostCard;
use crate::session::SessionStore;
use crate::store::Subscription;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Login,
    Feed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginField {
    Email,
    Password,
}

/// Login form state
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub focused: LoginField,
    pub error: Option<String>,
    pub loading: bool,
    /// Set by Enter; the main loop performs the login after the next draw
    pub pending_submit: bool,
}

impl LoginState {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focused: LoginField::Email,
            error: None,
            loading: false,
            pending_submit: false,
        }
    }

    pub fn focused_input(&mut self) -> &mut String {
        match self.focused {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }
}

impl Default for LoginState {
    fn default() -> Self {
        Self::new()
    }
}

/// Feed list state. The cards themselves live on [`App`].
pub struct FeedState {
    pub list_state: ListState,
    pub loading: bool,
    pub error: Option<String>,
    /// Set to reload the feed after the loading state has been drawn
    pub pending_load: bool,
}

/// Single-line comment composer bound to one card
pub struct ComposerState {
    /// Post whose card receives the text; `None` while closed
    pub post_id: Option<String>,
    pub textarea: TextArea<'static>,
}

impl ComposerState {
    pub fn new() -> Self {
        Self {
            post_id: None,
            textarea: TextArea::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.post_id.is_some()
    }

    pub fn content(&self) -> String {
        self.textarea.lines().join(" ")
    }
}

impl Default for ComposerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Comment thread dialog, keyed by the selected post
pub struct CommentDialogState {
    pub open: bool,
    pub selected_post: Option<String>,
    pub scroll: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PostOption {
    Follow,
    Delete,
    Bookmark,
    Cancel,
}

/// Options dialog for one post. Entries depend on who wrote it.
pub struct OptionsDialogState {
    pub post_id: String,
    pub options: Vec<PostOption>,
    pub selected: usize,
}

/// Result of background work, delivered back to the event loop
#[derive(Debug)]
pub enum AppEvent {
    Action(ActionOutcome),
    Profile {
        author_id: String,
        result: ApiResult<User>,
    },
}

/// Main application state
pub struct App {
    pub running: bool,
    pub current_screen: Screen,
    /// Client for login, feed and profile requests
    pub api_client: ApiClient,
    pub actions: PostActions,
    pub(crate) posts_subscription: Subscription<Vec<Post>>,
    /// Mounted cards, in feed order
    pub cards: Vec<PostCard>,
    pub feed_state: FeedState,
    pub login_state: LoginState,
    pub composer: ComposerState,
    pub comment_dialog: CommentDialogState,
    pub options_dialog: Option<OptionsDialogState>,
    /// Post awaiting y/n before it is deleted
    pub delete_confirmation: Option<String>,
    pub show_help: bool,
    pub color_scheme: ColorScheme,
    /// Author profiles by author id
    pub profiles: HashMap<String, User>,
    pub(crate) requested_profiles: HashSet<String>,
    pub pending_requests: Vec<ActionRequest>,
    pub pending_profiles: Vec<String>,
    pub config_manager: Option<ConfigManager>,
    pub session_store: Option<SessionStore>,
    pub log_config: crate::logging::LogConfig,
}
