use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent};
use ratatui::widgets::ListState;
use sociopedia_types::{ColorScheme, Post, User};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

use crate::actions::{ActionOutcome, ActionRequest, PostActions};
use crate::api::{ApiClient, SocialApi};
use crate::config::UserPreferences;
use crate::follow_cache::FollowStatusCache;
use crate::notify::{Notifier, TOAST_TTL};
use crate::post_card::PostCard;
use crate::session::Session;
use crate::store::{AuthStore, PostStore};

pub mod state;
pub use state::*;
pub mod handlers;

impl App {
    /// App talking to `api_client` for every request
    pub fn new(api_client: ApiClient, follow_cache: FollowStatusCache) -> Self {
        let actions = PostActions::new(
            Arc::new(api_client.clone()),
            PostStore::default(),
            AuthStore::default(),
            follow_cache,
            Notifier::new(),
        );
        Self::with_actions(api_client, actions)
    }

    /// App whose card actions go through `actions` instead of `api_client`
    pub fn with_actions(api_client: ApiClient, actions: PostActions) -> Self {
        let posts_subscription = actions.posts().subscribe();

        Self {
            running: true,
            current_screen: Screen::Feed,
            api_client,
            actions,
            posts_subscription,
            cards: Vec::new(),
            feed_state: FeedState {
                list_state: ListState::default(),
                loading: false,
                error: None,
                pending_load: false,
            },
            login_state: LoginState::new(),
            composer: ComposerState::new(),
            comment_dialog: CommentDialogState {
                open: false,
                selected_post: None,
                scroll: 0,
            },
            options_dialog: None,
            delete_confirmation: None,
            show_help: false,
            color_scheme: ColorScheme::Default,
            profiles: HashMap::new(),
            requested_profiles: HashSet::new(),
            pending_requests: Vec::new(),
            pending_profiles: Vec::new(),
            config_manager: None,
            session_store: None,
            log_config: crate::logging::LogConfig::default(),
        }
    }

    pub fn viewer(&self) -> Option<User> {
        self.actions.auth().read()
    }

    pub fn notifier(&self) -> &Notifier {
        self.actions.notifier()
    }

    /// Swap the client used for card actions, keeping every store
    fn rebuild_actions(&mut self) {
        let api: Arc<dyn SocialApi> = Arc::new(self.api_client.clone());
        self.actions = PostActions::new(
            api,
            self.actions.posts().clone(),
            self.actions.auth().clone(),
            self.actions.follow_cache().clone(),
            self.actions.notifier().clone(),
        );
    }

    // Feed

    pub fn selected_index(&self) -> Option<usize> {
        self.feed_state
            .list_state
            .selected()
            .filter(|&i| i < self.cards.len())
    }

    pub fn selected_card(&self) -> Option<&PostCard> {
        self.selected_index().and_then(|i| self.cards.get(i))
    }

    fn selected_post_id(&self) -> Option<String> {
        self.selected_card().map(|card| card.post_id().to_string())
    }

    pub fn card(&self, post_id: &str) -> Option<&PostCard> {
        self.cards.iter().find(|card| card.post_id() == post_id)
    }

    fn card_mut(&mut self, post_id: &str) -> Option<&mut PostCard> {
        self.cards.iter_mut().find(|card| card.post_id() == post_id)
    }

    pub fn next_post(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        let next = match self.selected_index() {
            Some(i) if i + 1 < self.cards.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.feed_state.list_state.select(Some(next));
    }

    pub fn previous_post(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        let previous = self.selected_index().map(|i| i.saturating_sub(1)).unwrap_or(0);
        self.feed_state.list_state.select(Some(previous));
    }

    /// Pick up a new version of the shared post collection, if one was published
    pub fn sync_feed(&mut self) {
        if let Some(posts) = self.posts_subscription.take_changed() {
            self.apply_posts(posts);
        }
    }

    /// Mount cards for new posts, refresh the read-only copy of existing ones,
    /// and unmount cards whose post left the collection
    fn apply_posts(&mut self, posts: Vec<Post>) {
        let selected_id = self.selected_post_id();
        let mut previous: HashMap<String, PostCard> = self
            .cards
            .drain(..)
            .map(|card| (card.post_id().to_string(), card))
            .collect();

        let mut cards = Vec::with_capacity(posts.len());
        let mut mounted = 0;
        for post in posts {
            let card = match previous.remove(&post.id) {
                Some(mut card) => {
                    card.post = post;
                    card
                }
                None => {
                    mounted += 1;
                    self.queue_profile(&post);
                    self.actions.mount(post)
                }
            };
            cards.push(card);
        }

        log_store_update!(
            self.log_config,
            "Feed synced: {} cards ({} mounted, {} unmounted)",
            cards.len(),
            mounted,
            previous.len()
        );

        for post_id in previous.keys() {
            self.forget_post(post_id);
        }

        self.cards = cards;
        let selection = selected_id
            .and_then(|id| self.cards.iter().position(|card| card.post_id() == id))
            .or_else(|| {
                let len = self.cards.len();
                self.feed_state
                    .list_state
                    .selected()
                    .map(|i| i.min(len.saturating_sub(1)))
            })
            .or(Some(0))
            .filter(|_| !self.cards.is_empty());
        self.feed_state.list_state.select(selection);
    }

    /// Close anything still pointing at a post that was removed
    fn forget_post(&mut self, post_id: &str) {
        if self.composer.post_id.as_deref() == Some(post_id) {
            self.close_composer();
        }
        if self.comment_dialog.selected_post.as_deref() == Some(post_id) {
            self.close_comment_dialog();
        }
        if self.options_dialog.as_ref().map(|d| d.post_id.as_str()) == Some(post_id) {
            self.options_dialog = None;
        }
        if self.delete_confirmation.as_deref() == Some(post_id) {
            self.delete_confirmation = None;
        }
    }

    fn queue_profile(&mut self, post: &Post) {
        if let Some(author_id) = post.author_id() {
            if self.requested_profiles.insert(author_id.to_string()) {
                self.pending_profiles.push(author_id.to_string());
            }
        }
    }

    pub fn author_profile(&self, card: &PostCard) -> Option<&User> {
        card.post.author_id().and_then(|id| self.profiles.get(id))
    }

    /// Replace the feed with the server's post list, remounting every card
    pub async fn load_posts(&mut self) -> Result<()> {
        self.feed_state.loading = true;
        self.feed_state.error = None;
        log_api_call!(self.log_config, "GET /post/all");

        match self.api_client.get_all_posts().await {
            Ok(posts) => {
                log::info!("Loaded {} posts", posts.len());
                self.cards.clear();
                self.actions.posts().replace(posts);
                self.sync_feed();
            }
            Err(e) => {
                log::error!("Failed to load posts: {}", e);
                let message = e.user_message("Failed to load posts");
                self.feed_state.error = Some(message.clone());
                self.notifier().error(message);
            }
        }

        self.feed_state.loading = false;
        Ok(())
    }

    // Session

    pub fn restore_session(&mut self, session: Session) {
        log::info!("Restoring session for {}", session.user.username);
        self.api_client.set_session_token(Some(session.token));
        self.actions.auth().replace(Some(session.user));
        self.rebuild_actions();
        self.current_screen = Screen::Feed;
    }

    /// Log in with the form's credentials and reload the feed as that user
    pub async fn login(&mut self) -> Result<()> {
        let email = self.login_state.email.trim().to_string();
        let password = self.login_state.password.clone();
        self.login_state.loading = true;
        self.login_state.error = None;
        log_api_call!(self.log_config, "POST /user/login for {}", email);

        let result = self.api_client.login(email, password).await;
        self.login_state.loading = false;

        let user = match result {
            Ok(user) => user,
            Err(e) => {
                log::warn!("Login failed: {}", e);
                self.login_state.error = Some(e.user_message("Login failed"));
                return Ok(());
            }
        };

        log::info!("Logged in as {}", user.username);
        if let (Some(store), Some(token)) = (&self.session_store, self.api_client.session_token()) {
            let session = Session {
                token: token.to_string(),
                user: user.clone(),
            };
            if let Err(e) = store.save(&session) {
                log::warn!("Failed to save session: {}", e);
            }
        }

        self.actions.auth().replace(Some(user));
        self.rebuild_actions();
        self.login_state.password.clear();
        self.current_screen = Screen::Feed;
        self.feed_state.pending_load = true;
        Ok(())
    }

    /// Browse the feed without an account
    pub fn skip_login(&mut self) {
        self.login_state.error = None;
        self.current_screen = Screen::Feed;
        if self.cards.is_empty() {
            self.feed_state.pending_load = true;
        }
    }

    pub fn open_login(&mut self) {
        self.login_state = LoginState::new();
        self.current_screen = Screen::Login;
    }

    // Card actions. Requests are queued and sent by `spawn_pending`.

    fn queue(&mut self, request: Option<ActionRequest>) {
        if let Some(request) = request {
            log_debug!(self.log_config, "Queued {} for post {}", request.kind(), request.post_id());
            self.pending_requests.push(request);
        }
    }

    pub fn like_selected(&mut self) {
        let request = self.selected_card().and_then(|card| self.actions.like_request(card));
        self.queue(request);
    }

    pub fn bookmark_selected(&mut self) {
        let request = self.selected_card().map(|card| self.actions.bookmark_request(card));
        self.queue(request);
    }

    pub fn follow_selected(&mut self) {
        let viewer = self.viewer();
        let Some(card) = self.selected_card() else {
            return;
        };
        if !card.can_follow(viewer.as_ref()) {
            self.notifier().error("You can't follow yourself");
            return;
        }
        let request = self.actions.follow_request(card);
        self.queue(request);
    }

    /// Ask for confirmation before deleting the selected post
    pub fn request_delete_selected(&mut self) {
        let viewer = self.viewer();
        let Some(card) = self.selected_card() else {
            return;
        };
        if !card.can_delete(viewer.as_ref()) {
            self.notifier().error("You can only delete your own posts");
            return;
        }
        let post_id = card.post_id().to_string();
        self.delete_confirmation = Some(post_id);
    }

    pub fn confirm_delete(&mut self) {
        let Some(post_id) = self.delete_confirmation.take() else {
            return;
        };
        let request = self.card(&post_id).map(|card| self.actions.delete_request(card));
        self.queue(request);
    }

    pub fn cancel_delete(&mut self) {
        self.delete_confirmation = None;
    }

    // Composer

    pub fn open_composer(&mut self) {
        let Some(card) = self.selected_card() else {
            return;
        };
        let post_id = card.post_id().to_string();
        let mut textarea = tui_textarea::TextArea::default();
        textarea.insert_str(&card.comment_text);
        self.composer.textarea = textarea;
        self.composer.post_id = Some(post_id);
    }

    /// Close the composer. The card keeps its text for next time.
    pub fn close_composer(&mut self) {
        self.composer.post_id = None;
        self.composer.textarea = tui_textarea::TextArea::default();
    }

    pub fn handle_composer_input(&mut self, key: KeyEvent) {
        self.composer.textarea.input(key);
        let content = self.composer.content();
        if let Some(post_id) = self.composer.post_id.clone() {
            if let Some(card) = self.card_mut(&post_id) {
                card.set_comment_text(&content);
            }
        }
    }

    /// Queue the comment and close the composer. Empty text does nothing.
    pub fn submit_composer(&mut self) {
        let Some(post_id) = self.composer.post_id.clone() else {
            return;
        };
        let request = self.card(&post_id).and_then(|card| self.actions.comment_request(card));
        if request.is_some() {
            self.queue(request);
            self.close_composer();
        }
    }

    // Dialogs

    pub fn open_comment_dialog(&mut self) {
        if let Some(post_id) = self.selected_post_id() {
            self.comment_dialog.selected_post = Some(post_id);
            self.comment_dialog.open = true;
            self.comment_dialog.scroll = 0;
        }
    }

    pub fn close_comment_dialog(&mut self) {
        self.comment_dialog.open = false;
        self.comment_dialog.scroll = 0;
    }

    pub fn comment_dialog_card(&self) -> Option<&PostCard> {
        if !self.comment_dialog.open {
            return None;
        }
        self.comment_dialog
            .selected_post
            .as_deref()
            .and_then(|id| self.card(id))
    }

    pub fn scroll_comments(&mut self, down: bool) {
        let len = self.comment_dialog_card().map(|card| card.comments.len()).unwrap_or(0);
        let scroll = &mut self.comment_dialog.scroll;
        if down {
            if *scroll + 1 < len {
                *scroll += 1;
            }
        } else {
            *scroll = scroll.saturating_sub(1);
        }
    }

    pub fn open_options_dialog(&mut self) {
        let viewer = self.viewer();
        let Some(card) = self.selected_card() else {
            return;
        };

        let mut options = Vec::new();
        if card.can_follow(viewer.as_ref()) {
            options.push(PostOption::Follow);
        }
        if card.can_delete(viewer.as_ref()) {
            options.push(PostOption::Delete);
        }
        options.push(PostOption::Bookmark);
        options.push(PostOption::Cancel);

        let post_id = card.post_id().to_string();
        self.options_dialog = Some(OptionsDialogState {
            post_id,
            options,
            selected: 0,
        });
    }

    pub fn move_option(&mut self, down: bool) {
        if let Some(dialog) = &mut self.options_dialog {
            if down {
                dialog.selected = (dialog.selected + 1).min(dialog.options.len().saturating_sub(1));
            } else {
                dialog.selected = dialog.selected.saturating_sub(1);
            }
        }
    }

    pub fn choose_option(&mut self) {
        let Some(dialog) = self.options_dialog.take() else {
            return;
        };
        let Some(option) = dialog.options.get(dialog.selected).copied() else {
            return;
        };

        // The feed may have moved since the dialog opened
        if let Some(index) = self.cards.iter().position(|c| c.post_id() == dialog.post_id) {
            self.feed_state.list_state.select(Some(index));
        } else {
            return;
        }

        match option {
            PostOption::Follow => self.follow_selected(),
            PostOption::Delete => self.request_delete_selected(),
            PostOption::Bookmark => self.bookmark_selected(),
            PostOption::Cancel => {}
        }
    }

    // Background work

    /// Apply a finished card action to the card it came from and the stores
    pub fn apply_outcome(&mut self, outcome: ActionOutcome) {
        let post_id = outcome.request.post_id().to_string();
        let card = self.cards.iter_mut().find(|card| card.post.id == post_id);
        self.actions.reconcile(card, outcome);
        self.sync_feed();
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Action(outcome) => self.apply_outcome(outcome),
            AppEvent::Profile { author_id, result } => match result {
                Ok(user) => {
                    log_debug!(self.log_config, "Cached profile for {}", author_id);
                    self.profiles.insert(author_id, user);
                }
                Err(e) => {
                    // Retried when the author shows up on a newly mounted card
                    log::warn!("Failed to fetch profile {}: {}", author_id, e);
                    self.requested_profiles.remove(&author_id);
                }
            },
        }
    }

    pub fn take_pending_requests(&mut self) -> Vec<ActionRequest> {
        std::mem::take(&mut self.pending_requests)
    }

    /// Send queued requests on the runtime. Results come back through `tx`.
    pub fn spawn_pending(&mut self, tx: &UnboundedSender<AppEvent>) {
        for request in self.take_pending_requests() {
            log_api_call!(self.log_config, "Sending {} for post {}", request.kind(), request.post_id());
            let api = self.actions.api();
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = request.send(api.as_ref()).await;
                let _ = tx.send(AppEvent::Action(outcome));
            });
        }

        for author_id in std::mem::take(&mut self.pending_profiles) {
            log_api_call!(self.log_config, "GET /user/{}/profile", author_id);
            let client = self.api_client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = client.get_user_profile(&author_id).await;
                let _ = tx.send(AppEvent::Profile { author_id, result });
            });
        }
    }

    // Preferences

    pub fn cycle_color_scheme(&mut self) {
        self.color_scheme = self.color_scheme.next();
        if let Some(config_manager) = &self.config_manager {
            let prefs = UserPreferences {
                color_scheme: self.color_scheme,
            };
            if let Err(e) = config_manager.save_preferences(&prefs) {
                log::warn!("Failed to save preferences: {}", e);
            }
        }
        self.notifier().success(format!("Theme: {}", self.color_scheme.as_str()));
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn clear_expired_toasts(&self) {
        self.notifier().clear_expired(TOAST_TTL);
    }

    // Events

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        handlers::handle_key_event(self, key)
    }

    /// Poll for a terminal event and handle it. Returns whether one arrived.
    pub fn poll_event(&mut self, timeout: Duration) -> Result<bool> {
        if !event::poll(timeout)? {
            return Ok(false);
        }
        if let Event::Key(key) = event::read()? {
            self.handle_key_event(key)?;
        }
        Ok(true)
    }
}
