use sociopedia_types::{Post, User};
use std::sync::Arc;
use tokio::sync::watch;

/// Shared, externally owned value that views read and handlers replace.
///
/// Writers publish whole new versions with [`SharedState::replace`]; readers
/// either take a snapshot with [`SharedState::read`] or hold a
/// [`Subscription`] to learn when a new version was published.
pub struct SharedState<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for SharedState<T> {
    fn clone(&self) -> Self {
        Self { tx: Arc::clone(&self.tx) }
    }
}

impl<T: Clone> SharedState<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current version
    pub fn read(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Borrow the current version without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Publish a new version, notifying every subscriber
    pub fn replace(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn subscribe(&self) -> Subscription<T> {
        Subscription { rx: self.tx.subscribe() }
    }
}

impl<T: Clone + Default> Default for SharedState<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Receiving half of a [`SharedState`]
pub struct Subscription<T> {
    rx: watch::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    /// Whether a version was published since the last one this subscriber saw
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Take the latest version if it is new to this subscriber
    pub fn take_changed(&mut self) -> Option<T> {
        if self.has_changed() {
            Some(self.rx.borrow_and_update().clone())
        } else {
            None
        }
    }
}

/// The feed's post collection
pub type PostStore = SharedState<Vec<Post>>;

/// The authenticated user, if any
pub type AuthStore = SharedState<Option<User>>;
