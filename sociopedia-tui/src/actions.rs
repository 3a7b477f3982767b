//! Post card action handlers.
//!
//! Each handler is split in three steps so the view never blocks on the
//! network:
//!
//! 1. a `*_request` method snapshots the card into an [`ActionRequest`],
//!    enforcing the handler's client-side preconditions;
//! 2. [`ActionRequest::send`] performs the single HTTP call and yields an
//!    [`ActionOutcome`] without touching any state;
//! 3. [`PostActions::reconcile`] applies a confirmed outcome to the card and
//!    the shared stores, or reports the failure.
//!
//! Shared state is only written in step 3, after the server confirmed. Two
//! overlapping requests are reconciled in the order their responses arrive.

use std::sync::Arc;

use sociopedia_types::{ActionResponse, Comment, LikeAction, Post};

use crate::api::{ApiResult, NewComment, SocialApi};
use crate::emoji::parse_emoji_shortcodes;
use crate::follow_cache::FollowStatusCache;
use crate::notify::Notifier;
use crate::post_card::PostCard;
use crate::store::{AuthStore, PostStore};

/// Snapshot of a card interaction, taken when the user triggered it
#[derive(Debug, Clone, PartialEq)]
pub enum ActionRequest {
    Like {
        post_id: String,
        user_id: String,
        was_liked: bool,
        count_before: usize,
    },
    Comment {
        post_id: String,
        text: String,
    },
    Follow {
        post_id: String,
        author_id: String,
        was_following: bool,
    },
    Delete {
        post_id: String,
    },
    Bookmark {
        post_id: String,
    },
}

impl ActionRequest {
    pub fn post_id(&self) -> &str {
        match self {
            ActionRequest::Like { post_id, .. }
            | ActionRequest::Comment { post_id, .. }
            | ActionRequest::Follow { post_id, .. }
            | ActionRequest::Delete { post_id }
            | ActionRequest::Bookmark { post_id } => post_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ActionRequest::Like { was_liked: false, .. } => "like",
            ActionRequest::Like { was_liked: true, .. } => "dislike",
            ActionRequest::Comment { .. } => "comment",
            ActionRequest::Follow { .. } => "follow",
            ActionRequest::Delete { .. } => "delete",
            ActionRequest::Bookmark { .. } => "bookmark",
        }
    }

    /// Message shown when the server gave no reason for a failure
    fn failure_message(&self) -> &'static str {
        match self {
            ActionRequest::Like { was_liked: false, .. } => "Failed to like post",
            ActionRequest::Like { was_liked: true, .. } => "Failed to unlike post",
            ActionRequest::Comment { .. } => "Failed to add comment",
            ActionRequest::Follow { .. } => "An error occurred while following/unfollowing",
            ActionRequest::Delete { .. } => "Failed to delete post",
            ActionRequest::Bookmark { .. } => "Failed to bookmark post",
        }
    }

    /// Issue the request's single HTTP call
    pub async fn send(self, api: &dyn SocialApi) -> ActionOutcome {
        log::debug!("Sending {} request for post {}", self.kind(), self.post_id());

        let result = match &self {
            ActionRequest::Like { post_id, was_liked, .. } => api
                .like_or_dislike(post_id, LikeAction::for_liked(*was_liked))
                .await
                .map(ActionReply::Ack),
            ActionRequest::Comment { post_id, text } => {
                api.add_comment(post_id, text).await.map(ActionReply::Comment)
            }
            ActionRequest::Follow { author_id, .. } => {
                api.follow_or_unfollow(author_id).await.map(ActionReply::Ack)
            }
            ActionRequest::Delete { post_id } => api.delete_post(post_id).await.map(ActionReply::Ack),
            ActionRequest::Bookmark { post_id } => api.bookmark(post_id).await.map(ActionReply::Ack),
        };

        ActionOutcome { request: self, result }
    }
}

/// Confirmed server reply
#[derive(Debug, Clone, PartialEq)]
pub enum ActionReply {
    Ack(ActionResponse),
    Comment(NewComment),
}

impl ActionReply {
    fn message(&self) -> Option<&str> {
        let message = match self {
            ActionReply::Ack(response) => &response.message,
            ActionReply::Comment(new_comment) => &new_comment.message,
        };
        message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

#[derive(Debug)]
pub struct ActionOutcome {
    pub request: ActionRequest,
    pub result: ApiResult<ActionReply>,
}

/// Handlers shared by every card in the feed
#[derive(Clone)]
pub struct PostActions {
    api: Arc<dyn SocialApi>,
    posts: PostStore,
    auth: AuthStore,
    follow_cache: FollowStatusCache,
    notifier: Notifier,
}

impl PostActions {
    pub fn new(
        api: Arc<dyn SocialApi>,
        posts: PostStore,
        auth: AuthStore,
        follow_cache: FollowStatusCache,
        notifier: Notifier,
    ) -> Self {
        Self {
            api,
            posts,
            auth,
            follow_cache,
            notifier,
        }
    }

    pub fn api(&self) -> Arc<dyn SocialApi> {
        Arc::clone(&self.api)
    }

    pub fn posts(&self) -> &PostStore {
        &self.posts
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn follow_cache(&self) -> &FollowStatusCache {
        &self.follow_cache
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Mount a card for `post` against the current viewer and follow cache
    pub fn mount(&self, post: Post) -> PostCard {
        let viewer = self.auth.read();
        PostCard::mount(post, viewer.as_ref(), &self.follow_cache)
    }

    // Step 1: snapshot the card

    /// Requires a logged-in user, whose id goes into the liker set
    pub fn like_request(&self, card: &PostCard) -> Option<ActionRequest> {
        let Some(user_id) = self.auth.with(|user| user.as_ref().map(|u| u.id.clone())) else {
            self.notifier.error("Log in to like posts");
            return None;
        };

        Some(ActionRequest::Like {
            post_id: card.post_id().to_string(),
            user_id,
            was_liked: card.liked,
            count_before: card.like_count,
        })
    }

    /// Whitespace-only text never produces a request
    pub fn comment_request(&self, card: &PostCard) -> Option<ActionRequest> {
        if !card.can_submit_comment() {
            return None;
        }

        Some(ActionRequest::Comment {
            post_id: card.post_id().to_string(),
            text: parse_emoji_shortcodes(&card.comment_text),
        })
    }

    pub fn follow_request(&self, card: &PostCard) -> Option<ActionRequest> {
        let Some(author_id) = card.post.author_id() else {
            self.notifier.error("This post has no author to follow");
            return None;
        };

        Some(ActionRequest::Follow {
            post_id: card.post_id().to_string(),
            author_id: author_id.to_string(),
            was_following: card.is_following,
        })
    }

    pub fn delete_request(&self, card: &PostCard) -> ActionRequest {
        ActionRequest::Delete {
            post_id: card.post_id().to_string(),
        }
    }

    pub fn bookmark_request(&self, card: &PostCard) -> ActionRequest {
        ActionRequest::Bookmark {
            post_id: card.post_id().to_string(),
        }
    }

    // Step 3: apply the outcome

    /// Apply a finished request. `card` is the mounted card for the request's
    /// post, if it is still mounted.
    pub fn reconcile(&self, card: Option<&mut PostCard>, outcome: ActionOutcome) {
        let ActionOutcome { request, result } = outcome;

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("{} request for post {} failed: {}", request.kind(), request.post_id(), e);
                self.notifier.error(e.user_message(request.failure_message()));
                return;
            }
        };

        log::info!("{} request for post {} confirmed", request.kind(), request.post_id());
        let server_message = reply.message().map(str::to_string);

        match (request, reply) {
            (
                ActionRequest::Like {
                    post_id,
                    user_id,
                    was_liked,
                    count_before,
                },
                _,
            ) => {
                let updated = with_liker_toggled(&self.posts.read(), &post_id, &user_id, was_liked);
                self.posts.replace(updated);

                if let Some(card) = card {
                    card.liked = !was_liked;
                    card.like_count = if was_liked {
                        count_before.saturating_sub(1)
                    } else {
                        count_before + 1
                    };
                    self.sync_card(card);
                }

                let fallback = if was_liked { "Post unliked" } else { "Post liked" };
                self.notifier.success(server_message.unwrap_or_else(|| fallback.to_string()));
            }
            (ActionRequest::Comment { post_id, .. }, ActionReply::Comment(new_comment)) => {
                let comments = match card {
                    Some(card) => {
                        card.comments.push(new_comment.comment.clone());
                        card.comment_text.clear();
                        let comments = card.comments.clone();
                        let updated = with_comments(&self.posts.read(), &post_id, comments.clone());
                        self.posts.replace(updated);
                        self.sync_card(card);
                        comments
                    }
                    None => {
                        let mut comments = self.posts.with(|posts| {
                            posts
                                .iter()
                                .find(|p| p.id == post_id)
                                .map(|p| p.comments.clone())
                                .unwrap_or_default()
                        });
                        comments.push(new_comment.comment.clone());
                        let updated = with_comments(&self.posts.read(), &post_id, comments.clone());
                        self.posts.replace(updated);
                        comments
                    }
                };

                log::debug!("Post {} now has {} comments", post_id, comments.len());
                self.notifier.success(server_message.unwrap_or_else(|| "Comment added".to_string()));
            }
            (ActionRequest::Comment { post_id, .. }, ActionReply::Ack(_)) => {
                // The client never builds this pairing; a comment reply always carries the comment
                log::error!("Comment request for post {} confirmed without a comment", post_id);
                self.notifier.error("Failed to add comment");
            }
            (
                ActionRequest::Follow {
                    author_id,
                    was_following,
                    ..
                },
                _,
            ) => {
                let following = !was_following;
                if let Some(card) = card {
                    card.is_following = following;
                }

                if let Err(e) = self.follow_cache.set_following(&author_id, following) {
                    log::warn!("Failed to persist follow status for {}: {}", author_id, e);
                }

                self.notifier.success(if following {
                    "Followed successfully"
                } else {
                    "Unfollowed successfully"
                });
            }
            (ActionRequest::Delete { post_id }, _) => {
                let updated = without_post(&self.posts.read(), &post_id);
                self.posts.replace(updated);
                self.notifier.success(server_message.unwrap_or_else(|| "Post deleted".to_string()));
            }
            (ActionRequest::Bookmark { .. }, _) => {
                self.notifier.success(server_message.unwrap_or_else(|| "Post bookmarked".to_string()));
            }
        }
    }

    /// Point the card's local copy at the shared collection's current entry
    fn sync_card(&self, card: &mut PostCard) {
        if let Some(post) = self
            .posts
            .with(|posts| posts.iter().find(|p| p.id == card.post.id).cloned())
        {
            card.post = post;
        }
    }

    // Inline variants: steps 1-3 in one await, for callers that can wait

    async fn run(&self, card: &mut PostCard, request: Option<ActionRequest>) {
        if let Some(request) = request {
            let outcome = request.send(self.api.as_ref()).await;
            self.reconcile(Some(card), outcome);
        }
    }

    pub async fn toggle_like(&self, card: &mut PostCard) {
        let request = self.like_request(card);
        self.run(card, request).await;
    }

    pub async fn submit_comment(&self, card: &mut PostCard) {
        let request = self.comment_request(card);
        self.run(card, request).await;
    }

    pub async fn toggle_follow(&self, card: &mut PostCard) {
        let request = self.follow_request(card);
        self.run(card, request).await;
    }

    pub async fn delete_post(&self, card: &mut PostCard) {
        let request = Some(self.delete_request(card));
        self.run(card, request).await;
    }

    pub async fn bookmark(&self, card: &mut PostCard) {
        let request = Some(self.bookmark_request(card));
        self.run(card, request).await;
    }
}

/// New collection where `post_id`'s liker set gains (like) or loses (unlike) `user_id`
pub fn with_liker_toggled(posts: &[Post], post_id: &str, user_id: &str, was_liked: bool) -> Vec<Post> {
    posts
        .iter()
        .map(|p| {
            if p.id != post_id {
                return p.clone();
            }
            let likes = if was_liked {
                p.likes.iter().filter(|id| *id != user_id).cloned().collect()
            } else {
                let mut likes = p.likes.clone();
                likes.push(user_id.to_string());
                likes
            };
            Post { likes, ..p.clone() }
        })
        .collect()
}

/// New collection where `post_id`'s comment sequence is replaced by `comments`
pub fn with_comments(posts: &[Post], post_id: &str, comments: Vec<Comment>) -> Vec<Post> {
    posts
        .iter()
        .map(|p| {
            if p.id == post_id {
                Post {
                    comments: comments.clone(),
                    ..p.clone()
                }
            } else {
                p.clone()
            }
        })
        .collect()
}

/// New collection without any entry for `post_id`
pub fn without_post(posts: &[Post], post_id: &str) -> Vec<Post> {
    posts.iter().filter(|p| p.id != post_id).cloned().collect()
}
