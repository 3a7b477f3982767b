use sociopedia_types::{Comment, Post, User};

use crate::follow_cache::FollowStatusCache;

/// Local view state of one post in the feed.
///
/// `liked` and `like_count` are derived once, when the card is mounted. The
/// action handlers adjust them after each confirmed request instead of
/// re-deriving them from the liker set.
#[derive(Debug, Clone, PartialEq)]
pub struct PostCard {
    /// Read-only copy of the shared collection's entry
    pub post: Post,
    pub liked: bool,
    pub like_count: usize,
    pub comments: Vec<Comment>,
    pub is_following: bool,
    /// Comment composer text; never whitespace-only
    pub comment_text: String,
}

impl PostCard {
    pub fn mount(post: Post, viewer: Option<&User>, follow_cache: &FollowStatusCache) -> Self {
        let liked = viewer.map(|user| post.is_liked_by(&user.id)).unwrap_or(false);
        let is_following = post
            .author_id()
            .map(|author_id| follow_cache.is_following(author_id))
            .unwrap_or(false);

        Self {
            liked,
            like_count: post.likes.len(),
            comments: post.comments.clone(),
            is_following,
            comment_text: String::new(),
            post,
        }
    }

    pub fn post_id(&self) -> &str {
        &self.post.id
    }

    /// Accept composer input, collapsing whitespace-only text to empty
    pub fn set_comment_text(&mut self, input: &str) {
        if input.trim().is_empty() {
            self.comment_text.clear();
        } else {
            self.comment_text = input.to_string();
        }
    }

    /// The "Post" affordance only exists while there is text to send
    pub fn can_submit_comment(&self) -> bool {
        !self.comment_text.trim().is_empty()
    }

    pub fn is_own_post(&self, viewer: Option<&User>) -> bool {
        viewer.map(|user| self.post.is_authored_by(&user.id)).unwrap_or(false)
    }

    /// Follow is offered on other people's posts only
    pub fn can_follow(&self, viewer: Option<&User>) -> bool {
        self.post.author_id().is_some() && !self.is_own_post(viewer)
    }

    /// Delete is offered to the author only. The server does its own check.
    pub fn can_delete(&self, viewer: Option<&User>) -> bool {
        self.is_own_post(viewer)
    }

    pub fn follow_label(&self) -> &'static str {
        if self.is_following {
            "Unfollow"
        } else {
            "Follow"
        }
    }

    pub fn likes_label(&self) -> String {
        format!("{} likes", self.like_count)
    }

    /// "View all N comments", shown only when there are comments
    pub fn comments_summary(&self) -> Option<String> {
        if self.comments.is_empty() {
            None
        } else {
            Some(format!("View all {} comments", self.comments.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;
    use sociopedia_types::Author;
    use std::sync::Arc;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            username: format!("user_{}", id),
            email: None,
            profile_picture: None,
            bio: None,
            followers: vec![],
            following: vec![],
        }
    }

    fn post(author_id: &str, likes: &[&str]) -> Post {
        Post {
            id: "p1".to_string(),
            author: Some(Author {
                id: author_id.to_string(),
                username: "bob".to_string(),
                profile_picture: None,
            }),
            image: "https://cdn.example.com/p1.jpg".to_string(),
            caption: "sunset".to_string(),
            likes: likes.iter().map(|s| s.to_string()).collect(),
            comments: vec![],
            created_at: None,
        }
    }

    fn cache() -> FollowStatusCache {
        FollowStatusCache::new(Arc::new(MemoryKeyValueStore::new()))
    }

    #[test]
    fn test_mount_derives_like_state() {
        let viewer = user("u1");

        let liked = PostCard::mount(post("u2", &["u1", "u3"]), Some(&viewer), &cache());
        assert!(liked.liked);
        assert_eq!(liked.like_count, 2);

        let not_liked = PostCard::mount(post("u2", &["u3"]), Some(&viewer), &cache());
        assert!(!not_liked.liked);
        assert_eq!(not_liked.likes_label(), "1 likes");

        let anonymous = PostCard::mount(post("u2", &["u1"]), None, &cache());
        assert!(!anonymous.liked);
        assert_eq!(anonymous.like_count, 1);
    }

    #[test]
    fn test_mount_reads_follow_cache() {
        let cache = cache();
        cache.set_following("u2", true).unwrap();

        let card = PostCard::mount(post("u2", &[]), Some(&user("u1")), &cache);
        assert!(card.is_following);
        assert_eq!(card.follow_label(), "Unfollow");
    }

    #[test]
    fn test_whitespace_comment_text_is_cleared() {
        let mut card = PostCard::mount(post("u2", &[]), None, &cache());

        card.set_comment_text("   \t ");
        assert_eq!(card.comment_text, "");
        assert!(!card.can_submit_comment());

        card.set_comment_text(" great shot ");
        assert_eq!(card.comment_text, " great shot ");
        assert!(card.can_submit_comment());
    }

    #[test]
    fn test_ownership_controls() {
        let author = user("u2");
        let viewer = user("u1");
        let card = PostCard::mount(post("u2", &[]), Some(&viewer), &cache());

        assert!(card.can_follow(Some(&viewer)));
        assert!(!card.can_delete(Some(&viewer)));
        assert!(!card.can_follow(Some(&author)));
        assert!(card.can_delete(Some(&author)));
        assert!(!card.can_delete(None));
    }

    #[test]
    fn test_comments_summary() {
        let mut card = PostCard::mount(post("u2", &[]), None, &cache());
        assert_eq!(card.comments_summary(), None);

        card.comments.push(Comment {
            id: "c1".to_string(),
            text: "nice".to_string(),
            author: None,
        });
        assert_eq!(card.comments_summary(), Some("View all 1 comments".to_string()));
    }
}
