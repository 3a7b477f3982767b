use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use proptest::prelude::*;
use tempfile::TempDir;

use sociopedia::actions::{with_liker_toggled, without_post, ActionRequest, PostActions};
use sociopedia::api::{ApiError, ApiResult, NewComment, SocialApi};
use sociopedia::follow_cache::FollowStatusCache;
use sociopedia::notify::{Notifier, ToastKind};
use sociopedia::post_card::PostCard;
use sociopedia::storage::{FileKeyValueStore, MemoryKeyValueStore};
use sociopedia::store::{AuthStore, PostStore};
use sociopedia_types::{ActionResponse, Author, Comment, LikeAction, Post, User};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Like(String, LikeAction),
    Comment(String, String),
    Follow(String),
    Delete(String),
    Bookmark(String),
}

/// Records every call and answers with a configurable result
#[derive(Default)]
struct FakeApi {
    calls: Mutex<Vec<Call>>,
    fail_with: Mutex<Option<(u16, Option<String>)>>,
    message: Mutex<Option<String>>,
}

impl FakeApi {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn fail(&self, status: u16, message: Option<&str>) {
        *self.fail_with.lock().unwrap() = Some((status, message.map(str::to_string)));
    }

    fn reply_with(&self, message: &str) {
        *self.message.lock().unwrap() = Some(message.to_string());
    }

    fn answer(&self, call: Call) -> ApiResult<ActionResponse> {
        self.calls.lock().unwrap().push(call);
        if let Some((status, message)) = self.fail_with.lock().unwrap().clone() {
            return Err(match status {
                401 | 403 => ApiError::Unauthorized(message),
                404 => ApiError::NotFound(message),
                _ => ApiError::Api { status, message },
            });
        }
        Ok(ActionResponse {
            success: true,
            message: self.message.lock().unwrap().clone(),
        })
    }
}

#[async_trait]
impl SocialApi for FakeApi {
    async fn like_or_dislike(&self, post_id: &str, action: LikeAction) -> ApiResult<ActionResponse> {
        self.answer(Call::Like(post_id.to_string(), action))
    }

    async fn add_comment(&self, post_id: &str, text: &str) -> ApiResult<NewComment> {
        let response = self.answer(Call::Comment(post_id.to_string(), text.to_string()))?;
        Ok(NewComment {
            comment: Comment {
                id: format!("c-{}", text.len()),
                text: text.to_string(),
                author: Some(Author {
                    id: String::new(),
                    username: "alice".to_string(),
                    profile_picture: None,
                }),
            },
            message: response.message,
        })
    }

    async fn follow_or_unfollow(&self, author_id: &str) -> ApiResult<ActionResponse> {
        self.answer(Call::Follow(author_id.to_string()))
    }

    async fn delete_post(&self, post_id: &str) -> ApiResult<ActionResponse> {
        self.answer(Call::Delete(post_id.to_string()))
    }

    async fn bookmark(&self, post_id: &str) -> ApiResult<ActionResponse> {
        self.answer(Call::Bookmark(post_id.to_string()))
    }
}

fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        username: format!("{}-name", id),
        email: None,
        profile_picture: None,
        bio: None,
        followers: vec![],
        following: vec![],
    }
}

fn post(id: &str, author_id: &str, likes: &[&str]) -> Post {
    Post {
        id: id.to_string(),
        author: Some(Author {
            id: author_id.to_string(),
            username: format!("{}-name", author_id),
            profile_picture: None,
        }),
        image: format!("https://img.example/{}.jpg", id),
        caption: format!("caption {}", id),
        likes: likes.iter().map(|s| s.to_string()).collect(),
        comments: vec![],
        created_at: None,
    }
}

struct Fixture {
    api: Arc<FakeApi>,
    actions: PostActions,
    posts: PostStore,
    notifier: Notifier,
}

fn fixture_with_cache(viewer: Option<User>, posts: Vec<Post>, follow_cache: FollowStatusCache) -> Fixture {
    let api = Arc::new(FakeApi::default());
    let post_store = PostStore::new(posts);
    let auth = AuthStore::new(viewer);
    let notifier = Notifier::new();
    let actions = PostActions::new(
        api.clone(),
        post_store.clone(),
        auth,
        follow_cache,
        notifier.clone(),
    );
    Fixture {
        api,
        actions,
        posts: post_store,
        notifier,
    }
}

fn fixture(viewer: Option<User>, posts: Vec<Post>) -> Fixture {
    let cache = FollowStatusCache::new(Arc::new(MemoryKeyValueStore::new()));
    fixture_with_cache(viewer, posts, cache)
}

fn latest(notifier: &Notifier) -> (ToastKind, String) {
    let toast = notifier.latest().expect("a toast");
    (toast.kind, toast.message)
}

#[tokio::test]
async fn test_like_then_unlike_round_trips_count_and_liker_set() {
    let f = fixture(Some(user("u1")), vec![post("p1", "u2", &["u3"])]);
    let mut card = f.actions.mount(f.posts.read()[0].clone());
    assert!(!card.liked);
    assert_eq!(card.like_count, 1);

    f.actions.toggle_like(&mut card).await;
    assert!(card.liked);
    assert_eq!(card.like_count, 2);
    assert_eq!(f.posts.read()[0].likes, vec!["u3", "u1"]);
    assert_eq!(card.post.likes, vec!["u3", "u1"]);

    f.actions.toggle_like(&mut card).await;
    assert!(!card.liked);
    assert_eq!(card.like_count, 1);
    assert_eq!(f.posts.read()[0].likes, vec!["u3"]);

    assert_eq!(
        f.api.calls(),
        vec![
            Call::Like("p1".to_string(), LikeAction::Like),
            Call::Like("p1".to_string(), LikeAction::Dislike),
        ]
    );
    assert_eq!(latest(&f.notifier).0, ToastKind::Success);
}

#[tokio::test]
async fn test_like_uses_server_message_when_present() {
    let f = fixture(Some(user("u1")), vec![post("p1", "u2", &[])]);
    f.api.reply_with("Post liked");
    let mut card = f.actions.mount(f.posts.read()[0].clone());

    f.actions.toggle_like(&mut card).await;

    assert_eq!(latest(&f.notifier), (ToastKind::Success, "Post liked".to_string()));
}

#[tokio::test]
async fn test_like_without_viewer_sends_nothing() {
    let f = fixture(None, vec![post("p1", "u2", &[])]);
    let mut card = f.actions.mount(f.posts.read()[0].clone());

    f.actions.toggle_like(&mut card).await;

    assert!(f.api.calls().is_empty());
    assert_eq!(card.like_count, 0);
    assert_eq!(latest(&f.notifier).0, ToastKind::Error);
}

#[tokio::test]
async fn test_failed_like_leaves_everything_untouched() {
    let f = fixture(Some(user("u1")), vec![post("p1", "u2", &[])]);
    f.api.fail(500, None);
    let mut card = f.actions.mount(f.posts.read()[0].clone());
    let before = card.clone();

    f.actions.toggle_like(&mut card).await;

    assert_eq!(card, before);
    assert!(f.posts.read()[0].likes.is_empty());
    assert_eq!(
        latest(&f.notifier),
        (ToastKind::Error, "Failed to like post".to_string())
    );
}

#[tokio::test]
async fn test_comment_appends_and_clears_text() {
    let f = fixture(Some(user("u1")), vec![post("p1", "u2", &[]), post("p2", "u2", &[])]);
    let mut card = f.actions.mount(f.posts.read()[0].clone());
    card.set_comment_text("great shot :fire:");

    f.actions.submit_comment(&mut card).await;

    assert_eq!(
        f.api.calls(),
        vec![Call::Comment("p1".to_string(), "great shot 🔥".to_string())]
    );
    assert_eq!(card.comments.len(), 1);
    assert_eq!(card.comments[0].text, "great shot 🔥");
    assert!(card.comment_text.is_empty());

    let posts = f.posts.read();
    assert_eq!(posts[0].comments, card.comments);
    assert!(posts[1].comments.is_empty());
}

#[tokio::test]
async fn test_whitespace_comment_makes_no_request() {
    let f = fixture(Some(user("u1")), vec![post("p1", "u2", &[])]);
    let mut card = f.actions.mount(f.posts.read()[0].clone());
    card.set_comment_text("   \t ");

    f.actions.submit_comment(&mut card).await;

    assert!(f.api.calls().is_empty());
    assert!(f.notifier.latest().is_none());
}

#[tokio::test]
async fn test_failed_comment_keeps_draft() {
    let f = fixture(Some(user("u1")), vec![post("p1", "u2", &[])]);
    f.api.fail(401, Some("User not authenticated"));
    let mut card = f.actions.mount(f.posts.read()[0].clone());
    card.set_comment_text("hello");

    f.actions.submit_comment(&mut card).await;

    assert_eq!(card.comment_text, "hello");
    assert!(card.comments.is_empty());
    assert_eq!(
        latest(&f.notifier),
        (ToastKind::Error, "User not authenticated".to_string())
    );
}

#[tokio::test]
async fn test_follow_persists_across_reload() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("local_storage.json");
    let cache = FollowStatusCache::new(Arc::new(FileKeyValueStore::new(&file)));
    let f = fixture_with_cache(Some(user("u1")), vec![post("p1", "u2", &[])], cache);
    let mut card = f.actions.mount(f.posts.read()[0].clone());
    assert!(!card.is_following);

    f.actions.toggle_follow(&mut card).await;
    assert!(card.is_following);
    assert_eq!(f.api.calls(), vec![Call::Follow("u2".to_string())]);
    assert_eq!(
        latest(&f.notifier),
        (ToastKind::Success, "Followed successfully".to_string())
    );

    // A fresh cache over the same file sees the saved status
    let reopened = FollowStatusCache::new(Arc::new(FileKeyValueStore::new(&file)));
    assert!(reopened.is_following("u2"));
    let remounted = PostCard::mount(f.posts.read()[0].clone(), Some(&user("u1")), &reopened);
    assert!(remounted.is_following);

    f.actions.toggle_follow(&mut card).await;
    assert!(!card.is_following);
    assert!(!FollowStatusCache::new(Arc::new(FileKeyValueStore::new(&file))).is_following("u2"));
    assert_eq!(
        latest(&f.notifier),
        (ToastKind::Success, "Unfollowed successfully".to_string())
    );
}

#[tokio::test]
async fn test_failed_follow_keeps_cache() {
    let f = fixture(Some(user("u1")), vec![post("p1", "u2", &[])]);
    f.api.fail(500, None);
    let mut card = f.actions.mount(f.posts.read()[0].clone());

    f.actions.toggle_follow(&mut card).await;

    assert!(!card.is_following);
    assert!(!f.actions.follow_cache().is_following("u2"));
    assert_eq!(
        latest(&f.notifier),
        (
            ToastKind::Error,
            "An error occurred while following/unfollowing".to_string()
        )
    );
}

#[tokio::test]
async fn test_delete_removes_post_from_store() {
    let f = fixture(Some(user("u2")), vec![post("p1", "u2", &[]), post("p2", "u3", &[])]);
    let mut card = f.actions.mount(f.posts.read()[0].clone());

    f.actions.delete_post(&mut card).await;

    let ids: Vec<String> = f.posts.read().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec!["p2"]);
    assert_eq!(f.api.calls(), vec![Call::Delete("p1".to_string())]);
}

#[tokio::test]
async fn test_failed_delete_shows_server_reason() {
    let f = fixture(Some(user("u1")), vec![post("p1", "u2", &[])]);
    f.api.fail(403, Some("Unauthorized"));
    let mut card = f.actions.mount(f.posts.read()[0].clone());

    f.actions.delete_post(&mut card).await;

    assert_eq!(f.posts.read().len(), 1);
    assert_eq!(latest(&f.notifier), (ToastKind::Error, "Unauthorized".to_string()));
}

#[tokio::test]
async fn test_bookmark_changes_no_state() {
    let f = fixture(Some(user("u1")), vec![post("p1", "u2", &["u1"])]);
    f.api.reply_with("Post bookmarked");
    let mut card = f.actions.mount(f.posts.read()[0].clone());
    let card_before = card.clone();
    let posts_before = f.posts.read();

    f.actions.bookmark(&mut card).await;

    assert_eq!(card, card_before);
    assert_eq!(f.posts.read(), posts_before);
    assert_eq!(
        latest(&f.notifier),
        (ToastKind::Success, "Post bookmarked".to_string())
    );
}

#[tokio::test]
async fn test_outcome_for_unmounted_card_still_updates_store() {
    let f = fixture(Some(user("u1")), vec![post("p1", "u2", &[])]);
    let card = f.actions.mount(f.posts.read()[0].clone());
    let request = f.actions.like_request(&card).unwrap();
    assert!(matches!(request, ActionRequest::Like { was_liked: false, .. }));

    let outcome = request.send(f.api.as_ref()).await;
    f.actions.reconcile(None, outcome);

    assert_eq!(f.posts.read()[0].likes, vec!["u1"]);
}

#[tokio::test]
async fn test_overlapping_likes_reconcile_in_arrival_order() {
    let f = fixture(Some(user("u1")), vec![post("p1", "u2", &[])]);
    let mut card = f.actions.mount(f.posts.read()[0].clone());

    // Both requests snapshot the same unliked card
    let first = f.actions.like_request(&card).unwrap();
    let second = f.actions.like_request(&card).unwrap();
    let first = first.send(f.api.as_ref()).await;
    let second = second.send(f.api.as_ref()).await;
    f.actions.reconcile(Some(&mut card), first);
    f.actions.reconcile(Some(&mut card), second);

    assert!(card.liked);
    assert_eq!(card.like_count, 1);
    // The liker set does not deduplicate
    assert_eq!(f.posts.read()[0].likes, vec!["u1", "u1"]);
}

fn liker_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("u[0-9]", 0..6)
}

proptest! {
    #[test]
    fn prop_mount_for_absent_viewer_is_unliked(likes in liker_ids(), viewer in "v[0-9]") {
        let mut p = post("p1", "author", &[]);
        p.likes = likes.clone();
        let cache = FollowStatusCache::new(Arc::new(MemoryKeyValueStore::new()));

        let card = PostCard::mount(p, Some(&user(&viewer)), &cache);

        prop_assert!(!card.liked);
        prop_assert_eq!(card.like_count, likes.len());
    }

    #[test]
    fn prop_mount_counts_liker_set_size(likes in liker_ids(), viewer in "u[0-9]") {
        let mut p = post("p1", "author", &[]);
        p.likes = likes.clone();
        let cache = FollowStatusCache::new(Arc::new(MemoryKeyValueStore::new()));

        let card = PostCard::mount(p, Some(&user(&viewer)), &cache);

        prop_assert_eq!(card.liked, likes.contains(&viewer));
        prop_assert_eq!(card.like_count, likes.len());

        let anonymous = PostCard::mount(card.post.clone(), None, &cache);
        prop_assert!(!anonymous.liked);
    }

    #[test]
    fn prop_like_then_unlike_drops_every_viewer_entry(likes in liker_ids(), viewer in "u[0-9]") {
        let mut p = post("p1", "author", &[]);
        p.likes = likes.clone();
        let posts = vec![p, post("p2", "author", &["u1"])];

        let liked = with_liker_toggled(&posts, "p1", &viewer, false);
        prop_assert_eq!(liked[0].likes.len(), likes.len() + 1);
        prop_assert_eq!(liked[0].likes.last(), Some(&viewer));

        let unliked = with_liker_toggled(&liked, "p1", &viewer, true);
        prop_assert!(!unliked[0].is_liked_by(&viewer));
        let others: Vec<String> = likes.into_iter().filter(|id| *id != viewer).collect();
        prop_assert_eq!(&unliked[0].likes, &others);
        prop_assert_eq!(&unliked[1], &posts[1]);
    }

    #[test]
    fn prop_without_post_keeps_order_of_the_rest(count in 0usize..8, victim in 0usize..10) {
        let posts: Vec<Post> = (0..count).map(|i| post(&format!("p{}", i), "a", &[])).collect();
        let victim_id = format!("p{}", victim);

        let remaining = without_post(&posts, &victim_id);

        prop_assert!(remaining.iter().all(|p| p.id != victim_id));
        let expected: Vec<&Post> = posts.iter().filter(|p| p.id != victim_id).collect();
        prop_assert_eq!(remaining.iter().collect::<Vec<_>>(), expected);
    }
}
