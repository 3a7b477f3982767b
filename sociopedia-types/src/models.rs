use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author reference embedded in posts and comments.
///
/// Comments are populated with `username`/`profilePicture` only, so the id
/// defaults to empty when the backend leaves it out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(rename = "profilePicture", default)]
    pub profile_picture: Option<String>,
}

impl Author {
    /// First character of the username, used when there is no avatar to show
    pub fn initial(&self) -> Option<char> {
        self.username.chars().next()
    }

    /// Avatar URL, treating the backend's empty-string default as absent
    pub fn avatar_url(&self) -> Option<&str> {
        self.profile_picture.as_deref().filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub author: Option<Author>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    /// Populated author; null when the author account no longer exists
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub caption: String,
    /// Liker ids. The backend keeps these unique, the client does not.
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn author_id(&self) -> Option<&str> {
        self.author
            .as_ref()
            .map(|a| a.id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn author_username(&self) -> &str {
        self.author.as_ref().map(|a| a.username.as_str()).unwrap_or("unknown")
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|id| id == user_id)
    }

    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.author_id() == Some(user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "profilePicture", default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub followers: Vec<String>,
    #[serde(default)]
    pub following: Vec<String>,
}

// Request/Response types for API

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Envelope shared by every endpoint: `{ success, message }`.
///
/// Error bodies use the same shape, so this doubles as the error payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub comment: Option<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub posts: Option<Vec<Post>>,
}

/// Returned by login and by the profile endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_decodes_backend_payload() {
        let json = r#"{
            "_id": "p1",
            "caption": "sunset",
            "image": "https://cdn.example.com/p1.jpg",
            "author": { "_id": "u2", "username": "bob", "profilePicture": "" },
            "likes": ["u3"],
            "comments": [
                { "_id": "c1", "text": "nice", "author": { "username": "carol", "profilePicture": "" } }
            ],
            "createdAt": "2024-05-01T10:00:00.000Z",
            "__v": 0
        }"#;

        let post: Post = serde_json::from_str(json).unwrap();

        assert_eq!(post.id, "p1");
        assert_eq!(post.author_id(), Some("u2"));
        assert_eq!(post.author_username(), "bob");
        assert!(post.is_liked_by("u3"));
        assert!(!post.is_liked_by("u1"));
        assert_eq!(post.comments[0].author.as_ref().unwrap().id, "");
        assert!(post.created_at.is_some());
        assert_eq!(post.author.as_ref().unwrap().avatar_url(), None);
    }

    #[test]
    fn test_post_with_missing_author() {
        let post: Post = serde_json::from_str(r#"{ "_id": "p9", "author": null }"#).unwrap();

        assert_eq!(post.author_id(), None);
        assert_eq!(post.author_username(), "unknown");
        assert!(!post.is_authored_by(""));
        assert!(post.likes.is_empty());
    }

    #[test]
    fn test_error_body_without_message() {
        let body: ActionResponse = serde_json::from_str(r#"{ "success": false }"#).unwrap();
        assert!(!body.success);
        assert_eq!(body.message, None);

        let empty: ActionResponse = serde_json::from_str("{}").unwrap();
        assert!(!empty.success);
    }

    #[test]
    fn test_author_initial() {
        let author = Author {
            id: "u1".to_string(),
            username: "alice".to_string(),
            profile_picture: Some("https://cdn.example.com/a.png".to_string()),
        };
        assert_eq!(author.initial(), Some('a'));
        assert_eq!(author.avatar_url(), Some("https://cdn.example.com/a.png"));
        assert_eq!(Author::default().initial(), None);
    }
}
