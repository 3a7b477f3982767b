use async_trait::async_trait;
use reqwest::header::{HeaderMap, COOKIE, SET_COOKIE};
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{ApiError, ApiResult};
use sociopedia_types::*;

/// Production backend origin
pub const DEFAULT_SERVER_URL: &str = "https://sociopedia-9rlt.onrender.com";

/// Name of the cookie carrying the session credential
const SESSION_COOKIE: &str = "token";

/// Comment confirmed by the server, with the message it sent along
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub comment: Comment,
    pub message: Option<String>,
}

/// Requests issued by the post card's action handlers.
///
/// Every method resolves to `Ok` only when the server confirmed success, so
/// callers can reconcile local state without looking at the envelope again.
#[async_trait]
pub trait SocialApi: Send + Sync {
    async fn like_or_dislike(&self, post_id: &str, action: LikeAction) -> ApiResult<ActionResponse>;

    async fn add_comment(&self, post_id: &str, text: &str) -> ApiResult<NewComment>;

    /// The request does not say which direction it toggles
    async fn follow_or_unfollow(&self, author_id: &str) -> ApiResult<ActionResponse>;

    async fn delete_post(&self, post_id: &str) -> ApiResult<ActionResponse>;

    async fn bookmark(&self, post_id: &str) -> ApiResult<ActionResponse>;
}

/// API client for communicating with the Sociopedia backend
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session_token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for the given origin (without the `/api/v1` prefix)
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url = server_url.into();
        Self {
            client: Client::new(),
            base_url: format!("{}/api/v1", server_url.trim_end_matches('/')),
            session_token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the session token for authenticated requests
    pub fn set_session_token(&mut self, token: Option<String>) {
        self.session_token = token;
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Helper to attach the session cookie to a request if available
    fn add_auth_header(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.session_token {
            req.header(COOKIE, format!("{}={}", SESSION_COOKIE, token))
        } else {
            req
        }
    }

    /// Helper to handle API responses
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        // Error bodies share the `{ success, message }` envelope; HTML error
        // pages and empty bodies carry no usable message
        let message = serde_json::from_str::<ActionResponse>(&body)
            .ok()
            .and_then(|envelope| envelope.message);

        log::warn!("Request failed with status {}: {:?}", status.as_u16(), message);

        match status.as_u16() {
            404 => Err(ApiError::NotFound(message)),
            401 | 403 => Err(ApiError::Unauthorized(message)),
            400 => Err(ApiError::BadRequest(message)),
            code => Err(ApiError::Api { status: code, message }),
        }
    }

    async fn send_action(&self, req: reqwest::RequestBuilder) -> ApiResult<ActionResponse> {
        let response = self.add_auth_header(req).send().await?;
        let envelope: ActionResponse = self.handle_response(response).await?;
        ensure_success(envelope.success, &envelope.message)?;
        Ok(envelope)
    }

    // Authentication endpoints

    /// Login with email and password, keeping the session cookie the server sets
    pub async fn login(&mut self, email: String, password: String) -> ApiResult<User> {
        let url = self.url("/user/login");
        let request = LoginRequest { email, password };
        let response = self.client.post(&url).json(&request).send().await?;
        let token = extract_session_cookie(response.headers());

        let login: UserResponse = self.handle_response(response).await?;
        ensure_success(login.success, &login.message)?;
        let user = login.user.ok_or(ApiError::MalformedResponse("user"))?;
        let token = token.ok_or(ApiError::MalformedResponse("token cookie"))?;

        self.session_token = Some(token);
        Ok(user)
    }

    // Feed endpoints

    /// Load every post in the feed, newest first as ordered by the server
    pub async fn get_all_posts(&self) -> ApiResult<Vec<Post>> {
        let url = self.url("/post/all");
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        let feed: PostsResponse = self.handle_response(response).await?;
        ensure_success(feed.success, &feed.message)?;
        feed.posts.ok_or(ApiError::MalformedResponse("posts"))
    }

    // Profile endpoints

    /// Fetch a user's public profile
    pub async fn get_user_profile(&self, user_id: &str) -> ApiResult<User> {
        let url = self.url(&format!("/user/{}/profile", urlencoding::encode(user_id)));
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        let profile: UserResponse = self.handle_response(response).await?;
        ensure_success(profile.success, &profile.message)?;
        profile.user.ok_or(ApiError::MalformedResponse("user"))
    }
}

#[async_trait]
impl SocialApi for ApiClient {
    async fn like_or_dislike(&self, post_id: &str, action: LikeAction) -> ApiResult<ActionResponse> {
        let url = self.url(&format!(
            "/post/{}/{}",
            urlencoding::encode(post_id),
            action.as_str()
        ));
        self.send_action(self.client.get(&url)).await
    }

    async fn add_comment(&self, post_id: &str, text: &str) -> ApiResult<NewComment> {
        let url = self.url(&format!("/post/{}/comment", urlencoding::encode(post_id)));
        let request = CreateCommentRequest { text: text.to_string() };
        let req = self.add_auth_header(self.client.post(&url).json(&request));
        let response = req.send().await?;
        let envelope: CommentResponse = self.handle_response(response).await?;
        ensure_success(envelope.success, &envelope.message)?;

        let comment = envelope.comment.ok_or(ApiError::MalformedResponse("comment"))?;
        Ok(NewComment { comment, message: envelope.message })
    }

    async fn follow_or_unfollow(&self, author_id: &str) -> ApiResult<ActionResponse> {
        let url = self.url(&format!("/user/followorunfollow/{}", urlencoding::encode(author_id)));
        self.send_action(self.client.post(&url)).await
    }

    async fn delete_post(&self, post_id: &str) -> ApiResult<ActionResponse> {
        let url = self.url(&format!("/post/delete/{}", urlencoding::encode(post_id)));
        self.send_action(self.client.delete(&url)).await
    }

    async fn bookmark(&self, post_id: &str) -> ApiResult<ActionResponse> {
        let url = self.url(&format!("/post/{}/bookmark", urlencoding::encode(post_id)));
        self.send_action(self.client.get(&url)).await
    }
}

fn ensure_success(success: bool, message: &Option<String>) -> ApiResult<()> {
    if success {
        Ok(())
    } else {
        Err(ApiError::Rejected(message.clone()))
    }
}

/// Pull the session token out of the `Set-Cookie` headers
fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(client.url("/post/all"), "http://localhost:8000/api/v1/post/all");
    }

    #[test]
    fn test_extract_session_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("theme=dark; Path=/"));
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("token=abc.def.ghi; Path=/; HttpOnly; SameSite=Strict"),
        );

        assert_eq!(extract_session_cookie(&headers), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_extract_session_cookie_ignores_cleared_token() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("token=; Max-Age=0"));
        assert_eq!(extract_session_cookie(&headers), None);
    }

    #[test]
    fn test_ensure_success() {
        assert!(ensure_success(true, &None).is_ok());
        let err = ensure_success(false, &Some("Post not found".to_string())).unwrap_err();
        assert_eq!(err.server_message(), Some("Post not found"));
    }
}
