mod client;
mod error;

pub use client::{ApiClient, NewComment, SocialApi, DEFAULT_SERVER_URL};
pub use error::{ApiError, ApiResult};
