use github_insights_server::{
    api::github::{GithubClient, GithubError, ProfileData},
    cache::{CachedContent, ResponseCache},
    types::RankKind,
};
use rocket::{
    form::Errors,
    http::{ContentType, Header, Status},
    response::{self, Responder},
    Request, Response,
};
use serde::Serialize;
use tracing::{debug, error, info};

pub const CACHE_CONTROL: &str = "public, s-maxage=14400, max-age=3600, stale-while-revalidate=7200";

/// A successful response, tagged with whether it came from the cache.
pub struct Cached {
    content: CachedContent,
    hit: bool,
}

impl Cached {
    pub fn hit(content: CachedContent) -> Self {
        Self { content, hit: true }
    }

    pub fn miss(content: CachedContent) -> Self {
        Self {
            content,
            hit: false,
        }
    }
}

impl<'r> Responder<'r, 'static> for Cached {
    fn respond_to(self, _req: &'r Request<'_>) -> response::Result<'static> {
        let body = self.content.body;

        Response::build()
            .header(self.content.content_type)
            .header(Header::new("Cache-Control", CACHE_CONTROL))
            .header(Header::new("X-Cache", if self.hit { "HIT" } else { "MISS" }))
            .sized_body(body.len(), std::io::Cursor::new(body))
            .ok()
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: Status,
    message: String,
}

impl ApiError {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn missing_username() -> Self {
        Self::new(Status::BadRequest, "Missing username parameter")
    }
}

impl From<GithubError> for ApiError {
    fn from(error: GithubError) -> Self {
        match error {
            GithubError::UserNotFound => Self::new(Status::NotFound, "User not found"),
            GithubError::GraphQl(message) => {
                Self::new(Status::BadGateway, format!("GitHub error: {message}"))
            }
            GithubError::Api(_) => Self::new(Status::BadGateway, "Failed to reach GitHub"),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, _req: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .status(self.status)
            .header(ContentType::Plain)
            .header(Header::new("Cache-Control", "no-store"))
            .sized_body(self.message.len(), std::io::Cursor::new(self.message))
            .ok()
    }
}

/// Trimmed, non-empty username from the query string.
pub fn require_username(username: Option<&str>) -> Result<String, ApiError> {
    match username.map(str::trim) {
        Some(username) if !username.is_empty() => Ok(username.to_string()),
        _ => Err(ApiError::missing_username()),
    }
}

/// The `strategy` query parameter. Absent means the default, anything
/// unrecognised is rejected.
pub fn rank_strategy(strategy: Option<Result<RankKind, Errors<'_>>>) -> Result<RankKind, ApiError> {
    match strategy {
        None => Ok(RankKind::default()),
        Some(Ok(kind)) => Ok(kind),
        Some(Err(_)) => Err(ApiError::new(
            Status::BadRequest,
            "Unknown strategy, expected weighted or percentile",
        )),
    }
}

/// GitHub logins are case-insensitive, so are the cache keys.
pub fn cache_key(kind: &str, username: &str) -> String {
    format!("{kind}:{}", username.to_lowercase())
}

pub async fn lookup(cache: &ResponseCache, key: &str) -> Option<Cached> {
    let content = cache.get(key).await?;
    debug!("Cache hit for {key}");
    Some(Cached::hit(content))
}

pub async fn store(cache: &ResponseCache, key: String, content: CachedContent) -> Cached {
    cache.insert(key, content.clone()).await;
    Cached::miss(content)
}

pub async fn fetch_profile(github: &GithubClient, username: &str) -> Result<ProfileData, ApiError> {
    github.profile(username).await.map_err(|e| {
        match &e {
            GithubError::UserNotFound => info!("User {username} not found"),
            _ => error!("Failed to fetch profile for {username}: {e:#?}"),
        }
        e.into()
    })
}

pub fn to_json<T: Serialize>(value: &T) -> Result<CachedContent, ApiError> {
    serde_json::to_string(value)
        .map(CachedContent::json)
        .map_err(|e| {
            error!("Failed to serialize response: {e}");
            ApiError::new(Status::InternalServerError, "Failed to serialize response")
        })
}
