use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rocket::{fairing::AdHoc, http::ContentType, tokio::sync::RwLock};

/// A rendered response body, ready to be served again.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedContent {
    pub body: String,
    pub content_type: ContentType,
}

impl CachedContent {
    pub fn new(body: String, content_type: ContentType) -> Self {
        Self { body, content_type }
    }

    pub fn svg(body: String) -> Self {
        Self::new(body, ContentType::SVG)
    }

    pub fn json(body: String) -> Self {
        Self::new(body, ContentType::JSON)
    }
}

/// In-memory response cache keyed by request. Entries expire `ttl` after
/// insertion and are never served once expired.
pub struct ResponseCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, (Instant, CachedContent)>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get(&self, key: &str) -> Option<CachedContent> {
        let entries = self.entries.read().await;
        let (inserted_at, content) = entries.get(key)?;
        (inserted_at.elapsed() < self.ttl).then(|| content.clone())
    }

    pub async fn insert(&self, key: String, content: CachedContent) {
        self.entries
            .write()
            .await
            .insert(key, (Instant::now(), content));
    }

    /// Drops every expired entry and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, (inserted_at, _)| inserted_at.elapsed() < self.ttl);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

pub fn stage(ttl: Duration) -> AdHoc {
    AdHoc::on_ignite("Response cache", move |rocket| async move {
        rocket
            .manage(Arc::new(ResponseCache::new(ttl)))
            .attach(AdHoc::on_liftoff("Purge expired responses", |rocket| {
                Box::pin(async move {
                    let Some(cache) = rocket.state::<Arc<ResponseCache>>().cloned()
                    else {
                        tracing::error!("Response cache is not managed, purge loop disabled");
                        return;
                    };

                    rocket::tokio::spawn(async move {
                        let period = cache.ttl().max(Duration::from_secs(60));
                        let mut interval = rocket::tokio::time::interval(period);
                        loop {
                            interval.tick().await;
                            let purged = cache.purge_expired().await;
                            if purged > 0 {
                                tracing::debug!("Purged {purged} expired responses");
                            }
                        }
                    });
                })
            }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rocket::async_test]
    async fn serves_fresh_entries() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache
            .insert("badges:octocat".to_string(), CachedContent::svg("<svg/>".into()))
            .await;

        let hit = cache.get("badges:octocat").await.unwrap();
        assert_eq!(hit.body, "<svg/>");
        assert_eq!(hit.content_type, ContentType::SVG);
        assert!(cache.get("badges:other").await.is_none());
    }

    #[rocket::async_test]
    async fn expired_entries_are_not_served() {
        let cache = ResponseCache::new(Duration::ZERO);
        cache
            .insert("data:octocat".to_string(), CachedContent::json("{}".into()))
            .await;

        assert!(cache.get("data:octocat").await.is_none());
        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.len().await, 0);
    }

    #[rocket::async_test]
    async fn insert_replaces_previous_entry() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache
            .insert("rank:octocat".to_string(), CachedContent::svg("old".into()))
            .await;
        cache
            .insert("rank:octocat".to_string(), CachedContent::svg("new".into()))
            .await;

        assert_eq!(cache.get("rank:octocat").await.unwrap().body, "new");
        assert_eq!(cache.purge_expired().await, 0);
        assert_eq!(cache.len().await, 1);
    }
}
