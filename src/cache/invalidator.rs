use std::sync::Arc;

use time::macros::format_description;
use time::Date;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{CacheClient, CacheError};
use crate::scoring::range::DateRange;

/// `radar:{user_id}:{range_start}:{range_end}`
pub fn radar_key(user_id: Uuid, range: DateRange) -> String {
    format!("radar:{}:{}:{}", user_id, range.start, range.end)
}

fn radar_prefix(user_id: Uuid) -> String {
    format!("radar:{}:", user_id)
}

fn parse_radar_key(key: &str) -> Option<(Uuid, DateRange)> {
    let format = format_description!("[year]-[month]-[day]");
    let mut parts = key.split(':');
    if parts.next()? != "radar" {
        return None;
    }
    let user_id = Uuid::parse_str(parts.next()?).ok()?;
    let start = Date::parse(parts.next()?, format).ok()?;
    let end = Date::parse(parts.next()?, format).ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((user_id, DateRange::new(start, end)))
}

/// Purges cached radar views whose window covers a changed date. Failures
/// are logged and swallowed.
#[derive(Clone)]
pub struct ScoreCacheInvalidator {
    cache: Arc<dyn CacheClient>,
}

impl ScoreCacheInvalidator {
    pub fn new(cache: Arc<dyn CacheClient>) -> Self {
        Self { cache }
    }

    pub async fn invalidate_date(&self, user_id: Uuid, date: Date) {
        self.invalidate_dates(user_id, &[date]).await;
    }

    pub async fn invalidate_dates(&self, user_id: Uuid, dates: &[Date]) {
        if dates.is_empty() {
            return;
        }
        match self.purge(user_id, Some(dates)).await {
            Ok(removed) => debug!(%user_id, dates = dates.len(), removed, "radar cache invalidated"),
            Err(e) => warn!(error = %e, %user_id, dates = dates.len(), "radar cache invalidation failed"),
        }
    }

    /// Full-user wildcard: drops every radar view of the user. Request paths
    /// invalidate by date; this is the operator-facing purge.
    pub async fn invalidate_user(&self, user_id: Uuid) {
        match self.purge(user_id, None).await {
            Ok(removed) => debug!(%user_id, removed, "radar cache cleared"),
            Err(e) => warn!(error = %e, %user_id, "radar cache clear failed"),
        }
    }

    async fn purge(&self, user_id: Uuid, dates: Option<&[Date]>) -> Result<usize, CacheError> {
        let keys: Vec<String> = self
            .cache
            .scan_prefix(&radar_prefix(user_id))
            .await?
            .into_iter()
            .filter(|key| match parse_radar_key(key) {
                Some((owner, range)) if owner == user_id => match dates {
                    Some(dates) => dates.iter().any(|d| range.contains(*d)),
                    None => true,
                },
                _ => false,
            })
            .collect();

        if !keys.is_empty() {
            self.cache.delete(&keys).await?;
        }
        Ok(keys.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory::MemoryCache;
    use time::macros::date;

    fn key(user: Uuid, start: Date, end: Date) -> String {
        radar_key(user, DateRange::new(start, end))
    }

    #[test]
    fn radar_key_round_trips_through_parser() {
        let user = Uuid::new_v4();
        let k = key(user, date!(2024-01-01), date!(2024-01-31));
        assert_eq!(k, format!("radar:{user}:2024-01-01:2024-01-31"));
        assert_eq!(
            parse_radar_key(&k),
            Some((user, DateRange::new(date!(2024-01-01), date!(2024-01-31))))
        );
        assert_eq!(parse_radar_key("radar:not-a-uuid:2024-01-01:2024-01-31"), None);
        assert_eq!(parse_radar_key(&format!("radar:{user}:2024-01-01")), None);
    }

    #[tokio::test]
    async fn removes_only_windows_covering_the_date() {
        let cache = Arc::new(MemoryCache::default());
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        let january = key(user, date!(2024-01-01), date!(2024-01-31));
        let february = key(user, date!(2024-02-01), date!(2024-02-29));
        let others = key(other, date!(2024-01-01), date!(2024-01-31));
        for k in [&january, &february, &others] {
            cache.insert(k, "{}");
        }
        cache.insert(&format!("radar:{user}:garbage"), "{}");

        let invalidator = ScoreCacheInvalidator::new(cache.clone());
        invalidator.invalidate_date(user, date!(2024-01-15)).await;

        let keys = cache.keys();
        assert!(!keys.contains(&january));
        assert!(keys.contains(&february));
        assert!(keys.contains(&others));
        assert_eq!(keys.len(), 3);
    }

    #[tokio::test]
    async fn user_wildcard_clears_every_window() {
        let cache = Arc::new(MemoryCache::default());
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        cache.insert(&key(user, date!(2024-01-01), date!(2024-01-31)), "{}");
        cache.insert(&key(user, date!(2024-02-01), date!(2024-02-29)), "{}");
        cache.insert(&key(other, date!(2024-01-01), date!(2024-01-31)), "{}");

        ScoreCacheInvalidator::new(cache.clone())
            .invalidate_user(user)
            .await;

        assert_eq!(cache.keys(), vec![key(other, date!(2024-01-01), date!(2024-01-31))]);
    }

    #[tokio::test]
    async fn backend_failure_is_swallowed() {
        let cache = Arc::new(MemoryCache::failing());
        let invalidator = ScoreCacheInvalidator::new(cache);
        invalidator.invalidate_date(Uuid::new_v4(), date!(2024-01-01)).await;
        invalidator.invalidate_user(Uuid::new_v4()).await;
    }
}
