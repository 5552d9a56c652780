use std::future::Future;

use time::Date;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::radar::{build_radar_chart, RadarChart};
use super::trends::{build_trend, PersonalTrend, TrendRules, LONG_WINDOW_DAYS};
use crate::cache::{invalidator::radar_key, CacheClient};
use crate::dates::shift;
use crate::error::ServiceError;
use crate::scoring::range::DateRange;
use crate::scoring::repo as score_repo;
use crate::scoring::types::DailyScore;
use crate::state::AppState;

/// Serves the chart from cache when possible. Any cache failure, including
/// an undecodable entry, falls through to `compute`.
pub async fn cached_radar<F, Fut>(
    cache: &dyn CacheClient,
    key: &str,
    ttl_secs: u64,
    compute: F,
) -> anyhow::Result<RadarChart>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<RadarChart>>,
{
    match cache.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str::<RadarChart>(&raw) {
            Ok(chart) => {
                debug!(key, "radar cache hit");
                return Ok(chart);
            }
            Err(e) => warn!(error = %e, key, "radar cache entry undecodable"),
        },
        Ok(None) => {}
        Err(e) => warn!(error = %e, key, "radar cache read failed"),
    }

    let chart = compute().await?;
    match serde_json::to_string(&chart) {
        Ok(payload) => {
            if let Err(e) = cache.set_ex(key, &payload, ttl_secs).await {
                warn!(error = %e, key, "radar cache write failed");
            }
        }
        Err(e) => warn!(error = %e, key, "radar chart encoding failed"),
    }
    Ok(chart)
}

#[instrument(skip(state))]
pub async fn skin_score(
    state: &AppState,
    user_id: Uuid,
    date: Date,
) -> Result<DailyScore, ServiceError> {
    score_repo::find(&state.db, user_id, date)
        .await?
        .ok_or(ServiceError::NotFound("skin score"))
}

#[instrument(skip(state))]
pub async fn radar_chart(
    state: &AppState,
    user_id: Uuid,
    start: Date,
    end: Date,
) -> Result<RadarChart, ServiceError> {
    if start > end {
        return Err(ServiceError::bad_request("start_date must not be after end_date"));
    }
    let range = DateRange::new(start, end);
    let scoring = &state.config.scoring;

    let chart = cached_radar(
        state.cache.as_ref(),
        &radar_key(user_id, range),
        scoring.radar_cache_ttl_secs,
        || async move {
            let scores = score_repo::list_in_range(&state.db, user_id, range).await?;
            Ok(build_radar_chart(&scores, scoring.problem_skin_threshold))
        },
    )
    .await?;
    Ok(chart)
}

#[instrument(skip(state))]
pub async fn trends(
    state: &AppState,
    user_id: Uuid,
    date: Date,
) -> Result<PersonalTrend, ServiceError> {
    let range = DateRange::new(shift(date, 1 - LONG_WINDOW_DAYS), date);
    let scores = score_repo::list_in_range(&state.db, user_id, range).await?;
    Ok(build_trend(
        &scores,
        date,
        &TrendRules::from_config(&state.config.scoring),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::cache::memory::MemoryCache;
    use time::macros::date;

    fn chart() -> RadarChart {
        RadarChart {
            problem_dates: vec![date!(2024-01-02)],
            ..RadarChart::default()
        }
    }

    #[tokio::test]
    async fn computes_once_then_serves_from_cache() {
        let cache = MemoryCache::default();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let compute = || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(chart())
        };

        let first = cached_radar(&cache, "radar:k", 43_200, compute).await.unwrap();
        let second = cached_radar(&cache, "radar:k", 43_200, compute).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.ttl("radar:k"), Some(43_200));
    }

    #[tokio::test]
    async fn corrupt_entry_is_recomputed_and_replaced() {
        let cache = MemoryCache::default();
        cache.insert("radar:k", "not json");

        let result = cached_radar(&cache, "radar:k", 60, || async { Ok(chart()) })
            .await
            .unwrap();

        assert_eq!(result, chart());
        let stored = cache.get("radar:k").await.unwrap().unwrap();
        assert_eq!(serde_json::from_str::<RadarChart>(&stored).unwrap(), chart());
    }

    #[tokio::test]
    async fn unavailable_cache_falls_through() {
        let cache = MemoryCache::failing();
        let result = cached_radar(&cache, "radar:k", 60, || async { Ok(chart()) })
            .await
            .unwrap();
        assert_eq!(result, chart());
    }
}
