use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use time::Date;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::composite::CompositeScorer;
use super::range::{DateRange, RecalcWindow};
use super::store::ScoringStore;
use super::types::DailyScore;
use crate::cache::ScoreCacheInvalidator;
use crate::config::ScoringConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecalcSummary {
    pub dates_scanned: usize,
    pub dates_changed: usize,
    pub chunks: usize,
}

impl std::ops::AddAssign for RecalcSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.dates_scanned += rhs.dates_scanned;
        self.dates_changed += rhs.dates_changed;
        self.chunks += rhs.chunks;
    }
}

/// Re-derives stored daily scores from persisted inputs. Every run is
/// idempotent; a failed run can simply be repeated.
#[derive(Clone)]
pub struct ScoreEngine {
    store: Arc<dyn ScoringStore>,
    invalidator: ScoreCacheInvalidator,
    scorer: CompositeScorer,
    window: RecalcWindow,
    chunk_size: usize,
}

impl ScoreEngine {
    pub fn new(
        store: Arc<dyn ScoringStore>,
        invalidator: ScoreCacheInvalidator,
        config: &ScoringConfig,
    ) -> Self {
        Self {
            store,
            invalidator,
            scorer: CompositeScorer::from_config(config),
            window: RecalcWindow::from_config(config),
            chunk_size: config.recalc_chunk_size.max(1),
        }
    }

    async fn compute(&self, user_id: Uuid, date: Date) -> anyhow::Result<Option<DailyScore>> {
        let Some(input) = self.store.find_input(user_id, date).await? else {
            return Ok(None);
        };

        let environment = match self.store.find_environment(date, &input.region_code).await {
            Ok(sample) => sample,
            Err(e) => {
                warn!(error = %e, %date, region = %input.region_code, "environment lookup failed; climate neutral");
                None
            }
        };
        let profile = self.store.find_profile(user_id).await?;
        let last_cycle = self.store.last_cycle_on_or_before(user_id, date).await?;

        let outcome = self.scorer.score(
            &input,
            environment.as_ref(),
            profile.as_ref(),
            last_cycle.as_ref(),
            date,
        );
        Ok(Some(DailyScore {
            user_id,
            date,
            composite_score: outcome.composite_score,
            axis_details: outcome.axis_details,
        }))
    }

    /// Scores one day and persists it. `None` when the day has no input.
    /// The flag reports whether the stored value changed.
    #[instrument(skip(self))]
    pub async fn score_day(
        &self,
        user_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Option<(DailyScore, bool)>> {
        let Some(score) = self.compute(user_id, date).await? else {
            return Ok(None);
        };
        let changed = !self
            .store
            .save_scores(user_id, std::slice::from_ref(&score))
            .await?
            .is_empty();
        if changed {
            self.invalidator.invalidate_date(user_id, date).await;
        }
        debug!(composite = score.composite_score, changed, "day scored");
        Ok(Some((score, changed)))
    }

    /// Re-scores every date with an input inside `range`, committing in
    /// chunks. An error aborts the remaining chunks only.
    #[instrument(skip(self), fields(range_start = %range.start, range_end = %range.end))]
    pub async fn recalculate_range(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> anyhow::Result<RecalcSummary> {
        let dates = self.store.list_input_dates(user_id, range).await?;
        let mut summary = RecalcSummary {
            dates_scanned: dates.len(),
            ..RecalcSummary::default()
        };

        for (chunk, batch) in dates.chunks(self.chunk_size).enumerate() {
            let mut scores = Vec::with_capacity(batch.len());
            for &date in batch {
                if let Some(score) = self.compute(user_id, date).await? {
                    scores.push(score);
                }
            }

            let changed = self
                .store
                .save_scores(user_id, &scores)
                .await
                .with_context(|| format!("recalculation chunk {chunk} for user {user_id}"))?;
            summary.chunks += 1;
            summary.dates_changed += changed.len();
            debug!(chunk, changed = changed.len(), "chunk committed");

            self.invalidator.invalidate_dates(user_id, &changed).await;
        }

        info!(
            scanned = summary.dates_scanned,
            changed = summary.dates_changed,
            chunks = summary.chunks,
            "recalculation finished"
        );
        Ok(summary)
    }

    /// Resolves the window affected by one interval shape and re-scores it.
    /// Edits call this for the old and the new shape.
    pub async fn recalculate_after_cycle_change(
        &self,
        user_id: Uuid,
        start: Date,
        end: Option<Date>,
        today: Date,
    ) -> anyhow::Result<RecalcSummary> {
        let previous = self.store.previous_cycle_before(user_id, start).await?;
        let range = self.window.resolve(previous.as_ref(), start, end, today);
        self.recalculate_range(user_id, range).await
    }
}
