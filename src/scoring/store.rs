use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::range::DateRange;
use super::repo;
use super::types::DailyScore;
use crate::cycles::repo as cycles_repo;
use crate::cycles::repo_types::CycleInterval;
use crate::environment::repo as environment_repo;
use crate::environment::repo_types::EnvironmentSample;
use crate::profile::repo as profile_repo;
use crate::profile::repo_types::CycleProfile;
use crate::records::repo as records_repo;
use crate::records::repo_types::DailyInput;

/// Reads and writes the scoring engine needs, so it can run against
/// Postgres or an in-memory fixture.
#[async_trait]
pub trait ScoringStore: Send + Sync {
    /// Dates inside `range` that have a daily input, ascending.
    async fn list_input_dates(&self, user_id: Uuid, range: DateRange) -> anyhow::Result<Vec<Date>>;

    async fn find_input(&self, user_id: Uuid, date: Date) -> anyhow::Result<Option<DailyInput>>;

    async fn find_environment(
        &self,
        date: Date,
        region_code: &str,
    ) -> anyhow::Result<Option<EnvironmentSample>>;

    async fn find_profile(&self, user_id: Uuid) -> anyhow::Result<Option<CycleProfile>>;

    /// Latest interval with `start_date <= date`.
    async fn last_cycle_on_or_before(
        &self,
        user_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Option<CycleInterval>>;

    /// Latest interval with `start_date < date`.
    async fn previous_cycle_before(
        &self,
        user_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Option<CycleInterval>>;

    /// Upserts the batch as one atomic unit and returns the dates whose
    /// stored value changed.
    async fn save_scores(&self, user_id: Uuid, scores: &[DailyScore]) -> anyhow::Result<Vec<Date>>;
}

#[derive(Clone)]
pub struct PgScoringStore {
    db: PgPool,
}

impl PgScoringStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScoringStore for PgScoringStore {
    async fn list_input_dates(&self, user_id: Uuid, range: DateRange) -> anyhow::Result<Vec<Date>> {
        records_repo::list_dates(&self.db, user_id, range).await
    }

    async fn find_input(&self, user_id: Uuid, date: Date) -> anyhow::Result<Option<DailyInput>> {
        let row = records_repo::find_by_date(&self.db, user_id, date).await?;
        Ok(row.as_ref().map(DailyInput::from))
    }

    async fn find_environment(
        &self,
        date: Date,
        region_code: &str,
    ) -> anyhow::Result<Option<EnvironmentSample>> {
        environment_repo::find(&self.db, date, region_code).await
    }

    async fn find_profile(&self, user_id: Uuid) -> anyhow::Result<Option<CycleProfile>> {
        profile_repo::find(&self.db, user_id).await
    }

    async fn last_cycle_on_or_before(
        &self,
        user_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Option<CycleInterval>> {
        let mut conn = self.db.acquire().await?;
        cycles_repo::last_on_or_before(&mut *conn, user_id, date).await
    }

    async fn previous_cycle_before(
        &self,
        user_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Option<CycleInterval>> {
        let mut conn = self.db.acquire().await?;
        cycles_repo::previous_before(&mut *conn, user_id, date, None).await
    }

    async fn save_scores(&self, user_id: Uuid, scores: &[DailyScore]) -> anyhow::Result<Vec<Date>> {
        repo::upsert_batch(&self.db, user_id, scores).await
    }
}
