use async_trait::async_trait;
use sqlx::PgConnection;
use time::Date;
use uuid::Uuid;

use super::repo;
use super::repo_types::CycleInterval;

/// Interval reads and writes a cycle mutation performs. The Postgres
/// implementation runs on the mutation's transaction.
#[async_trait]
pub trait CycleStore: Send {
    async fn list_open(&mut self, user_id: Uuid) -> anyhow::Result<Vec<CycleInterval>>;

    /// Latest interval with `start_date < date`, other than `exclude`.
    async fn previous_before(
        &mut self,
        user_id: Uuid,
        date: Date,
        exclude: Option<Uuid>,
    ) -> anyhow::Result<Option<CycleInterval>>;

    /// Earliest interval with `start_date >= date`, other than `exclude`.
    async fn next_after(
        &mut self,
        user_id: Uuid,
        date: Date,
        exclude: Option<Uuid>,
    ) -> anyhow::Result<Option<CycleInterval>>;

    async fn find(&mut self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<CycleInterval>>;

    async fn insert(
        &mut self,
        user_id: Uuid,
        start: Date,
        end: Option<Date>,
    ) -> anyhow::Result<CycleInterval>;

    async fn update(
        &mut self,
        id: Uuid,
        start: Date,
        end: Option<Date>,
    ) -> anyhow::Result<CycleInterval>;

    async fn delete(&mut self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

#[async_trait]
impl CycleStore for PgConnection {
    async fn list_open(&mut self, user_id: Uuid) -> anyhow::Result<Vec<CycleInterval>> {
        repo::list_open(self, user_id).await
    }

    async fn previous_before(
        &mut self,
        user_id: Uuid,
        date: Date,
        exclude: Option<Uuid>,
    ) -> anyhow::Result<Option<CycleInterval>> {
        repo::previous_before(self, user_id, date, exclude).await
    }

    async fn next_after(
        &mut self,
        user_id: Uuid,
        date: Date,
        exclude: Option<Uuid>,
    ) -> anyhow::Result<Option<CycleInterval>> {
        repo::next_after(self, user_id, date, exclude).await
    }

    async fn find(&mut self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<CycleInterval>> {
        repo::find(self, user_id, id).await
    }

    async fn insert(
        &mut self,
        user_id: Uuid,
        start: Date,
        end: Option<Date>,
    ) -> anyhow::Result<CycleInterval> {
        repo::insert(self, user_id, start, end).await
    }

    async fn update(
        &mut self,
        id: Uuid,
        start: Date,
        end: Option<Date>,
    ) -> anyhow::Result<CycleInterval> {
        repo::update(self, id, start, end).await
    }

    async fn delete(&mut self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        repo::delete(self, user_id, id).await
    }
}
