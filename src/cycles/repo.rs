use anyhow::Context;
use sqlx::{PgConnection, PgPool};
use time::Date;
use uuid::Uuid;

use super::repo_types::CycleInterval;

// Lookups take a connection so they can run inside the mutation's
// transaction. All ordered scans ride on the (user_id, start_date) index.

pub async fn previous_before(
    conn: &mut PgConnection,
    user_id: Uuid,
    date: Date,
    exclude: Option<Uuid>,
) -> anyhow::Result<Option<CycleInterval>> {
    let row = sqlx::query_as::<_, CycleInterval>(
        r#"
        SELECT id, user_id, start_date, end_date
          FROM cycle_interval
         WHERE user_id = $1
           AND start_date < $2
           AND ($3::uuid IS NULL OR id <> $3)
         ORDER BY start_date DESC
         LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(exclude)
    .fetch_optional(conn)
    .await
    .context("previous cycle interval")?;
    Ok(row)
}

/// Earliest interval starting on or after `date`.
pub async fn next_after(
    conn: &mut PgConnection,
    user_id: Uuid,
    date: Date,
    exclude: Option<Uuid>,
) -> anyhow::Result<Option<CycleInterval>> {
    let row = sqlx::query_as::<_, CycleInterval>(
        r#"
        SELECT id, user_id, start_date, end_date
          FROM cycle_interval
         WHERE user_id = $1
           AND start_date >= $2
           AND ($3::uuid IS NULL OR id <> $3)
         ORDER BY start_date ASC
         LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(exclude)
    .fetch_optional(conn)
    .await
    .context("next cycle interval")?;
    Ok(row)
}

pub async fn last_on_or_before(
    conn: &mut PgConnection,
    user_id: Uuid,
    date: Date,
) -> anyhow::Result<Option<CycleInterval>> {
    let row = sqlx::query_as::<_, CycleInterval>(
        r#"
        SELECT id, user_id, start_date, end_date
          FROM cycle_interval
         WHERE user_id = $1 AND start_date <= $2
         ORDER BY start_date DESC
         LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(conn)
    .await
    .context("last cycle interval")?;
    Ok(row)
}

pub async fn list_open(conn: &mut PgConnection, user_id: Uuid) -> anyhow::Result<Vec<CycleInterval>> {
    let rows = sqlx::query_as::<_, CycleInterval>(
        r#"
        SELECT id, user_id, start_date, end_date
          FROM cycle_interval
         WHERE user_id = $1 AND end_date IS NULL
         ORDER BY start_date ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await
    .context("open cycle intervals")?;
    Ok(rows)
}

pub async fn find(
    conn: &mut PgConnection,
    user_id: Uuid,
    id: Uuid,
) -> anyhow::Result<Option<CycleInterval>> {
    let row = sqlx::query_as::<_, CycleInterval>(
        r#"
        SELECT id, user_id, start_date, end_date
          FROM cycle_interval
         WHERE id = $1 AND user_id = $2
           FOR UPDATE
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(conn)
    .await
    .context("find cycle interval")?;
    Ok(row)
}

pub async fn list_recent(db: &PgPool, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<CycleInterval>> {
    let rows = sqlx::query_as::<_, CycleInterval>(
        r#"
        SELECT id, user_id, start_date, end_date
          FROM cycle_interval
         WHERE user_id = $1
         ORDER BY start_date DESC
         LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await
    .context("list cycle intervals")?;
    Ok(rows)
}

pub async fn insert(
    conn: &mut PgConnection,
    user_id: Uuid,
    start: Date,
    end: Option<Date>,
) -> anyhow::Result<CycleInterval> {
    let row = sqlx::query_as::<_, CycleInterval>(
        r#"
        INSERT INTO cycle_interval (id, user_id, start_date, end_date)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, start_date, end_date
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_one(conn)
    .await
    .context("insert cycle interval")?;
    Ok(row)
}

pub async fn update(
    conn: &mut PgConnection,
    id: Uuid,
    start: Date,
    end: Option<Date>,
) -> anyhow::Result<CycleInterval> {
    let row = sqlx::query_as::<_, CycleInterval>(
        r#"
        UPDATE cycle_interval
           SET start_date = $2, end_date = $3, updated_at = now()
         WHERE id = $1
        RETURNING id, user_id, start_date, end_date
        "#,
    )
    .bind(id)
    .bind(start)
    .bind(end)
    .fetch_one(conn)
    .await
    .context("update cycle interval")?;
    Ok(row)
}

pub async fn delete(conn: &mut PgConnection, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM cycle_interval WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(conn)
        .await
        .context("delete cycle interval")?;
    Ok(result.rows_affected() > 0)
}
