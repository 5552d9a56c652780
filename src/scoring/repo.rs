use anyhow::Context;
use sqlx::{types::Json, PgConnection, PgPool};
use time::Date;
use uuid::Uuid;

use super::range::DateRange;
use super::types::{DailyScore, DailyScoreRow};

pub async fn find(db: &PgPool, user_id: Uuid, date: Date) -> anyhow::Result<Option<DailyScore>> {
    let row = sqlx::query_as::<_, DailyScoreRow>(
        r#"
        SELECT user_id, date, composite_score, axis_details
          FROM daily_score
         WHERE user_id = $1 AND date = $2
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(db)
    .await
    .context("find daily score")?;
    Ok(row.map(DailyScore::from))
}

pub async fn list_in_range(
    db: &PgPool,
    user_id: Uuid,
    range: DateRange,
) -> anyhow::Result<Vec<DailyScore>> {
    let rows = sqlx::query_as::<_, DailyScoreRow>(
        r#"
        SELECT user_id, date, composite_score, axis_details
          FROM daily_score
         WHERE user_id = $1 AND date BETWEEN $2 AND $3
         ORDER BY date ASC
        "#,
    )
    .bind(user_id)
    .bind(range.start)
    .bind(range.end)
    .fetch_all(db)
    .await
    .context("list daily scores")?;
    Ok(rows.into_iter().map(DailyScore::from).collect())
}

/// Upserts all scores in one transaction. Rows whose values are unchanged
/// are left untouched and not reported.
pub async fn upsert_batch(
    db: &PgPool,
    user_id: Uuid,
    scores: &[DailyScore],
) -> anyhow::Result<Vec<Date>> {
    if scores.is_empty() {
        return Ok(Vec::new());
    }

    let mut tx = db.begin().await.context("begin score batch")?;
    let mut changed = Vec::new();
    for score in scores {
        let existing = sqlx::query_as::<_, DailyScoreRow>(
            r#"
            SELECT user_id, date, composite_score, axis_details
              FROM daily_score
             WHERE user_id = $1 AND date = $2
               FOR UPDATE
            "#,
        )
        .bind(user_id)
        .bind(score.date)
        .fetch_optional(&mut *tx)
        .await
        .context("lock daily score")?
        .map(DailyScore::from);

        if existing.is_some_and(|old| old.same_values(score)) {
            continue;
        }

        sqlx::query(
            r#"
            INSERT INTO daily_score (user_id, date, composite_score, axis_details)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, date) DO UPDATE
               SET composite_score = EXCLUDED.composite_score,
                   axis_details = EXCLUDED.axis_details,
                   updated_at = now()
            "#,
        )
        .bind(user_id)
        .bind(score.date)
        .bind(score.composite_score)
        .bind(Json(score.axis_details))
        .execute(&mut *tx)
        .await
        .with_context(|| format!("upsert daily score {}", score.date))?;
        changed.push(score.date);
    }
    tx.commit().await.context("commit score batch")?;

    Ok(changed)
}

pub async fn delete(conn: &mut PgConnection, user_id: Uuid, date: Date) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM daily_score WHERE user_id = $1 AND date = $2")
        .bind(user_id)
        .bind(date)
        .execute(conn)
        .await
        .context("delete daily score")?;
    Ok(result.rows_affected() > 0)
}
