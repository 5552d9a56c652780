use anyhow::Context;
use sqlx::{PgConnection, PgPool};
use time::Date;
use uuid::Uuid;

use super::dto::{CreateRecordRequest, UpdateRecordRequest};
use super::repo_types::DailyInputRow;
use crate::scoring::range::DateRange;

const COLUMNS: &str = "id, user_id, date, skin_condition, sleep, stress, skincare_effort, \
    menstruation_self_report, water_intake, memo, region_code, created_at, updated_at";

/// `None` when the user already has a record for that date.
pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    req: &CreateRecordRequest,
) -> anyhow::Result<Option<DailyInputRow>> {
    let row = sqlx::query_as::<_, DailyInputRow>(&format!(
        r#"
        INSERT INTO daily_input (id, user_id, date, skin_condition, sleep, stress, skincare_effort,
                                 menstruation_self_report, water_intake, memo, region_code)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (user_id, date) DO NOTHING
        RETURNING {COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(req.date)
    .bind(req.skin_condition)
    .bind(req.sleep)
    .bind(req.stress)
    .bind(req.skincare_effort)
    .bind(req.menstruation_self_report)
    .bind(req.water_intake)
    .bind(&req.memo)
    .bind(&req.region_code)
    .fetch_optional(db)
    .await
    .context("insert daily input")?;
    Ok(row)
}

pub async fn find_by_date(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
) -> anyhow::Result<Option<DailyInputRow>> {
    let row = sqlx::query_as::<_, DailyInputRow>(&format!(
        "SELECT {COLUMNS} FROM daily_input WHERE user_id = $1 AND date = $2"
    ))
    .bind(user_id)
    .bind(date)
    .fetch_optional(db)
    .await
    .context("find daily input")?;
    Ok(row)
}

/// Newest first, bounds optional and inclusive.
pub async fn list(
    db: &PgPool,
    user_id: Uuid,
    start: Option<Date>,
    end: Option<Date>,
    limit: i64,
) -> anyhow::Result<Vec<DailyInputRow>> {
    let rows = sqlx::query_as::<_, DailyInputRow>(&format!(
        r#"
        SELECT {COLUMNS}
          FROM daily_input
         WHERE user_id = $1
           AND ($2::date IS NULL OR date >= $2)
           AND ($3::date IS NULL OR date <= $3)
         ORDER BY date DESC
         LIMIT $4
        "#
    ))
    .bind(user_id)
    .bind(start)
    .bind(end)
    .bind(limit)
    .fetch_all(db)
    .await
    .context("list daily inputs")?;
    Ok(rows)
}

/// Dates with an input inside `range`, ascending.
pub async fn list_dates(db: &PgPool, user_id: Uuid, range: DateRange) -> anyhow::Result<Vec<Date>> {
    let dates = sqlx::query_scalar::<_, Date>(
        r#"
        SELECT date
          FROM daily_input
         WHERE user_id = $1 AND date BETWEEN $2 AND $3
         ORDER BY date ASC
        "#,
    )
    .bind(user_id)
    .bind(range.start)
    .bind(range.end)
    .fetch_all(db)
    .await
    .context("list daily input dates")?;
    Ok(dates)
}

/// Applies the present fields only.
pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
    req: &UpdateRecordRequest,
) -> anyhow::Result<Option<DailyInputRow>> {
    let row = sqlx::query_as::<_, DailyInputRow>(&format!(
        r#"
        UPDATE daily_input
           SET skin_condition = COALESCE($3, skin_condition),
               sleep = COALESCE($4, sleep),
               stress = COALESCE($5, stress),
               skincare_effort = COALESCE($6, skincare_effort),
               menstruation_self_report = COALESCE($7, menstruation_self_report),
               water_intake = COALESCE($8, water_intake),
               memo = COALESCE($9, memo),
               region_code = COALESCE($10, region_code),
               updated_at = now()
         WHERE user_id = $1 AND date = $2
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(date)
    .bind(req.skin_condition)
    .bind(req.sleep)
    .bind(req.stress)
    .bind(req.skincare_effort)
    .bind(req.menstruation_self_report)
    .bind(req.water_intake)
    .bind(&req.memo)
    .bind(&req.region_code)
    .fetch_optional(db)
    .await
    .context("update daily input")?;
    Ok(row)
}

pub async fn delete(conn: &mut PgConnection, user_id: Uuid, date: Date) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM daily_input WHERE user_id = $1 AND date = $2")
        .bind(user_id)
        .bind(date)
        .execute(conn)
        .await
        .context("delete daily input")?;
    Ok(result.rows_affected() > 0)
}
