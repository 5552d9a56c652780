use anyhow::Context;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::repo_types::CycleProfile;

pub async fn find(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<CycleProfile>> {
    let row = sqlx::query_as::<_, CycleProfile>(
        r#"
        SELECT user_id, cycle_length_days, last_menstruation_start, region_code
          FROM user_profile
         WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("find user profile")?;
    Ok(row)
}

/// Creates the row on first write; absent values keep what is stored.
pub async fn upsert(
    db: &PgPool,
    user_id: Uuid,
    cycle_length_days: Option<i32>,
    last_menstruation_start: Option<Date>,
    region_code: Option<&str>,
) -> anyhow::Result<CycleProfile> {
    let row = sqlx::query_as::<_, CycleProfile>(
        r#"
        INSERT INTO user_profile (user_id, cycle_length_days, last_menstruation_start, region_code)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id) DO UPDATE
           SET cycle_length_days = COALESCE(EXCLUDED.cycle_length_days, user_profile.cycle_length_days),
               last_menstruation_start = COALESCE(EXCLUDED.last_menstruation_start, user_profile.last_menstruation_start),
               region_code = COALESCE(EXCLUDED.region_code, user_profile.region_code),
               updated_at = now()
        RETURNING user_id, cycle_length_days, last_menstruation_start, region_code
        "#,
    )
    .bind(user_id)
    .bind(cycle_length_days)
    .bind(last_menstruation_start)
    .bind(region_code)
    .fetch_one(db)
    .await
    .context("upsert user profile")?;
    Ok(row)
}
