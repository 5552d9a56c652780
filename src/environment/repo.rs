use anyhow::Context;
use sqlx::PgPool;
use time::Date;

use super::repo_types::{EnvironmentSample, Region};

pub async fn find(
    db: &PgPool,
    date: Date,
    region_code: &str,
) -> anyhow::Result<Option<EnvironmentSample>> {
    let row = sqlx::query_as::<_, EnvironmentSample>(
        r#"
        SELECT date, region_code, avg_temp_c, avg_humidity, uv_index, weather_code
          FROM daily_environment
         WHERE date = $1 AND region_code = $2
        "#,
    )
    .bind(date)
    .bind(region_code)
    .fetch_optional(db)
    .await
    .context("find environment sample")?;
    Ok(row)
}

/// Inserts the sample unless one already exists, and returns the stored row.
pub async fn insert_if_absent(
    db: &PgPool,
    sample: &EnvironmentSample,
) -> anyhow::Result<EnvironmentSample> {
    sqlx::query(
        r#"
        INSERT INTO daily_environment (date, region_code, avg_temp_c, avg_humidity, uv_index, weather_code)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (date, region_code) DO NOTHING
        "#,
    )
    .bind(sample.date)
    .bind(&sample.region_code)
    .bind(sample.avg_temp_c)
    .bind(sample.avg_humidity)
    .bind(sample.uv_index)
    .bind(&sample.weather_code)
    .execute(db)
    .await
    .context("insert environment sample")?;

    find(db, sample.date, &sample.region_code)
        .await?
        .context("environment sample vanished after insert")
}

pub async fn find_region(db: &PgPool, code: &str) -> anyhow::Result<Option<Region>> {
    let row = sqlx::query_as::<_, Region>(
        "SELECT code, name, latitude, longitude FROM region WHERE code = $1",
    )
    .bind(code)
    .fetch_optional(db)
    .await
    .context("find region")?;
    Ok(row)
}

pub async fn list_regions(db: &PgPool) -> anyhow::Result<Vec<Region>> {
    let rows = sqlx::query_as::<_, Region>(
        "SELECT code, name, latitude, longitude FROM region ORDER BY code",
    )
    .fetch_all(db)
    .await
    .context("list regions")?;
    Ok(rows)
}
