use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::NewRecommendation;

/// Create the recommendation log table if it does not exist yet
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS recommendation (
            id UUID PRIMARY KEY,
            age_group TEXT NOT NULL,
            goal TEXT NOT NULL,
            recommended_stocks TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Store one served recommendation
pub async fn insert(pool: &PgPool, rec: &NewRecommendation) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    let created_at: DateTime<Utc> = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO recommendation (id, age_group, goal, recommended_stocks, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(&rec.age_group)
    .bind(&rec.goal)
    .bind(&rec.recommended_stocks)
    .bind(created_at)
    .execute(pool)
    .await?;

    Ok(id)
}
