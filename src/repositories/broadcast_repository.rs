use sqlx::PgPool;
use uuid::Uuid;

use crate::models::broadcast::{Broadcast, BroadcastAudience};
use crate::utils::errors::AppError;

pub struct BroadcastRepository {
    pool: PgPool,
}

impl BroadcastRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        title: String,
        message: String,
        audience: BroadcastAudience,
    ) -> Result<Broadcast, AppError> {
        let broadcast = sqlx::query_as::<_, Broadcast>(
            r#"
            INSERT INTO broadcasts (id, title, message, audience, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(message)
        .bind(audience)
        .fetch_one(&self.pool)
        .await?;

        Ok(broadcast)
    }

    pub async fn list_recent(&self, limit: i64) -> Result<Vec<Broadcast>, AppError> {
        let broadcasts = sqlx::query_as::<_, Broadcast>(
            "SELECT * FROM broadcasts ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(broadcasts)
    }
}
