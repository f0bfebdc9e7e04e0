use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::deal::{Deal, DiscountType};
use crate::utils::errors::AppError;

pub struct DealRepository {
    pool: PgPool,
}

impl DealRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        code_hash: String,
        description: Option<String>,
        discount_type: DiscountType,
        discount_value: Decimal,
        min_purchase: Option<Decimal>,
        usage_limit: Option<i32>,
        valid_from: DateTime<Utc>,
        valid_until: DateTime<Utc>,
        is_active: bool,
    ) -> Result<Deal, AppError> {
        let deal = sqlx::query_as::<_, Deal>(
            r#"
            INSERT INTO deals (id, code_hash, description, discount_type, discount_value,
                               min_purchase, usage_limit, usage_count, valid_from, valid_until, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 0, $8, $9, $10, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(code_hash)
        .bind(description)
        .bind(discount_type)
        .bind(discount_value)
        .bind(min_purchase)
        .bind(usage_limit)
        .bind(valid_from)
        .bind(valid_until)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            // Unique sobre code_hash: el código ya existe
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AppError::Conflict("A deal with this code already exists".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(deal)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Deal>, AppError> {
        let deal = sqlx::query_as::<_, Deal>("SELECT * FROM deals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(deal)
    }

    pub async fn find_by_code_hash(&self, code_hash: &str) -> Result<Option<Deal>, AppError> {
        let deal = sqlx::query_as::<_, Deal>("SELECT * FROM deals WHERE code_hash = $1")
            .bind(code_hash)
            .fetch_optional(&self.pool)
            .await?;

        Ok(deal)
    }

    pub async fn list_all(&self) -> Result<Vec<Deal>, AppError> {
        let deals = sqlx::query_as::<_, Deal>("SELECT * FROM deals ORDER BY valid_until DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(deals)
    }

    /// Deals canjeables ahora mismo, para el listado público
    pub async fn list_currently_valid(&self) -> Result<Vec<Deal>, AppError> {
        let deals = sqlx::query_as::<_, Deal>(
            r#"
            SELECT * FROM deals
            WHERE is_active = TRUE
              AND valid_from <= NOW()
              AND valid_until >= NOW()
              AND (usage_limit IS NULL OR usage_count < usage_limit)
            ORDER BY valid_until ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(deals)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        code_hash: Option<String>,
        description: Option<String>,
        discount_type: DiscountType,
        discount_value: Decimal,
        min_purchase: Option<Decimal>,
        usage_limit: Option<i32>,
        valid_from: DateTime<Utc>,
        valid_until: DateTime<Utc>,
        is_active: bool,
    ) -> Result<Deal, AppError> {
        let deal = sqlx::query_as::<_, Deal>(
            r#"
            UPDATE deals
            SET code_hash = COALESCE($2, code_hash), description = $3, discount_type = $4,
                discount_value = $5, min_purchase = $6, usage_limit = $7,
                valid_from = $8, valid_until = $9, is_active = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(code_hash)
        .bind(description)
        .bind(discount_type)
        .bind(discount_value)
        .bind(min_purchase)
        .bind(usage_limit)
        .bind(valid_from)
        .bind(valid_until)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Deal not found".to_string()))?;

        Ok(deal)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM deals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Deal not found".to_string()));
        }

        Ok(())
    }

    /// Incrementar el contador de usos solo si sigue por debajo del cupo.
    /// El guard en el WHERE evita que dos canjes concurrentes superen el límite.
    pub async fn increment_usage(&self, id: Uuid) -> Result<Deal, AppError> {
        let deal = sqlx::query_as::<_, Deal>(
            r#"
            UPDATE deals
            SET usage_count = usage_count + 1
            WHERE id = $1
              AND (usage_limit IS NULL OR usage_count < usage_limit)
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::PromoLimitReached)?;

        Ok(deal)
    }
}
