use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::vehicle_dto::VehicleFilters;
use crate::models::vehicle::{Vehicle, VehicleSpecs};
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: String,
        vehicle_type: String,
        price_per_day: Decimal,
        specs: VehicleSpecs,
        description: Option<String>,
        features: Vec<String>,
        images: Vec<String>,
        availability: bool,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, name, vehicle_type, price_per_day, availability, specs, description, features, images, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(vehicle_type)
        .bind(price_per_day)
        .bind(availability)
        .bind(sqlx::types::Json(specs))
        .bind(description)
        .bind(features)
        .bind(images)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    /// Listar el catálogo con filtros opcionales, ordenado por precio
    pub async fn find_filtered(&self, filters: &VehicleFilters) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT * FROM vehicles
            WHERE ($1::TEXT IS NULL OR vehicle_type = $1)
              AND ($2::NUMERIC IS NULL OR price_per_day >= $2)
              AND ($3::NUMERIC IS NULL OR price_per_day <= $3)
              AND ($4::BOOLEAN IS NULL OR availability = $4)
            ORDER BY price_per_day ASC
            "#,
        )
        .bind(&filters.vehicle_type)
        .bind(filters.min_price)
        .bind(filters.max_price)
        .bind(filters.available)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    /// Tipos distintos para las opciones de filtro del catálogo
    pub async fn distinct_types(&self) -> Result<Vec<String>, AppError> {
        let types: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT vehicle_type FROM vehicles ORDER BY vehicle_type")
                .fetch_all(&self.pool)
                .await?;

        Ok(types.into_iter().map(|(t,)| t).collect())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        name: String,
        vehicle_type: String,
        price_per_day: Decimal,
        specs: VehicleSpecs,
        description: Option<String>,
        features: Vec<String>,
        images: Vec<String>,
        availability: bool,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET name = $2, vehicle_type = $3, price_per_day = $4, availability = $5,
                specs = $6, description = $7, features = $8, images = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(vehicle_type)
        .bind(price_per_day)
        .bind(availability)
        .bind(sqlx::types::Json(specs))
        .bind(description)
        .bind(features)
        .bind(images)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                // FK desde bookings: el vehículo tiene reservas asociadas
                sqlx::Error::Database(db) if db.code().as_deref() == Some("23503") => {
                    AppError::Conflict(
                        "Cannot delete vehicle because it has associated bookings".to_string(),
                    )
                }
                _ => AppError::Database(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Vehicle not found".to_string()));
        }

        Ok(())
    }
}
