use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::booking::{Booking, BookingStatus};
use crate::utils::errors::AppError;

/// Código PostgreSQL de violación de constraint de exclusión
const EXCLUSION_VIOLATION: &str = "23P01";

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Comprobar solapamiento con reservas PENDING/CONFIRMED del vehículo.
    ///
    /// Solo lectura; el predicado vive en `Booking::overlaps` y la garantía
    /// real contra la carrera check-then-insert la da el constraint de
    /// exclusión en `create`.
    pub async fn has_overlap(
        &self,
        vehicle_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let blocking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE vehicle_id = $1
              AND status IN ('PENDING', 'CONFIRMED')
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(blocking.iter().any(|b| b.overlaps(start, end)))
    }

    /// Insertar una reserva PENDING.
    ///
    /// El constraint de exclusión sobre (vehicle_id, rango de fechas)
    /// convierte una inserción concurrente solapada en `Conflict` en vez
    /// de dejar pasar la carrera.
    pub async fn create(
        &self,
        user_id: Uuid,
        vehicle_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        total_price: Decimal,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (id, user_id, vehicle_id, start_date, end_date, total_price, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'PENDING', NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(vehicle_id)
        .bind(start)
        .bind(end)
        .bind(total_price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(EXCLUSION_VIOLATION) => {
                AppError::Conflict(
                    "Vehicle is already booked for the selected dates".to_string(),
                )
            }
            _ => AppError::Database(e),
        })?;

        Ok(booking)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = $1 ORDER BY start_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn list_paginated(&self, page: i64, limit: i64) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn count_all(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Transición de estado simple (cancelación, override de administración)
    pub async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        Ok(booking)
    }

    /// Confirmar el pago: estado CONFIRMED, token cifrado y referencia
    /// del procesador en una sola escritura. Solo aplica sobre PENDING,
    /// así un reintento tras confirmar no reescribe nada.
    pub async fn confirm_payment(
        &self,
        id: Uuid,
        payment_token_enc: String,
        transaction_ref: String,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'CONFIRMED', payment_token_enc = $2, transaction_ref = $3
            WHERE id = $1 AND status = 'PENDING'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payment_token_enc)
        .bind(transaction_ref)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::InvalidState("Booking is not pending payment".to_string())
        })?;

        Ok(booking)
    }
}
