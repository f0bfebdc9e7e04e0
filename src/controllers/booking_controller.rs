//! Ciclo de vida de reservas
//!
//! Orquesta creación (validación de fechas, disponibilidad, precio),
//! confirmación de pago contra el procesador externo y cancelación
//! dentro de la ventana de 24 horas.

use chrono::Utc;
use uuid::Uuid;

use crate::dto::booking_dto::{
    BookingListResponse, BookingResponse, CreateBookingRequest, PaymentResultResponse,
    UserBookingsResponse,
};
use crate::middleware::auth::{AuthenticatedUser, Capability};
use crate::models::booking::{Booking, BookingPhase, BookingStatus};
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::payment_service::{
    charge_outcome, ChargeOutcome, PaymentClient, PaymentStatus,
};
use crate::services::pricing;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Validar el rango de fechas de una reserva nueva: el fin debe ser
/// posterior al inicio y el inicio no puede estar en el pasado.
fn validate_booking_dates(
    start: chrono::DateTime<Utc>,
    end: chrono::DateTime<Utc>,
    now: chrono::DateTime<Utc>,
) -> Result<(), AppError> {
    if end <= start {
        return Err(AppError::BadRequest(
            "End date must be after start date".to_string(),
        ));
    }
    if start < now {
        return Err(AppError::BadRequest(
            "Start date cannot be in the past".to_string(),
        ));
    }
    Ok(())
}

pub struct BookingController {
    bookings: BookingRepository,
    vehicles: VehicleRepository,
    payments: PaymentClient,
    token_cipher: crate::utils::crypto::TokenCipher,
}

impl BookingController {
    pub fn new(state: &AppState) -> Self {
        Self {
            bookings: BookingRepository::new(state.pool.clone()),
            vehicles: VehicleRepository::new(state.pool.clone()),
            payments: state.payments.clone(),
            token_cipher: state.token_cipher.clone(),
        }
    }

    /// Crear una reserva PENDING para el usuario autenticado
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateBookingRequest,
    ) -> Result<BookingResponse, AppError> {
        let now = Utc::now();

        validate_booking_dates(request.start_date, request.end_date, now)?;

        let vehicle = self
            .vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        if !vehicle.availability {
            return Err(AppError::Unavailable(
                "Vehicle is not available for booking".to_string(),
            ));
        }

        if self
            .bookings
            .has_overlap(vehicle.id, request.start_date, request.end_date)
            .await?
        {
            return Err(AppError::Conflict(
                "Vehicle is already booked for the selected dates".to_string(),
            ));
        }

        let total_price =
            pricing::rental_price(vehicle.price_per_day, request.start_date, request.end_date)?;

        // El constraint de exclusión convierte una inserción concurrente
        // solapada en Conflict aunque el has_overlap anterior pasara.
        let booking = self
            .bookings
            .create(
                user.user_id,
                vehicle.id,
                request.start_date,
                request.end_date,
                total_price,
            )
            .await?;

        tracing::info!(
            booking_id = %booking.id,
            vehicle_id = %vehicle.id,
            "Reserva creada en estado PENDING"
        );

        Ok(BookingResponse::from_booking(&booking, now))
    }

    /// Confirmar el pago de una reserva PENDING.
    ///
    /// `succeeded` confirma y guarda la referencia del procesador junto al
    /// token cifrado; `requires_action` y `failed` dejan la reserva PENDING.
    pub async fn confirm_payment(
        &self,
        user: &AuthenticatedUser,
        booking_id: Uuid,
        payment_method_token: &str,
    ) -> Result<PaymentResultResponse, AppError> {
        let now = Utc::now();

        let booking = self.load_owned(user, booking_id).await?;

        if booking.status != BookingStatus::Pending {
            return Err(AppError::InvalidState(
                "Booking is not pending payment".to_string(),
            ));
        }

        let charge = self
            .payments
            .charge(booking.id, booking.total_price, payment_method_token)
            .await?;

        match charge_outcome(charge)? {
            ChargeOutcome::Confirmed { transaction_ref } => {
                // El token nunca se persiste en claro
                let token_enc = self.token_cipher.encrypt(payment_method_token)?;

                let confirmed = self
                    .bookings
                    .confirm_payment(booking.id, token_enc, transaction_ref)
                    .await?;

                tracing::info!(booking_id = %confirmed.id, "Pago confirmado");

                Ok(PaymentResultResponse {
                    payment_status: PaymentStatus::Succeeded,
                    booking: BookingResponse::from_booking(&confirmed, now),
                })
            }
            ChargeOutcome::ActionRequired => {
                // La reserva sigue PENDING; el cliente debe completar la
                // acción y reintentar con la misma clave de idempotencia.
                Ok(PaymentResultResponse {
                    payment_status: PaymentStatus::RequiresAction,
                    booking: BookingResponse::from_booking(&booking, now),
                })
            }
        }
    }

    /// Cancelar una reserva propia con al menos 24h de antelación
    pub async fn cancel(
        &self,
        user: &AuthenticatedUser,
        booking_id: Uuid,
    ) -> Result<BookingResponse, AppError> {
        let now = Utc::now();

        let booking = self.load_owned(user, booking_id).await?;
        booking.check_cancellation_window(now)?;

        let cancelled = self
            .bookings
            .update_status(booking.id, BookingStatus::Cancelled)
            .await?;

        tracing::info!(booking_id = %cancelled.id, "Reserva cancelada");

        Ok(BookingResponse::from_booking(&cancelled, now))
    }

    pub async fn get_by_id(
        &self,
        user: &AuthenticatedUser,
        booking_id: Uuid,
    ) -> Result<BookingResponse, AppError> {
        let booking = self.load_owned(user, booking_id).await?;
        Ok(BookingResponse::from_booking(&booking, Utc::now()))
    }

    /// Reservas del usuario agrupadas por fase derivada del reloj
    pub async fn list_for_user(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<UserBookingsResponse, AppError> {
        let now = Utc::now();
        let bookings = self.bookings.list_by_user(user.user_id).await?;

        let mut response = UserBookingsResponse {
            upcoming: Vec::new(),
            active: Vec::new(),
            past: Vec::new(),
            cancelled: Vec::new(),
        };

        for booking in &bookings {
            let entry = BookingResponse::from_booking(booking, now);
            match booking.classify(now) {
                BookingPhase::Upcoming => response.upcoming.push(entry),
                BookingPhase::Active => response.active.push(entry),
                BookingPhase::Past => response.past.push(entry),
                BookingPhase::Cancelled => response.cancelled.push(entry),
            }
        }

        Ok(response)
    }

    /// Listado paginado para administración
    pub async fn list_all(
        &self,
        user: &AuthenticatedUser,
        page: i64,
        limit: i64,
    ) -> Result<BookingListResponse, AppError> {
        user.require(Capability::Admin)?;

        let now = Utc::now();
        let page = page.max(1);
        let limit = limit.clamp(1, 100);

        let bookings = self.bookings.list_paginated(page, limit).await?;
        let total = self.bookings.count_all().await?;

        Ok(BookingListResponse {
            bookings: bookings
                .iter()
                .map(|b| BookingResponse::from_booking(b, now))
                .collect(),
            total,
            page,
            per_page: limit,
        })
    }

    /// Override de estado por administración
    pub async fn update_status(
        &self,
        user: &AuthenticatedUser,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<BookingResponse, AppError> {
        user.require(Capability::Admin)?;

        let booking = self.bookings.update_status(booking_id, status).await?;
        Ok(BookingResponse::from_booking(&booking, Utc::now()))
    }

    /// Cargar una reserva verificando propiedad (o capacidad de admin)
    async fn load_owned(
        &self,
        user: &AuthenticatedUser,
        booking_id: Uuid,
    ) -> Result<Booking, AppError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        user.require(Capability::Owner(booking.user_id))?;

        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::Decimal;
    use crate::services::payment_service::ChargeResponse;

    #[test]
    fn test_past_start_date_rejected() {
        let now = Utc::now();
        let result =
            validate_booking_dates(now - Duration::hours(1), now + Duration::days(3), now);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_end_not_after_start_rejected() {
        let now = Utc::now();
        let start = now + Duration::days(2);
        assert!(validate_booking_dates(start, start, now).is_err());
        assert!(validate_booking_dates(start, start - Duration::days(1), now).is_err());
    }

    #[test]
    fn test_valid_future_range_accepted() {
        let now = Utc::now();
        let result =
            validate_booking_dates(now + Duration::days(1), now + Duration::days(4), now);
        assert!(result.is_ok());
    }

    #[test]
    fn test_requires_action_leaves_booking_pending() {
        let now = Utc::now();
        let booking = Booking {
            id: uuid::Uuid::new_v4(),
            user_id: uuid::Uuid::new_v4(),
            vehicle_id: uuid::Uuid::new_v4(),
            start_date: now + Duration::days(2),
            end_date: now + Duration::days(5),
            total_price: Decimal::from(150),
            status: BookingStatus::Pending,
            payment_token_enc: None,
            transaction_ref: None,
            created_at: now,
        };

        let outcome = charge_outcome(ChargeResponse {
            status: PaymentStatus::RequiresAction,
            transaction_id: None,
            reason: None,
        })
        .unwrap();
        assert_eq!(outcome, ChargeOutcome::ActionRequired);

        // En esta rama la reserva no se toca: la respuesta al cliente
        // la refleja tal cual, todavía PENDING
        let response = BookingResponse::from_booking(&booking, now);
        assert_eq!(response.status, BookingStatus::Pending);
        assert!(response.transaction_ref.is_none());
    }
}
