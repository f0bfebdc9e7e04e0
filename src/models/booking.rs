//! Modelo de Booking
//!
//! Este módulo contiene la fila de la tabla `bookings`, el enum de estado
//! persistido y las derivaciones puras sobre fechas (fase de presentación
//! y ventana de cancelación). La fase nunca se persiste: se calcula
//! siempre contra el reloj para evitar divergencia con la verdad almacenada.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::errors::AppError;

/// Estado persistido de una reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Estados que bloquean el calendario de un vehículo
    pub fn blocks_calendar(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// Fase de presentación de una reserva, derivada del reloj.
/// Nunca se guarda en la base de datos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingPhase {
    Upcoming,
    Active,
    Past,
    Cancelled,
}

/// Booking - fila de la tabla bookings
#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub status: BookingStatus,
    /// Token de método de pago cifrado (AES-256-GCM), nunca en texto plano
    pub payment_token_enc: Option<String>,
    /// Referencia de transacción devuelta por el procesador
    pub transaction_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Comprobar si esta reserva solapa con el rango propuesto.
    ///
    /// Solo las reservas que bloquean el calendario (PENDING/CONFIRMED)
    /// pueden solapar. El predicado es el mismo que aplica el constraint
    /// de exclusión en la base: existente.start ≤ propuesto.end AND
    /// existente.end ≥ propuesto.start.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.status.blocks_calendar() && self.start_date <= end && self.end_date >= start
    }

    /// Clasificar la reserva para presentación según el reloj.
    pub fn classify(&self, now: DateTime<Utc>) -> BookingPhase {
        match self.status {
            BookingStatus::Cancelled => BookingPhase::Cancelled,
            BookingStatus::Completed => BookingPhase::Past,
            BookingStatus::Pending | BookingStatus::Confirmed => {
                if now < self.start_date {
                    BookingPhase::Upcoming
                } else if now <= self.end_date {
                    BookingPhase::Active
                } else {
                    BookingPhase::Past
                }
            }
        }
    }

    /// Verificar la ventana de cancelación: solo se permite cancelar
    /// con al menos 24 horas de antelación al inicio.
    pub fn check_cancellation_window(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        if !self.status.blocks_calendar() {
            return Err(AppError::InvalidState(format!(
                "Cannot cancel a booking with status {:?}",
                self.status
            )));
        }
        if self.start_date - now < Duration::hours(24) {
            return Err(AppError::TooLate(
                "Cancellation is not allowed less than 24 hours before start date".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(status: BookingStatus, start: DateTime<Utc>, end: DateTime<Utc>) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            start_date: start,
            end_date: end,
            total_price: Decimal::from(150),
            status,
            payment_token_enc: None,
            transaction_ref: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_overlap_detected_for_intersecting_ranges() {
        let now = Utc::now();
        let b = booking(
            BookingStatus::Confirmed,
            now + Duration::days(2),
            now + Duration::days(5),
        );
        // Rango que entra por la mitad de la reserva existente
        assert!(b.overlaps(now + Duration::days(4), now + Duration::days(7)));
        // Rango que contiene por completo a la reserva existente
        assert!(b.overlaps(now + Duration::days(1), now + Duration::days(6)));
    }

    #[test]
    fn test_no_overlap_for_disjoint_ranges() {
        let now = Utc::now();
        let b = booking(
            BookingStatus::Pending,
            now + Duration::days(2),
            now + Duration::days(5),
        );
        assert!(!b.overlaps(now + Duration::days(6), now + Duration::days(9)));
        assert!(!b.overlaps(now - Duration::days(3), now + Duration::days(1)));
    }

    #[test]
    fn test_cancelled_booking_never_overlaps() {
        let now = Utc::now();
        let b = booking(
            BookingStatus::Cancelled,
            now + Duration::days(2),
            now + Duration::days(5),
        );
        assert!(!b.overlaps(now + Duration::days(3), now + Duration::days(4)));
    }

    #[test]
    fn test_classify_confirmed_before_start_is_upcoming() {
        let now = Utc::now();
        let b = booking(
            BookingStatus::Confirmed,
            now + Duration::days(2),
            now + Duration::days(5),
        );
        assert_eq!(b.classify(now), BookingPhase::Upcoming);
    }

    #[test]
    fn test_classify_spanning_now_is_active() {
        let now = Utc::now();
        let b = booking(
            BookingStatus::Confirmed,
            now - Duration::days(1),
            now + Duration::days(1),
        );
        assert_eq!(b.classify(now), BookingPhase::Active);
    }

    #[test]
    fn test_classify_ended_is_past() {
        let now = Utc::now();
        let b = booking(
            BookingStatus::Confirmed,
            now - Duration::days(5),
            now - Duration::days(2),
        );
        assert_eq!(b.classify(now), BookingPhase::Past);
    }

    #[test]
    fn test_classify_cancelled_wins_over_dates() {
        let now = Utc::now();
        let b = booking(
            BookingStatus::Cancelled,
            now + Duration::days(2),
            now + Duration::days(5),
        );
        assert_eq!(b.classify(now), BookingPhase::Cancelled);
    }

    #[test]
    fn test_cancellation_rejected_12_hours_before_start() {
        let now = Utc::now();
        let b = booking(
            BookingStatus::Confirmed,
            now + Duration::hours(12),
            now + Duration::days(3),
        );
        assert!(matches!(
            b.check_cancellation_window(now),
            Err(AppError::TooLate(_))
        ));
    }

    #[test]
    fn test_cancellation_allowed_48_hours_before_start() {
        let now = Utc::now();
        let b = booking(
            BookingStatus::Confirmed,
            now + Duration::hours(48),
            now + Duration::days(5),
        );
        assert!(b.check_cancellation_window(now).is_ok());
    }

    #[test]
    fn test_cancellation_rejected_for_completed_booking() {
        let now = Utc::now();
        let b = booking(
            BookingStatus::Completed,
            now + Duration::days(5),
            now + Duration::days(8),
        );
        assert!(matches!(
            b.check_cancellation_window(now),
            Err(AppError::InvalidState(_))
        ));
    }
}
