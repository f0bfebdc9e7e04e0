use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::booking::{Booking, BookingPhase, BookingStatus};
use crate::services::payment_service::PaymentStatus;

// Request para crear una reserva
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub vehicle_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

// Request para confirmar el pago de una reserva
#[derive(Debug, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub payment_method_token: String,
}

// Request de administración para forzar un estado
#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

// Response de reserva. El token de pago cifrado nunca se expone.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub phase: BookingPhase,
    pub transaction_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BookingResponse {
    pub fn from_booking(b: &Booking, now: DateTime<Utc>) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            vehicle_id: b.vehicle_id,
            start_date: b.start_date,
            end_date: b.end_date,
            total_price: b.total_price,
            status: b.status,
            phase: b.classify(now),
            transaction_ref: b.transaction_ref.clone(),
            created_at: b.created_at,
        }
    }
}

/// Listado de reservas del usuario agrupado por fase derivada
#[derive(Debug, Serialize)]
pub struct UserBookingsResponse {
    pub upcoming: Vec<BookingResponse>,
    pub active: Vec<BookingResponse>,
    pub past: Vec<BookingResponse>,
    pub cancelled: Vec<BookingResponse>,
}

/// Resultado de un intento de pago
#[derive(Debug, Serialize)]
pub struct PaymentResultResponse {
    pub payment_status: PaymentStatus,
    pub booking: BookingResponse,
}

/// Listado paginado para administración
#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    pub bookings: Vec<BookingResponse>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// Parámetros de paginación
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
