use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{
    BookingResponse, ConfirmPaymentRequest, CreateBookingRequest, PaymentResultResponse,
    UserBookingsResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas de reservas; todas requieren autenticación
pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/", get(list_my_bookings))
        .route("/:id", get(get_booking))
        .route("/:id/payment", post(confirm_payment))
        .route("/:id/cancel", post(cancel_booking))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn list_my_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserBookingsResponse>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller.list_for_user(&user).await?;
    Ok(Json(response))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller.get_by_id(&user, id).await?;
    Ok(Json(response))
}

async fn confirm_payment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Result<Json<PaymentResultResponse>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller
        .confirm_payment(&user, id, &request.payment_method_token)
        .await?;
    Ok(Json(response))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller.cancel(&user, id).await?;
    Ok(Json(response))
}
