use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post, put},
    Extension, Json, Router,
};
use futures::stream::Stream;
use std::convert::Infallible;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::controllers::admin_controller::AdminController;
use crate::controllers::booking_controller::BookingController;
use crate::dto::admin_dto::{BroadcastResponse, CreateBroadcastRequest, DashboardStats};
use crate::dto::booking_dto::{
    BookingListResponse, BookingResponse, PaginationParams, UpdateBookingStatusRequest,
};
use crate::dto::response::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas de back office; todas requieren autenticación y las operaciones
/// verifican la capacidad de administrador en el controller
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/bookings", get(list_bookings))
        .route("/bookings/:id/status", put(update_booking_status))
        .route("/broadcasts", post(create_broadcast))
        .route("/broadcasts", get(list_broadcasts))
        .route("/broadcasts/stream", get(broadcast_stream))
}

async fn get_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<DashboardStats>, AppError> {
    let controller = AdminController::new(&state);
    let response = controller.dashboard(&user).await?;
    Ok(Json(response))
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<BookingListResponse>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller
        .list_all(&user, params.page.unwrap_or(1), params.limit.unwrap_or(10))
        .await?;
    Ok(Json(response))
}

async fn update_booking_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller.update_status(&user, id, request.status).await?;
    Ok(Json(response))
}

async fn create_broadcast(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateBroadcastRequest>,
) -> Result<Json<ApiResponse<BroadcastResponse>>, AppError> {
    let controller = AdminController::new(&state);
    let response = controller.create_broadcast(&user, request).await?;
    Ok(Json(response))
}

async fn list_broadcasts(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<BroadcastResponse>>, AppError> {
    let controller = AdminController::new(&state);
    let response = controller.list_broadcasts(20).await?;
    Ok(Json(response))
}

/// Stream SSE de broadcasts. Fire-and-forget: un receptor rezagado
/// pierde los mensajes descartados y sigue con el siguiente.
async fn broadcast_stream(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthenticatedUser>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.notifier.subscribe();

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let sse_event = Event::default().event("broadcast").json_data(&event).ok()?;
                    return Some((Ok(sse_event), rx));
                }
                // Receptor rezagado: se saltan los mensajes perdidos
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
