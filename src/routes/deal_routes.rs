use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::deal_controller::DealController;
use crate::dto::deal_dto::{
    CreateDealRequest, DealResponse, UpdateDealRequest, ValidateDealRequest, ValidateDealResponse,
};
use crate::dto::response::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas públicas: deals vigentes y validación de códigos en el checkout
pub fn create_public_router() -> Router<AppState> {
    Router::new()
        .route("/active", get(list_active_deals))
        .route("/validate", post(validate_code))
}

/// Rutas autenticadas: canje y administración
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/redeem", post(redeem_code))
        .route("/", get(list_all_deals))
        .route("/", post(create_deal))
        .route("/:id", put(update_deal))
        .route("/:id", delete(delete_deal))
}

async fn list_active_deals(
    State(state): State<AppState>,
) -> Result<Json<Vec<DealResponse>>, AppError> {
    let controller = DealController::new(&state);
    let response = controller.list_active().await?;
    Ok(Json(response))
}

async fn validate_code(
    State(state): State<AppState>,
    Json(request): Json<ValidateDealRequest>,
) -> Result<Json<ValidateDealResponse>, AppError> {
    let controller = DealController::new(&state);
    let response = controller.validate_code(&request.code).await?;
    Ok(Json(response))
}

async fn redeem_code(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthenticatedUser>,
    Json(request): Json<ValidateDealRequest>,
) -> Result<Json<ValidateDealResponse>, AppError> {
    let controller = DealController::new(&state);
    let response = controller.redeem_code(&request.code).await?;
    Ok(Json(response))
}

async fn list_all_deals(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<DealResponse>>, AppError> {
    let controller = DealController::new(&state);
    let response = controller.list_all(&user).await?;
    Ok(Json(response))
}

async fn create_deal(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateDealRequest>,
) -> Result<Json<ApiResponse<DealResponse>>, AppError> {
    let controller = DealController::new(&state);
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn update_deal(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDealRequest>,
) -> Result<Json<ApiResponse<DealResponse>>, AppError> {
    let controller = DealController::new(&state);
    let response = controller.update(&user, id, request).await?;
    Ok(Json(response))
}

async fn delete_deal(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = DealController::new(&state);
    controller.delete(&user, id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Deal eliminado exitosamente"
    })))
}
