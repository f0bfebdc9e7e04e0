//! Back office: dashboard agregado y broadcasts
//!
//! Los rollups son solo lectura. Los broadcasts se persisten y luego se
//! publican fire-and-forget a los clientes conectados.

use validator::Validate;

use crate::dto::admin_dto::{BroadcastResponse, CreateBroadcastRequest, DashboardStats};
use crate::dto::response::ApiResponse;
use crate::middleware::auth::{AuthenticatedUser, Capability};
use crate::repositories::broadcast_repository::BroadcastRepository;
use crate::repositories::stats_repository::StatsRepository;
use crate::services::notifier::BroadcastNotifier;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct AdminController {
    stats: StatsRepository,
    broadcasts: BroadcastRepository,
    notifier: BroadcastNotifier,
}

impl AdminController {
    pub fn new(state: &AppState) -> Self {
        Self {
            stats: StatsRepository::new(state.pool.clone()),
            broadcasts: BroadcastRepository::new(state.pool.clone()),
            notifier: state.notifier.clone(),
        }
    }

    pub async fn dashboard(&self, user: &AuthenticatedUser) -> Result<DashboardStats, AppError> {
        user.require(Capability::Admin)?;
        self.stats.dashboard().await
    }

    pub async fn create_broadcast(
        &self,
        user: &AuthenticatedUser,
        request: CreateBroadcastRequest,
    ) -> Result<ApiResponse<BroadcastResponse>, AppError> {
        user.require(Capability::Admin)?;
        request.validate()?;

        let broadcast = self
            .broadcasts
            .create(request.title, request.message, request.audience)
            .await?;

        // Fan-out sin garantía de entrega; 0 receptores no es un error
        let receivers = self.notifier.publish((&broadcast).into());
        tracing::info!(
            broadcast_id = %broadcast.id,
            receivers,
            "Broadcast publicado"
        );

        Ok(ApiResponse::success_with_message(
            broadcast.into(),
            "Broadcast enviado exitosamente".to_string(),
        ))
    }

    /// Anuncios recientes, visibles para cualquier usuario autenticado
    pub async fn list_broadcasts(&self, limit: i64) -> Result<Vec<BroadcastResponse>, AppError> {
        let broadcasts = self.broadcasts.list_recent(limit.clamp(1, 100)).await?;
        Ok(broadcasts.into_iter().map(Into::into).collect())
    }
}
