//! Gestión y validación de códigos promocionales
//!
//! Los códigos se buscan siempre por hash del texto normalizado; el
//! texto plano no toca la base de datos ni los logs.

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::deal_dto::{
    CreateDealRequest, DealResponse, UpdateDealRequest, ValidateDealResponse,
};
use crate::dto::response::ApiResponse;
use crate::middleware::auth::{AuthenticatedUser, Capability};
use crate::repositories::deal_repository::DealRepository;
use crate::utils::errors::AppError;
use crate::utils::hash::promo_code_hash;

pub struct DealController {
    repository: DealRepository,
    promo_salt: String,
}

impl DealController {
    pub fn new(state: &crate::state::AppState) -> Self {
        Self {
            repository: DealRepository::new(state.pool.clone()),
            promo_salt: state.config.promo_code_salt.clone(),
        }
    }

    /// Validar un código en el checkout. Devuelve los términos del
    /// descuento; nunca el hash almacenado.
    pub async fn validate_code(&self, code: &str) -> Result<ValidateDealResponse, AppError> {
        let hash = promo_code_hash(code, &self.promo_salt);

        let deal = self
            .repository
            .find_by_code_hash(&hash)
            .await?
            .ok_or_else(|| AppError::NotFound("Promo code not found".to_string()))?;

        deal.check_validity(Utc::now())?;

        Ok(ValidateDealResponse {
            valid: true,
            terms: deal.terms(),
        })
    }

    /// Canjear un código: validar y consumir un uso del cupo
    pub async fn redeem_code(&self, code: &str) -> Result<ValidateDealResponse, AppError> {
        let hash = promo_code_hash(code, &self.promo_salt);

        let deal = self
            .repository
            .find_by_code_hash(&hash)
            .await?
            .ok_or_else(|| AppError::NotFound("Promo code not found".to_string()))?;

        deal.check_validity(Utc::now())?;

        // El UPDATE con guard hace que dos canjes concurrentes no superen el cupo
        let deal = self.repository.increment_usage(deal.id).await?;

        Ok(ValidateDealResponse {
            valid: true,
            terms: deal.terms(),
        })
    }

    /// Listado público de deals vigentes (sin hashes)
    pub async fn list_active(&self) -> Result<Vec<DealResponse>, AppError> {
        let deals = self.repository.list_currently_valid().await?;
        Ok(deals.into_iter().map(Into::into).collect())
    }

    pub async fn list_all(&self, user: &AuthenticatedUser) -> Result<Vec<DealResponse>, AppError> {
        user.require(Capability::Admin)?;

        let deals = self.repository.list_all().await?;
        Ok(deals.into_iter().map(Into::into).collect())
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateDealRequest,
    ) -> Result<ApiResponse<DealResponse>, AppError> {
        user.require(Capability::Admin)?;
        request.validate()?;

        if request.valid_until <= request.valid_from {
            return Err(AppError::BadRequest(
                "validUntil must be after validFrom".to_string(),
            ));
        }

        let code_hash = promo_code_hash(&request.code, &self.promo_salt);

        let deal = self
            .repository
            .create(
                code_hash,
                request.description,
                request.discount_type,
                request.discount_value,
                request.min_purchase,
                request.usage_limit,
                request.valid_from,
                request.valid_until,
                request.is_active,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            deal.into(),
            "Deal creado exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateDealRequest,
    ) -> Result<ApiResponse<DealResponse>, AppError> {
        user.require(Capability::Admin)?;
        request.validate()?;

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Deal not found".to_string()))?;

        let code_hash = request
            .code
            .as_deref()
            .map(|code| promo_code_hash(code, &self.promo_salt));

        let valid_from = request.valid_from.unwrap_or(current.valid_from);
        let valid_until = request.valid_until.unwrap_or(current.valid_until);
        if valid_until <= valid_from {
            return Err(AppError::BadRequest(
                "validUntil must be after validFrom".to_string(),
            ));
        }

        let deal = self
            .repository
            .update(
                id,
                code_hash,
                request.description.or(current.description),
                request.discount_type.unwrap_or(current.discount_type),
                request.discount_value.unwrap_or(current.discount_value),
                request.min_purchase.or(current.min_purchase),
                request.usage_limit.or(current.usage_limit),
                valid_from,
                valid_until,
                request.is_active.unwrap_or(current.is_active),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            deal.into(),
            "Deal actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        user.require(Capability::Admin)?;
        self.repository.delete(id).await
    }
}
