use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::deal::{Deal, DealTerms, DiscountType};

// Request para crear un deal. El código llega en texto plano y
// solo se persiste su hash.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDealRequest {
    #[validate(length(min = 3, max = 40))]
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_purchase: Option<Decimal>,
    pub usage_limit: Option<i32>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

// Request para actualizar un deal existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDealRequest {
    #[validate(length(min = 3, max = 40))]
    pub code: Option<String>,
    pub description: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
    pub min_purchase: Option<Decimal>,
    pub usage_limit: Option<i32>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

// Request para validar un código en el checkout
#[derive(Debug, Deserialize)]
pub struct ValidateDealRequest {
    pub code: String,
}

// Response de deal para administración. El hash no sale de la base.
#[derive(Debug, Serialize)]
pub struct DealResponse {
    pub id: Uuid,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_purchase: Option<Decimal>,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Deal> for DealResponse {
    fn from(d: Deal) -> Self {
        Self {
            id: d.id,
            description: d.description,
            discount_type: d.discount_type,
            discount_value: d.discount_value,
            min_purchase: d.min_purchase,
            usage_limit: d.usage_limit,
            usage_count: d.usage_count,
            valid_from: d.valid_from,
            valid_until: d.valid_until,
            is_active: d.is_active,
            created_at: d.created_at,
        }
    }
}

/// Response de validación de un código
#[derive(Debug, Serialize)]
pub struct ValidateDealResponse {
    pub valid: bool,
    pub terms: DealTerms,
}
