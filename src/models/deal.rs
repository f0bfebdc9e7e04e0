//! Modelo de Deal (código promocional)
//!
//! El código en texto plano nunca se almacena: la tabla guarda `code_hash`
//! (único). La validación de un código es una comprobación pura sobre la
//! fila una vez localizada por hash.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::errors::AppError;

/// Tipo de descuento de un deal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "discount_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

/// Deal - fila de la tabla deals
#[derive(Debug, Clone, FromRow)]
pub struct Deal {
    pub id: Uuid,
    pub code_hash: String,
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

/// Términos de descuento devueltos al validar un código.
/// Nunca incluye el hash almacenado.
#[derive(Debug, Clone, Serialize)]
pub struct DealTerms {
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_purchase: Option<Decimal>,
    pub description: Option<String>,
}

impl Deal {
    /// Comprobar si el deal es canjeable en `now`.
    ///
    /// Orden de comprobación: flag activo, ventana de validez, cupo de usos.
    pub fn check_validity(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        if !self.is_active {
            return Err(AppError::PromoInactive);
        }
        if now < self.valid_from || now > self.valid_until {
            return Err(AppError::PromoOutOfWindow);
        }
        if let Some(limit) = self.usage_limit {
            if self.usage_count >= limit {
                return Err(AppError::PromoLimitReached);
            }
        }
        Ok(())
    }

    /// Extraer los términos del descuento (sin exponer el hash)
    pub fn terms(&self) -> DealTerms {
        DealTerms {
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            min_purchase: self.min_purchase,
            description: self.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn deal(now: DateTime<Utc>) -> Deal {
        Deal {
            id: Uuid::new_v4(),
            code_hash: "0123456789abcdef0123456789abcdef".to_string(),
            description: Some("10% off".to_string()),
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::from(10),
            min_purchase: None,
            usage_limit: None,
            usage_count: 0,
            valid_from: now - Duration::days(1),
            valid_until: now + Duration::days(1),
            is_active: true,
            created_at: now,
        }
    }

    #[test]
    fn test_valid_deal_passes() {
        let now = Utc::now();
        assert!(deal(now).check_validity(now).is_ok());
    }

    #[test]
    fn test_inactive_deal_rejected() {
        let now = Utc::now();
        let mut d = deal(now);
        d.is_active = false;
        assert!(matches!(d.check_validity(now), Err(AppError::PromoInactive)));
    }

    #[test]
    fn test_expired_deal_rejected_even_if_active() {
        let now = Utc::now();
        let mut d = deal(now);
        d.valid_until = now - Duration::hours(1);
        assert!(d.is_active);
        assert!(matches!(
            d.check_validity(now),
            Err(AppError::PromoOutOfWindow)
        ));
    }

    #[test]
    fn test_not_yet_valid_deal_rejected() {
        let now = Utc::now();
        let mut d = deal(now);
        d.valid_from = now + Duration::hours(1);
        assert!(matches!(
            d.check_validity(now),
            Err(AppError::PromoOutOfWindow)
        ));
    }

    #[test]
    fn test_usage_limit_reached_rejected() {
        let now = Utc::now();
        let mut d = deal(now);
        d.usage_limit = Some(5);
        d.usage_count = 5;
        assert!(matches!(
            d.check_validity(now),
            Err(AppError::PromoLimitReached)
        ));
    }

    #[test]
    fn test_usage_below_limit_passes() {
        let now = Utc::now();
        let mut d = deal(now);
        d.usage_limit = Some(5);
        d.usage_count = 4;
        assert!(d.check_validity(now).is_ok());
    }

    #[test]
    fn test_terms_do_not_expose_hash() {
        let now = Utc::now();
        let d = deal(now);
        let json = serde_json::to_value(d.terms()).unwrap();
        assert!(json.get("code_hash").is_none());
        assert_eq!(json["discount_type"], "PERCENTAGE");
    }
}
