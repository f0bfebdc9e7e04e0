//! Cálculo de precios de alquiler
//!
//! Función pura: (tarifa diaria, fecha inicio, fecha fin) -> precio total.
//! La duración se cobra por días completos, redondeando hacia arriba.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::utils::errors::AppError;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Duración facturable en días completos (ceiling)
pub fn rental_duration_days(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<i64, AppError> {
    if end <= start {
        return Err(AppError::BadRequest(
            "End date must be after start date".to_string(),
        ));
    }
    let seconds = (end - start).num_seconds();
    Ok((seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY)
}

/// Precio total del alquiler: días facturables × tarifa diaria
pub fn rental_price(
    price_per_day: Decimal,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Decimal, AppError> {
    let days = rental_duration_days(start, end)?;
    Ok(price_per_day * Decimal::from(days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::str::FromStr;

    #[test]
    fn test_three_days_at_50_is_150() {
        let start = Utc::now();
        let end = start + Duration::days(3);
        let price = rental_price(Decimal::from(50), start, end).unwrap();
        assert_eq!(price, Decimal::from(150));
    }

    #[test]
    fn test_partial_day_rounds_up() {
        let start = Utc::now();
        let end = start + Duration::days(2) + Duration::hours(1);
        assert_eq!(rental_duration_days(start, end).unwrap(), 3);
    }

    #[test]
    fn test_exact_days_do_not_round_up() {
        let start = Utc::now();
        let end = start + Duration::days(7);
        assert_eq!(rental_duration_days(start, end).unwrap(), 7);
    }

    #[test]
    fn test_sub_day_rental_charges_one_day() {
        let start = Utc::now();
        let end = start + Duration::hours(5);
        let price = rental_price(Decimal::from(80), start, end).unwrap();
        assert_eq!(price, Decimal::from(80));
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let start = Utc::now();
        let end = start - Duration::days(1);
        assert!(matches!(
            rental_price(Decimal::from(50), start, end),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_end_equal_start_is_rejected() {
        let start = Utc::now();
        assert!(rental_duration_days(start, start).is_err());
    }

    #[test]
    fn test_decimal_rate_keeps_precision() {
        let start = Utc::now();
        let end = start + Duration::days(2);
        let rate = Decimal::from_str("49.99").unwrap();
        let price = rental_price(rate, start, end).unwrap();
        assert_eq!(price, Decimal::from_str("99.98").unwrap());
    }
}
