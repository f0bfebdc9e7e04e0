//! Modelo de Vehicle
//!
//! Mapea exactamente a la tabla `vehicles`. Las specs estructuradas
//! (marca/modelo/año/asientos/transmisión/combustible) se guardan como JSONB.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Especificaciones estructuradas de un vehículo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleSpecs {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub seats: i32,
    pub transmission: String,
    pub fuel_type: String,
}

/// Vehicle - fila de la tabla vehicles
#[derive(Debug, Clone, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub vehicle_type: String,
    pub price_per_day: Decimal,
    pub availability: bool,
    pub specs: sqlx::types::Json<VehicleSpecs>,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}
