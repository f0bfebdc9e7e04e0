use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::{Vehicle, VehicleSpecs};

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 100))]
    pub make: String,
    #[validate(length(min = 1, max = 100))]
    pub model: String,
    #[validate(range(min = 1950, max = 2100))]
    pub year: i32,
    #[validate(length(min = 1, max = 50))]
    pub vehicle_type: String,
    pub price_per_day: Decimal,
    #[validate(range(min = 1, max = 20))]
    pub seats: i32,
    #[validate(length(min = 1, max = 30))]
    pub transmission: String,
    #[validate(length(min = 1, max = 30))]
    pub fuel_type: String,
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_availability")]
    pub availability: bool,
}

fn default_availability() -> bool {
    true
}

// Request para actualizar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub vehicle_type: Option<String>,
    pub price_per_day: Option<Decimal>,
    pub seats: Option<i32>,
    pub transmission: Option<String>,
    pub fuel_type: Option<String>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub availability: Option<bool>,
}

/// Filtros de búsqueda del catálogo
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleFilters {
    pub vehicle_type: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub available: Option<bool>,
}

// Response de vehículo
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub name: String,
    pub vehicle_type: String,
    pub price_per_day: Decimal,
    pub availability: bool,
    pub specs: VehicleSpecs,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(v: Vehicle) -> Self {
        Self {
            id: v.id,
            name: v.name,
            vehicle_type: v.vehicle_type,
            price_per_day: v.price_per_day,
            availability: v.availability,
            specs: v.specs.0,
            description: v.description,
            features: v.features,
            images: v.images,
            created_at: v.created_at,
        }
    }
}
