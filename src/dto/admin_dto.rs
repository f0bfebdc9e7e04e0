use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::broadcast::{Broadcast, BroadcastAudience};

/// Conteo por tipo de vehículo
#[derive(Debug, Serialize)]
pub struct VehicleTypeCount {
    pub vehicle_type: String,
    pub count: i64,
}

/// Conteo por estado de reserva
#[derive(Debug, Serialize)]
pub struct BookingStatusCount {
    pub status: String,
    pub count: i64,
}

/// Ingresos de un mes calendario
#[derive(Debug, Serialize)]
pub struct MonthlyRevenue {
    pub month: DateTime<Utc>,
    pub revenue: Decimal,
}

/// Vehículo más reservado
#[derive(Debug, Serialize)]
pub struct TopVehicle {
    pub vehicle_id: Uuid,
    pub name: String,
    pub booking_count: i64,
}

/// Rollup del dashboard de administración
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub user_count: i64,
    pub vehicle_count: i64,
    pub total_bookings: i64,
    pub active_bookings: i64,
    pub deal_count: i64,
    pub total_revenue: Decimal,
    pub monthly_revenue: Decimal,
    pub growth_rate: f64,
    pub vehicles_by_type: Vec<VehicleTypeCount>,
    pub bookings_by_status: Vec<BookingStatusCount>,
    pub top_vehicles: Vec<TopVehicle>,
    pub monthly_revenue_series: Vec<MonthlyRevenue>,
}

// Request para crear un broadcast
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBroadcastRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    #[serde(default = "default_audience")]
    pub audience: BroadcastAudience,
}

fn default_audience() -> BroadcastAudience {
    BroadcastAudience::All
}

// Response de broadcast
#[derive(Debug, Serialize)]
pub struct BroadcastResponse {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub audience: BroadcastAudience,
    pub created_at: DateTime<Utc>,
}

impl From<Broadcast> for BroadcastResponse {
    fn from(b: Broadcast) -> Self {
        Self {
            id: b.id,
            title: b.title,
            message: b.message,
            audience: b.audience,
            created_at: b.created_at,
        }
    }
}
