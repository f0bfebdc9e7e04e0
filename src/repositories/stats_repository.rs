//! Consultas agregadas para el dashboard de administración
//!
//! Solo lecturas; los rollups reflejan el estado almacenado sin más
//! invariantes. Las reservas canceladas no cuentan como ingreso.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::dto::admin_dto::{
    BookingStatusCount, DashboardStats, MonthlyRevenue, TopVehicle, VehicleTypeCount,
};
use crate::utils::errors::AppError;

pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as(sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn revenue(&self, sql: &str) -> Result<Decimal, AppError> {
        let (sum,): (Option<Decimal>,) = sqlx::query_as(sql).fetch_one(&self.pool).await?;
        Ok(sum.unwrap_or(Decimal::ZERO))
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, AppError> {
        // La identidad vive en el proveedor externo; el conteo de usuarios
        // se deriva de los que han reservado alguna vez.
        let user_count = self
            .count("SELECT COUNT(DISTINCT user_id) FROM bookings")
            .await?;
        let vehicle_count = self.count("SELECT COUNT(*) FROM vehicles").await?;
        let total_bookings = self.count("SELECT COUNT(*) FROM bookings").await?;
        let active_bookings = self
            .count(
                "SELECT COUNT(*) FROM bookings WHERE status = 'CONFIRMED' \
                 AND start_date <= NOW() AND end_date >= NOW()",
            )
            .await?;
        let deal_count = self.count("SELECT COUNT(*) FROM deals").await?;

        let total_revenue = self
            .revenue("SELECT SUM(total_price) FROM bookings WHERE status <> 'CANCELLED'")
            .await?;
        let monthly_revenue = self
            .revenue(
                "SELECT SUM(total_price) FROM bookings WHERE status <> 'CANCELLED' \
                 AND created_at >= date_trunc('month', NOW())",
            )
            .await?;
        let previous_month_revenue = self
            .revenue(
                "SELECT SUM(total_price) FROM bookings WHERE status <> 'CANCELLED' \
                 AND created_at >= date_trunc('month', NOW()) - INTERVAL '1 month' \
                 AND created_at < date_trunc('month', NOW())",
            )
            .await?;

        let growth_rate = if previous_month_revenue > Decimal::ZERO {
            let ratio = (monthly_revenue - previous_month_revenue) / previous_month_revenue;
            (ratio * Decimal::from(100)).to_f64().unwrap_or(0.0)
        } else {
            0.0
        };

        let vehicles_by_type: Vec<(String, i64)> = sqlx::query_as(
            "SELECT vehicle_type, COUNT(*) FROM vehicles GROUP BY vehicle_type ORDER BY COUNT(*) DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let bookings_by_status: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status::TEXT, COUNT(*) FROM bookings GROUP BY status ORDER BY COUNT(*) DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let top_vehicles: Vec<(uuid::Uuid, String, i64)> = sqlx::query_as(
            r#"
            SELECT v.id, v.name, COUNT(b.id)
            FROM vehicles v
            JOIN bookings b ON b.vehicle_id = v.id
            GROUP BY v.id, v.name
            ORDER BY COUNT(b.id) DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let monthly_series: Vec<(chrono::DateTime<chrono::Utc>, Option<Decimal>)> =
            sqlx::query_as(
                r#"
                SELECT date_trunc('month', created_at) AS month, SUM(total_price)
                FROM bookings
                WHERE status <> 'CANCELLED'
                  AND created_at >= date_trunc('month', NOW()) - INTERVAL '11 months'
                GROUP BY month
                ORDER BY month
                "#,
            )
            .fetch_all(&self.pool)
            .await?;

        Ok(DashboardStats {
            user_count,
            vehicle_count,
            total_bookings,
            active_bookings,
            deal_count,
            total_revenue,
            monthly_revenue,
            growth_rate,
            vehicles_by_type: vehicles_by_type
                .into_iter()
                .map(|(vehicle_type, count)| VehicleTypeCount {
                    vehicle_type,
                    count,
                })
                .collect(),
            bookings_by_status: bookings_by_status
                .into_iter()
                .map(|(status, count)| BookingStatusCount { status, count })
                .collect(),
            top_vehicles: top_vehicles
                .into_iter()
                .map(|(vehicle_id, name, booking_count)| TopVehicle {
                    vehicle_id,
                    name,
                    booking_count,
                })
                .collect(),
            monthly_revenue_series: monthly_series
                .into_iter()
                .map(|(month, revenue)| MonthlyRevenue {
                    month,
                    revenue: revenue.unwrap_or(Decimal::ZERO),
                })
                .collect(),
        })
    }
}
