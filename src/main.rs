mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{middleware::from_fn_with_state, response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::EnvironmentConfig;
use database::create_pool;
use middleware::auth::auth_middleware;
use middleware::cors::cors_middleware;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "torquex_rental=debug,tower_http=info".into()),
        )
        .init();

    info!("🚗 TorqueX Rental - API de alquiler de vehículos");
    info!("================================================");

    // Inicializar base de datos
    let pool = match create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let config = EnvironmentConfig::default();
    let port = config.port;

    let app_state = AppState::new(pool, config)
        .map_err(|e| anyhow::anyhow!("Error inicializando el estado: {}", e))?;

    // Rutas que requieren autenticación
    let authed_routes = Router::new()
        .nest("/api/bookings", routes::booking_routes::create_booking_router())
        .nest("/api/vehicles", routes::vehicle_routes::create_admin_router())
        .nest("/api/deals", routes::deal_routes::create_admin_router())
        .nest("/api/admin", routes::admin_routes::create_admin_router())
        .layer(from_fn_with_state(app_state.clone(), auth_middleware));

    let app = Router::new()
        .route("/health", get(health_endpoint))
        // Catálogo y deals públicos
        .nest("/api/vehicles", routes::vehicle_routes::create_public_router())
        .nest("/api/deals", routes::deal_routes::create_public_router())
        .merge(authed_routes)
        .layer(cors_middleware())
        .with_state(app_state);

    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚙 Catálogo:");
    info!("   GET  /api/vehicles - Listar vehículos (filtros: vehicle_type, min_price, max_price, available)");
    info!("   GET  /api/vehicles/:id - Detalle de vehículo");
    info!("   POST /api/vehicles - Crear vehículo (admin)");
    info!("   PUT  /api/vehicles/:id - Actualizar vehículo (admin)");
    info!("   DELETE /api/vehicles/:id - Eliminar vehículo (admin)");
    info!("📅 Reservas:");
    info!("   POST /api/bookings - Crear reserva");
    info!("   GET  /api/bookings - Mis reservas (agrupadas por fase)");
    info!("   GET  /api/bookings/:id - Detalle de reserva");
    info!("   POST /api/bookings/:id/payment - Confirmar pago");
    info!("   POST /api/bookings/:id/cancel - Cancelar reserva");
    info!("🎟  Deals:");
    info!("   GET  /api/deals/active - Deals vigentes");
    info!("   POST /api/deals/validate - Validar código promocional");
    info!("   POST /api/deals/redeem - Canjear código (autenticado)");
    info!("   GET/POST/PUT/DELETE /api/deals - Gestión de deals (admin)");
    info!("🛠  Back office:");
    info!("   GET  /api/admin/dashboard - Rollups del dashboard");
    info!("   GET  /api/admin/bookings - Reservas paginadas");
    info!("   PUT  /api/admin/bookings/:id/status - Forzar estado de reserva");
    info!("   POST /api/admin/broadcasts - Crear broadcast");
    info!("   GET  /api/admin/broadcasts - Broadcasts recientes");
    info!("   GET  /api/admin/broadcasts/stream - Stream SSE de broadcasts");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "torquex-rental",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
