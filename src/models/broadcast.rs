//! Modelo de Broadcast (anuncios de administración)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Audiencia objetivo de un broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "broadcast_audience", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BroadcastAudience {
    All,
    Users,
    Admins,
}

/// Broadcast - fila de la tabla broadcasts
#[derive(Debug, Clone, FromRow)]
pub struct Broadcast {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub audience: BroadcastAudience,
    pub created_at: DateTime<Utc>,
}

/// Evento publicado a los clientes conectados (fire-and-forget)
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastEvent {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&Broadcast> for BroadcastEvent {
    fn from(b: &Broadcast) -> Self {
        Self {
            id: b.id,
            title: b.title.clone(),
            message: b.message.clone(),
            timestamp: b.created_at,
        }
    }
}
