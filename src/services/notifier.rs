//! Fan-out de broadcasts en tiempo real
//!
//! Publicación fire-and-forget sobre un canal `tokio::sync::broadcast`;
//! los clientes se suscriben vía SSE. Un receptor rezagado pierde
//! mensajes, no hay garantía de entrega.

use tokio::sync::broadcast;

use crate::models::broadcast::BroadcastEvent;

/// Capacidad del canal; los mensajes por encima se descartan para
/// los receptores lentos.
const CHANNEL_CAPACITY: usize = 64;

/// Notificador de broadcasts compartido en el estado de la app
#[derive(Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<BroadcastEvent>,
}

impl BroadcastNotifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publicar un evento a todos los clientes conectados.
    /// Devuelve cuántos receptores lo recibieron (0 si no hay nadie conectado).
    pub fn publish(&self, event: BroadcastEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Suscribirse al stream de eventos
    pub fn subscribe(&self) -> broadcast::Receiver<BroadcastEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn event() -> BroadcastEvent {
        BroadcastEvent {
            id: Uuid::new_v4(),
            title: "Maintenance".to_string(),
            message: "The site will be down tonight".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_does_not_fail() {
        let notifier = BroadcastNotifier::new();
        assert_eq!(notifier.publish(event()), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let notifier = BroadcastNotifier::new();
        let mut rx = notifier.subscribe();
        let e = event();
        assert_eq!(notifier.publish(e.clone()), 1);
        let received = rx.recv().await.unwrap();
        assert_eq!(received.id, e.id);
        assert_eq!(received.title, "Maintenance");
    }
}
