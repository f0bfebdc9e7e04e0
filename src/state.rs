//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Los colaboradores (pool, procesador de
//! pagos, notificador) se inyectan explícitamente, nunca como globals.

use sqlx::PgPool;

use crate::config::EnvironmentConfig;
use crate::services::notifier::BroadcastNotifier;
use crate::services::payment_service::PaymentClient;
use crate::utils::crypto::TokenCipher;
use crate::utils::errors::AppError;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub payments: PaymentClient,
    pub token_cipher: TokenCipher,
    pub notifier: BroadcastNotifier,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Result<Self, AppError> {
        let payments = PaymentClient::new(&config)?;
        let token_cipher = TokenCipher::from_hex_key(&config.payment_token_key)?;

        Ok(Self {
            pool,
            config,
            payments,
            token_cipher,
            notifier: BroadcastNotifier::new(),
        })
    }
}
