//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    // Procesador de pagos externo
    pub payment_api_url: String,
    pub payment_api_key: String,
    pub payment_timeout_secs: u64,
    /// Clave AES-256 (hex, 64 chars) para cifrar tokens de pago en reposo
    pub payment_token_key: String,
    /// Salt para el hash de códigos promocionales
    pub promo_code_salt: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            payment_api_url: env::var("PAYMENT_API_URL").expect("PAYMENT_API_URL must be set"),
            payment_api_key: env::var("PAYMENT_API_KEY").expect("PAYMENT_API_KEY must be set"),
            payment_timeout_secs: env::var("PAYMENT_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("PAYMENT_TIMEOUT_SECS must be a valid number"),
            payment_token_key: env::var("PAYMENT_TOKEN_KEY")
                .expect("PAYMENT_TOKEN_KEY must be set"),
            promo_code_salt: env::var("PROMO_CODE_SALT").expect("PROMO_CODE_SALT must be set"),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
