//! Cliente del procesador de pagos externo
//!
//! El cobro se envía con un timeout acotado y una clave de idempotencia
//! derivada del id de la reserva: un reintento tras una respuesta ambigua
//! no puede producir un doble cobro.

use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::config::EnvironmentConfig;
use crate::utils::errors::AppError;

/// Estado reportado por el procesador
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Succeeded,
    RequiresAction,
    Failed,
}

/// Request de cobro enviado al procesador
#[derive(Debug, Serialize)]
pub struct ChargeRequest {
    pub amount: Decimal,
    pub currency: String,
    pub payment_method: String,
    pub idempotency_key: String,
    pub reference: String,
}

/// Response del procesador
#[derive(Debug, Clone, Deserialize)]
pub struct ChargeResponse {
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub reason: Option<String>,
}

/// Qué hacer con la reserva tras la respuesta del procesador
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeOutcome {
    /// Cobro realizado; confirmar la reserva con esta referencia
    Confirmed { transaction_ref: String },
    /// El cliente debe completar una acción; la reserva no se toca
    ActionRequired,
}

/// Interpretar la respuesta del procesador.
///
/// `failed` se convierte en `PaymentFailed` con la razón del procesador;
/// `succeeded` sin referencia de transacción es una respuesta malformada
/// y se trata como ambigua (la reserva queda PENDING y es reintentable).
pub fn charge_outcome(charge: ChargeResponse) -> Result<ChargeOutcome, AppError> {
    match charge.status {
        PaymentStatus::Succeeded => {
            let transaction_ref = charge.transaction_id.ok_or_else(|| {
                AppError::ServiceUnavailable(
                    "Payment processor reported success without a transaction id".to_string(),
                )
            })?;
            Ok(ChargeOutcome::Confirmed { transaction_ref })
        }
        PaymentStatus::RequiresAction => Ok(ChargeOutcome::ActionRequired),
        PaymentStatus::Failed => Err(AppError::PaymentFailed(
            charge
                .reason
                .unwrap_or_else(|| "Payment was declined".to_string()),
        )),
    }
}

/// Cliente HTTP del procesador de pagos
#[derive(Clone)]
pub struct PaymentClient {
    http: Client,
    api_url: String,
    api_key: String,
}

impl PaymentClient {
    pub fn new(config: &EnvironmentConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.payment_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Error building HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_url: config.payment_api_url.clone(),
            api_key: config.payment_api_key.clone(),
        })
    }

    /// Clave de idempotencia estable por reserva
    pub fn idempotency_key(booking_id: Uuid) -> String {
        format!("booking-{}", booking_id)
    }

    /// Cobrar una reserva.
    ///
    /// Un error de transporte (timeout, conexión) se reporta como 503 y la
    /// reserva queda PENDING; el mismo idempotency_key hace el reintento seguro.
    pub async fn charge(
        &self,
        booking_id: Uuid,
        amount: Decimal,
        payment_method: &str,
    ) -> Result<ChargeResponse, AppError> {
        let request = ChargeRequest {
            amount,
            currency: "USD".to_string(),
            payment_method: payment_method.to_string(),
            idempotency_key: Self::idempotency_key(booking_id),
            reference: booking_id.to_string(),
        };

        let response = self
            .http
            .post(format!("{}/v1/charges", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Payment processor unreachable: {}", e);
                AppError::ServiceUnavailable(
                    "Payment processor did not respond; the booking is still pending and the payment can be retried".to_string(),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Payment processor returned {}: {}", status, body);
            return Err(AppError::ServiceUnavailable(
                "Payment processor returned an unexpected response".to_string(),
            ));
        }

        response.json::<ChargeResponse>().await.map_err(|e| {
            tracing::error!("Invalid payment processor response: {}", e);
            AppError::ServiceUnavailable(
                "Payment processor returned an unreadable response".to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idempotency_key_is_stable_per_booking() {
        let id = Uuid::new_v4();
        assert_eq!(
            PaymentClient::idempotency_key(id),
            PaymentClient::idempotency_key(id)
        );
        assert_eq!(
            PaymentClient::idempotency_key(id),
            format!("booking-{}", id)
        );
    }

    #[test]
    fn test_charge_response_parses_snake_case_statuses() {
        let body = r#"{"status":"requires_action","transaction_id":null,"reason":null}"#;
        let parsed: ChargeResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status, PaymentStatus::RequiresAction);

        let body = r#"{"status":"succeeded","transaction_id":"txn_123","reason":null}"#;
        let parsed: ChargeResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status, PaymentStatus::Succeeded);
        assert_eq!(parsed.transaction_id.as_deref(), Some("txn_123"));

        let body = r#"{"status":"failed","transaction_id":null,"reason":"card_declined"}"#;
        let parsed: ChargeResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status, PaymentStatus::Failed);
        assert_eq!(parsed.reason.as_deref(), Some("card_declined"));
    }

    #[test]
    fn test_succeeded_charge_confirms_with_transaction_ref() {
        let outcome = charge_outcome(ChargeResponse {
            status: PaymentStatus::Succeeded,
            transaction_id: Some("txn_123".to_string()),
            reason: None,
        })
        .unwrap();
        assert_eq!(
            outcome,
            ChargeOutcome::Confirmed {
                transaction_ref: "txn_123".to_string()
            }
        );
    }

    #[test]
    fn test_requires_action_does_not_confirm() {
        let outcome = charge_outcome(ChargeResponse {
            status: PaymentStatus::RequiresAction,
            transaction_id: None,
            reason: None,
        })
        .unwrap();
        assert_eq!(outcome, ChargeOutcome::ActionRequired);
    }

    #[test]
    fn test_failed_charge_surfaces_processor_reason() {
        let result = charge_outcome(ChargeResponse {
            status: PaymentStatus::Failed,
            transaction_id: None,
            reason: Some("card_declined".to_string()),
        });
        assert!(matches!(result, Err(AppError::PaymentFailed(reason)) if reason == "card_declined"));
    }

    #[test]
    fn test_succeeded_without_transaction_id_is_ambiguous() {
        let result = charge_outcome(ChargeResponse {
            status: PaymentStatus::Succeeded,
            transaction_id: None,
            reason: None,
        });
        assert!(matches!(result, Err(AppError::ServiceUnavailable(_))));
    }
}
