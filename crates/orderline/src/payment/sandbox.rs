//! Offline gateway for development and tests.
//!
//! Card tokens decide the outcome, like the processor's test tokens:
//!
//! | token | outcome |
//! |---|---|
//! | `tok_visa`, `tok_mastercard` | succeeds |
//! | `tok_chargeDeclined` | declined |
//! | `tok_chargeDeclinedInsufficientFunds` | declined, insufficient funds |
//! | `tok_threeDSecure` | requires customer action |

use crate::payment::{CardToken, GatewayError, IntentRequest, IntentStatus, PaymentGateway, PaymentIntent};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct SandboxGateway {
    intents: Mutex<HashMap<String, PaymentIntent>>,
    created: AtomicU32,
    confirmations: AtomicU32,
    outage: Option<String>,
}

impl SandboxGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway whose every call fails with `Unavailable(reason)`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            outage: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Number of intents created so far.
    pub fn intents_created(&self) -> u32 {
        self.created.load(Ordering::SeqCst)
    }

    pub fn confirmations(&self) -> u32 {
        self.confirmations.load(Ordering::SeqCst)
    }

    fn check_outage(&self) -> Result<(), GatewayError> {
        match &self.outage {
            Some(reason) => Err(GatewayError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PaymentGateway for SandboxGateway {
    async fn create_intent(&self, request: IntentRequest) -> Result<PaymentIntent, GatewayError> {
        self.check_outage()?;
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        let intent = PaymentIntent {
            id: format!("pi_sandbox_{n}"),
            client_secret: format!("pi_sandbox_{n}_secret"),
            amount: request.amount,
            currency: request.currency,
            status: IntentStatus::RequiresPaymentMethod,
        };
        info!(intent_id = %intent.id, amount = intent.amount, "Payment intent created");
        self.intents
            .lock()
            .await
            .insert(intent.client_secret.clone(), intent.clone());
        Ok(intent)
    }

    async fn confirm(
        &self,
        client_secret: &str,
        card: &CardToken,
    ) -> Result<PaymentIntent, GatewayError> {
        self.check_outage()?;
        self.confirmations.fetch_add(1, Ordering::SeqCst);
        let mut intents = self.intents.lock().await;
        let intent = intents
            .get_mut(client_secret)
            .ok_or_else(|| GatewayError::UnknownIntent(client_secret.to_string()))?;

        if intent.status == IntentStatus::Succeeded {
            debug!(intent_id = %intent.id, "Intent already succeeded");
            return Ok(intent.clone());
        }

        let status = match card.0.as_str() {
            "tok_visa" | "tok_mastercard" => IntentStatus::Succeeded,
            "tok_threeDSecure" => IntentStatus::RequiresAction,
            "tok_chargeDeclined" => {
                warn!(intent_id = %intent.id, "Card declined");
                return Err(GatewayError::Declined("Your card was declined.".to_string()));
            }
            "tok_chargeDeclinedInsufficientFunds" => {
                warn!(intent_id = %intent.id, "Card declined");
                return Err(GatewayError::Declined(
                    "Your card has insufficient funds.".to_string(),
                ));
            }
            _ => {
                return Err(GatewayError::Declined(
                    "Your card number is incorrect.".to_string(),
                ))
            }
        };
        intent.status = status;
        info!(intent_id = %intent.id, ?status, "Payment intent confirmed");
        Ok(intent.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn intent(gateway: &SandboxGateway) -> PaymentIntent {
        gateway
            .create_intent(IntentRequest::new(2049, "usd").unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_visa_succeeds() {
        let gateway = SandboxGateway::new();
        let created = intent(&gateway).await;
        assert_eq!(created.status, IntentStatus::RequiresPaymentMethod);

        let confirmed = gateway
            .confirm(&created.client_secret, &CardToken::new("tok_visa"))
            .await
            .unwrap();
        assert_eq!(confirmed.status, IntentStatus::Succeeded);
        assert_eq!(confirmed.amount, 2049);
        assert_eq!(gateway.intents_created(), 1);
    }

    #[tokio::test]
    async fn test_declines_and_actions() {
        let gateway = SandboxGateway::new();
        let created = intent(&gateway).await;

        let err = gateway
            .confirm(&created.client_secret, &CardToken::new("tok_chargeDeclined"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Your card was declined.");

        let pending = gateway
            .confirm(&created.client_secret, &CardToken::new("tok_threeDSecure"))
            .await
            .unwrap();
        assert_eq!(pending.status, IntentStatus::RequiresAction);

        assert!(matches!(
            gateway.confirm("pi_missing_secret", &CardToken::new("tok_visa")).await,
            Err(GatewayError::UnknownIntent(_))
        ));
    }

    #[tokio::test]
    async fn test_outage_fails_every_call() {
        let gateway = SandboxGateway::unavailable("maintenance");
        let err = gateway
            .create_intent(IntentRequest::new(100, "usd").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::Unavailable("maintenance".to_string()));
        assert_eq!(gateway.intents_created(), 0);
    }
}
