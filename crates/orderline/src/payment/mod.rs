//! # Payment Gateway
//!
//! The checkout talks to the card processor through [`PaymentGateway`]: create an intent for
//! an amount in minor units, then confirm it with the tokenised card the customer entered.
//! An intent only counts as paid once its status is [`IntentStatus::Succeeded`].
//!
//! [`SandboxGateway`] is an offline implementation driven by test card tokens.

pub mod error;
pub mod sandbox;

pub use error::GatewayError;
pub use sandbox::SandboxGateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Amount to charge, in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRequest {
    pub amount: i64,
    pub currency: String,
}

impl IntentRequest {
    /// Fails with `AmountRequired` unless `amount` is positive.
    pub fn new(amount: i64, currency: impl Into<String>) -> Result<Self, GatewayError> {
        if amount <= 0 {
            return Err(GatewayError::AmountRequired);
        }
        Ok(Self {
            amount,
            currency: currency.into(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    RequiresPaymentMethod,
    RequiresAction,
    Succeeded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
    pub status: IntentStatus,
}

/// A tokenised card, as produced by the gateway's client-side SDK.
#[derive(Clone, PartialEq, Eq)]
pub struct CardToken(pub String);

impl CardToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

// Tokens are card stand-ins; keep them out of logs.
impl std::fmt::Debug for CardToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CardToken(..)")
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_intent(&self, request: IntentRequest) -> Result<PaymentIntent, GatewayError>;

    /// Confirms the intent behind `client_secret` with `card`.
    ///
    /// `Ok` does not mean paid: check the returned status.
    async fn confirm(
        &self,
        client_secret: &str,
        card: &CardToken,
    ) -> Result<PaymentIntent, GatewayError>;
}
