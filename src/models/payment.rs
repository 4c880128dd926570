use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A payment/checkout request. Transient; nothing here is persisted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub buyer_public_key: String,
    pub amount: Decimal,
    /// Code into the configured currency table, e.g. "SOL", "USDC", "BARK".
    pub currency: String,
    /// Defaults to the configured treasury address when omitted.
    #[serde(default)]
    pub recipient: Option<String>,
}

/// An unsigned transaction ready for client-side signing, plus a tracking
/// id. Confirmation and settlement happen outside this service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedPayment {
    /// Base64 of the bincode-serialized transaction, signatures not required.
    pub transaction: String,
    pub transaction_id: Uuid,
}
