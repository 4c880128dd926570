use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::address::is_well_formed;
use crate::utils::error::AppError;

/// Unambiguous uppercase alphabet for redemption codes (no 0/O, 1/I).
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const CODE_GROUPS: usize = 4;
const CODE_GROUP_LEN: usize = 4;

/// A purchased gift card. The code redeems at most once; `redeemed_by` and
/// `redeemed_at` are stamped together by the store's atomic redeem.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GiftCard {
    pub id: Uuid,
    pub code: String,
    pub amount: Decimal,
    pub purchased_by: String,
    pub purchased_at: DateTime<Utc>,
    pub redeemed_by: Option<String>,
    pub redeemed_at: Option<DateTime<Utc>>,
}

impl GiftCard {
    /// Validate a purchase and mint the record with a fresh code. Payment
    /// for the card is verified upstream by the payment builder; nothing is
    /// deducted here.
    pub fn purchase(request: PurchaseGiftCard) -> Result<Self, AppError> {
        if !is_well_formed(&request.public_key) {
            return Err(AppError::Validation(format!(
                "publicKey is not a valid account address: {}",
                request.public_key
            )));
        }
        if request.amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "amount must be a positive number".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            code: generate_code(),
            amount: request.amount,
            purchased_by: request.public_key,
            purchased_at: Utc::now(),
            redeemed_by: None,
            redeemed_at: None,
        })
    }
}

fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    let mut code = String::with_capacity(CODE_GROUPS * (CODE_GROUP_LEN + 1) - 1);
    for group in 0..CODE_GROUPS {
        if group > 0 {
            code.push('-');
        }
        for _ in 0..CODE_GROUP_LEN {
            let idx = rng.gen_range(0..CODE_ALPHABET.len());
            code.push(CODE_ALPHABET[idx] as char);
        }
    }
    code
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseGiftCard {
    pub public_key: String,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemGiftCard {
    pub public_key: String,
    pub gift_code: String,
}

impl RedeemGiftCard {
    pub fn validate(&self) -> Result<(), AppError> {
        if !is_well_formed(&self.public_key) {
            return Err(AppError::Validation(format!(
                "publicKey is not a valid account address: {}",
                self.public_key
            )));
        }
        if self.gift_code.trim().is_empty() {
            return Err(AppError::Validation("giftCode is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftCardReceipt {
    pub gift_code: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct RedeemedAmount {
    pub amount: Decimal,
}
