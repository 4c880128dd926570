use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::address::{is_well_formed, mask};
use crate::utils::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "blink_status", rename_all = "lowercase")]
pub enum BlinkStatus {
    Pending,
    Completed,
    Cancelled,
}

impl std::fmt::Display for BlinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BlinkStatus::Pending => "pending",
            BlinkStatus::Completed => "completed",
            BlinkStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// A pending peer-to-peer transfer intent.
///
/// Only the store mutates records, and only through its atomic transition
/// operation; everything handed out is an owned copy. `completed_at` and
/// `cancelled_at` are mutually exclusive.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Blink {
    pub id: Uuid,
    pub from_address: String,
    pub to_address: String,
    pub amount: Decimal,
    pub status: BlinkStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Blink {
    /// Validate a creation request and mint the record: fresh id, status
    /// `pending`, creation timestamp, no terminal timestamps.
    pub fn create(request: CreateBlink) -> Result<Self, AppError> {
        request.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            from_address: request.from_address,
            to_address: request.to_address,
            amount: request.amount,
            status: BlinkStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
            cancelled_at: None,
        })
    }

    /// External view with both addresses masked.
    pub fn masked(&self) -> BlinkView {
        BlinkView {
            id: self.id,
            from_address: mask(&self.from_address),
            to_address: mask(&self.to_address),
            amount: self.amount,
            status: self.status,
            created_at: self.created_at,
            completed_at: self.completed_at,
            cancelled_at: self.cancelled_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlink {
    pub from_address: String,
    pub to_address: String,
    pub amount: Decimal,
}

impl CreateBlink {
    /// Reports the first violated constraint.
    pub fn validate(&self) -> Result<(), AppError> {
        if !is_well_formed(&self.from_address) {
            return Err(AppError::Validation(format!(
                "fromAddress is not a valid account address: {}",
                self.from_address
            )));
        }
        if !is_well_formed(&self.to_address) {
            return Err(AppError::Validation(format!(
                "toAddress is not a valid account address: {}",
                self.to_address
            )));
        }
        if self.amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "amount must be a positive number".to_string(),
            ));
        }
        Ok(())
    }
}

/// The two recognized lifecycle transitions. Anything else is rejected at
/// the boundary by deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferAction {
    Complete,
    Cancel,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub action: TransferAction,
}

/// Response form of a [`Blink`] with masked addresses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlinkView {
    pub id: Uuid,
    pub from_address: String,
    pub to_address: String,
    pub amount: Decimal,
    pub status: BlinkStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}
