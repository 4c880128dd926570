use std::str::FromStr;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_instruction;
use solana_sdk::transaction::Transaction;
use spl_associated_token_account::get_associated_token_address;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use uuid::Uuid;

use crate::config::CurrencySpec;
use crate::ledger::Ledger;
use crate::models::payment::{PaymentRequest, PreparedPayment};
use crate::utils::error::AppError;

/// Builds unsigned transfer transactions for client-side signing.
///
/// Native payments become a single system transfer; token payments move
/// funds between the parties' associated token accounts, creating the
/// recipient's account in the same transaction when it does not exist yet.
pub struct PaymentBuilder {
    ledger: Arc<dyn Ledger>,
    currencies: Vec<CurrencySpec>,
    treasury: Option<Pubkey>,
    simulate: bool,
}

impl PaymentBuilder {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        currencies: Vec<CurrencySpec>,
        treasury: Option<Pubkey>,
        simulate: bool,
    ) -> Self {
        Self {
            ledger,
            currencies,
            treasury,
            simulate,
        }
    }

    pub async fn build(&self, request: &PaymentRequest) -> Result<PreparedPayment, AppError> {
        if request.amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "amount must be a positive number".to_string(),
            ));
        }
        let currency = self
            .currencies
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(&request.currency))
            .ok_or_else(|| {
                AppError::Validation(format!("unsupported currency: {}", request.currency))
            })?;
        let payer = parse_pubkey(&request.buyer_public_key, "buyerPublicKey")?;
        let recipient = match &request.recipient {
            Some(address) => parse_pubkey(address, "recipient")?,
            None => self.treasury.ok_or_else(|| {
                AppError::Validation(
                    "no recipient given and no treasury address configured".to_string(),
                )
            })?,
        };
        let base_amount = to_base_units(request.amount, currency.decimals)?;

        let mut instructions: Vec<Instruction> = Vec::new();
        match &currency.mint {
            None => {
                instructions.push(system_instruction::transfer(&payer, &recipient, base_amount));
            }
            Some(mint) => {
                let payer_account = get_associated_token_address(&payer, mint);
                let recipient_account = get_associated_token_address(&recipient, mint);
                if !self.ledger.account_exists(&recipient_account).await? {
                    // Must precede the transfer: instructions execute in
                    // order within the transaction, so the account exists
                    // by the time the transfer runs.
                    instructions.push(create_associated_token_account_idempotent(
                        &payer,
                        &recipient,
                        mint,
                        &spl_token::id(),
                    ));
                }
                instructions.push(
                    spl_token::instruction::transfer_checked(
                        &spl_token::id(),
                        &payer_account,
                        mint,
                        &recipient_account,
                        &payer,
                        &[],
                        base_amount,
                        currency.decimals,
                    )
                    .map_err(|e| AppError::Internal(e.to_string()))?,
                );
            }
        }

        let blockhash = self.ledger.latest_blockhash().await?;
        let message = Message::new_with_blockhash(&instructions, Some(&payer), &blockhash);
        let transaction = Transaction::new_unsigned(message);

        if self.simulate {
            self.ledger.simulate(&transaction).await?;
        }

        // Signing happens client-side, so signatures are absent by design
        let bytes =
            bincode::serialize(&transaction).map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(PreparedPayment {
            transaction: BASE64.encode(bytes),
            transaction_id: Uuid::new_v4(),
        })
    }
}

fn parse_pubkey(address: &str, field: &str) -> Result<Pubkey, AppError> {
    Pubkey::from_str(address).map_err(|_| {
        AppError::Validation(format!("{field} is not a valid account address: {address}"))
    })
}

/// Exact conversion into the currency's smallest unit. Fails on excess
/// fractional digits or overflow rather than rounding.
fn to_base_units(amount: Decimal, decimals: u8) -> Result<u64, AppError> {
    let factor = 10u64
        .checked_pow(decimals as u32)
        .ok_or_else(|| AppError::Validation(format!("unsupported decimal count: {decimals}")))?;
    let scaled = amount
        .checked_mul(Decimal::from(factor))
        .ok_or_else(|| AppError::Validation("amount is out of range".to_string()))?;
    if !scaled.fract().is_zero() {
        return Err(AppError::Validation(format!(
            "amount has more than {decimals} decimal places"
        )));
    }
    scaled
        .to_u64()
        .ok_or_else(|| AppError::Validation("amount is out of range".to_string()))
}
