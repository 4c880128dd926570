use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::blink::{Blink, TransferAction};
use crate::models::gift_card::GiftCard;
use crate::store::Store;
use crate::utils::error::AppError;

/// Postgres backend. Transitions and redemptions are expressed as
/// conditional updates, so the status check and the write are one atomic
/// statement; a lost race surfaces as zero updated rows.
pub struct Postgres {
    pool: PgPool,
}

impl Postgres {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for Postgres {
    async fn insert_blink(&self, blink: Blink) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO blinks \
             (id, from_address, to_address, amount, status, created_at, completed_at, cancelled_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(blink.id)
        .bind(&blink.from_address)
        .bind(&blink.to_address)
        .bind(blink.amount)
        .bind(blink.status)
        .bind(blink.created_at)
        .bind(blink.completed_at)
        .bind(blink.cancelled_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_blink(&self, id: Uuid) -> Result<Blink, AppError> {
        sqlx::query_as::<_, Blink>("SELECT * FROM blinks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Blink '{id}' was not found")))
    }

    async fn list_blinks(&self) -> Result<Vec<Blink>, AppError> {
        let blinks = sqlx::query_as::<_, Blink>("SELECT * FROM blinks ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(blinks)
    }

    async fn transition_blink(&self, id: Uuid, action: TransferAction) -> Result<Blink, AppError> {
        let query = match action {
            TransferAction::Complete => {
                "UPDATE blinks SET status = 'completed', completed_at = $2 \
                 WHERE id = $1 AND status = 'pending' RETURNING *"
            }
            TransferAction::Cancel => {
                "UPDATE blinks SET status = 'cancelled', cancelled_at = $2 \
                 WHERE id = $1 AND status = 'pending' RETURNING *"
            }
        };

        let updated = sqlx::query_as::<_, Blink>(query)
            .bind(id)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(blink) => Ok(blink),
            // Zero rows: either the id is unknown or someone else won the
            // transition. Re-read to tell the two apart.
            None => match self.find_blink(id).await {
                Ok(existing) => Err(AppError::InvalidState(format!(
                    "Blink '{id}' is already {}",
                    existing.status
                ))),
                Err(e) => Err(e),
            },
        }
    }

    async fn insert_gift_card(&self, card: GiftCard) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO gift_cards \
             (id, code, amount, purchased_by, purchased_at, redeemed_by, redeemed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(card.id)
        .bind(&card.code)
        .bind(card.amount)
        .bind(&card.purchased_by)
        .bind(card.purchased_at)
        .bind(&card.redeemed_by)
        .bind(card.redeemed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn redeem_gift_card(&self, code: &str, redeemer: &str) -> Result<GiftCard, AppError> {
        let updated = sqlx::query_as::<_, GiftCard>(
            "UPDATE gift_cards SET redeemed_by = $2, redeemed_at = $3 \
             WHERE code = $1 AND redeemed_by IS NULL RETURNING *",
        )
        .bind(code)
        .bind(redeemer)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(card) => Ok(card),
            None => {
                let existing =
                    sqlx::query_as::<_, GiftCard>("SELECT * FROM gift_cards WHERE code = $1")
                        .bind(code)
                        .fetch_optional(&self.pool)
                        .await?;
                match existing {
                    Some(_) => Err(AppError::AlreadyRedeemed(format!(
                        "Gift code '{code}' has already been redeemed"
                    ))),
                    None => Err(AppError::NotFound(format!(
                        "Gift code '{code}' was not found"
                    ))),
                }
            }
        }
    }
}
