pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::blink::{Blink, TransferAction};
use crate::models::gift_card::GiftCard;
use crate::utils::error::AppError;

/// Persistence seam for Blink and gift card records. The lifecycle manager
/// only ever talks to this trait; backends are injected at startup.
///
/// Contract for implementors: `transition_blink` and `redeem_gift_card`
/// are atomic per entity. Two concurrent transition attempts on the same
/// id must yield exactly one success and one `InvalidState` (resp.
/// `AlreadyRedeemed`), never two successes. Records are never deleted.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_blink(&self, blink: Blink) -> Result<(), AppError>;

    async fn find_blink(&self, id: Uuid) -> Result<Blink, AppError>;

    /// All Blinks, newest first.
    async fn list_blinks(&self) -> Result<Vec<Blink>, AppError>;

    /// Apply a `pending -> completed | cancelled` transition, stamping the
    /// matching timestamp, and return the updated record.
    async fn transition_blink(&self, id: Uuid, action: TransferAction) -> Result<Blink, AppError>;

    async fn insert_gift_card(&self, card: GiftCard) -> Result<(), AppError>;

    /// Stamp `redeemed_by`/`redeemed_at` on an unredeemed code and return
    /// the updated card.
    async fn redeem_gift_card(&self, code: &str, redeemer: &str) -> Result<GiftCard, AppError>;
}
