use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::blink::{Blink, BlinkStatus, TransferAction};
use crate::models::gift_card::GiftCard;
use crate::store::Store;
use crate::utils::error::AppError;

#[derive(Default)]
struct Data {
    blinks: HashMap<Uuid, Blink>,
    gift_cards: HashMap<String, GiftCard>,
}

/// In-memory backend. Backs tests and local runs without a database; all
/// read-modify-write sequences run under the write lock, which makes
/// transitions and redemptions atomic per entity.
#[derive(Default, Clone)]
pub struct Memory {
    data: Arc<RwLock<Data>>,
}

#[async_trait]
impl Store for Memory {
    async fn insert_blink(&self, blink: Blink) -> Result<(), AppError> {
        let mut data = self.data.write().await;
        data.blinks.insert(blink.id, blink);
        Ok(())
    }

    async fn find_blink(&self, id: Uuid) -> Result<Blink, AppError> {
        let data = self.data.read().await;
        data.blinks
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Blink '{id}' was not found")))
    }

    async fn list_blinks(&self) -> Result<Vec<Blink>, AppError> {
        let data = self.data.read().await;
        let mut blinks: Vec<Blink> = data.blinks.values().cloned().collect();
        blinks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(blinks)
    }

    async fn transition_blink(&self, id: Uuid, action: TransferAction) -> Result<Blink, AppError> {
        let mut data = self.data.write().await;
        let blink = data
            .blinks
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Blink '{id}' was not found")))?;
        if blink.status != BlinkStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "Blink '{id}' is already {}",
                blink.status
            )));
        }
        let now = Utc::now();
        match action {
            TransferAction::Complete => {
                blink.status = BlinkStatus::Completed;
                blink.completed_at = Some(now);
            }
            TransferAction::Cancel => {
                blink.status = BlinkStatus::Cancelled;
                blink.cancelled_at = Some(now);
            }
        }
        Ok(blink.clone())
    }

    async fn insert_gift_card(&self, card: GiftCard) -> Result<(), AppError> {
        let mut data = self.data.write().await;
        data.gift_cards.insert(card.code.clone(), card);
        Ok(())
    }

    async fn redeem_gift_card(&self, code: &str, redeemer: &str) -> Result<GiftCard, AppError> {
        let mut data = self.data.write().await;
        let card = data
            .gift_cards
            .get_mut(code)
            .ok_or_else(|| AppError::NotFound(format!("Gift code '{code}' was not found")))?;
        if card.redeemed_by.is_some() {
            return Err(AppError::AlreadyRedeemed(format!(
                "Gift code '{code}' has already been redeemed"
            )));
        }
        card.redeemed_by = Some(redeemer.to_string());
        card.redeemed_at = Some(Utc::now());
        Ok(card.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::blink::CreateBlink;
    use crate::models::gift_card::PurchaseGiftCard;
    use rust_decimal::Decimal;
    use solana_sdk::pubkey::Pubkey;

    fn new_blink() -> Blink {
        Blink::create(CreateBlink {
            from_address: Pubkey::new_unique().to_string(),
            to_address: Pubkey::new_unique().to_string(),
            amount: Decimal::new(15, 1),
        })
        .unwrap()
    }

    fn new_gift_card() -> GiftCard {
        GiftCard::purchase(PurchaseGiftCard {
            public_key: Pubkey::new_unique().to_string(),
            amount: Decimal::new(100, 0),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_find_unknown_blink() {
        let store = Memory::default();
        assert!(matches!(
            store.find_blink(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_complete_stamps_exactly_once() {
        let store = Memory::default();
        let blink = new_blink();
        let id = blink.id;
        store.insert_blink(blink).await.unwrap();

        let completed = store
            .transition_blink(id, TransferAction::Complete)
            .await
            .unwrap();
        assert_eq!(completed.status, BlinkStatus::Completed);
        assert!(completed.completed_at.is_some());
        assert!(completed.cancelled_at.is_none());

        // Second transition of either kind fails and changes nothing
        match store.transition_blink(id, TransferAction::Complete).await {
            Err(AppError::InvalidState(msg)) => assert!(msg.contains("completed")),
            other => panic!("expected invalid state, got {other:?}"),
        }
        assert!(matches!(
            store.transition_blink(id, TransferAction::Cancel).await,
            Err(AppError::InvalidState(_))
        ));

        let stored = store.find_blink(id).await.unwrap();
        assert_eq!(stored.status, BlinkStatus::Completed);
        assert!(stored.cancelled_at.is_none());
    }

    #[tokio::test]
    async fn test_cancel_is_terminal() {
        let store = Memory::default();
        let blink = new_blink();
        let id = blink.id;
        store.insert_blink(blink).await.unwrap();

        let cancelled = store
            .transition_blink(id, TransferAction::Cancel)
            .await
            .unwrap();
        assert_eq!(cancelled.status, BlinkStatus::Cancelled);
        assert!(cancelled.cancelled_at.is_some());
        assert!(cancelled.completed_at.is_none());

        assert!(matches!(
            store.transition_blink(id, TransferAction::Complete).await,
            Err(AppError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_transition_unknown_id() {
        let store = Memory::default();
        assert!(matches!(
            store
                .transition_blink(Uuid::new_v4(), TransferAction::Complete)
                .await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = Memory::default();
        let first = new_blink();
        let second = new_blink();
        store.insert_blink(first.clone()).await.unwrap();
        store.insert_blink(second.clone()).await.unwrap();

        let listed = store.list_blinks().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].created_at >= listed[1].created_at);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_transitions_have_one_winner() {
        let store = Memory::default();
        for _ in 0..32 {
            let blink = new_blink();
            let id = blink.id;
            store.insert_blink(blink).await.unwrap();

            let complete_store = store.clone();
            let cancel_store = store.clone();
            let complete = tokio::spawn(async move {
                complete_store
                    .transition_blink(id, TransferAction::Complete)
                    .await
            });
            let cancel = tokio::spawn(async move {
                cancel_store
                    .transition_blink(id, TransferAction::Cancel)
                    .await
            });

            let complete = complete.await.unwrap();
            let cancel = cancel.await.unwrap();
            assert!(
                complete.is_ok() ^ cancel.is_ok(),
                "exactly one transition must win: complete={complete:?} cancel={cancel:?}"
            );
            if let Err(e) = &complete {
                assert!(matches!(e, AppError::InvalidState(_)));
            }
            if let Err(e) = &cancel {
                assert!(matches!(e, AppError::InvalidState(_)));
            }

            let stored = store.find_blink(id).await.unwrap();
            assert_ne!(stored.status, BlinkStatus::Pending);
            assert!(
                stored.completed_at.is_some() ^ stored.cancelled_at.is_some(),
                "a record must never carry both terminal timestamps"
            );
        }
    }

    #[tokio::test]
    async fn test_redeem_twice() {
        let store = Memory::default();
        let card = new_gift_card();
        let code = card.code.clone();
        let amount = card.amount;
        store.insert_gift_card(card).await.unwrap();

        let redeemer = Pubkey::new_unique().to_string();
        let redeemed = store.redeem_gift_card(&code, &redeemer).await.unwrap();
        assert_eq!(redeemed.amount, amount);
        assert_eq!(redeemed.redeemed_by.as_deref(), Some(redeemer.as_str()));
        assert!(redeemed.redeemed_at.is_some());

        assert!(matches!(
            store.redeem_gift_card(&code, &redeemer).await,
            Err(AppError::AlreadyRedeemed(_))
        ));
    }

    #[tokio::test]
    async fn test_redeem_unknown_code() {
        let store = Memory::default();
        assert!(matches!(
            store.redeem_gift_card("AAAA-BBBB-CCCC-DDDD", "x").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_redemptions_have_one_winner() {
        let store = Memory::default();
        for _ in 0..16 {
            let card = new_gift_card();
            let code = card.code.clone();
            store.insert_gift_card(card).await.unwrap();

            let left_store = store.clone();
            let right_store = store.clone();
            let left_code = code.clone();
            let right_code = code.clone();
            let left =
                tokio::spawn(
                    async move { left_store.redeem_gift_card(&left_code, "wallet-a").await },
                );
            let right = tokio::spawn(async move {
                right_store.redeem_gift_card(&right_code, "wallet-b").await
            });

            let left = left.await.unwrap();
            let right = right.await.unwrap();
            assert!(left.is_ok() ^ right.is_ok());
        }
    }
}
