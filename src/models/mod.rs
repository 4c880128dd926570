pub mod blink;
pub mod gift_card;
pub mod payment;
