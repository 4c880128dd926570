use std::sync::Arc;

pub mod config;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod payments;
pub mod routes;
pub mod store;
pub mod utils;

use crate::payments::PaymentBuilder;
use crate::store::Store;

/// Shared handler state: the persistence backend and the payment
/// transaction builder, both injected at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub payments: Arc<PaymentBuilder>,
}
