use async_trait::async_trait;
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;

use crate::utils::error::AppError;

/// The ledger collaborator consumed by the payment builder: recent
/// blockhash lookup, account existence checks for associated token
/// accounts, and pre-flight simulation. Everything network-bound lives
/// behind this trait.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn latest_blockhash(&self) -> Result<Hash, AppError>;

    async fn account_exists(&self, address: &Pubkey) -> Result<bool, AppError>;

    /// Ok when the engine accepts the transaction; `SimulationFailed` with
    /// the engine's logs otherwise.
    async fn simulate(&self, transaction: &Transaction) -> Result<(), AppError>;
}

/// Live ledger over the nonblocking Solana RPC client.
pub struct RpcLedger {
    client: RpcClient,
}

impl RpcLedger {
    pub fn new(rpc_url: String) -> Self {
        Self {
            client: RpcClient::new(rpc_url),
        }
    }
}

fn upstream(error: ClientError) -> AppError {
    AppError::Upstream(error.to_string())
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn latest_blockhash(&self) -> Result<Hash, AppError> {
        self.client.get_latest_blockhash().await.map_err(upstream)
    }

    async fn account_exists(&self, address: &Pubkey) -> Result<bool, AppError> {
        let response = self
            .client
            .get_account_with_commitment(address, self.client.commitment())
            .await
            .map_err(upstream)?;
        Ok(response.value.is_some())
    }

    async fn simulate(&self, transaction: &Transaction) -> Result<(), AppError> {
        let response = self
            .client
            .simulate_transaction(transaction)
            .await
            .map_err(upstream)?;
        if let Some(err) = response.value.err {
            let logs = response.value.logs.unwrap_or_default().join("; ");
            return Err(AppError::SimulationFailed(format!("{err} [{logs}]")));
        }
        Ok(())
    }
}

/// Canned ledger for tests: fixed blockhash, configurable account
/// existence, optional forced simulation failure.
#[cfg(test)]
pub mod mock {
    use super::*;

    pub struct MockLedger {
        pub accounts_exist: bool,
        pub fail_simulation: Option<String>,
    }

    impl Default for MockLedger {
        fn default() -> Self {
            Self {
                accounts_exist: true,
                fail_simulation: None,
            }
        }
    }

    #[async_trait]
    impl Ledger for MockLedger {
        async fn latest_blockhash(&self) -> Result<Hash, AppError> {
            Ok(Hash::default())
        }

        async fn account_exists(&self, _address: &Pubkey) -> Result<bool, AppError> {
            Ok(self.accounts_exist)
        }

        async fn simulate(&self, _transaction: &Transaction) -> Result<(), AppError> {
            match &self.fail_simulation {
                Some(diagnostic) => Err(AppError::SimulationFailed(diagnostic.clone())),
                None => Ok(()),
            }
        }
    }
}
