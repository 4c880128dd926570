use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3001";
const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Mainnet USDC mint, overridable via `USDC_MINT` for devnet runs.
const DEFAULT_USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
const DEFAULT_BARK_MINT: &str = "2NTvEssJ2i998V2cMGT4Fy3JhyFnAzHFonDo9dbAkVrg";

/// One entry of the supported-currency table. `mint` is absent for the
/// network's native coin.
#[derive(Debug, Clone)]
pub struct CurrencySpec {
    pub code: String,
    pub mint: Option<Pubkey>,
    pub decimals: u8,
}

/// Runtime configuration, read from the environment exactly once in `main`
/// and passed down explicitly. No module reads the environment afterwards.
pub struct Config {
    pub bind_address: SocketAddr,
    /// Absent means the in-memory store (local runs and tests).
    pub database_url: Option<String>,
    pub rpc_url: String,
    /// Default payment recipient (the merchant account).
    pub treasury_address: Option<Pubkey>,
    /// Pre-flight simulate built transactions before returning them.
    pub simulate_payments: bool,
    pub currencies: Vec<CurrencySpec>,
}

impl Config {
    pub fn from_env() -> Self {
        let bind_address = env::var("BIND_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string())
            .parse()
            .expect("BIND_ADDRESS must be a socket address");

        let treasury_address = env::var("TREASURY_ADDRESS").ok().map(|addr| {
            Pubkey::from_str(&addr).expect("TREASURY_ADDRESS must be a valid account address")
        });

        let simulate_payments = env::var("SIMULATE_PAYMENTS")
            .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        Self {
            bind_address,
            database_url: env::var("DATABASE_URL").ok(),
            rpc_url: env::var("SOLANA_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string()),
            treasury_address,
            simulate_payments,
            currencies: vec![
                CurrencySpec {
                    code: "SOL".to_string(),
                    mint: None,
                    decimals: 9,
                },
                CurrencySpec {
                    code: "USDC".to_string(),
                    mint: Some(mint_from_env("USDC_MINT", DEFAULT_USDC_MINT)),
                    decimals: 6,
                },
                CurrencySpec {
                    code: "BARK".to_string(),
                    mint: Some(mint_from_env("BARK_MINT", DEFAULT_BARK_MINT)),
                    decimals: 9,
                },
            ],
        }
    }
}

fn mint_from_env(var: &str, default: &str) -> Pubkey {
    let value = env::var(var).unwrap_or_else(|_| default.to_string());
    Pubkey::from_str(&value).unwrap_or_else(|_| panic!("{var} must be a valid mint address"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mints_parse() {
        assert!(Pubkey::from_str(DEFAULT_USDC_MINT).is_ok());
        assert!(Pubkey::from_str(DEFAULT_BARK_MINT).is_ok());
    }
}
