use std::sync::Arc;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;

use bark_server::config::Config;
use bark_server::ledger::RpcLedger;
use bark_server::payments::PaymentBuilder;
use bark_server::routes::create_routes;
use bark_server::store::memory::Memory;
use bark_server::store::postgres::Postgres;
use bark_server::store::Store;
use bark_server::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            let store = Postgres::connect(url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Successfully connected to database");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store");
            Arc::new(Memory::default())
        }
    };

    let ledger = Arc::new(RpcLedger::new(config.rpc_url.clone()));
    let payments = Arc::new(PaymentBuilder::new(
        ledger,
        config.currencies.clone(),
        config.treasury_address,
        config.simulate_payments,
    ));

    let app = create_routes(AppState { store, payments });

    let addr = config.bind_address;
    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

async fn shutdown_signal() {
    signal::ctrl_c()
        .await
        .expect("Failed to install shutdown signal handler");
    tracing::info!("Shutdown signal received");
}
