use customer_app::{app::store_sample_customer, types::Environment};
use tracing::{error, info};
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Variables from .env take effect before anything reads the environment
    dotenvy::dotenv().ok();

    let environment = Environment::from_env();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(environment.tracing_level()).into())
        .from_env_lossy();

    // Use JSON format for staging/production, regular format for development
    if environment.json_logs() {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).init();
    }

    match store_sample_customer().await {
        Ok(stored) => {
            info!(id = %stored.id, "Stored customer");
            println!("Stored customer {}", serde_json::to_string_pretty(&stored)?);
            Ok(())
        }
        Err(e) => {
            error!("Failed to store customer: {}", e);
            Err(e.into())
        }
    }
}
