use job_feed::{config::Config, pipeline};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "job_feed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Fails before any request is made when the credential is missing
    let config = Config::load().inspect_err(|e| tracing::error!("{}", e))?;

    pipeline::run(&config).await?;

    Ok(())
}
