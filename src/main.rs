use anyhow::Context;
use sales_loader::{config::ConfigManager, Loader};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // A missing .env is fine; variables may come from the environment itself
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("failed to read .env");
        }
    }

    let config = ConfigManager::from_env()
        .load()
        .context("failed to load configuration")?;
    let loader = Loader::new(config);

    loader.run().await.context("sales load failed")?;
    Ok(())
}
