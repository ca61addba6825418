use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use laptop_advisor::{
    config::Config,
    db::{create_redis_client, RedisStore},
    models::PreferenceProfile,
    services::{CatalogStore, ResultFilter, ScoringEngine},
    AdvisorSession,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;

    let catalog = CatalogStore::load(&config.catalog_path)
        .with_context(|| format!("Failed to load catalog from {}", config.catalog_path))?;

    let profile = match &config.profile_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read profile from {}", path))?;
            serde_json::from_str::<PreferenceProfile>(&json)
                .with_context(|| format!("Failed to parse profile from {}", path))?
        }
        None => PreferenceProfile::default(),
    };

    let mut session = AdvisorSession::new(Arc::new(catalog), ScoringEngine::new(config.scoring()));

    if let Some(redis_url) = &config.redis_url {
        let client = create_redis_client(redis_url)?;
        session = session.with_store(Arc::new(RedisStore::new(client)));
        tracing::info!(session_id = %session.id(), "Favorites will be persisted to Redis");
    }

    session.set_profile(profile);
    session.set_filter(ResultFilter::new(config.search.as_str(), config.brand.as_str()));

    let results = match config.result_limit {
        Some(limit) => session.ranking().top(session.filter(), limit),
        None => session.results(),
    };

    tracing::info!(
        results = results.len(),
        catalog = session.catalog().len(),
        "Recommendations ready"
    );

    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}
