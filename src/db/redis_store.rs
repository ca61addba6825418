use redis::{Client, Commands};

use crate::db::KeyValueStore;
use crate::error::AppResult;

/// Creates a Redis client for persisting session state
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Key-value store backed by Redis
///
/// Values are stored with an expiry so abandoned sessions do not pile up.
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
    ttl_seconds: u64,
}

/// One week
const DEFAULT_TTL: u64 = 604800;

impl RedisStore {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            ttl_seconds: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }
}

impl KeyValueStore for RedisStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.client.get_connection()?;
        let value: Option<String> = conn.get(key)?;
        tracing::debug!(key = %key, hit = value.is_some(), "Store read");
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut conn = self.client.get_connection()?;
        let _: () = conn.set_ex(key, value, self.ttl_seconds)?;
        tracing::debug!(key = %key, ttl = self.ttl_seconds, "Store write");
        Ok(())
    }
}
