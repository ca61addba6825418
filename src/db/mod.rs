pub mod redis_store;
pub mod store;

pub use redis_store::{create_redis_client, RedisStore};
#[cfg(test)]
pub use store::MockKeyValueStore;
pub use store::{KeyValueStore, MemoryStore, StoreKey};
