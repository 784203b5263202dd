pub mod memory;
pub mod redis;
pub mod storage;

pub use memory::MemoryStorage;
pub use self::redis::create_redis_client;
pub use self::redis::RedisStorage;
pub use storage::KeyValueStorage;
pub use storage::StorageKey;

#[cfg(test)]
pub use storage::MockKeyValueStorage;
