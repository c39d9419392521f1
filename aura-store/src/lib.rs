pub mod amadeus;
pub mod app_config;
pub mod kv;
pub mod ledger_repo;
pub mod redis_repo;

pub use amadeus::AmadeusClient;
pub use kv::{open_store, FileStore, KeyValueStore, MemoryStore, StoreError};
pub use ledger_repo::KvLedgerRepository;
pub use redis_repo::RedisStore;
