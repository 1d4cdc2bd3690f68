//! Database module
//!
//! This module handles the record store: its contract, the PostgreSQL
//! backend and the in-process backend

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod service;
pub mod store;

// Re-export commonly used database components
pub use connection::{DatabasePool, PoolConfig, create_pool, run_migrations, health_check};
pub use memory::MemoryStore;
pub use repositories::{AdvertisementRepository, ImageRepository, GroupRepository};
pub use service::DatabaseService;
pub use store::RecordStore;
