pub mod config;
pub mod error;
pub mod persistence;
pub mod seed;
pub mod store;
pub mod taste;
pub mod views;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use persistence::{
    decode_snapshot, encode_snapshot, malformed_key, MemoryStorage, SnapshotStorage,
    SqliteStorage,
};
pub use seed::seeded_snapshot;
pub use store::Store;
pub use taste::{resolve_profile, QuizQuestion};
pub use views::{DashboardStats, ModeProfile};
