mod errors;
pub mod files;
mod memory;
mod service;
mod settings;
mod sqlite;
pub mod store;

pub use errors::{Error, ErrorKind};
pub use memory::{MemoryStore, MemoryTxn};
pub use service::NotificationPolicyService;
pub use settings::Settings;
pub use sqlite::{SqliteStore, SqliteTxn};
pub use store::{StoreError, StoredConfig};
