pub mod error;
pub mod sqlite;
pub mod tables;

pub use error::{StoreError, StoreResult};
pub use sqlite::Database;
