pub mod manager;
pub mod memory;
pub mod sqlite;

pub use manager::DatabaseManager;
pub use memory::{InMemoryAnswerEventRepository, InMemoryAnswerRepository};
pub use sqlite::{SqliteAnswerEventRepository, SqliteAnswerRepository};
