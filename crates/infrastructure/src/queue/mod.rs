pub mod in_memory;
pub mod logging;
pub mod publisher;
pub mod resolver;
pub mod sqlite;

pub use in_memory::InMemoryQueueApi;
pub use logging::LoggingQueueService;
pub use publisher::QueuePublisher;
pub use resolver::QueueUrlResolver;
pub use sqlite::SqliteQueueApi;
