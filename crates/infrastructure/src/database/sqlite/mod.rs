pub mod sqlite_answer_event_repository;
pub mod sqlite_answer_repository;

pub use sqlite_answer_event_repository::SqliteAnswerEventRepository;
pub use sqlite_answer_repository::SqliteAnswerRepository;
