pub mod queue;
pub mod repository;
pub mod service;

pub use queue::{QueueApi, QueueService};
pub use repository::{AnswerEventRepository, AnswerRepository};
pub use service::AnswerService;
