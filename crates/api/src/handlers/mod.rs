pub mod answers;
pub mod health;
