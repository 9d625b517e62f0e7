pub mod task;
pub mod user;

pub use task::{Task, TaskPayload};
pub use user::{User, UserPayload};
