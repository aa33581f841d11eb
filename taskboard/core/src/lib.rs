//! Shared task model and the task store connector used by every taskboard service.
pub mod error;
pub mod store;
pub mod task;
pub mod wire;

pub use error::Error;
pub use store::{HttpTaskStore, MockTaskStore, TaskStore};
pub use task::{ParsePriorityError, Priority, Task, TaskId, TaskPatch};
