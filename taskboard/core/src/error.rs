use crate::task::TaskId;
use thiserror::Error;

/// Errors that can occur while calling another taskboard service.
///
/// Logical outcomes the caller may want to report distinctly (a missing task,
/// an id collision) get their own variants; everything else is a transport
/// problem or an unexpected status code.
#[derive(Error, Debug)]
pub enum Error {
    /// The remote service does not know the task
    #[error("task '{0}' not found")]
    NotFound(TaskId),
    /// The task store already holds a task with this id
    #[error("task '{0}' already exists")]
    AlreadyExists(TaskId),
    /// The request never produced a usable response
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The remote service answered with a non-success status
    #[error("unexpected response status {0}")]
    Status(u16),
}
