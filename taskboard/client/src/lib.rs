//! Client side of the taskboard: a per-session command log that can undo and
//! redo mutations applied to the task store and completion services.
pub mod action;
pub mod completion;
pub mod config;
pub mod dispatch;
pub mod log;
pub mod repl;
pub mod reports;
pub mod session;

pub use action::{Action, Direction};
pub use completion::{CompletionService, HttpCompletionService, MockCompletionService};
pub use log::CommandLog;
pub use reports::{HttpReports, MockReports, Reports};
pub use session::{Intent, Session, Status, TaskDraft};
