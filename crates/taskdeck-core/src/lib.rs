pub mod auth;
pub mod error;
pub mod progress;
pub mod project;
pub mod task;
pub mod validate;
pub mod view;

pub use error::ValidationError;
pub use progress::Progress;
pub use project::{Project, ProjectStatus};
pub use task::{Task, TaskStatus};
pub use view::{ListQuery, SortDirection, ViewMode};
