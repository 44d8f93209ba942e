pub mod catalog;
pub mod conflict;
pub mod selection;

pub use catalog::{CourseCatalog, CourseKind};
pub use conflict::ConflictMap;
pub use selection::{ResetOutcome, SelectionError, SelectionState};
