// Pruning - deletes dead files reported by a scan

mod safe_delete;
mod undo;

pub use safe_delete::{DeleteSummary, SafeDeleter};
pub use undo::UndoScript;
