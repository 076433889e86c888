pub mod rename;

pub use rename::{apply_plan, RenameMode, RenameOutcome};
