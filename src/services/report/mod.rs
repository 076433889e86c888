//! Run outputs: the rename plan and the log/CSV/zip writers built from it.

pub mod archive;
pub mod csv_export;
pub mod emitter;
pub mod text_log;

pub use archive::{write_archive, write_archive_to};
pub use csv_export::write_csv;
pub use emitter::{emit, emit_with, padding_width, RenameEntry, RenamePlan};
pub use text_log::render_text_log;
