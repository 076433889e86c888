pub mod assets;
pub mod config;
pub mod file_ops;
pub mod matcher;
pub mod prompts;
pub mod report;
