pub mod completion;
pub mod config;
pub mod notes;
pub mod render;
