// Core modules
pub mod config;
pub mod error;
pub mod pages;
pub mod player;
pub mod scene;
pub mod site;
pub mod svg;
pub mod template;
pub mod video;

// Re-export commonly used types
pub use error::{PagesmithError, Result};
