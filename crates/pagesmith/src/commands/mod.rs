//! CLI command implementations

pub mod build;
pub mod svg;
pub mod timeline;
pub mod video;

/// How a command finished, mapped to the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Clean,
    /// Finished, but some inputs were skipped
    WithWarnings,
}

impl Completion {
    pub fn exit_code(self) -> i32 {
        match self {
            Completion::Clean => 0,
            Completion::WithWarnings => 2,
        }
    }
}
