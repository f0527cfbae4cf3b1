use std::path::PathBuf;

/// Errors detected before the render loop starts
#[derive(thiserror::Error, Debug)]
pub enum StartupError {
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },

    #[error("{0}")]
    PatternSource(&'static str),

    #[error("invalid pattern: {0}")]
    Pattern(#[source] serde_json::Error),

    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Device(String),
}

impl StartupError {
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }
}
