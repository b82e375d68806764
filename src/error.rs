use thiserror::Error;

pub type Result<T> = std::result::Result<T, GimmeError>;

#[derive(Error, Debug)]
pub enum GimmeError {
    #[error("Git error: {0}")]
    Git(String),
    #[error("Repository error: {0}")]
    Repository(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Malformed commit {commit}: {reason}")]
    MalformedCommit { commit: String, reason: String },
}
