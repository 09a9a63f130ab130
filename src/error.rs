use thiserror::Error;

#[derive(Error, Debug)]
pub enum CadenceError {
    #[error("task '{0}' not found")]
    TaskNotFound(String),

    #[error("member '{0}' not found")]
    MemberNotFound(String),

    #[error("cannot move '{id}' to a closed status: {open} subtask(s) still open")]
    ClosureBlocked { id: String, open: usize },

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid category '{0}'")]
    InvalidCategory(String),

    #[error("invalid recurrence '{0}'")]
    InvalidRecurrence(String),

    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("invalid month '{0}' (expected YYYY-MM)")]
    InvalidMonth(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("workspace not initialized (run `cadence init` first)")]
    NotInitialized,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CadenceError>;
