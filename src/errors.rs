use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum SemilleroError {
    #[error("I/O error: {0}")]
    #[diagnostic(code(semillero::io))]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    #[diagnostic(code(semillero::config))]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(semillero::serde))]
    Serde(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    #[diagnostic(code(semillero::db))]
    Db(#[from] sea_orm::DbErr),

    #[error("{kind} `{id}` not found")]
    #[diagnostic(code(semillero::not_found))]
    NotFound { kind: &'static str, id: String },

    #[error("Validation failed: {0}")]
    #[diagnostic(
        code(semillero::validation),
        help("Fill in every required field before saving")
    )]
    Validation(String),

    #[error("Permission denied: {0}")]
    #[diagnostic(
        code(semillero::permission_denied),
        help("Log in with an account whose role covers this action")
    )]
    PermissionDenied(String),

    #[error("{0}")]
    #[diagnostic(code(semillero::other))]
    Other(String),
}

impl SemilleroError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        SemilleroError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn denied(action: impl Into<String>) -> Self {
        SemilleroError::PermissionDenied(action.into())
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        SemilleroError::Validation(reason.into())
    }
}
