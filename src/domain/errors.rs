/// Simplified error system - the timeline clamps geometry instead of failing,
/// so errors only surface at configuration and DOM boundaries.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    ConfigError(String),
    ValidationError(String),
    DomError(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::ConfigError(msg) => write!(f, "Config Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::DomError(msg) => write!(f, "DOM Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
