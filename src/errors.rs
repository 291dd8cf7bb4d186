use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

pub type RouteResult<T> = std::result::Result<T, RouteError>;

/// Terminal outcomes of a price search that carry no finite answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no feasible route found")]
    NoRoute,

    #[error("arbitrage loop detected")]
    ArbitrageLoop,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse float error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Market description error at line {line}: {message}")]
    Market { line: usize, message: String },

    #[error("Serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}
