//! Client error taxonomy
//!
//! Simulation code never returns errors; everything here comes from the
//! service, wallet and storage boundaries.

use core::fmt;

/// Rejected input, raised before any state is touched
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Not `0x` followed by 40 hex digits
    WalletAddress(String),
    /// Not 3-20 characters of letters, digits, `_` or `-`
    Nickname(String),
    /// Negative or otherwise unusable score
    Score(i64),
    /// Page must be >= 1, limit within 1..=100
    Pagination { page: u32, limit: u32 },
    /// Required field missing or empty
    MissingField(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WalletAddress(addr) => write!(f, "invalid wallet address: {addr}"),
            Self::Nickname(name) => write!(
                f,
                "invalid nickname '{name}': use 3-20 letters, numbers, underscores or hyphens"
            ),
            Self::Score(score) => write!(f, "invalid score: {score}"),
            Self::Pagination { page, limit } => write!(
                f,
                "invalid pagination (page {page}, limit {limit}): page must be >= 1 and limit between 1 and 100"
            ),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors surfaced by the external collaborators (score API, chain, storage)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientError {
    InvalidInput(ValidationError),
    /// Duplicate resource (e.g. nickname already taken, free life already used)
    Conflict(String),
    /// Recoverable: the caller should try again later
    RateLimitExceeded,
    /// Storage, network or chain RPC unavailable
    ExternalService {
        service: &'static str,
        message: String,
    },
    /// Token balance below the price of a purchase (base units)
    InsufficientFunds { required: u128, available: u128 },
    /// Unrecoverable initialisation failure; the session cannot start
    TerminalSession(String),
}

impl ClientError {
    pub fn external(service: &'static str, message: impl Into<String>) -> Self {
        Self::ExternalService {
            service,
            message: message.into(),
        }
    }

    /// Whether an immediate retry has any chance of succeeding
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ExternalService { .. })
    }

    /// Map an HTTP status + body from the score API onto the taxonomy
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            400 => Self::InvalidInput(ValidationError::MissingField("request")),
            409 => Self::Conflict(body.to_string()),
            429 => Self::RateLimitExceeded,
            _ => Self::external("score-api", format!("HTTP {status}: {body}")),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::Conflict(details) => write!(f, "conflict: {details}"),
            Self::RateLimitExceeded => write!(f, "too many requests, try again later"),
            Self::ExternalService { service, message } => {
                write!(f, "{service} unavailable: {message}")
            }
            Self::InsufficientFunds {
                required,
                available,
            } => write!(f, "insufficient balance: need {required}, have {available}"),
            Self::TerminalSession(reason) => write!(f, "cannot start session: {reason}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidInput(err)
    }
}
