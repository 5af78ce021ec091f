use crate::storage::StorageError;

/// Rejections of client input. Always reported as 400.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Every required field absent from a creation request, in declaration order
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("invalid value for field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("invalid Pokémon id '{0}'")]
    InvalidId(String),
}

impl ValidationError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PokedexError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The multipart body could not be read
    #[error("malformed request body: {0}")]
    Request(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("database error: {0}")]
    Persistence(#[from] sea_orm::DbErr),
    #[error("Pokémon {0} not found")]
    NotFound(i32),
}

pub type Result<T> = std::result::Result<T, PokedexError>;

/// Parses a path id, rejecting anything that is not a positive integer.
pub fn parse_id(raw: &str) -> std::result::Result<i32, ValidationError> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidId(raw.to_string())),
    }
}
