#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("invalid user id: {0:?}")]
    UserId(String),
    #[error("invalid NIF: {0:?}")]
    Nif(String),
    #[error("invalid email: {0:?}")]
    Email(String),
    #[error("invalid role: {0:?}")]
    Role(String),
    #[error("credential does not meet the password rules")]
    WeakCredential,
    #[error("credential error: {0}")]
    Credential(String),
}
