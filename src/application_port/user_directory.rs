use crate::domain_model::{FieldError, User, UserId};

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("user already exists: {0}")]
    DuplicateUser(String),
    #[error("user not found: {0}")]
    NotFound(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error(transparent)]
    Invalid(#[from] FieldError),
    #[error("directory initialization failed: {0}")]
    Initialization(String),
}

/// Values used to seed the admin and guest accounts on first start.
#[derive(Debug, Clone)]
pub struct DefaultAccounts {
    pub admin_name: String,
    pub guest_name: String,
    pub default_password: String,
}

/// Stores users and resolves any of their three natural keys (id, NIF,
/// email) to the canonical id.
///
/// Absence on `fetch_by_id` and `resolve_equivalent` is `Ok(None)`; an `Err`
/// always means the request could not be answered.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    async fn create(&self, user: User) -> Result<(), DirectoryError>;
    async fn fetch_by_id(&self, user_id: &UserId) -> Result<Option<User>, DirectoryError>;
    async fn fetch_all(&self) -> Result<Vec<User>, DirectoryError>;
    async fn resolve_equivalent(&self, key: &str) -> Result<Option<UserId>, DirectoryError>;
    async fn delete(&self, user_id: &UserId) -> Result<User, DirectoryError>;
    async fn update(&self, user: User) -> Result<(), DirectoryError>;
    async fn close(&self);
}
