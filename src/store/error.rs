//! Error types for the user store.

use thiserror::Error;

/// Errors that can occur during user store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(Box<redb::TransactionError>),

    #[error("Table error: {0}")]
    Table(redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Record encoding error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("Password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Username not found: {0}")]
    UsernameNotFound(String),

    #[error("Email not found: {0}")]
    EmailNotFound(String),

    #[error("Username {0} already exists")]
    UsernameAlreadyExists(String),

    #[error("Email {0} already exists")]
    EmailAlreadyExists(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl From<redb::TransactionError> for StoreError {
    fn from(err: redb::TransactionError) -> Self {
        Self::Transaction(Box::new(err))
    }
}

impl From<redb::TableError> for StoreError {
    fn from(err: redb::TableError) -> Self {
        match err {
            redb::TableError::TableDoesNotExist(name) => Self::BucketNotFound(name),
            other => Self::Table(other),
        }
    }
}

impl StoreError {
    /// Returns `true` for the lookup misses (`UserNotFound`, `UsernameNotFound`,
    /// `EmailNotFound`).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::UsernameNotFound(_) | Self::EmailNotFound(_)
        )
    }

    /// Returns `true` for registration and rename conflicts.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::UsernameAlreadyExists(_) | Self::EmailAlreadyExists(_)
        )
    }
}
