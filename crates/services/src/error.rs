//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::api::ApiError;
use crate::config::ConfigError;

/// Errors emitted by `SessionContext`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SignInError {
    #[error("email and password are required")]
    MissingCredentials,
    #[error("user not found, check your email and password")]
    UnknownUser,
    #[error(transparent)]
    Api(ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl From<ApiError> for SignInError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound => SignInError::UnknownUser,
            other => SignInError::Api(other),
        }
    }
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("sign in as a patient to enroll in trials")]
    NotSignedIn,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `EmrService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmrUploadError {
    #[error("the selected file is not a PDF")]
    NotPdf,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `TimelineService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TimelineError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `ChatService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("assistant returned an empty response")]
    EmptyResponse,
    #[error(transparent)]
    Agent(#[from] ApiError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
