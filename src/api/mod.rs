//! Backend collaborator interface.
//!
//! [`BlogApi`] is the raw transport: one method per endpoint, token passed in
//! by the caller. [`gateway::Gateway`] layers the session on top of it and is
//! what the rest of the client talks to.

use crate::model::{Document, DocumentId, UserId, Version, VersionId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod gateway;
pub mod http;

#[cfg(test)]
pub mod fake;

/// Errors from the backend API layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connection, DNS, TLS, ...).
    #[error("network failure: {0}")]
    Network(String),

    /// The backend rejected the session token (HTTP 401).
    #[error("your session has expired, please log in again")]
    Unauthorized,

    /// The backend refused the request and said why.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// The backend's `detail` text, or the status reason.
        message: String,
    },

    /// A success response whose body could not be decoded.
    #[error("unexpected response from server: {0}")]
    Decode(String),

    /// The login succeeded but the session could not be persisted locally.
    #[error("could not save session: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Rejected { status: 404, .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub username: String,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub msg: String,
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBlog {
    pub title: String,
    pub content: String,
}

/// Result of publishing, including the backend's content analysis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PublishReceipt {
    #[serde(default)]
    pub msg: String,
    pub blog_id: DocumentId,
    pub ai_score: f64,
    pub plagiarism_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogUpdate {
    pub content: String,
    pub change_description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateReceipt {
    #[serde(default)]
    pub msg: String,
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RestoreReceipt {
    #[serde(default)]
    pub msg: String,
    pub new_version: u32,
}

/// One method per backend endpoint. Authorized calls receive the bearer
/// token explicitly; implementations map HTTP 401 to [`ApiError::Unauthorized`].
#[async_trait]
pub trait BlogApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError>;

    async fn list_blogs(
        &self,
        token: Option<&str>,
        author: Option<UserId>,
    ) -> Result<Vec<Document>, ApiError>;

    async fn get_blog(&self, token: Option<&str>, id: DocumentId) -> Result<Document, ApiError>;

    async fn create_blog(
        &self,
        token: Option<&str>,
        blog: &NewBlog,
    ) -> Result<PublishReceipt, ApiError>;

    async fn update_blog(
        &self,
        token: Option<&str>,
        id: DocumentId,
        update: &BlogUpdate,
    ) -> Result<UpdateReceipt, ApiError>;

    async fn delete_blog(&self, token: Option<&str>, id: DocumentId) -> Result<(), ApiError>;

    async fn list_versions(
        &self,
        token: Option<&str>,
        id: DocumentId,
    ) -> Result<Vec<Version>, ApiError>;

    async fn restore_version(
        &self,
        token: Option<&str>,
        id: DocumentId,
        version: VersionId,
    ) -> Result<RestoreReceipt, ApiError>;
}
