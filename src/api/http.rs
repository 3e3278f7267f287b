//! REST implementation of [`BlogApi`] over [`reqwest`].

use crate::api::{
    ApiError, BlogApi, BlogUpdate, LoginRequest, LoginResponse, NewBlog, PublishReceipt,
    RegisterRequest, RegisterResponse, RestoreReceipt, UpdateReceipt,
};
use crate::model::{Document, DocumentId, UserId, Version, VersionId};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// HTTP client for one blog backend.
pub struct HttpBlogApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBlogApi {
    /// * `base_url` - e.g. `http://localhost:8000`; a trailing slash is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // ---- private helpers ----

    /// Maps a non-success response to the matching [`ApiError`].
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message: rejection_message(status, &body),
        })
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

/// Extracts the backend's `detail` field, which is either a plain message or
/// a structured validation report.
fn rejection_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());

    match detail {
        Some(Value::String(message)) if !message.is_empty() => message,
        Some(Value::Null) | None => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
        Some(other) => other.to_string(),
    }
}

#[async_trait]
impl BlogApi for HttpBlogApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(request)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(request)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn list_blogs(
        &self,
        token: Option<&str>,
        author: Option<UserId>,
    ) -> Result<Vec<Document>, ApiError> {
        let mut builder = self.client.get(self.url("/blogs"));
        if let Some(author) = author {
            builder = builder.query(&[("author_id", author.0)]);
        }
        let response = Self::authorized(builder, token).send().await?;
        Self::parse_response(response).await
    }

    async fn get_blog(&self, token: Option<&str>, id: DocumentId) -> Result<Document, ApiError> {
        let builder = self.client.get(self.url(&format!("/blogs/{id}")));
        let response = Self::authorized(builder, token).send().await?;
        Self::parse_response(response).await
    }

    async fn create_blog(
        &self,
        token: Option<&str>,
        blog: &NewBlog,
    ) -> Result<PublishReceipt, ApiError> {
        let builder = self.client.post(self.url("/blogs")).json(blog);
        let response = Self::authorized(builder, token).send().await?;
        Self::parse_response(response).await
    }

    async fn update_blog(
        &self,
        token: Option<&str>,
        id: DocumentId,
        update: &BlogUpdate,
    ) -> Result<UpdateReceipt, ApiError> {
        let builder = self
            .client
            .put(self.url(&format!("/blogs/{id}")))
            .json(update);
        let response = Self::authorized(builder, token).send().await?;
        Self::parse_response(response).await
    }

    async fn delete_blog(&self, token: Option<&str>, id: DocumentId) -> Result<(), ApiError> {
        let builder = self.client.delete(self.url(&format!("/blogs/{id}")));
        let response = Self::authorized(builder, token).send().await?;
        Self::check_status(response).await
    }

    async fn list_versions(
        &self,
        token: Option<&str>,
        id: DocumentId,
    ) -> Result<Vec<Version>, ApiError> {
        let builder = self.client.get(self.url(&format!("/blogs/{id}/versions")));
        let response = Self::authorized(builder, token).send().await?;
        Self::parse_response(response).await
    }

    async fn restore_version(
        &self,
        token: Option<&str>,
        id: DocumentId,
        version: VersionId,
    ) -> Result<RestoreReceipt, ApiError> {
        let builder = self
            .client
            .post(self.url(&format!("/blogs/{id}/restore/{version}")));
        let response = Self::authorized(builder, token).send().await?;
        Self::parse_response(response).await
    }
}
