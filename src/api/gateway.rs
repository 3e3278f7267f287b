use crate::api::{
    ApiError, BlogApi, BlogUpdate, LoginRequest, NewBlog, PublishReceipt, RegisterRequest,
    RegisterResponse, RestoreReceipt, UpdateReceipt,
};
use crate::model::{Document, DocumentId, UserId, Version, VersionId};
use crate::session::{Session, SessionStore};
use std::sync::Arc;

/// Session-aware access to the backend.
///
/// Every call reads the current token from the [`SessionStore`]. Any
/// [`ApiError::Unauthorized`] clears the session before the error is handed
/// back, whichever endpoint produced it.
#[derive(Clone)]
pub struct Gateway {
    api: Arc<dyn BlogApi>,
    session: Arc<SessionStore>,
}

impl Gateway {
    pub fn new(api: Arc<dyn BlogApi>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn token(&self) -> Option<String> {
        self.session.current().token().map(str::to_string)
    }

    fn guard<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(ApiError::Unauthorized) = &result {
            tracing::warn!("Backend rejected the session token, clearing session");
            self.session.clear();
        }
        result
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.guard(self.api.login(&request).await)?;
        self.session
            .set_authenticated(response.access_token, response.user_id, response.username)
            .map_err(|err| ApiError::Storage(err.to_string()))
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisterResponse, ApiError> {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.guard(self.api.register(&request).await)
    }

    pub async fn list_blogs(&self, author: Option<UserId>) -> Result<Vec<Document>, ApiError> {
        let token = self.token();
        self.guard(self.api.list_blogs(token.as_deref(), author).await)
    }

    pub async fn blog(&self, id: DocumentId) -> Result<Document, ApiError> {
        let token = self.token();
        self.guard(self.api.get_blog(token.as_deref(), id).await)
    }

    pub async fn create_blog(&self, blog: NewBlog) -> Result<PublishReceipt, ApiError> {
        let token = self.token();
        self.guard(self.api.create_blog(token.as_deref(), &blog).await)
    }

    pub async fn update_blog(
        &self,
        id: DocumentId,
        update: BlogUpdate,
    ) -> Result<UpdateReceipt, ApiError> {
        let token = self.token();
        self.guard(self.api.update_blog(token.as_deref(), id, &update).await)
    }

    pub async fn delete_blog(&self, id: DocumentId) -> Result<(), ApiError> {
        let token = self.token();
        self.guard(self.api.delete_blog(token.as_deref(), id).await)
    }

    pub async fn versions(&self, id: DocumentId) -> Result<Vec<Version>, ApiError> {
        let token = self.token();
        self.guard(self.api.list_versions(token.as_deref(), id).await)
    }

    pub async fn restore(
        &self,
        id: DocumentId,
        version: VersionId,
    ) -> Result<RestoreReceipt, ApiError> {
        let token = self.token();
        self.guard(self.api.restore_version(token.as_deref(), id, version).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeBlogApi;
    use crate::session::store::MemorySessionPersistence;
    use assert_matches::assert_matches;

    fn gateway(api: FakeBlogApi) -> (Gateway, Arc<FakeBlogApi>) {
        let api = Arc::new(api);
        let session = Arc::new(SessionStore::load(Box::new(
            MemorySessionPersistence::default(),
        )));
        (Gateway::new(api.clone(), session), api)
    }

    #[tokio::test]
    async fn login_stores_the_session() {
        let (gateway, _) = gateway(FakeBlogApi::with_user("ana@example.com", "pw", UserId(3), "ana"));
        let session = gateway
            .login("ana@example.com", "pw")
            .await
            .expect("credentials are valid");
        assert_eq!(session.user_id(), Some(UserId(3)));
        assert_eq!(gateway.session().current().display_name(), Some("ana"));
    }

    #[tokio::test]
    async fn bad_credentials_surface_detail() {
        let (gateway, _) = gateway(FakeBlogApi::with_user("ana@example.com", "pw", UserId(3), "ana"));
        let err = gateway
            .login("ana@example.com", "wrong")
            .await
            .expect_err("wrong password must fail");
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(!gateway.session().current().is_authenticated());
    }

    #[tokio::test]
    async fn authorized_calls_send_the_current_token() {
        let (gateway, api) =
            gateway(FakeBlogApi::with_user("ana@example.com", "pw", UserId(3), "ana"));
        gateway
            .login("ana@example.com", "pw")
            .await
            .expect("credentials are valid");
        gateway.list_blogs(None).await.expect("listing works");
        assert_eq!(api.last_token().as_deref(), Some(api.token_for(UserId(3)).as_str()));
    }

    #[tokio::test]
    async fn unauthorized_from_any_endpoint_clears_session() {
        let (gateway, api) =
            gateway(FakeBlogApi::with_user("ana@example.com", "pw", UserId(3), "ana"));
        gateway
            .login("ana@example.com", "pw")
            .await
            .expect("credentials are valid");

        api.revoke_tokens();
        let result = gateway.versions(DocumentId(1)).await;

        assert_matches!(result, Err(ApiError::Unauthorized));
        let session = gateway.session().current();
        assert!(session.token().is_none());
        assert!(session.user_id().is_none());
        assert!(session.display_name().is_none());
    }
}
