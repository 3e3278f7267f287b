//! In-memory [`BlogApi`] used by tests. Mirrors the backend's versioning
//! rules: every edit or restore appends a version numbered one past the
//! current maximum and never touches existing records.

use crate::api::{
    ApiError, BlogApi, BlogUpdate, LoginRequest, LoginResponse, NewBlog, PublishReceipt,
    RegisterRequest, RegisterResponse, RestoreReceipt, UpdateReceipt,
};
use crate::model::{Document, DocumentId, UserId, Version, VersionId};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

struct FakeUser {
    email: String,
    password: String,
    id: UserId,
    name: String,
}

#[derive(Default)]
struct FakeState {
    users: Vec<FakeUser>,
    blogs: Vec<Document>,
    versions: Vec<Version>,
    next_id: i64,
    revoked: bool,
    last_token: Option<String>,
    fail_restore: Option<ApiError>,
    fail_versions: Option<ApiError>,
}

impl FakeState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn caller(&mut self, token: Option<&str>) -> Result<Option<UserId>, ApiError> {
        self.last_token = token.map(str::to_string);
        let Some(token) = token else {
            return Ok(None);
        };
        if self.revoked {
            return Err(ApiError::Unauthorized);
        }
        self.users
            .iter()
            .find(|user| token_for(user.id) == token)
            .map(|user| Some(user.id))
            .ok_or(ApiError::Unauthorized)
    }

    fn required_caller(&mut self, token: Option<&str>) -> Result<UserId, ApiError> {
        self.caller(token)?.ok_or(ApiError::Unauthorized)
    }

    fn blog_mut(&mut self, id: DocumentId) -> Result<&mut Document, ApiError> {
        self.blogs
            .iter_mut()
            .find(|blog| blog.id == id)
            .ok_or_else(|| rejected(404, "Blog not found"))
    }

    fn next_version_number(&self, id: DocumentId) -> u32 {
        self.versions
            .iter()
            .filter(|version| version.document_id == id)
            .map(|version| version.version_number)
            .max()
            .unwrap_or(0)
            + 1
    }

    fn append_version(&mut self, id: DocumentId, content: &str, description: &str) -> u32 {
        let version_number = self.next_version_number(id);
        let version_id = VersionId(self.next_id());
        self.versions.push(Version {
            id: version_id,
            document_id: id,
            version_number,
            content: content.to_string(),
            change_description: description.to_string(),
            created_at: format!("2025-01-01T00:00:{:02}", version_number % 60),
        });
        version_number
    }
}

fn token_for(user: UserId) -> String {
    format!("token-{user}")
}

fn rejected(status: u16, message: &str) -> ApiError {
    ApiError::Rejected {
        status,
        message: message.to_string(),
    }
}

#[derive(Default)]
pub struct FakeBlogApi {
    state: Mutex<FakeState>,
}

impl FakeBlogApi {
    pub fn with_user(email: &str, password: &str, id: UserId, name: &str) -> Self {
        let api = Self::default();
        api.add_user(email, password, id, name);
        api
    }

    pub fn add_user(&self, email: &str, password: &str, id: UserId, name: &str) {
        self.state().users.push(FakeUser {
            email: email.to_string(),
            password: password.to_string(),
            id,
            name: name.to_string(),
        });
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn token_for(&self, user: UserId) -> String {
        token_for(user)
    }

    pub fn last_token(&self) -> Option<String> {
        self.state().last_token.clone()
    }

    pub fn revoke_tokens(&self) {
        self.state().revoked = true;
    }

    pub fn fail_next_restore(&self, err: ApiError) {
        self.state().fail_restore = Some(err);
    }

    pub fn fail_next_versions(&self, err: ApiError) {
        self.state().fail_versions = Some(err);
    }

    /// Publishes a blog directly, bypassing authentication.
    pub fn seed_blog(&self, author: UserId, title: &str, content: &str) -> DocumentId {
        let mut state = self.state();
        let id = DocumentId(state.next_id());
        let author_name = state
            .users
            .iter()
            .find(|user| user.id == author)
            .map(|user| user.name.clone())
            .unwrap_or_default();
        state.blogs.push(Document {
            id,
            title: title.to_string(),
            content: content.to_string(),
            author_id: author,
            author_name,
            created_at: "2025-01-01T00:00:00".to_string(),
            ai_score: Some(10.0),
            plagiarism_score: Some(0.0),
        });
        state.append_version(id, content, "Initial Publication");
        id
    }

    /// Appends an edit directly, bypassing authentication.
    pub fn seed_edit(&self, id: DocumentId, content: &str, description: &str) {
        let mut state = self.state();
        if let Ok(blog) = state.blog_mut(id) {
            blog.content = content.to_string();
        }
        state.append_version(id, content, description);
    }

    pub fn versions_of(&self, id: DocumentId) -> Vec<Version> {
        self.state()
            .versions
            .iter()
            .filter(|version| version.document_id == id)
            .cloned()
            .collect()
    }

    pub fn content_of(&self, id: DocumentId) -> Option<String> {
        self.state()
            .blogs
            .iter()
            .find(|blog| blog.id == id)
            .map(|blog| blog.content.clone())
    }
}

#[async_trait]
impl BlogApi for FakeBlogApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let state = self.state();
        state
            .users
            .iter()
            .find(|user| user.email == request.email && user.password == request.password)
            .map(|user| LoginResponse {
                access_token: token_for(user.id),
                username: user.name.clone(),
                user_id: user.id,
            })
            .ok_or_else(|| rejected(400, "Invalid credentials"))
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let mut state = self.state();
        if state
            .users
            .iter()
            .any(|user| user.email == request.email || user.name == request.username)
        {
            return Err(rejected(400, "User already exists"));
        }
        let id = UserId(state.next_id());
        state.users.push(FakeUser {
            email: request.email.clone(),
            password: request.password.clone(),
            id,
            name: request.username.clone(),
        });
        Ok(RegisterResponse {
            msg: "User created successfully".to_string(),
            user_id: Some(id),
        })
    }

    async fn list_blogs(
        &self,
        token: Option<&str>,
        author: Option<UserId>,
    ) -> Result<Vec<Document>, ApiError> {
        let mut state = self.state();
        state.caller(token)?;
        Ok(state
            .blogs
            .iter()
            .rev()
            .filter(|blog| author.map_or(true, |author| blog.author_id == author))
            .cloned()
            .collect())
    }

    async fn get_blog(&self, token: Option<&str>, id: DocumentId) -> Result<Document, ApiError> {
        let mut state = self.state();
        state.caller(token)?;
        state.blog_mut(id).map(|blog| blog.clone())
    }

    async fn create_blog(
        &self,
        token: Option<&str>,
        blog: &NewBlog,
    ) -> Result<PublishReceipt, ApiError> {
        let author = self.state().required_caller(token)?;
        let id = self.seed_blog(author, &blog.title, &blog.content);
        Ok(PublishReceipt {
            msg: "Blog created".to_string(),
            blog_id: id,
            ai_score: 10.0,
            plagiarism_score: 0.0,
        })
    }

    async fn update_blog(
        &self,
        token: Option<&str>,
        id: DocumentId,
        update: &BlogUpdate,
    ) -> Result<UpdateReceipt, ApiError> {
        let mut state = self.state();
        let caller = state.required_caller(token)?;
        let blog = state.blog_mut(id)?;
        if blog.author_id != caller {
            return Err(rejected(403, "Not authorized to edit this blog"));
        }
        blog.content = update.content.clone();
        let version = state.append_version(id, &update.content, &update.change_description);
        Ok(UpdateReceipt {
            msg: "Blog updated".to_string(),
            version,
        })
    }

    async fn delete_blog(&self, token: Option<&str>, id: DocumentId) -> Result<(), ApiError> {
        let mut state = self.state();
        let caller = state.required_caller(token)?;
        if state.blog_mut(id)?.author_id != caller {
            return Err(rejected(403, "Not authorized to delete this blog"));
        }
        state.blogs.retain(|blog| blog.id != id);
        state.versions.retain(|version| version.document_id != id);
        Ok(())
    }

    async fn list_versions(
        &self,
        token: Option<&str>,
        id: DocumentId,
    ) -> Result<Vec<Version>, ApiError> {
        let mut state = self.state();
        state.caller(token)?;
        if let Some(err) = state.fail_versions.take() {
            return Err(err);
        }
        let mut versions: Vec<Version> = state
            .versions
            .iter()
            .filter(|version| version.document_id == id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        Ok(versions)
    }

    async fn restore_version(
        &self,
        token: Option<&str>,
        id: DocumentId,
        version: VersionId,
    ) -> Result<RestoreReceipt, ApiError> {
        let mut state = self.state();
        let caller = state.required_caller(token)?;
        if let Some(err) = state.fail_restore.take() {
            return Err(err);
        }
        if state.blog_mut(id)?.author_id != caller {
            return Err(rejected(403, "Not authorized"));
        }
        let source = state
            .versions
            .iter()
            .find(|candidate| candidate.id == version && candidate.document_id == id)
            .cloned()
            .ok_or_else(|| rejected(404, "Version not found"))?;

        let description = format!("Restored from Version {}", source.version_number);
        let new_version = state.append_version(id, &source.content, &description);
        state.blog_mut(id)?.content = source.content.clone();
        Ok(RestoreReceipt {
            msg: format!("Restored to version {}", source.version_number),
            new_version,
        })
    }
}
