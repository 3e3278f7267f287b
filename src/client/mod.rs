use crate::api::gateway::Gateway;
use crate::api::{BlogUpdate, NewBlog};
use crate::event::AppEvent;
use crate::history::{self, RestoreRequest};
use crate::model::{DocumentId, UserId};
use crate::router::RenderTicket;
use std::future::Future;
use std::sync::mpsc;
use tokio::runtime::Handle;

/// Runs backend calls on the tokio runtime and reports each outcome to the UI
/// thread as one [`AppEvent`].
#[derive(Clone)]
pub struct BlogClient {
    gateway: Gateway,
    tx: mpsc::Sender<AppEvent>,
    runtime_handle: Handle,
}

impl BlogClient {
    pub fn new(gateway: Gateway, tx: mpsc::Sender<AppEvent>, runtime_handle: Handle) -> Self {
        Self {
            gateway,
            tx,
            runtime_handle,
        }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    fn spawn<F, Fut>(&self, task: F)
    where
        F: FnOnce(Gateway) -> Fut,
        Fut: Future<Output = AppEvent> + Send + 'static,
    {
        let tx = self.tx.clone();
        let work = task(self.gateway.clone());
        self.runtime_handle.spawn(async move {
            let event = work.await;
            tracing::debug!(event = event.name(), ticket = ?event.ticket(), "Background task finished");
            if tx.send(event).is_err() {
                tracing::debug!("UI event channel closed, dropping result");
            }
        });
    }

    pub fn login(&self, ticket: RenderTicket, email: String, password: String) {
        self.spawn(move |gateway| async move {
            let result = gateway.login(&email, &password).await;
            AppEvent::LoggedIn { ticket, result }
        });
    }

    pub fn register(&self, ticket: RenderTicket, username: String, email: String, password: String) {
        self.spawn(move |gateway| async move {
            let result = gateway.register(&username, &email, &password).await;
            AppEvent::Registered { ticket, result }
        });
    }

    pub fn list_blogs(&self, ticket: RenderTicket, author: Option<UserId>) {
        self.spawn(move |gateway| async move {
            let result = gateway.list_blogs(author).await;
            AppEvent::BlogsLoaded { ticket, result }
        });
    }

    pub fn blog(&self, ticket: RenderTicket, id: DocumentId) {
        self.spawn(move |gateway| async move {
            let result = gateway.blog(id).await;
            AppEvent::BlogLoaded { ticket, result }
        });
    }

    pub fn publish(&self, ticket: RenderTicket, blog: NewBlog) {
        self.spawn(move |gateway| async move {
            let result = gateway.create_blog(blog).await;
            AppEvent::Published { ticket, result }
        });
    }

    /// Saves an edit, then re-reads the document so the view shows what the
    /// backend stored.
    pub fn update(&self, ticket: RenderTicket, id: DocumentId, update: BlogUpdate) {
        self.spawn(move |gateway| async move {
            let result = match gateway.update_blog(id, update).await {
                Ok(receipt) => gateway.blog(id).await.map(|document| (receipt, document)),
                Err(err) => Err(err),
            };
            AppEvent::Updated { ticket, result }
        });
    }

    pub fn delete(&self, ticket: RenderTicket, id: DocumentId) {
        self.spawn(move |gateway| async move {
            let result = gateway.delete_blog(id).await;
            AppEvent::Deleted { ticket, result }
        });
    }

    pub fn history(&self, ticket: RenderTicket, id: DocumentId) {
        self.spawn(move |gateway| async move {
            let result = history::load(&gateway, id).await;
            AppEvent::HistoryLoaded { ticket, result }
        });
    }

    pub fn restore(&self, ticket: RenderTicket, request: RestoreRequest) {
        self.spawn(move |gateway| async move {
            let result = history::restore_version(&gateway, request).await;
            AppEvent::RestoreFinished { ticket, result }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeBlogApi;
    use crate::api::ApiError;
    use crate::router::Router;
    use crate::session::store::MemorySessionPersistence;
    use crate::session::{Session, SessionStore};
    use assert_matches::assert_matches;
    use std::sync::Arc;
    use std::time::Duration;

    struct Harness {
        _runtime: tokio::runtime::Runtime,
        client: BlogClient,
        rx: mpsc::Receiver<AppEvent>,
        api: Arc<FakeBlogApi>,
    }

    impl Harness {
        fn new() -> Self {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .expect("test runtime should build");
            let api = Arc::new(FakeBlogApi::with_user(
                "ana@example.com",
                "pw",
                UserId(7),
                "ana",
            ));
            let session = Arc::new(SessionStore::load(Box::new(
                MemorySessionPersistence::default(),
            )));
            let (tx, rx) = mpsc::channel();
            let client = BlogClient::new(
                Gateway::new(api.clone(), session),
                tx,
                runtime.handle().clone(),
            );
            Self {
                _runtime: runtime,
                client,
                rx,
                api,
            }
        }

        fn next_event(&self) -> AppEvent {
            self.rx
                .recv_timeout(Duration::from_secs(5))
                .expect("background task should report back")
        }

        fn ticket(&self) -> RenderTicket {
            Router::default()
                .navigate("/login", &Session::anonymous())
                .ticket
        }
    }

    #[test]
    fn login_reports_session_with_ticket() {
        let harness = Harness::new();
        let ticket = harness.ticket();
        harness
            .client
            .login(ticket, "ana@example.com".to_string(), "pw".to_string());

        let event = harness.next_event();
        assert_eq!(event.ticket(), ticket);
        assert_matches!(event, AppEvent::LoggedIn { result: Ok(session), .. } => {
            assert_eq!(session.user_id(), Some(UserId(7)));
        });
        assert!(harness.client.gateway().session().current().is_authenticated());
    }

    #[test]
    fn update_returns_refreshed_document() {
        let harness = Harness::new();
        let ticket = harness.ticket();
        let id = harness.api.seed_blog(UserId(7), "Post", "first draft");
        harness
            .client
            .login(ticket, "ana@example.com".to_string(), "pw".to_string());
        harness.next_event();

        harness.client.update(
            ticket,
            id,
            BlogUpdate {
                content: "second draft".to_string(),
                change_description: "Rewrite".to_string(),
            },
        );

        assert_matches!(harness.next_event(), AppEvent::Updated { result: Ok((receipt, document)), .. } => {
            assert_eq!(receipt.version, 2);
            assert_eq!(document.content, "second draft");
        });
    }

    #[test]
    fn expired_token_is_flagged() {
        let harness = Harness::new();
        let ticket = harness.ticket();
        let id = harness.api.seed_blog(UserId(7), "Post", "text");
        harness
            .client
            .login(ticket, "ana@example.com".to_string(), "pw".to_string());
        harness.next_event();

        harness.api.revoke_tokens();
        harness.client.history(ticket, id);

        let event = harness.next_event();
        assert!(event.is_unauthorized());
        assert_matches!(
            event,
            AppEvent::HistoryLoaded {
                result: Err(crate::history::HistoryError::Api(ApiError::Unauthorized)),
                ..
            }
        );
        assert!(!harness.client.gateway().session().current().is_authenticated());
    }
}
