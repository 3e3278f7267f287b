//! Routed screen state, kept apart from egui so navigation and event
//! handling can run without a frame.

use crate::api::ApiError;
use crate::diff::DiffOptions;
use crate::event::AppEvent;
use crate::history::VersionHistoryController;
use crate::model::{DocumentId, UserId};
use crate::router::{RenderTicket, Router, ViewKind, LOGIN_PATH, ROOT_PATH};
use crate::session::Session;
use crate::ui::auth::{LoginForm, RegisterForm};
use crate::ui::blogs::{BlogListView, BlogView, CreateForm};
use crate::ui::history_view::HistoryView;
use std::time::Instant;

pub enum Screen {
    Landing,
    Blogs(BlogListView),
    Login(LoginForm),
    Register(RegisterForm),
    Create(CreateForm),
    Blog(BlogView),
    History(HistoryView),
    NotFound(String),
}

/// Background load a freshly built screen needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    Blogs {
        ticket: RenderTicket,
        author: Option<UserId>,
    },
    Blog {
        ticket: RenderTicket,
        id: DocumentId,
    },
    History {
        ticket: RenderTicket,
        id: DocumentId,
    },
}

impl Fetch {
    pub fn ticket(&self) -> RenderTicket {
        match self {
            Self::Blogs { ticket, .. } | Self::Blog { ticket, .. } | Self::History { ticket, .. } => {
                *ticket
            }
        }
    }
}

/// Where to go once an event has been applied to the active screen.
struct Redirect {
    location: &'static str,
    notice: Option<String>,
}

impl Screen {
    fn apply(&mut self, event: AppEvent) -> Option<Redirect> {
        match (self, event) {
            (Screen::Login(form), AppEvent::LoggedIn { result, .. }) => match result {
                Ok(_) => {
                    return Some(Redirect {
                        location: ROOT_PATH,
                        notice: None,
                    })
                }
                Err(err) => form.fail(err),
            },
            (Screen::Register(form), AppEvent::Registered { result, .. }) => match result {
                Ok(_) => {
                    return Some(Redirect {
                        location: LOGIN_PATH,
                        notice: Some("Registration successful! Please log in.".to_string()),
                    })
                }
                Err(err) => form.fail(err),
            },
            (Screen::Blogs(view), AppEvent::BlogsLoaded { result, .. }) => view.load(result),
            (Screen::Blog(view), AppEvent::BlogLoaded { result, .. }) => view.load(result),
            (Screen::Blog(view), AppEvent::Updated { result, .. }) => view.finish_update(result),
            (Screen::Blog(view), AppEvent::Deleted { result, .. }) => match result {
                Ok(()) => {
                    return Some(Redirect {
                        location: ROOT_PATH,
                        notice: Some("Blog deleted.".to_string()),
                    })
                }
                Err(err) => view.fail_delete(err),
            },
            (Screen::Create(form), AppEvent::Published { result, .. }) => {
                form.finish(result, Instant::now())
            }
            (Screen::History(view), AppEvent::HistoryLoaded { result, .. }) => view.loaded(result),
            (Screen::History(view), AppEvent::RestoreFinished { result, .. }) => {
                view.restored(result)
            }
            (_, event) => {
                tracing::debug!(event = event.name(), "Event does not apply to the active view");
            }
        }
        None
    }
}

pub struct Shell {
    router: Router,
    screen: Screen,
    diff_options: DiffOptions,
    notice: Option<String>,
    location_input: String,
    diagnostics_log: Vec<String>,
}

impl Shell {
    pub fn new(diff_options: DiffOptions) -> Self {
        Self {
            router: Router::default(),
            screen: Screen::Landing,
            diff_options,
            notice: None,
            location_input: ROOT_PATH.to_string(),
            diagnostics_log: Vec::new(),
        }
    }

    pub fn view(&self) -> Option<ViewKind> {
        self.router.current().map(|state| state.view)
    }

    /// Ticket of the active navigation; actions started from a view use it.
    pub fn ticket(&self) -> Option<RenderTicket> {
        self.router.current().map(|state| state.ticket)
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
    }

    pub fn location_input_mut(&mut self) -> &mut String {
        &mut self.location_input
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics_log
    }

    pub fn log_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostics_log.push(format!(
            "[{}] {}",
            chrono::Local::now().format("%H:%M:%S"),
            message.into()
        ));
    }

    pub fn publish_redirect_due(&self, now: Instant) -> bool {
        matches!(&self.screen, Screen::Create(form) if form.redirect_due(now))
    }

    /// Resolves `location`, replaces the screen and returns the load it needs.
    pub fn navigate(&mut self, location: &str, session: &Session) -> Option<Fetch> {
        let state = self.router.navigate(location, session).clone();
        self.location_input = state.path.clone();
        self.log_diagnostic(format!("navigate {location} -> {:?}", state.view));

        let ticket = state.ticket;
        let (screen, fetch) = match (state.view, state.params.document_id) {
            (ViewKind::Landing, _) => (Screen::Landing, None),
            (ViewKind::BlogList, _) => (
                Screen::Blogs(BlogListView::new(false)),
                Some(Fetch::Blogs {
                    ticket,
                    author: None,
                }),
            ),
            (ViewKind::MyBlogs, _) => (
                Screen::Blogs(BlogListView::new(true)),
                Some(Fetch::Blogs {
                    ticket,
                    author: session.user_id(),
                }),
            ),
            (ViewKind::Login, _) => (Screen::Login(LoginForm::with_notice(self.notice.take())), None),
            (ViewKind::Register, _) => (Screen::Register(RegisterForm::default()), None),
            (ViewKind::CreateBlog, _) => (Screen::Create(CreateForm::default()), None),
            (ViewKind::BlogView, Some(id)) => {
                (Screen::Blog(BlogView::new(id)), Some(Fetch::Blog { ticket, id }))
            }
            (ViewKind::VersionHistory, Some(id)) => (
                Screen::History(HistoryView::new(VersionHistoryController::new(
                    id,
                    self.diff_options,
                ))),
                Some(Fetch::History { ticket, id }),
            ),
            (ViewKind::BlogView | ViewKind::VersionHistory | ViewKind::NotFound, _) => {
                (Screen::NotFound(state.path), None)
            }
        };
        self.screen = screen;
        fetch
    }

    /// Applies one background result. `session` is the state after the
    /// gateway has seen the response.
    pub fn apply_event(&mut self, event: AppEvent, session: &Session) -> Option<Fetch> {
        let name = event.name();
        if event.is_unauthorized() {
            tracing::info!(event = name, "Session expired, returning to login");
            self.log_diagnostic(format!("{name}: session expired"));
            self.notice = Some(ApiError::Unauthorized.to_string());
            return self.navigate(LOGIN_PATH, session);
        }

        let ticket = event.ticket();
        let signed_in = matches!(&event, AppEvent::LoggedIn { result: Ok(_), .. });
        let mut redirect = None;
        let screen = &mut self.screen;
        if !self.router.commit(ticket, || redirect = screen.apply(event)) {
            self.log_diagnostic(format!("{name}: stale result dropped"));
            if signed_in {
                return self.resolve_again(session);
            }
            return None;
        }
        self.log_diagnostic(name);

        let Redirect { location, notice } = redirect?;
        if notice.is_some() {
            self.notice = notice;
        }
        self.navigate(location, session)
    }

    /// The session changed under the active view; route it again.
    fn resolve_again(&mut self, session: &Session) -> Option<Fetch> {
        let location = match self.router.current() {
            Some(state) if state.view != ViewKind::Login => state.path.clone(),
            _ => ROOT_PATH.to_string(),
        };
        tracing::info!(%location, "Signed in from a superseded view");
        self.navigate(&location, session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryError;
    use crate::model::Document;
    use crate::session::Identity;
    use assert_matches::assert_matches;

    fn signed_in() -> Session {
        Session::authenticated(Identity {
            token: "token-1".to_string(),
            user_id: UserId(1),
            display_name: "ana".to_string(),
        })
    }

    fn document(id: i64) -> Document {
        Document {
            id: DocumentId(id),
            title: format!("Post {id}"),
            content: "words".to_string(),
            author_id: UserId(1),
            author_name: "ana".to_string(),
            created_at: String::new(),
            ai_score: None,
            plagiarism_score: None,
        }
    }

    fn ticket_of(fetch: Option<Fetch>) -> RenderTicket {
        fetch.expect("view should start a load").ticket()
    }

    fn shown_document(shell: &Shell) -> Option<DocumentId> {
        match shell.screen() {
            Screen::Blog(view) => view.document().map(|document| document.id),
            _ => None,
        }
    }

    #[test]
    fn unauthorized_history_result_returns_to_login() {
        let mut shell = Shell::new(DiffOptions::default());
        let fetch = shell.navigate("/blogs/1/history", &signed_in());
        assert_matches!(fetch, Some(Fetch::History { id: DocumentId(1), .. }));

        let next = shell.apply_event(
            AppEvent::HistoryLoaded {
                ticket: ticket_of(fetch),
                result: Err(HistoryError::Api(ApiError::Unauthorized)),
            },
            &Session::anonymous(),
        );

        assert_eq!(next, None);
        assert_eq!(shell.view(), Some(ViewKind::Login));
        assert!(matches!(shell.screen(), Screen::Login(_)));
        assert!(shell
            .diagnostics()
            .iter()
            .any(|entry| entry.ends_with("history_loaded: session expired")));
    }

    #[test]
    fn unauthorized_stale_result_still_returns_to_login() {
        let mut shell = Shell::new(DiffOptions::default());
        let session = signed_in();
        let stale = ticket_of(shell.navigate("/blogs/1", &session));
        shell.navigate("/my-blogs", &session);

        shell.apply_event(
            AppEvent::BlogLoaded {
                ticket: stale,
                result: Err(ApiError::Unauthorized),
            },
            &Session::anonymous(),
        );
        assert_eq!(shell.view(), Some(ViewKind::Login));
    }

    #[test]
    fn latest_navigation_wins_in_either_order() {
        for latest_first in [false, true] {
            let mut shell = Shell::new(DiffOptions::default());
            let session = signed_in();
            let first = ticket_of(shell.navigate("/blogs/1", &session));
            let second = ticket_of(shell.navigate("/blogs/2", &session));

            let mut events = vec![
                AppEvent::BlogLoaded {
                    ticket: first,
                    result: Ok(document(1)),
                },
                AppEvent::BlogLoaded {
                    ticket: second,
                    result: Ok(document(2)),
                },
            ];
            if latest_first {
                events.reverse();
            }
            for event in events {
                assert_eq!(shell.apply_event(event, &session), None);
            }

            assert_eq!(shown_document(&shell), Some(DocumentId(2)), "latest_first={latest_first}");
            assert_eq!(shell.location_input_mut().as_str(), "/blogs/2");
            assert!(shell
                .diagnostics()
                .iter()
                .any(|entry| entry.ends_with("blog_loaded: stale result dropped")));
        }
    }

    #[test]
    fn sign_in_redirects_to_blog_list() {
        let mut shell = Shell::new(DiffOptions::default());
        assert_eq!(shell.navigate("/login", &Session::anonymous()), None);
        let ticket = shell.ticket().expect("navigated");

        let session = signed_in();
        let fetch = shell.apply_event(
            AppEvent::LoggedIn {
                ticket,
                result: Ok(session.clone()),
            },
            &session,
        );

        assert_eq!(shell.view(), Some(ViewKind::BlogList));
        assert_matches!(fetch, Some(Fetch::Blogs { author: None, .. }));
    }

    #[test]
    fn superseded_sign_in_routes_current_location_again() {
        let mut shell = Shell::new(DiffOptions::default());
        let anonymous = Session::anonymous();
        shell.navigate("/login", &anonymous);
        let login = shell.ticket().expect("navigated");
        shell.navigate("/", &anonymous);
        assert_eq!(shell.view(), Some(ViewKind::Landing));

        let failed = shell.apply_event(
            AppEvent::LoggedIn {
                ticket: login,
                result: Err(ApiError::Network("refused".to_string())),
            },
            &anonymous,
        );
        assert_eq!(failed, None);
        assert_eq!(shell.view(), Some(ViewKind::Landing));

        let session = signed_in();
        let fetch = shell.apply_event(
            AppEvent::LoggedIn {
                ticket: login,
                result: Ok(session.clone()),
            },
            &session,
        );
        assert_eq!(shell.view(), Some(ViewKind::BlogList));
        assert_matches!(fetch, Some(Fetch::Blogs { .. }));
    }

    #[test]
    fn deleting_blog_returns_home_with_notice() {
        let mut shell = Shell::new(DiffOptions::default());
        let session = signed_in();
        let ticket = ticket_of(shell.navigate("/blogs/3", &session));

        let fetch = shell.apply_event(
            AppEvent::Deleted {
                ticket,
                result: Ok(()),
            },
            &session,
        );

        assert_eq!(shell.view(), Some(ViewKind::BlogList));
        assert_eq!(shell.notice(), Some("Blog deleted."));
        assert_matches!(fetch, Some(Fetch::Blogs { .. }));
    }
}
