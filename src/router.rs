//! Location → view resolution with an authentication guard.
//!
//! Each call to [`Router::navigate`] runs `Resolving → Guarding → Rendering`
//! from scratch and hands out a fresh [`RenderTicket`]. Work started for a
//! navigation (network fetches, view construction) carries that ticket and
//! may only reach the screen through [`Router::commit`], which refuses every
//! ticket except the newest one.

use crate::model::DocumentId;
use crate::session::Session;

pub const ROOT_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Landing,
    BlogList,
    MyBlogs,
    Login,
    Register,
    CreateBlog,
    BlogView,
    VersionHistory,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    /// Slash-separated segments; `:id` matches one document id.
    pub pattern: &'static str,
    pub view: ViewKind,
    pub requires_auth: bool,
}

pub const ROUTES: &[RouteEntry] = &[
    RouteEntry {
        pattern: "/login",
        view: ViewKind::Login,
        requires_auth: false,
    },
    RouteEntry {
        pattern: "/register",
        view: ViewKind::Register,
        requires_auth: false,
    },
    RouteEntry {
        pattern: "/create",
        view: ViewKind::CreateBlog,
        requires_auth: true,
    },
    RouteEntry {
        pattern: "/my-blogs",
        view: ViewKind::MyBlogs,
        requires_auth: true,
    },
    RouteEntry {
        pattern: "/blogs/:id",
        view: ViewKind::BlogView,
        requires_auth: true,
    },
    RouteEntry {
        pattern: "/blogs/:id/history",
        view: ViewKind::VersionHistory,
        requires_auth: true,
    },
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    pub document_id: Option<DocumentId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub path: String,
    pub view: ViewKind,
    pub params: RouteParams,
    pub requires_auth: bool,
    pub ticket: RenderTicket,
}

struct Matched {
    view: ViewKind,
    params: RouteParams,
    requires_auth: bool,
}

pub struct Router {
    routes: Vec<RouteEntry>,
    generation: u64,
    current: Option<NavigationState>,
}

impl Default for Router {
    fn default() -> Self {
        Self::with_routes(ROUTES.to_vec())
    }
}

impl Router {
    pub fn with_routes(routes: Vec<RouteEntry>) -> Self {
        Self {
            routes,
            generation: 0,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&NavigationState> {
        self.current.as_ref()
    }

    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        self.current
            .as_ref()
            .is_some_and(|state| state.ticket == ticket)
    }

    /// Runs `apply` only if `ticket` belongs to the latest navigation.
    pub fn commit(&self, ticket: RenderTicket, apply: impl FnOnce()) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(?ticket, "Discarding stale render");
            return false;
        }
        apply();
        true
    }

    pub fn navigate(&mut self, location: &str, session: &Session) -> &NavigationState {
        self.generation += 1;
        let ticket = RenderTicket(self.generation);
        let mut path = normalize(location);
        let mut redirected = false;

        let state = loop {
            match self.resolve(&path, session) {
                None => {
                    tracing::debug!(%path, "No route matched");
                    break NavigationState {
                        path,
                        view: ViewKind::NotFound,
                        params: RouteParams::default(),
                        requires_auth: false,
                        ticket,
                    };
                }
                Some(matched) if matched.requires_auth && !session.is_authenticated() => {
                    if redirected {
                        tracing::warn!(%path, "Login route is itself protected");
                        break NavigationState {
                            path,
                            view: ViewKind::NotFound,
                            params: RouteParams::default(),
                            requires_auth: false,
                            ticket,
                        };
                    }
                    tracing::info!(attempted = %path, "Protected view needs a session, redirecting to login");
                    path = LOGIN_PATH.to_string();
                    redirected = true;
                }
                Some(matched) => {
                    break NavigationState {
                        path,
                        view: matched.view,
                        params: matched.params,
                        requires_auth: matched.requires_auth,
                        ticket,
                    };
                }
            }
        };

        tracing::debug!(path = %state.path, view = ?state.view, ?ticket, "Rendering");
        self.current.insert(state)
    }

    fn resolve(&self, path: &str, session: &Session) -> Option<Matched> {
        if path == ROOT_PATH {
            return Some(if session.is_authenticated() {
                Matched {
                    view: ViewKind::BlogList,
                    params: RouteParams::default(),
                    requires_auth: true,
                }
            } else {
                Matched {
                    view: ViewKind::Landing,
                    params: RouteParams::default(),
                    requires_auth: false,
                }
            });
        }

        self.routes.iter().find_map(|entry| {
            match_pattern(entry.pattern, path).map(|params| Matched {
                view: entry.view,
                params,
                requires_auth: entry.requires_auth,
            })
        })
    }
}

/// Strips a leading `#`, any query string, and trailing slashes.
pub fn normalize(location: &str) -> String {
    let location = location.trim().trim_start_matches('#');
    let location = location.split(['?', '#']).next().unwrap_or_default();
    let trimmed = location.trim_end_matches('/');
    if trimmed.is_empty() {
        ROOT_PATH.to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn match_pattern(pattern: &str, path: &str) -> Option<RouteParams> {
    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();
    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = RouteParams::default();
    for (expected, actual) in pattern_segments.iter().zip(&path_segments) {
        if *expected == ":id" {
            params.document_id = Some(actual.parse().ok()?);
        } else if expected != actual {
            return None;
        }
    }
    Some(params)
}
