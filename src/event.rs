use crate::api::{ApiError, PublishReceipt, RegisterResponse, UpdateReceipt};
use crate::history::{HistoryData, HistoryError};
use crate::model::Document;
use crate::router::RenderTicket;
use crate::session::Session;

/// Results of background work, tagged with the navigation that started it.
#[derive(Debug, Clone)]
pub enum AppEvent {
    LoggedIn {
        ticket: RenderTicket,
        result: Result<Session, ApiError>,
    },
    Registered {
        ticket: RenderTicket,
        result: Result<RegisterResponse, ApiError>,
    },
    BlogsLoaded {
        ticket: RenderTicket,
        result: Result<Vec<Document>, ApiError>,
    },
    BlogLoaded {
        ticket: RenderTicket,
        result: Result<Document, ApiError>,
    },
    Published {
        ticket: RenderTicket,
        result: Result<PublishReceipt, ApiError>,
    },
    Updated {
        ticket: RenderTicket,
        result: Result<(UpdateReceipt, Document), ApiError>,
    },
    Deleted {
        ticket: RenderTicket,
        result: Result<(), ApiError>,
    },
    HistoryLoaded {
        ticket: RenderTicket,
        result: Result<HistoryData, HistoryError>,
    },
    RestoreFinished {
        ticket: RenderTicket,
        result: Result<HistoryData, HistoryError>,
    },
}

impl AppEvent {
    pub fn ticket(&self) -> RenderTicket {
        match self {
            Self::LoggedIn { ticket, .. }
            | Self::Registered { ticket, .. }
            | Self::BlogsLoaded { ticket, .. }
            | Self::BlogLoaded { ticket, .. }
            | Self::Published { ticket, .. }
            | Self::Updated { ticket, .. }
            | Self::Deleted { ticket, .. }
            | Self::HistoryLoaded { ticket, .. }
            | Self::RestoreFinished { ticket, .. } => *ticket,
        }
    }

    /// True when the backend rejected the session token. The session has
    /// already been cleared by the gateway at this point.
    pub fn is_unauthorized(&self) -> bool {
        fn api(result: &Result<impl Sized, ApiError>) -> bool {
            matches!(result, Err(ApiError::Unauthorized))
        }
        fn history(result: &Result<HistoryData, HistoryError>) -> bool {
            matches!(result, Err(HistoryError::Api(ApiError::Unauthorized)))
        }

        match self {
            Self::LoggedIn { result, .. } => api(result),
            Self::Registered { result, .. } => api(result),
            Self::BlogsLoaded { result, .. } => api(result),
            Self::BlogLoaded { result, .. } => api(result),
            Self::Published { result, .. } => api(result),
            Self::Updated { result, .. } => api(result),
            Self::Deleted { result, .. } => api(result),
            Self::HistoryLoaded { result, .. } | Self::RestoreFinished { result, .. } => {
                history(result)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LoggedIn { .. } => "logged_in",
            Self::Registered { .. } => "registered",
            Self::BlogsLoaded { .. } => "blogs_loaded",
            Self::BlogLoaded { .. } => "blog_loaded",
            Self::Published { .. } => "published",
            Self::Updated { .. } => "updated",
            Self::Deleted { .. } => "deleted",
            Self::HistoryLoaded { .. } => "history_loaded",
            Self::RestoreFinished { .. } => "restore_finished",
        }
    }
}
