//! Version history of one document: loading, selection with a word diff, and
//! restore.
//!
//! Network work is split from state changes so the controller can live on the
//! UI thread: [`load`] and [`restore_version`] are plain async functions run on
//! the runtime, and their results are fed back through [`VersionHistoryController::show`]
//! and [`VersionHistoryController::finish_restore`].

use crate::api::gateway::Gateway;
use crate::api::ApiError;
use crate::diff::{diff_with, DiffOptions, DiffResult};
use crate::model::{Document, DocumentId, UserId, Version, VersionId};
use crate::timeline::{self, TimelineError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("blog not found")]
    NotFound,

    #[error("only the author can restore a version")]
    NotAuthor,

    #[error("version {version_number} is already the current version")]
    AlreadyLatest { version_number: u32 },

    #[error("that version is not part of this history")]
    UnknownVersion,

    #[error("a restore is already in progress")]
    RestoreInProgress,

    #[error("history has not been loaded yet")]
    NotLoaded,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Timeline(#[from] TimelineError),
}

impl HistoryError {
    fn from_fetch(err: ApiError) -> Self {
        if err.is_not_found() {
            Self::NotFound
        } else {
            Self::Api(err)
        }
    }
}

/// A loaded timeline: versions most recent first plus the live document.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryData {
    pub current: Document,
    pub versions: Vec<Version>,
}

/// Everything [`restore_version`] needs, captured while the controller still
/// had a consistent view of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreRequest {
    pub document_id: DocumentId,
    pub version_id: VersionId,
    pub version_number: u32,
}

pub async fn load(gateway: &Gateway, document_id: DocumentId) -> Result<HistoryData, HistoryError> {
    let (current, versions) =
        tokio::try_join!(gateway.blog(document_id), gateway.versions(document_id))
            .map_err(HistoryError::from_fetch)?;

    timeline::latest_of(&versions)?;
    tracing::debug!(%document_id, versions = versions.len(), "Loaded version history");

    Ok(HistoryData {
        current,
        versions: timeline::ordered_descending(&versions),
    })
}

/// Asks the backend to copy an old version forward, then reloads the whole
/// timeline so the new version and content come from the server.
pub async fn restore_version(
    gateway: &Gateway,
    request: RestoreRequest,
) -> Result<HistoryData, HistoryError> {
    let receipt = gateway
        .restore(request.document_id, request.version_id)
        .await
        .map_err(HistoryError::from_fetch)?;
    tracing::info!(
        document_id = %request.document_id,
        from = request.version_number,
        new_version = receipt.new_version,
        "Restored version"
    );
    load(gateway, request.document_id).await
}

pub struct VersionHistoryController {
    document_id: DocumentId,
    options: DiffOptions,
    data: Option<HistoryData>,
    selected: Option<VersionId>,
    diff: Option<DiffResult>,
    error: Option<HistoryError>,
    restoring: Option<VersionId>,
}

impl VersionHistoryController {
    pub fn new(document_id: DocumentId, options: DiffOptions) -> Self {
        Self {
            document_id,
            options,
            data: None,
            selected: None,
            diff: None,
            error: None,
            restoring: None,
        }
    }

    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    pub fn versions(&self) -> &[Version] {
        self.data
            .as_ref()
            .map(|data| data.versions.as_slice())
            .unwrap_or_default()
    }

    pub fn current(&self) -> Option<&Document> {
        self.data.as_ref().map(|data| &data.current)
    }

    pub fn selected(&self) -> Option<&Version> {
        self.selected
            .and_then(|id| timeline::find(self.versions(), id))
    }

    /// Diff from the selected snapshot to the document's current text.
    pub fn diff(&self) -> Option<&DiffResult> {
        self.diff.as_ref()
    }

    pub fn error(&self) -> Option<&HistoryError> {
        self.error.as_ref()
    }

    pub fn is_restoring(&self) -> bool {
        self.restoring.is_some()
    }

    pub fn is_latest(&self, version: &Version) -> bool {
        timeline::is_latest(version, self.versions()).unwrap_or(false)
    }

    pub fn predecessor(&self, version: &Version) -> Option<&Version> {
        timeline::predecessor_of(version, self.versions())
            .ok()
            .flatten()
    }

    pub fn can_restore(&self, version: &Version, viewer: Option<UserId>) -> bool {
        self.current()
            .is_some_and(|current| current.is_authored_by(viewer))
            && !self.is_latest(version)
    }

    /// Replaces the timeline and selects its latest version.
    pub fn show(&mut self, data: HistoryData) {
        let latest = timeline::latest_of(&data.versions).map(|version| version.id);
        self.data = Some(data);
        self.error = None;
        self.selected = None;
        self.diff = None;

        match latest {
            Ok(id) => {
                if let Err(err) = self.select(id) {
                    self.error = Some(err);
                }
            }
            Err(err) => self.error = Some(err.into()),
        }
    }

    /// Records a load failure. A previously shown timeline stays visible.
    pub fn fail(&mut self, err: HistoryError) {
        tracing::warn!(document_id = %self.document_id, error = %err, "History unavailable");
        self.error = Some(err);
    }

    pub fn select(&mut self, version_id: VersionId) -> Result<(), HistoryError> {
        let data = self.data.as_ref().ok_or(HistoryError::NotLoaded)?;
        let version =
            timeline::find(&data.versions, version_id).ok_or(HistoryError::UnknownVersion)?;
        self.diff = Some(diff_with(
            &version.content,
            &data.current.content,
            self.options,
        ));
        self.selected = Some(version_id);
        self.error = None;
        Ok(())
    }

    /// Validates a restore and marks it pending. The controller refuses a
    /// second restore until [`Self::finish_restore`] is called.
    pub fn prepare_restore(
        &mut self,
        version_id: VersionId,
        viewer: Option<UserId>,
    ) -> Result<RestoreRequest, HistoryError> {
        if self.restoring.is_some() {
            return Err(HistoryError::RestoreInProgress);
        }
        let data = self.data.as_ref().ok_or(HistoryError::NotLoaded)?;
        if !data.current.is_authored_by(viewer) {
            return Err(HistoryError::NotAuthor);
        }
        let version =
            timeline::find(&data.versions, version_id).ok_or(HistoryError::UnknownVersion)?;
        if timeline::is_latest(version, &data.versions)? {
            return Err(HistoryError::AlreadyLatest {
                version_number: version.version_number,
            });
        }

        self.restoring = Some(version_id);
        Ok(RestoreRequest {
            document_id: self.document_id,
            version_id,
            version_number: version.version_number,
        })
    }

    /// Applies the outcome of [`restore_version`]. On failure the previous
    /// timeline and selection are left exactly as they were.
    pub fn finish_restore(&mut self, result: Result<HistoryData, HistoryError>) {
        self.restoring = None;
        match result {
            Ok(data) => self.show(data),
            Err(err) => self.fail(err),
        }
    }
}
