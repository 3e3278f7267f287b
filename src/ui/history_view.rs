use super::diff_view::show_diff;
use super::{blog_path, error_label, loading, muted_label, UiAction};
use crate::history::{HistoryData, HistoryError, VersionHistoryController};
use crate::markup;
use crate::model::{display_timestamp, UserId, Version, VersionId};
use crate::theme::Theme;
use eframe::egui::{self, RichText, ScrollArea};

/// `/blogs/:id/history`.
pub struct HistoryView {
    controller: VersionHistoryController,
    loading: bool,
    confirm_restore: Option<VersionId>,
    notice: Option<String>,
}

impl HistoryView {
    pub fn new(controller: VersionHistoryController) -> Self {
        Self {
            controller,
            loading: true,
            confirm_restore: None,
            notice: None,
        }
    }

    pub fn loaded(&mut self, result: Result<HistoryData, HistoryError>) {
        self.loading = false;
        match result {
            Ok(data) => self.controller.show(data),
            Err(err) => self.controller.fail(err),
        }
    }

    pub fn restored(&mut self, result: Result<HistoryData, HistoryError>) {
        let succeeded = result.is_ok();
        self.controller.finish_restore(result);
        if succeeded {
            self.notice = self
                .controller
                .selected()
                .map(|version| format!("Restored as version {}", version.version_number));
        }
    }

    /// Validates the restore and returns the action that starts it.
    pub fn request_restore(&mut self, version_id: VersionId, viewer: Option<UserId>) -> Option<UiAction> {
        self.notice = None;
        match self.controller.prepare_restore(version_id, viewer) {
            Ok(request) => Some(UiAction::Restore(request)),
            Err(err) => {
                self.controller.fail(err);
                None
            }
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, theme: &Theme, viewer: Option<UserId>) -> Option<UiAction> {
        let mut action = None;
        if ui.link("← Back to blog").clicked() {
            action = Some(UiAction::Navigate(blog_path(self.controller.document_id())));
        }
        ui.heading("Version History");

        if let Some(notice) = &self.notice {
            ui.label(RichText::new(notice).color(theme.success));
        }
        if let Some(error) = self.controller.error() {
            error_label(ui, theme, &error.to_string());
        }
        if self.loading {
            loading(ui, theme);
            return action;
        }
        if self.controller.versions().is_empty() {
            muted_label(ui, theme, "No history.");
            return action;
        }

        let mut clicked = None;
        ui.columns(2, |columns| {
            ScrollArea::vertical()
                .id_salt("version_list")
                .show(&mut columns[0], |ui| {
                    for version in self.controller.versions() {
                        if self.version_card(ui, theme, version) {
                            clicked = Some(version.id);
                        }
                    }
                });

            let ui = &mut columns[1];
            if let Some(snapshot_action) = self.snapshot(ui, theme, viewer) {
                action = Some(snapshot_action);
            }
        });
        if let Some(version_id) = clicked {
            self.notice = None;
            if let Err(err) = self.controller.select(version_id) {
                self.controller.fail(err);
            }
        }

        if let Some(version_id) = self.confirm_restore {
            let number = self
                .controller
                .versions()
                .iter()
                .find(|version| version.id == version_id)
                .map(|version| version.version_number)
                .unwrap_or_default();
            match super::confirm_dialog(
                ui.ctx(),
                theme,
                "Restore version",
                &format!(
                    "Are you sure you want to restore Version {number}? This will create a new version."
                ),
                "Restore",
            ) {
                Some(true) => {
                    self.confirm_restore = None;
                    if let Some(restore) = self.request_restore(version_id, viewer) {
                        action = Some(restore);
                    }
                }
                Some(false) => self.confirm_restore = None,
                None => {}
            }
        }
        action
    }

    fn version_card(&self, ui: &mut egui::Ui, theme: &Theme, version: &Version) -> bool {
        let selected = self
            .controller
            .selected()
            .is_some_and(|current| current.id == version.id);
        let frame = if selected {
            theme.selected_card_frame()
        } else {
            theme.card_frame()
        };
        let response = frame
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.strong(format!("Version {}", version.version_number));
                    if self.controller.is_latest(version) {
                        theme.badge_frame().show(ui, |ui| {
                            ui.label(
                                RichText::new("Current")
                                    .color(theme.text_on_accent)
                                    .size(11.0),
                            );
                        });
                    }
                });
                muted_label(ui, theme, display_timestamp(&version.created_at));
                if !version.change_description.is_empty() {
                    ui.label(RichText::new(&version.change_description).italics());
                }
            })
            .response;
        ui.add_space(theme.spacing_4);
        response.interact(egui::Sense::click()).clicked()
    }

    fn snapshot(&mut self, ui: &mut egui::Ui, theme: &Theme, viewer: Option<UserId>) -> Option<UiAction> {
        let mut action = None;
        let Some(version) = self.controller.selected().cloned() else {
            muted_label(ui, theme, "Select a version to view content.");
            return None;
        };

        theme.card_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.strong(format!("Content Snapshot (v{})", version.version_number));
                if self.controller.can_restore(&version, viewer) {
                    let restoring = self.controller.is_restoring();
                    if ui
                        .add_enabled(!restoring, theme.primary_button("Restore this Version"))
                        .clicked()
                    {
                        self.confirm_restore = Some(version.id);
                    }
                    if restoring {
                        ui.spinner();
                    }
                }
            });
            let mut provenance = display_timestamp(&version.created_at);
            if let Some(previous) = self.controller.predecessor(&version) {
                provenance.push_str(&format!(" · follows version {}", previous.version_number));
            }
            muted_label(ui, theme, provenance);
            ui.separator();
            ScrollArea::vertical()
                .id_salt("version_snapshot")
                .max_height(280.0)
                .show(ui, |ui| {
                    ui.label(&version.content);
                });

            if let Some(diff) = self.controller.diff() {
                ui.separator();
                ui.horizontal(|ui| {
                    ui.strong("Changes since this version");
                    if ui.small_button("Copy diff as HTML").clicked() {
                        action = Some(UiAction::CopyHtml(markup::diff_to_html(diff)));
                    }
                });
                ScrollArea::vertical()
                    .id_salt("version_diff")
                    .show(ui, |ui| show_diff(ui, diff, theme));
            }
        });
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffOptions;
    use crate::model::{Document, DocumentId};

    fn version(id: i64, number: u32, content: &str) -> Version {
        Version {
            id: VersionId(id),
            document_id: DocumentId(1),
            version_number: number,
            content: content.to_string(),
            change_description: String::new(),
            created_at: String::new(),
        }
    }

    fn data() -> HistoryData {
        HistoryData {
            current: Document {
                id: DocumentId(1),
                title: "Post".to_string(),
                content: "two".to_string(),
                author_id: UserId(1),
                author_name: "ana".to_string(),
                created_at: String::new(),
                ai_score: None,
                plagiarism_score: None,
            },
            versions: vec![version(11, 2, "two"), version(10, 1, "one")],
        }
    }

    #[test]
    fn load_failure_stops_spinner() {
        let mut view = HistoryView::new(VersionHistoryController::new(
            DocumentId(1),
            DiffOptions::default(),
        ));
        view.loaded(Err(HistoryError::NotFound));
        assert!(!view.loading);
        assert_eq!(view.controller.error(), Some(&HistoryError::NotFound));
    }

    #[test]
    fn restore_request_is_checked_before_sending() {
        let mut view = HistoryView::new(VersionHistoryController::new(
            DocumentId(1),
            DiffOptions::default(),
        ));
        view.loaded(Ok(data()));

        assert!(view.request_restore(VersionId(11), Some(UserId(1))).is_none());
        assert_eq!(
            view.controller.error(),
            Some(&HistoryError::AlreadyLatest { version_number: 2 })
        );
        assert!(view.request_restore(VersionId(10), Some(UserId(2))).is_none());

        let action = view.request_restore(VersionId(10), Some(UserId(1)));
        assert!(matches!(action, Some(UiAction::Restore(request)) if request.version_number == 1));
        assert!(view.controller.is_restoring());
    }
}
