pub mod auth;
pub mod blogs;
pub mod diff_view;
pub mod history_view;

use crate::api::{BlogUpdate, NewBlog};
use crate::history::RestoreRequest;
use crate::model::DocumentId;
use crate::theme::Theme;
use eframe::egui::{self, RichText};

/// What a view asks the app to do after a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Navigate(String),
    Login {
        email: String,
        password: String,
    },
    Register {
        username: String,
        email: String,
        password: String,
    },
    Publish(NewBlog),
    Update {
        id: DocumentId,
        update: BlogUpdate,
    },
    Delete(DocumentId),
    Restore(RestoreRequest),
    CopyHtml(String),
    Logout,
}

pub fn blog_path(id: DocumentId) -> String {
    format!("/blogs/{id}")
}

pub fn history_path(id: DocumentId) -> String {
    format!("/blogs/{id}/history")
}

pub(crate) fn error_label(ui: &mut egui::Ui, theme: &Theme, message: &str) {
    ui.label(RichText::new(message).color(theme.danger).size(13.0));
}

pub(crate) fn muted_label(ui: &mut egui::Ui, theme: &Theme, text: impl Into<String>) {
    ui.label(RichText::new(text.into()).color(theme.text_muted).size(12.0));
}

pub(crate) fn loading(ui: &mut egui::Ui, theme: &Theme) {
    ui.horizontal(|ui| {
        ui.spinner();
        muted_label(ui, theme, "Loading...");
    });
}

/// A modal yes/no prompt. Returns `Some(true)` on confirm, `Some(false)` on
/// cancel, `None` while still open.
pub(crate) fn confirm_dialog(
    ctx: &egui::Context,
    theme: &Theme,
    title: &str,
    message: &str,
    confirm_label: &str,
) -> Option<bool> {
    let mut answer = None;
    let modal = egui::Modal::new(egui::Id::new(("confirm", title))).show(ctx, |ui| {
        ui.set_max_width(360.0);
        ui.heading(title);
        ui.add_space(theme.spacing_8);
        ui.label(message);
        ui.add_space(theme.spacing_12);
        ui.horizontal(|ui| {
            if ui.add(theme.danger_button(confirm_label)).clicked() {
                answer = Some(true);
            }
            if ui.button("Cancel").clicked() {
                answer = Some(false);
            }
        });
    });
    if answer.is_none() && modal.should_close() {
        answer = Some(false);
    }
    answer
}
