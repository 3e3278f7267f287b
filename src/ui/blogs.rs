use super::{blog_path, error_label, history_path, loading, muted_label, UiAction};
use crate::api::{ApiError, BlogUpdate, NewBlog, PublishReceipt, UpdateReceipt};
use crate::model::{display_timestamp, Document, DocumentId, UserId};
use crate::theme::Theme;
use eframe::egui::{self, RichText, ScrollArea};
use std::time::{Duration, Instant};

pub const EXCERPT_CHARS: usize = 150;
pub const PUBLISH_REDIRECT_DELAY: Duration = Duration::from_secs(3);

pub fn excerpt(document: &Document) -> String {
    let excerpt = document.excerpt(EXCERPT_CHARS);
    if document.content.chars().count() > EXCERPT_CHARS {
        format!("{excerpt}...")
    } else {
        excerpt
    }
}

/// `/` and `/my-blogs`.
#[derive(Debug)]
pub struct BlogListView {
    mine: bool,
    blogs: Option<Vec<Document>>,
    error: Option<String>,
}

impl BlogListView {
    pub fn new(mine: bool) -> Self {
        Self {
            mine,
            blogs: None,
            error: None,
        }
    }

    pub fn load(&mut self, result: Result<Vec<Document>, ApiError>) {
        match result {
            Ok(blogs) => {
                self.blogs = Some(blogs);
                self.error = None;
            }
            Err(err) => self.error = Some(format!("Error loading blogs: {err}")),
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, theme: &Theme) -> Option<UiAction> {
        let mut action = None;
        ui.horizontal(|ui| {
            ui.heading(if self.mine { "My Blogs" } else { "Latest Blogs" });
            if ui.add(theme.primary_button("Write a blog")).clicked() {
                action = Some(UiAction::Navigate("/create".to_string()));
            }
        });
        ui.add_space(theme.spacing_8);

        if let Some(error) = &self.error {
            error_label(ui, theme, error);
            return action;
        }
        let Some(blogs) = &self.blogs else {
            loading(ui, theme);
            return action;
        };
        if blogs.is_empty() {
            muted_label(
                ui,
                theme,
                if self.mine {
                    "You haven't written any blogs yet."
                } else {
                    "No blogs yet. Be the first to write one!"
                },
            );
            return action;
        }

        ScrollArea::vertical().id_salt("blog_list").show(ui, |ui| {
            for blog in blogs {
                theme.card_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width().min(theme.reading_width));
                    if ui
                        .link(RichText::new(&blog.title).size(17.0).strong())
                        .clicked()
                    {
                        action = Some(UiAction::Navigate(blog_path(blog.id)));
                    }
                    let byline = match blog.author_name.as_str() {
                        "" => display_timestamp(&blog.created_at),
                        author => format!("By {author} · {}", display_timestamp(&blog.created_at)),
                    };
                    muted_label(ui, theme, byline);
                    ui.label(excerpt(blog));
                });
                ui.add_space(theme.spacing_8);
            }
        });
        action
    }
}

/// `/create`. After a successful publish the analysis scores stay on screen
/// for [`PUBLISH_REDIRECT_DELAY`] before returning to the listing.
#[derive(Debug, Default)]
pub struct CreateForm {
    pub title: String,
    pub content: String,
    pending: bool,
    error: Option<String>,
    published: Option<(PublishReceipt, Instant)>,
}

impl CreateForm {
    pub fn submit(&mut self) -> Result<UiAction, String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if self.content.trim().is_empty() {
            return Err("Content is required".to_string());
        }
        self.pending = true;
        self.error = None;
        Ok(UiAction::Publish(NewBlog {
            title: self.title.trim().to_string(),
            content: self.content.clone(),
        }))
    }

    pub fn finish(&mut self, result: Result<PublishReceipt, ApiError>, now: Instant) {
        self.pending = false;
        match result {
            Ok(receipt) => self.published = Some((receipt, now)),
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    pub fn redirect_due(&self, now: Instant) -> bool {
        self.published
            .as_ref()
            .is_some_and(|(_, at)| now.saturating_duration_since(*at) >= PUBLISH_REDIRECT_DELAY)
    }

    pub fn show(&mut self, ui: &mut egui::Ui, theme: &Theme) -> Option<UiAction> {
        let mut action = None;
        ui.heading("Write a new blog");
        ui.add_space(theme.spacing_8);

        if let Some((receipt, _)) = &self.published {
            theme.card_frame().show(ui, |ui| {
                ui.label(RichText::new("Blog published successfully!").color(theme.success));
                ui.horizontal(|ui| {
                    ui.label("AI probability:");
                    ui.label(
                        RichText::new(format!("{:.1}%", receipt.ai_score))
                            .color(theme.score_color(receipt.ai_score))
                            .strong(),
                    );
                });
                ui.horizontal(|ui| {
                    ui.label("Plagiarism score:");
                    ui.label(
                        RichText::new(format!("{:.1}%", receipt.plagiarism_score))
                            .color(theme.score_color(receipt.plagiarism_score))
                            .strong(),
                    );
                });
                muted_label(ui, theme, "Returning to the blog list...");
            });
            return None;
        }

        ui.label("Title");
        ui.add(egui::TextEdit::singleline(&mut self.title).desired_width(theme.reading_width));
        ui.label("Content");
        ui.add(
            egui::TextEdit::multiline(&mut self.content)
                .desired_rows(14)
                .desired_width(theme.reading_width),
        );

        if let Some(error) = &self.error {
            error_label(ui, theme, error);
        }

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.pending, theme.primary_button("Publish"))
                .clicked()
            {
                match self.submit() {
                    Ok(submitted) => action = Some(submitted),
                    Err(message) => self.error = Some(message),
                }
            }
            if self.pending {
                ui.spinner();
                muted_label(ui, theme, "Analyzing content...");
            }
        });
        action
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub content: String,
    pub change_description: String,
}

/// `/blogs/:id`: read, and for the author edit or delete.
#[derive(Debug)]
pub struct BlogView {
    id: DocumentId,
    document: Option<Document>,
    error: Option<String>,
    action_error: Option<String>,
    notice: Option<String>,
    draft: Option<EditDraft>,
    confirm_delete: bool,
    pending: bool,
}

impl BlogView {
    pub fn new(id: DocumentId) -> Self {
        Self {
            id,
            document: None,
            error: None,
            action_error: None,
            notice: None,
            draft: None,
            confirm_delete: false,
            pending: false,
        }
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn load(&mut self, result: Result<Document, ApiError>) {
        match result {
            Ok(document) => {
                self.document = Some(document);
                self.error = None;
            }
            Err(err) if err.is_not_found() => self.error = Some("Blog not found.".to_string()),
            Err(err) => self.error = Some(format!("Error loading blog: {err}")),
        }
    }

    pub fn start_edit(&mut self, viewer: Option<UserId>) -> bool {
        let Some(document) = &self.document else {
            return false;
        };
        if !document.is_authored_by(viewer) {
            return false;
        }
        self.draft = Some(EditDraft {
            content: document.content.clone(),
            change_description: String::new(),
        });
        self.action_error = None;
        true
    }

    pub fn submit_edit(&mut self) -> Result<UiAction, String> {
        let draft = self.draft.as_ref().ok_or("Nothing to save")?;
        if draft.content.trim().is_empty() {
            return Err("Content is required".to_string());
        }
        if draft.change_description.trim().is_empty() {
            return Err("Please describe what you changed".to_string());
        }
        if self
            .document
            .as_ref()
            .is_some_and(|document| document.content == draft.content)
        {
            return Err("No changes to save".to_string());
        }
        let update = BlogUpdate {
            content: draft.content.clone(),
            change_description: draft.change_description.trim().to_string(),
        };
        self.pending = true;
        self.action_error = None;
        Ok(UiAction::Update { id: self.id, update })
    }

    pub fn finish_update(&mut self, result: Result<(UpdateReceipt, Document), ApiError>) {
        self.pending = false;
        match result {
            Ok((receipt, document)) => {
                self.document = Some(document);
                self.draft = None;
                self.notice = Some(format!("Saved as version {}", receipt.version));
            }
            Err(err) => self.action_error = Some(err.to_string()),
        }
    }

    pub fn fail_delete(&mut self, err: ApiError) {
        self.pending = false;
        self.action_error = Some(err.to_string());
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        viewer: Option<UserId>,
    ) -> Option<UiAction> {
        let mut action = None;
        if ui.link("← Back to blogs").clicked() {
            action = Some(UiAction::Navigate("/".to_string()));
        }

        if let Some(error) = &self.error {
            error_label(ui, theme, error);
            return action;
        }
        let Some(document) = self.document.clone() else {
            loading(ui, theme);
            return action;
        };
        let is_author = document.is_authored_by(viewer);

        ui.horizontal(|ui| {
            ui.heading(&document.title);
            if ui.button("Version history").clicked() {
                action = Some(UiAction::Navigate(history_path(self.id)));
            }
            if is_author && self.draft.is_none() {
                if ui.add_enabled(!self.pending, egui::Button::new("Edit")).clicked() {
                    self.start_edit(viewer);
                }
                if ui
                    .add_enabled(!self.pending, theme.danger_button("Delete"))
                    .clicked()
                {
                    self.confirm_delete = true;
                }
            }
        });
        let byline = match document.author_name.as_str() {
            "" => display_timestamp(&document.created_at),
            author => format!("By {author} · {}", display_timestamp(&document.created_at)),
        };
        muted_label(ui, theme, byline);
        if let (Some(ai), Some(plagiarism)) = (document.ai_score, document.plagiarism_score) {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!("AI probability {ai:.0}%"))
                        .color(theme.score_color(ai))
                        .size(12.0),
                );
                ui.label(
                    RichText::new(format!("Plagiarism {plagiarism:.0}%"))
                        .color(theme.score_color(plagiarism))
                        .size(12.0),
                );
            });
        }

        if let Some(notice) = &self.notice {
            ui.label(RichText::new(notice).color(theme.success));
        }
        if let Some(error) = &self.action_error {
            error_label(ui, theme, error);
        }
        ui.separator();

        if self.draft.is_some() {
            if let Some(edit_action) = self.show_editor(ui, theme) {
                action = Some(edit_action);
            }
        } else {
            ScrollArea::vertical().id_salt("blog_body").show(ui, |ui| {
                ui.set_max_width(theme.reading_width);
                ui.label(&document.content);
            });
        }

        if self.confirm_delete {
            match super::confirm_dialog(
                ui.ctx(),
                theme,
                "Delete blog",
                "Are you sure you want to delete this blog? This cannot be undone.",
                "Delete",
            ) {
                Some(true) => {
                    self.confirm_delete = false;
                    self.pending = true;
                    action = Some(UiAction::Delete(self.id));
                }
                Some(false) => self.confirm_delete = false,
                None => {}
            }
        }
        action
    }

    fn show_editor(&mut self, ui: &mut egui::Ui, theme: &Theme) -> Option<UiAction> {
        let mut action = None;
        let mut cancel = false;
        if let Some(draft) = self.draft.as_mut() {
            ui.add(
                egui::TextEdit::multiline(&mut draft.content)
                    .desired_rows(14)
                    .desired_width(theme.reading_width),
            );
            ui.label("Change description");
            ui.add(
                egui::TextEdit::singleline(&mut draft.change_description)
                    .hint_text("e.g. Fixed typos in the introduction")
                    .desired_width(theme.reading_width),
            );
        }
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.pending, theme.primary_button("Save changes"))
                .clicked()
            {
                match self.submit_edit() {
                    Ok(submitted) => action = Some(submitted),
                    Err(message) => self.action_error = Some(message),
                }
            }
            if ui.add_enabled(!self.pending, egui::Button::new("Cancel")).clicked() {
                cancel = true;
            }
            if self.pending {
                ui.spinner();
            }
        });
        if cancel {
            self.draft = None;
            self.action_error = None;
        }
        action
    }
}
