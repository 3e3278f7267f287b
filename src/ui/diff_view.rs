use crate::diff::{DiffResult, DiffTag};
use crate::theme::Theme;
use eframe::egui::{self, text::LayoutJob, FontId, Stroke, TextFormat};

/// Lays out a word diff as wrapped prose: insertions on the added tint,
/// deletions struck through on the removed tint.
pub fn diff_layout(result: &DiffResult, theme: &Theme, wrap_width: f32) -> LayoutJob {
    let mut job = LayoutJob::default();
    job.wrap.max_width = wrap_width;

    let plain = TextFormat {
        font_id: FontId::proportional(15.0),
        color: theme.text_primary,
        ..Default::default()
    };

    for (index, token) in result.tokens.iter().enumerate() {
        if index > 0 {
            job.append(" ", 0.0, plain.clone());
        }
        let format = match token.tag {
            DiffTag::Unchanged => plain.clone(),
            DiffTag::Inserted => TextFormat {
                background: theme.diff_added_tint,
                color: theme.success,
                ..plain.clone()
            },
            DiffTag::Deleted => TextFormat {
                background: theme.diff_removed_tint,
                color: theme.danger,
                strikethrough: Stroke::new(1.0, theme.danger),
                ..plain.clone()
            },
        };
        job.append(&token.text, 0.0, format);
    }
    job
}

pub fn show_diff(ui: &mut egui::Ui, result: &DiffResult, theme: &Theme) {
    if result.tokens.is_empty() {
        super::muted_label(ui, theme, "Both versions are empty.");
        return;
    }
    if result.is_unchanged() {
        super::muted_label(ui, theme, "No differences from the current text.");
    } else {
        super::muted_label(
            ui,
            theme,
            format!(
                "{} words added, {} words removed since this version",
                result.count(DiffTag::Inserted),
                result.count(DiffTag::Deleted)
            ),
        );
    }
    let job = diff_layout(result, theme, ui.available_width());
    ui.label(job);
}
