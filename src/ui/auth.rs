use super::{error_label, muted_label, UiAction};
use crate::api::ApiError;
use crate::theme::Theme;
use eframe::egui::{self, RichText};

fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err("Enter a valid email address".to_string()),
    }
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pending: bool,
    error: Option<String>,
    notice: Option<String>,
}

impl LoginForm {
    pub fn with_notice(notice: Option<String>) -> Self {
        Self {
            notice,
            ..Self::default()
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn submit(&mut self) -> Result<UiAction, String> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        self.pending = true;
        self.error = None;
        Ok(UiAction::Login {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }

    pub fn fail(&mut self, err: ApiError) {
        self.pending = false;
        self.password.clear();
        self.error = Some(err.to_string());
    }

    pub fn show(&mut self, ui: &mut egui::Ui, theme: &Theme) -> Option<UiAction> {
        let mut action = None;
        theme.card_frame().show(ui, |ui| {
            ui.set_max_width(360.0);
            ui.heading("Log in");
            if let Some(notice) = &self.notice {
                ui.label(RichText::new(notice).color(theme.success));
            }
            ui.add_space(theme.spacing_8);

            ui.label("Email");
            ui.add(egui::TextEdit::singleline(&mut self.email).hint_text("you@example.com"));
            ui.label("Password");
            let password = ui.add(egui::TextEdit::singleline(&mut self.password).password(true));
            let enter = password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if let Some(error) = &self.error {
                error_label(ui, theme, error);
            }

            ui.horizontal(|ui| {
                let clicked = ui
                    .add_enabled(!self.pending, theme.primary_button("Log in"))
                    .clicked();
                if self.pending {
                    ui.spinner();
                }
                if (clicked || enter) && !self.pending {
                    match self.submit() {
                        Ok(submitted) => action = Some(submitted),
                        Err(message) => self.error = Some(message),
                    }
                }
            });

            ui.add_space(theme.spacing_8);
            ui.horizontal(|ui| {
                muted_label(ui, theme, "No account yet?");
                if ui.link("Register").clicked() {
                    action = Some(UiAction::Navigate("/register".to_string()));
                }
            });
        });
        action
    }
}

#[derive(Debug, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pending: bool,
    error: Option<String>,
}

impl RegisterForm {
    pub fn submit(&mut self) -> Result<UiAction, String> {
        if self.username.trim().is_empty() {
            return Err("Username is required".to_string());
        }
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        self.pending = true;
        self.error = None;
        Ok(UiAction::Register {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }

    pub fn fail(&mut self, err: ApiError) {
        self.pending = false;
        self.error = Some(err.to_string());
    }

    pub fn show(&mut self, ui: &mut egui::Ui, theme: &Theme) -> Option<UiAction> {
        let mut action = None;
        theme.card_frame().show(ui, |ui| {
            ui.set_max_width(360.0);
            ui.heading("Create an account");
            ui.add_space(theme.spacing_8);

            ui.label("Username");
            ui.text_edit_singleline(&mut self.username);
            ui.label("Email");
            ui.add(egui::TextEdit::singleline(&mut self.email).hint_text("you@example.com"));
            ui.label("Password");
            ui.add(egui::TextEdit::singleline(&mut self.password).password(true));

            if let Some(error) = &self.error {
                error_label(ui, theme, error);
            }

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!self.pending, theme.primary_button("Register"))
                    .clicked()
                {
                    match self.submit() {
                        Ok(submitted) => action = Some(submitted),
                        Err(message) => self.error = Some(message),
                    }
                }
                if self.pending {
                    ui.spinner();
                }
            });

            ui.add_space(theme.spacing_8);
            ui.horizontal(|ui| {
                muted_label(ui, theme, "Already registered?");
                if ui.link("Log in").clicked() {
                    action = Some(UiAction::Navigate("/login".to_string()));
                }
            });
        });
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn login_requires_email_and_password() {
        let mut form = LoginForm::default();
        assert_eq!(form.submit(), Err("Email is required".to_string()));

        form.email = "not-an-email".to_string();
        assert_eq!(form.submit(), Err("Enter a valid email address".to_string()));

        form.email = " ana@example.com ".to_string();
        assert_eq!(form.submit(), Err("Password is required".to_string()));
        assert!(!form.is_pending());
    }

    #[test]
    fn valid_login_becomes_pending() {
        let mut form = LoginForm {
            email: "ana@example.com ".to_string(),
            password: "pw".to_string(),
            ..LoginForm::default()
        };
        assert_matches!(form.submit(), Ok(UiAction::Login { email, .. }) => {
            assert_eq!(email, "ana@example.com");
        });
        assert!(form.is_pending());

        form.fail(ApiError::Rejected {
            status: 400,
            message: "Invalid credentials".to_string(),
        });
        assert!(!form.is_pending());
        assert!(form.password.is_empty());
        assert_eq!(form.error.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn register_checks_username_first() {
        let mut form = RegisterForm {
            email: "ana@example.com".to_string(),
            password: "pw".to_string(),
            ..RegisterForm::default()
        };
        assert_eq!(form.submit(), Err("Username is required".to_string()));

        form.username = "ana".to_string();
        assert_matches!(form.submit(), Ok(UiAction::Register { .. }));
    }
}
