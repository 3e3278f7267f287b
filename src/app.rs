use crate::client::BlogClient;
use crate::diff::DiffOptions;
use crate::event::AppEvent;
use crate::router::{LOGIN_PATH, ROOT_PATH};
use crate::session::Session;
use crate::shell::{Fetch, Screen, Shell};
use crate::theme::Theme;
use crate::ui::{muted_label, UiAction};
use eframe::egui::{self, RichText, ScrollArea};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub struct BlogDeskApp {
    rx: Receiver<AppEvent>,
    client: BlogClient,
    shell: Shell,
    theme: Theme,
    visuals_applied: bool,
}

impl BlogDeskApp {
    pub fn new(rx: Receiver<AppEvent>, client: BlogClient, diff_options: DiffOptions) -> Self {
        let mut app = Self {
            rx,
            client,
            shell: Shell::new(diff_options),
            theme: Theme::default(),
            visuals_applied: false,
        };
        app.navigate(ROOT_PATH);
        app
    }

    fn session(&self) -> Session {
        self.client.gateway().session().current()
    }

    fn dispatch(&self, fetch: Option<Fetch>) {
        let Some(fetch) = fetch else {
            return;
        };
        tracing::debug!(?fetch, "Loading view data");
        match fetch {
            Fetch::Blogs { ticket, author } => self.client.list_blogs(ticket, author),
            Fetch::Blog { ticket, id } => self.client.blog(ticket, id),
            Fetch::History { ticket, id } => self.client.history(ticket, id),
        }
    }

    fn navigate(&mut self, location: &str) {
        let session = self.session();
        let fetch = self.shell.navigate(location, &session);
        self.dispatch(fetch);
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    let session = self.session();
                    let fetch = self.shell.apply_event(event, &session);
                    self.dispatch(fetch);
                    ctx.request_repaint();
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.shell.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn handle_action(&mut self, action: UiAction, ctx: &egui::Context) {
        if let UiAction::Navigate(location) = &action {
            self.shell.set_notice(None);
            self.navigate(location);
            return;
        }

        let Some(ticket) = self.shell.ticket() else {
            return;
        };
        match action {
            UiAction::Navigate(_) => {}
            UiAction::Login { email, password } => self.client.login(ticket, email, password),
            UiAction::Register {
                username,
                email,
                password,
            } => self.client.register(ticket, username, email, password),
            UiAction::Publish(blog) => self.client.publish(ticket, blog),
            UiAction::Update { id, update } => self.client.update(ticket, id, update),
            UiAction::Delete(id) => self.client.delete(ticket, id),
            UiAction::Restore(request) => {
                self.shell
                    .log_diagnostic(format!("restore version {}", request.version_number));
                self.client.restore(ticket, request);
            }
            UiAction::CopyHtml(html) => {
                ctx.copy_text(html);
                self.shell.log_diagnostic("diff copied as HTML");
            }
            UiAction::Logout => {
                tracing::info!("Logging out");
                self.client.gateway().session().clear();
                self.shell
                    .set_notice(Some("You have been logged out.".to_string()));
                self.navigate(LOGIN_PATH);
            }
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) -> Option<UiAction> {
        let session = self.session();
        let mut action = None;
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .link(RichText::new("Blogdesk").strong().size(17.0))
                    .clicked()
                {
                    action = Some(UiAction::Navigate(ROOT_PATH.to_string()));
                }
                ui.separator();

                if session.is_authenticated() {
                    for (label, path) in [("All blogs", "/"), ("My blogs", "/my-blogs"), ("Write", "/create")] {
                        if ui.button(label).clicked() {
                            action = Some(UiAction::Navigate(path.to_string()));
                        }
                    }
                } else {
                    for (label, path) in [("Log in", "/login"), ("Register", "/register")] {
                        if ui.button(label).clicked() {
                            action = Some(UiAction::Navigate(path.to_string()));
                        }
                    }
                }

                ui.separator();
                let location = ui.add(
                    egui::TextEdit::singleline(self.shell.location_input_mut())
                        .desired_width(220.0)
                        .hint_text("/blogs/1/history"),
                );
                if location.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    action = Some(UiAction::Navigate(self.shell.location_input_mut().clone()));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(name) = session.display_name() {
                        if ui.button("Logout").clicked() {
                            action = Some(UiAction::Logout);
                        }
                        muted_label(ui, &self.theme, format!("Signed in as {name}"));
                    }
                });
            });
        });
        action
    }

    fn render_diagnostics(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("diagnostics").show(ctx, |ui| {
            egui::CollapsingHeader::new("Diagnostics")
                .default_open(false)
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt("diagnostics_log")
                        .max_height(90.0)
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for entry in self.shell.diagnostics() {
                                ui.label(RichText::new(entry).monospace().size(12.0));
                            }
                        });
                });
        });
    }

    fn render_center_panel(&mut self, ctx: &egui::Context) -> Option<UiAction> {
        let viewer = self.session().user_id();
        let theme = self.theme.clone();
        let mut action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            if !matches!(self.shell.screen(), Screen::Login(_)) {
                if let Some(notice) = self.shell.notice() {
                    ui.label(RichText::new(notice).color(theme.warning));
                }
            }
            action = match self.shell.screen_mut() {
                Screen::Landing => Self::render_landing(ui, &theme),
                Screen::Blogs(view) => view.show(ui, &theme),
                Screen::Login(form) => form.show(ui, &theme),
                Screen::Register(form) => form.show(ui, &theme),
                Screen::Create(form) => form.show(ui, &theme),
                Screen::Blog(view) => view.show(ui, &theme, viewer),
                Screen::History(view) => view.show(ui, &theme, viewer),
                Screen::NotFound(path) => {
                    ui.heading("404 - Page Not Found");
                    muted_label(ui, &theme, format!("Nothing lives at {path}."));
                    ui.link("Go home")
                        .clicked()
                        .then(|| UiAction::Navigate(ROOT_PATH.to_string()))
                }
            };
        });
        action
    }

    fn render_landing(ui: &mut egui::Ui, theme: &Theme) -> Option<UiAction> {
        let mut action = None;
        ui.vertical_centered(|ui| {
            ui.add_space(theme.spacing_16 * 4.0);
            ui.heading(RichText::new("Write. Revise. Publish.").size(32.0));
            ui.add_space(theme.spacing_8);
            muted_label(
                ui,
                theme,
                "Every edit is kept as a version, every version can be compared and restored.",
            );
            ui.add_space(theme.spacing_16);
            ui.horizontal(|ui| {
                if ui.add(theme.primary_button("Get started")).clicked() {
                    action = Some(UiAction::Navigate("/register".to_string()));
                }
                if ui.button("Log in").clicked() {
                    action = Some(UiAction::Navigate(LOGIN_PATH.to_string()));
                }
            });
        });
        action
    }
}

impl eframe::App for BlogDeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.visuals_applied {
            self.theme.apply_visuals(ctx);
            self.visuals_applied = true;
        }

        self.drain_events(ctx);

        if self.shell.publish_redirect_due(Instant::now()) {
            self.navigate(ROOT_PATH);
        }

        let top_action = self.render_top_bar(ctx);
        self.render_diagnostics(ctx);
        let center_action = self.render_center_panel(ctx);

        for action in [top_action, center_action].into_iter().flatten() {
            self.handle_action(action, ctx);
        }

        // Background results arrive over a plain channel, so keep polling.
        ctx.request_repaint_after(POLL_INTERVAL);
    }
}
