use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::protocol::Comment;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::UiEvent,
        orchestration::dispatch_backend_command,
        reducer::{FormModel, PERSON_PLACEHOLDER},
    },
};

pub const APP_TITLE: &str = "API Chaining Dashboard";

const FORM_MAX_WIDTH: f32 = 640.0;
const WARNING_FILL: egui::Color32 = egui::Color32::from_rgb(248, 215, 218);
const WARNING_TEXT: egui::Color32 = egui::Color32::from_rgb(114, 28, 36);

pub struct ApiChainApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    api_base_url: String,
    model: FormModel,
}

impl ApiChainApp {
    /// Queues the one directory load of this session.
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        api_base_url: String,
    ) -> Self {
        let mut model = FormModel {
            status: "Loading users...".to_string(),
            ..FormModel::default()
        };
        if let Some(err) = dispatch_backend_command(&cmd_tx, BackendCommand::LoadDirectory) {
            model.apply(UiEvent::Error(err));
        }

        Self {
            cmd_tx,
            ui_rx,
            api_base_url,
            model,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.model.apply(event);
        }
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small(self.model.status.as_str());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.small(egui::RichText::new(self.api_base_url.as_str()).weak());
                });
            });
        });
    }

    fn show_form(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.set_max_width(FORM_MAX_WIDTH);
                    ui.add_space(24.0);
                    ui.heading(APP_TITLE);
                    ui.add_space(16.0);

                    ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                        for warning in self.model.warnings() {
                            warning_banner(ui, &warning);
                        }

                        self.show_person_picker(ui);
                        ui.add_space(8.0);

                        ui.label(egui::RichText::new("Post Title").strong());
                        ui.add(
                            egui::TextEdit::singleline(&mut self.model.draft.title)
                                .id_salt("post_title")
                                .hint_text("Enter post title")
                                .desired_width(f32::INFINITY),
                        );
                        ui.add_space(8.0);

                        ui.label(egui::RichText::new("Post Body").strong());
                        ui.add(
                            egui::TextEdit::multiline(&mut self.model.draft.body)
                                .id_salt("post_body")
                                .hint_text("Enter post body")
                                .desired_rows(3)
                                .desired_width(f32::INFINITY),
                        );
                        ui.add_space(12.0);

                        let button = egui::Button::new(self.model.submit_label());
                        if ui.add_enabled(self.model.submit_enabled(), button).clicked() {
                            self.submit();
                        }

                        let comments = self.model.comments();
                        if !comments.is_empty() {
                            ui.add_space(20.0);
                            show_comments(ui, comments);
                        }
                    });
                });
            });
        });
    }

    fn show_person_picker(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Select User").strong());
        let selected_text = self.model.person_picker_text().to_string();
        let mut selected = self.model.draft.author_id;

        egui::ComboBox::from_id_salt("person_select")
            .selected_text(selected_text)
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut selected, None, PERSON_PLACEHOLDER);
                for person in self.model.directory.people() {
                    ui.selectable_value(&mut selected, Some(person.id), person.name.as_str());
                }
            });

        if selected != self.model.draft.author_id {
            self.model.select_person(selected);
        }
    }

    fn submit(&mut self) {
        let Some(cmd) = self.model.submit_command() else {
            return;
        };
        if let Some(err) = dispatch_backend_command(&self.cmd_tx, cmd) {
            self.model.apply(UiEvent::Error(err));
        }
    }
}

fn warning_banner(ui: &mut egui::Ui, message: &str) {
    egui::Frame::new()
        .fill(WARNING_FILL)
        .corner_radius(egui::CornerRadius::same(4))
        .inner_margin(egui::Margin::symmetric(12, 8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(message).color(WARNING_TEXT));
        });
    ui.add_space(8.0);
}

fn show_comments(ui: &mut egui::Ui, comments: &[Comment]) {
    ui.heading("Comments");
    ui.add_space(6.0);
    for comment in comments {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new(format!("{}:", comment.name)).strong());
                ui.label(comment.body.as_str());
            });
        });
    }
}

impl eframe::App for ApiChainApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_status_bar(ctx);
        self.show_form(ctx);

        if self.model.chain.state.is_in_flight() || self.model.directory.is_pending() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
