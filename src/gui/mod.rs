use deluge::models::view::{
    LevelMark, QuestionView, WidgetView, APOLOGY_TEXT, PROMPT_TEXT, THANKS_TEXT,
};
use deluge::Response;

pub mod state;

use state::AppState;

/// Interactions collected while drawing and applied after the frame's
/// borrows end.
enum UiAction {
    Mount,
    Unmount,
    Vote(bool),
    Respond(usize, Response),
    Cancel,
    Submit,
    Reset,
}

pub fn ui_main(ctx: &egui::Context, state: &mut AppState) {
    ctx.set_visuals(egui::Visuals::light());

    state.poll_submission();

    let mut actions = Vec::new();

    egui::TopBottomPanel::top("header").show(ctx, |ui| {
        egui::Frame::default()
            .outer_margin(egui::vec2(0.0, 4.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::left_to_right(egui::Align::Center), |ui| {
                        if let Some(widget) = &state.widget {
                            ui.label(widget.identity());
                        }
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if state.widget.is_some() {
                            if ui.button("Unmount").clicked() {
                                actions.push(UiAction::Unmount);
                            }
                            if ui.button("Reset").clicked() {
                                actions.push(UiAction::Reset);
                            }
                        }
                    });
                });
            });
    });

    egui::CentralPanel::default().show(ctx, |ui| match &state.widget {
        Some(widget) => {
            ui.vertical(|ui| {
                draw_widget(ui, &widget.view(), &mut actions);

                ui.add_space(12.0);
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for log in &state.logs {
                            ui.label(log);
                        }
                    });
            });
        }
        None => {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading("Mount a feedback widget");
                ui.add_space(12.0);
                egui::Grid::new("mount_grid")
                    .num_columns(2)
                    .show(ui, |ui| {
                        ui.label("Project:");
                        ui.text_edit_singleline(&mut state.project);
                        ui.end_row();

                        ui.label("Path:");
                        ui.text_edit_singleline(&mut state.page_path);
                        ui.end_row();

                        ui.label("Collector:");
                        ui.text_edit_singleline(&mut state.config.collector_url);
                        ui.end_row();
                    });

                ui.add_space(12.0);
                if ui.button("Mount").clicked() {
                    actions.push(UiAction::Mount);
                }
            });
        }
    });

    egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!(
                "Status: {}",
                match &state.widget {
                    Some(widget) => widget.state().to_string(),
                    None => "Not mounted".to_owned(),
                }
            ));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(&state.status_message);
            });
        });
    });

    for action in actions {
        match action {
            UiAction::Mount => state.mount_widget(),
            UiAction::Unmount => state.unmount_widget(),
            UiAction::Vote(vote) => state.vote(vote),
            UiAction::Respond(index, response) => state.respond(index, response),
            UiAction::Cancel => state.cancel(),
            UiAction::Submit => state.submit(),
            UiAction::Reset => state.reset(),
        }
    }

    if state.widget.as_ref().is_some_and(|w| w.is_submitting()) {
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

fn draw_widget(ui: &mut egui::Ui, view: &WidgetView, actions: &mut Vec<UiAction>) {
    match view {
        WidgetView::Prompt => {
            ui.label(PROMPT_TEXT);
            ui.horizontal(|ui| {
                if ui.button("Yes").clicked() {
                    actions.push(UiAction::Vote(true));
                }
                if ui.button("No").clicked() {
                    actions.push(UiAction::Vote(false));
                }
            });
        }
        WidgetView::Survey {
            apology,
            questions,
            submitting,
        } => {
            ui.add_enabled_ui(!submitting, |ui| {
                if *apology {
                    ui.label(APOLOGY_TEXT);
                }
                for (index, question) in questions.iter().enumerate() {
                    ui.separator();
                    draw_question(ui, index, question, actions);
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        actions.push(UiAction::Cancel);
                    }
                    if ui.button("Submit").clicked() {
                        actions.push(UiAction::Submit);
                    }
                });
            });
            if *submitting {
                ui.spinner();
            }
        }
        WidgetView::Thanks => {
            ui.label(THANKS_TEXT);
        }
    }
}

fn draw_question(
    ui: &mut egui::Ui,
    index: usize,
    question: &QuestionView,
    actions: &mut Vec<UiAction>,
) {
    match question {
        QuestionView::Binary {
            prompt,
            up_selected,
            down_selected,
            ..
        } => {
            ui.label(prompt);
            ui.horizontal(|ui| {
                if ui.selectable_label(*up_selected, "👍").clicked() {
                    actions.push(UiAction::Respond(index, Response::Binary(true)));
                }
                if ui.selectable_label(*down_selected, "👎").clicked() {
                    actions.push(UiAction::Respond(index, Response::Binary(false)));
                }
            });
        }
        QuestionView::Range { prompt, levels, .. } => {
            ui.label(prompt);
            ui.horizontal(|ui| {
                for (level, mark) in levels.iter().enumerate() {
                    let star = match mark {
                        LevelMark::Filled => "★",
                        LevelMark::Empty => "☆",
                    };
                    if ui.button(star).clicked() {
                        actions.push(UiAction::Respond(index, Response::Level(level)));
                    }
                }
            });
        }
        QuestionView::Freeform { caption, text, .. } => {
            let mut text = text.clone();
            let response = ui.add(egui::TextEdit::multiline(&mut text).hint_text(caption.as_str()));
            if response.changed() {
                actions.push(UiAction::Respond(index, Response::Text(text)));
            }
        }
    }
}
