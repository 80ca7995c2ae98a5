//! Code export panel - shows the generated React component

use crate::Project;
use egui::{ScrollArea, TextEdit, Ui};
use particula::prelude::*;

/// State for the export panel
#[derive(Default)]
pub struct ExportPanelState {
    pub open: bool,
    pub variant: ExportVariant,
    pub bundle: ExportBundle,
    /// File shown in the code view.
    pub selected: usize,
    pub just_copied: bool,
    /// Seconds left on the "Copied!" label.
    pub copy_feedback_timer: f32,
    pub last_written: Option<String>,
}

impl ExportPanelState {
    pub fn regenerate(&mut self, project: &Project) {
        self.bundle = project.export(self.variant);
        self.selected = self.selected.min(self.bundle.files.len().saturating_sub(1));
    }
}

/// Render the export panel as a window
pub fn render_export_window(ctx: &egui::Context, state: &mut ExportPanelState, project: &Project, delta_time: f32) {
    if !state.open {
        return;
    }

    if state.copy_feedback_timer > 0.0 {
        state.copy_feedback_timer -= delta_time;
        if state.copy_feedback_timer <= 0.0 {
            state.just_copied = false;
        }
    }

    let mut open = state.open;
    egui::Window::new("Export React Component")
        .open(&mut open)
        .default_size([640.0, 520.0])
        .resizable(true)
        .show(ctx, |ui| {
            if state.bundle.is_empty() {
                ui.label("Open an image to export its particles.");
                return;
            }

            ui.horizontal(|ui| {
                let before = state.variant;
                for &variant in ExportVariant::ALL {
                    ui.selectable_value(&mut state.variant, variant, variant.label());
                }
                if state.variant != before || ui.button("Regenerate").clicked() {
                    state.regenerate(project);
                }

                #[cfg(not(target_arch = "wasm32"))]
                {
                    if ui.button("Save...").clicked() {
                        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                            state.last_written = Some(match state.bundle.write_to_dir(&dir) {
                                Ok(paths) => format!("Wrote {} files to {}", paths.len(), dir.display()),
                                Err(e) => format!("Export failed: {e}"),
                            });
                        }
                    }
                }
            });

            ui.horizontal(|ui| {
                for (i, file) in state.bundle.files.iter().enumerate() {
                    ui.selectable_value(&mut state.selected, i, file.name.as_str());
                }
            });

            let Some(file) = state.bundle.files.get(state.selected) else {
                return;
            };
            let code = file.contents.clone();

            ui.horizontal(|ui| {
                if state.just_copied {
                    ui.label(egui::RichText::new("Copied!").color(egui::Color32::GREEN));
                } else if ui.button("Copy to Clipboard").clicked() {
                    ui.ctx().copy_text(code.clone());
                    state.just_copied = true;
                    state.copy_feedback_timer = 2.0;
                }
                ui.separator();
                ui.label(
                    egui::RichText::new(format!("{} lines, {} bytes", code.lines().count(), code.len()))
                        .weak()
                        .small(),
                );
                if let Some(msg) = &state.last_written {
                    ui.separator();
                    ui.label(egui::RichText::new(msg).small());
                }
            });

            ui.separator();

            ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
                let mut code = code;
                ui.add(
                    TextEdit::multiline(&mut code)
                        .font(egui::TextStyle::Monospace)
                        .code_editor()
                        .desired_width(f32::INFINITY)
                        .desired_rows(30)
                        .interactive(false),
                );
            });
        });
    state.open = open;
}

/// Render an "Export" button that opens the export panel
pub fn render_export_button(ui: &mut Ui, state: &mut ExportPanelState, project: &Project) -> bool {
    let clicked = ui.button("Export to React").clicked();
    if clicked {
        state.open = true;
        state.regenerate(project);
    }
    clicked
}
