//! Particula Editor - live preview for image particle scenes
//!
//! Open an image, tune the config with live feedback, paint masks, place
//! edits and export the result as a React component.

use eframe::egui;
use particula::prelude::*;
use particula::QualityState;
use particula_editor::ui::{
    render_export_button, render_export_window, render_settings_panel, ExportPanelState, Preview, Tool,
};
use particula_editor::{ConfigChange, Project, PRESETS};
use std::path::PathBuf;
use std::time::Instant;

/// Seconds to wait after the last slider move before re-extracting.
const REBUILD_DEBOUNCE: f32 = 0.3;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Particula Editor"),
        ..Default::default()
    };

    let initial_image = std::env::args_os().nth(1).map(PathBuf::from);
    eframe::run_native(
        "Particula Editor",
        options,
        Box::new(|_cc| Ok(Box::new(EditorApp::new(initial_image)))),
    )
}

struct EditorApp {
    project: Project,
    /// Config being edited; applied to the project immediately or after the debounce.
    config: ParticleConfig,
    preview: Preview,
    current_file: Option<PathBuf>,
    status_message: Option<(String, Instant)>,
    export_panel_state: ExportPanelState,
    /// Debounce timer for re-extraction (seconds remaining)
    rebuild_timer: Option<f32>,
}

impl EditorApp {
    fn new(initial_image: Option<PathBuf>) -> Self {
        let config = ParticleConfig::default();
        let mut app = Self {
            project: Project::new(config.clone()),
            config,
            preview: Preview::default(),
            current_file: None,
            status_message: None,
            export_panel_state: ExportPanelState::default(),
            rebuild_timer: None,
        };
        if let Some(path) = initial_image {
            app.open_image_at(path);
        }
        app
    }

    fn show_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Apply the edited config now, skipping any pending debounce.
    fn commit_config(&mut self) {
        self.rebuild_timer = None;
        self.project.apply_config(self.config.clone());
    }

    // ========================================================================
    // File operations (using rfd)
    // ========================================================================

    fn open_image_at(&mut self, path: PathBuf) {
        match self.project.open_image(&path) {
            Ok(()) => self.show_status(format!("Opened {}", path.display())),
            Err(e) => self.show_status(format!("Open failed: {e:#}")),
        }
    }

    fn open_image(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_file()
        {
            self.commit_config();
            self.open_image_at(path);
        }
    }

    fn open_mask(&mut self) {
        if let Some(path) = rfd::FileDialog::new().add_filter("PNG", &["png"]).pick_file() {
            match self.project.load_mask(&path) {
                Ok(()) => self.show_status(format!("Mask loaded from {}", path.display())),
                Err(e) => self.show_status(format!("Mask failed: {e:#}")),
            }
        }
    }

    fn open_optional_mask(&mut self) {
        if let Some(path) = rfd::FileDialog::new().add_filter("PNG", &["png"]).pick_file() {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "mask".to_string());
            match self.project.load_optional_mask(&name, &path) {
                Ok(slug) => self.show_status(format!("Optional mask '{slug}' added")),
                Err(e) => self.show_status(format!("Mask failed: {e:#}")),
            }
        }
    }

    fn save_config(&mut self) {
        if let Some(path) = self.current_file.clone() {
            match self.config.save(&path) {
                Ok(()) => self.show_status(format!("Saved to {}", path.display())),
                Err(e) => self.show_status(format!("Save failed: {e}")),
            }
        } else {
            self.save_config_as();
        }
    }

    fn save_config_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("particles.json")
            .save_file()
        {
            match self.config.save(&path) {
                Ok(()) => {
                    self.show_status(format!("Saved to {}", path.display()));
                    self.current_file = Some(path);
                }
                Err(e) => self.show_status(format!("Save failed: {e}")),
            }
        }
    }

    fn load_config(&mut self) {
        if let Some(path) = rfd::FileDialog::new().add_filter("JSON", &["json"]).pick_file() {
            match ParticleConfig::load(&path) {
                Ok(config) => {
                    self.config = config;
                    self.commit_config();
                    self.show_status(format!("Loaded {}", path.display()));
                    self.current_file = Some(path);
                }
                Err(e) => self.show_status(format!("Load failed: {e}")),
            }
        }
    }

    fn load_edits(&mut self) {
        if let Some(path) = rfd::FileDialog::new().add_filter("JSON", &["json"]).pick_file() {
            match self.project.load_edits(&path) {
                Ok(()) => self.show_status(format!("{} edits loaded", self.project.edits().len())),
                Err(e) => self.show_status(format!("Load failed: {e:#}")),
            }
        }
    }

    fn save_edits(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("edits.json")
            .save_file()
        {
            match self.project.edits().save(&path) {
                Ok(()) => self.show_status(format!("Edits saved to {}", path.display())),
                Err(e) => self.show_status(format!("Save failed: {e}")),
            }
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Image...").clicked() {
                        self.open_image();
                        ui.close_menu();
                    }
                    if ui.button("Open Mask...").clicked() {
                        self.open_mask();
                        ui.close_menu();
                    }
                    if ui.button("Add Optional Mask...").clicked() {
                        self.open_optional_mask();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Load Config...").clicked() {
                        self.load_config();
                        ui.close_menu();
                    }
                    if ui.button("Save Config").clicked() {
                        self.save_config();
                        ui.close_menu();
                    }
                    if ui.button("Save Config As...").clicked() {
                        self.save_config_as();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Load Edits...").clicked() {
                        self.load_edits();
                        ui.close_menu();
                    }
                    if ui.button("Save Edits...").clicked() {
                        self.save_edits();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui
                        .add_enabled(self.project.can_undo_mask(), egui::Button::new("Undo Mask Stroke"))
                        .clicked()
                    {
                        self.project.undo_mask();
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(self.project.can_redo_mask(), egui::Button::new("Redo Mask Stroke"))
                        .clicked()
                    {
                        self.project.redo_mask();
                        ui.close_menu();
                    }
                    if ui.button("Clear Edits").clicked() {
                        self.project.update_edits(|edits| edits.clear());
                        ui.close_menu();
                    }
                });

                ui.menu_button("Presets", |ui| {
                    for preset in PRESETS {
                        if ui.button(preset.name).on_hover_text(preset.description).clicked() {
                            self.config = (preset.config)();
                            self.commit_config();
                            self.show_status(format!("Loaded preset: {}", preset.name));
                            ui.close_menu();
                        }
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Reset").on_hover_text("Restart the animation").clicked() {
                        if let Some(engine) = self.project.engine_mut() {
                            engine.reset();
                        }
                    }

                    if self.rebuild_timer.is_some() {
                        ui.label(egui::RichText::new("⟳").color(egui::Color32::YELLOW))
                            .on_hover_text("Re-extraction pending...");
                    }

                    let btn_text = if self.preview.paused { "▶ Play" } else { "⏸ Pause" };
                    if ui.button(btn_text).clicked() {
                        self.preview.paused = !self.preview.paused;
                    }
                });
            });
        });
    }

    fn status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some((msg, time)) = &self.status_message {
                    if time.elapsed().as_secs() < 5 {
                        ui.label(msg);
                    } else {
                        self.status_message = None;
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(stats) = self.preview.stats() {
                        ui.label(format!("{:.0} FPS", stats.fps));
                        ui.separator();
                        let quality = match stats.quality {
                            QualityState::Disabled => "auto off".to_string(),
                            QualityState::Observing { observed, .. } => format!("measuring {observed}"),
                            QualityState::Locked(shape) => format!("locked {}", shape.label()),
                        };
                        ui.label(egui::RichText::new(quality).small().weak());
                        ui.separator();
                    }
                    if let Some(scene) = self.project.scene() {
                        ui.label(format!("{} particles ({} masked)", scene.len(), scene.masked_count()));
                        ui.separator();
                    }
                    match &self.current_file {
                        Some(file) => ui.label(egui::RichText::new(file.display().to_string()).small().weak()),
                        None => ui.label(egui::RichText::new("(unsaved)").small().weak()),
                    };
                });
            });
        });
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let delta_time = ctx.input(|i| i.stable_dt);

        if let Some(timer) = self.rebuild_timer.as_mut() {
            *timer -= delta_time;
        }
        if self.rebuild_timer.is_some_and(|t| t <= 0.0) {
            self.commit_config();
        }

        render_export_window(ctx, &mut self.export_panel_state, &self.project, delta_time);
        self.menu_bar(ctx);
        self.status_bar(ctx);

        egui::SidePanel::right("settings")
            .min_width(320.0)
            .default_width(360.0)
            .show(ctx, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for &tool in Tool::ALL {
                        ui.selectable_value(&mut self.preview.tool, tool, tool.label());
                    }
                });
                if self.preview.tool != Tool::Interact {
                    ui.add(egui::Slider::new(&mut self.preview.brush_radius, 1.0..=80.0).text("Brush"));
                }
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    if render_settings_panel(ui, &mut self.config) {
                        match self.project.classify(&self.config) {
                            ConfigChange::Unchanged => {}
                            ConfigChange::Live => {
                                self.project.apply_config(self.config.clone());
                            }
                            ConfigChange::Reinitialized | ConfigChange::Resampled => {
                                self.rebuild_timer = Some(REBUILD_DEBOUNCE);
                            }
                        }
                    }

                    ui.separator();
                    ui.horizontal(|ui| {
                        render_export_button(ui, &mut self.export_panel_state, &self.project);
                    });
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::from_gray(16)))
            .show(ctx, |ui| {
                self.preview.show(ui, &mut self.project);
            });
    }
}
