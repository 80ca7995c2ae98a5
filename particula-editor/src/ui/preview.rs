//! Live preview viewport.
//!
//! Ticks the project's engine into a [`PixelCanvas`] and shows it as a
//! texture. The active [`Tool`] decides what the pointer does over it.

use crate::Project;
use egui::{Color32, Sense, TextureOptions, Ui};
use glam::Vec2;
use particula::input::Pointer;
use particula::prelude::*;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Pointer drives the simulation.
    #[default]
    Interact,
    PaintMask,
    EraseMask,
    /// Click to add a delete zone.
    DeleteParticles,
    /// Click to add a particle.
    AddParticle,
}

impl Tool {
    pub const ALL: &'static [Tool] = &[
        Tool::Interact,
        Tool::PaintMask,
        Tool::EraseMask,
        Tool::DeleteParticles,
        Tool::AddParticle,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Interact => "Interact",
            Tool::PaintMask => "Paint mask",
            Tool::EraseMask => "Erase mask",
            Tool::DeleteParticles => "Delete",
            Tool::AddParticle => "Add",
        }
    }

    fn uses_brush(&self) -> bool {
        matches!(self, Tool::PaintMask | Tool::EraseMask | Tool::DeleteParticles)
    }
}

pub struct Preview {
    canvas: PixelCanvas,
    texture: Option<egui::TextureHandle>,
    pub tool: Tool,
    /// Brush radius in image pixels.
    pub brush_radius: f32,
    pub paused: bool,
    /// Simulated milliseconds; frozen while paused.
    clock_ms: f64,
    last_stats: Option<FrameStats>,
}

impl Default for Preview {
    fn default() -> Self {
        Self {
            canvas: PixelCanvas::new(1, 1),
            texture: None,
            tool: Tool::default(),
            brush_radius: 12.0,
            paused: false,
            clock_ms: 0.0,
            last_stats: None,
        }
    }
}

impl Preview {
    pub fn stats(&self) -> Option<&FrameStats> {
        self.last_stats.as_ref()
    }

    pub fn show(&mut self, ui: &mut Ui, project: &mut Project) {
        let Some((width, height)) = project.scene().map(|s| (s.width, s.height)) else {
            ui.centered_and_justified(|ui| {
                ui.label("Open an image to start (File > Open Image...)");
            });
            return;
        };
        let image_size = Vec2::new(width as f32, height as f32);

        let available = ui.available_size();
        let scale = (available.x / image_size.x).min(available.y / image_size.y).max(0.01);
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(image_size.x * scale, image_size.y * scale),
            Sense::click_and_drag(),
        );
        let to_image = |pos: egui::Pos2| {
            Pointer::view_to_image(
                Vec2::new(pos.x - rect.min.x, pos.y - rect.min.y),
                Vec2::new(rect.width(), rect.height()),
                image_size,
            )
        };
        let hovered = response.hover_pos().or(response.interact_pointer_pos()).map(to_image);

        if let Some(at) = hovered {
            self.apply_tool(&response, project, at);
        }

        if let Some(engine) = project.engine_mut() {
            match (self.tool, hovered) {
                (Tool::Interact, Some(at)) => engine.set_pointer(at),
                _ => engine.clear_pointer(),
            }

            if !self.paused {
                self.clock_ms += ui.input(|i| i.unstable_dt) as f64 * 1000.0;
                if self.canvas.size() != (width, height) {
                    self.canvas = PixelCanvas::new(width, height);
                }
                let stats = engine.tick(self.clock_ms, &mut self.canvas);
                if stats.rendered {
                    self.upload(ui.ctx(), width, height);
                }
                self.last_stats = Some(stats);
                ui.ctx().request_repaint();
            }
        }

        let painter = ui.painter_at(rect);
        if let Some(texture) = &self.texture {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(texture.id(), rect, uv, Color32::WHITE);
        }
        if self.tool.uses_brush() {
            if let Some(pos) = response.hover_pos() {
                painter.circle_stroke(pos, self.brush_radius * scale, (1.0, Color32::from_white_alpha(160)));
            }
        }
    }

    fn apply_tool(&self, response: &egui::Response, project: &mut Project, at: Vec2) {
        match self.tool {
            Tool::Interact => {}
            Tool::PaintMask | Tool::EraseMask => {
                if response.drag_started() || response.clicked() {
                    project.begin_mask_stroke();
                }
                if response.dragged() || response.clicked() {
                    project.paint_mask(at, self.brush_radius, self.tool == Tool::PaintMask);
                }
            }
            Tool::DeleteParticles => {
                if response.clicked() {
                    let radius = self.brush_radius;
                    project.update_edits(|edits| {
                        edits.delete(at, radius);
                    });
                }
            }
            Tool::AddParticle => {
                if response.clicked() {
                    project.update_edits(|edits| {
                        edits.add(at, None, None, Vec::new());
                    });
                }
            }
        }
    }

    fn upload(&mut self, ctx: &egui::Context, width: u32, height: u32) {
        let image = egui::ColorImage::from_rgba_unmultiplied([width as usize, height as usize], self.canvas.as_bytes());
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => self.texture = Some(ctx.load_texture("particula-preview", image, TextureOptions::NEAREST)),
        }
    }
}
