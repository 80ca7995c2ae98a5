//! Config sliders, grouped the way `ParticleConfig` is.

use egui::Ui;
use particula::prelude::*;
use particula::Rgb;

fn enum_combo<T: Copy + PartialEq>(
    ui: &mut Ui,
    label: &str,
    value: &mut T,
    all: &[T],
    label_of: fn(&T) -> &'static str,
) -> bool {
    let mut changed = false;
    egui::ComboBox::from_label(label)
        .selected_text(label_of(value))
        .show_ui(ui, |ui| {
            for option in all {
                changed |= ui.selectable_value(value, *option, label_of(option)).changed();
            }
        });
    changed
}

fn color_edit(ui: &mut Ui, label: &str, color: &mut Rgb) -> bool {
    let mut srgb = [color.r, color.g, color.b];
    let changed = ui
        .horizontal(|ui| {
            ui.label(label);
            ui.color_edit_button_srgb(&mut srgb).changed()
        })
        .inner;
    if changed {
        *color = Rgb::new(srgb[0], srgb[1], srgb[2]);
    }
    changed
}

/// Render every config group. Returns true if anything changed.
pub fn render_settings_panel(ui: &mut Ui, config: &mut ParticleConfig) -> bool {
    let mut changed = false;

    egui::CollapsingHeader::new("Sampling")
        .default_open(true)
        .show(ui, |ui| {
            let s = &mut config.sampling;
            changed |= ui.add(egui::Slider::new(&mut s.resolution, 1..=20).text("Resolution")).changed();
            changed |= ui.add(egui::Slider::new(&mut s.alpha_threshold, 0..=255).text("Alpha threshold")).changed();
            changed |= ui
                .add(egui::Slider::new(&mut s.max_particles, 100..=50_000).logarithmic(true).text("Max particles"))
                .changed();
            changed |= ui.checkbox(&mut s.color_clustering, "Cluster colors").changed();
            if s.color_clustering {
                changed |= ui.add(egui::Slider::new(&mut s.cluster_count, 1..=32).text("Clusters")).changed();
            }
            changed |= ui.add(egui::DragValue::new(&mut s.seed).prefix("seed: ")).changed();
        });

    egui::CollapsingHeader::new("Color").show(ui, |ui| {
        let c = &mut config.color;
        changed |= ui.checkbox(&mut c.use_original_colors, "Original colors").changed();
        changed |= enum_combo(ui, "Filter", &mut c.color_filter, ColorFilter::ALL, ColorFilter::label);
        if !c.use_original_colors {
            let mut removed = None;
            for (i, color) in c.custom_palette.iter_mut().enumerate() {
                ui.horizontal(|ui| {
                    changed |= color_edit(ui, &format!("#{i}"), color);
                    if ui.small_button("x").clicked() {
                        removed = Some(i);
                    }
                });
            }
            if let Some(i) = removed {
                c.custom_palette.remove(i);
                changed = true;
            }
            if ui.button("Add color").clicked() {
                c.custom_palette.push(Rgb::WHITE);
                changed = true;
            }
        }
    });

    egui::CollapsingHeader::new("Size").show(ui, |ui| {
        let s = &mut config.size;
        changed |= ui.add(egui::Slider::new(&mut s.particle_size, 0.5..=12.0).text("Size")).changed();
        changed |= ui.add(egui::Slider::new(&mut s.min_size, 0.1..=6.0).text("Min size")).changed();
        changed |= ui.add(egui::Slider::new(&mut s.size_variation, 0.0..=1.0).text("Variation")).changed();
    });

    egui::CollapsingHeader::new("Motion")
        .default_open(true)
        .show(ui, |ui| {
            let m = &mut config.motion;
            changed |= enum_combo(ui, "Interaction", &mut m.interaction_mode, InteractionMode::ALL, InteractionMode::label);
            changed |= ui.add(egui::Slider::new(&mut m.friction, 0.5..=0.99).text("Friction")).changed();
            changed |= ui.add(egui::Slider::new(&mut m.return_speed, 0.001..=0.3).text("Return speed")).changed();
            changed |= ui.add(egui::Slider::new(&mut m.speed, 0.1..=3.0).text("Speed")).changed();
            changed |= ui.add(egui::Slider::new(&mut m.mouse_radius, 10.0..=400.0).text("Pointer radius")).changed();
            changed |= ui.add(egui::Slider::new(&mut m.mouse_force, 0.0..=30.0).text("Pointer force")).changed();
            match m.interaction_mode {
                InteractionMode::Orbit => {
                    changed |= ui.add(egui::Slider::new(&mut m.orbit_speed, 0.0..=5.0).text("Orbit speed")).changed();
                }
                InteractionMode::Turbulence => {
                    changed |= ui
                        .add(egui::Slider::new(&mut m.turbulence_intensity, 0.0..=5.0).text("Turbulence"))
                        .changed();
                }
                InteractionMode::Push | InteractionMode::Pull => {}
            }
        });

    egui::CollapsingHeader::new("Reveal").show(ui, |ui| {
        let a = &mut config.initial_animation;
        changed |= ui.checkbox(&mut a.enabled, "Enabled").changed();
        ui.add_enabled_ui(a.enabled, |ui| {
            changed |= ui
                .add(egui::Slider::new(&mut a.particles_per_second, 10.0..=20_000.0).logarithmic(true).text("Per second"))
                .changed();
            changed |= enum_combo(ui, "Direction", &mut a.shooting_direction, ShootingDirection::ALL, ShootingDirection::label);
            changed |= ui.add(egui::Slider::new(&mut a.particle_speed, 0.0..=40.0).text("Launch speed")).changed();
            changed |= ui.checkbox(&mut a.bounce_enabled, "Bounce").changed();
            if a.bounce_enabled {
                changed |= ui.add(egui::Slider::new(&mut a.bounce_intensity, 0.0..=1.0).text("Bounce intensity")).changed();
                changed |= ui.add(egui::Slider::new(&mut a.bounce_damping, 0.5..=1.0).text("Bounce damping")).changed();
            }
            changed |= ui
                .checkbox(&mut a.mouse_interaction_during_animation, "Pointer during reveal")
                .changed();
        });
    });

    egui::CollapsingHeader::new("Idle").show(ui, |ui| {
        let i = &mut config.idle;
        changed |= ui.checkbox(&mut i.enabled, "Enabled").changed();
        ui.add_enabled_ui(i.enabled, |ui| {
            changed |= enum_combo(ui, "Mode", &mut i.mode, IdleMode::ALL, IdleMode::label);
            changed |= ui.add(egui::Slider::new(&mut i.speed, 0.0..=5.0).text("Speed")).changed();
            changed |= ui.add(egui::Slider::new(&mut i.intensity, 0.0..=5.0).text("Intensity")).changed();
            changed |= ui.checkbox(&mut i.affects_masked, "Move masked particles").changed();
            if i.mode == IdleMode::Turbulence {
                changed |= ui
                    .add(egui::Slider::new(&mut i.turbulence_mouse_radius, 0.0..=400.0).text("Calm radius"))
                    .changed();
            }
        });
    });

    egui::CollapsingHeader::new("Render").show(ui, |ui| {
        let r = &mut config.render;
        changed |= enum_combo(ui, "Shape", &mut r.shape, ParticleShape::ALL, ParticleShape::label);
        changed |= ui.checkbox(&mut r.auto_performance, "Auto performance").changed();
        changed |= ui.checkbox(&mut r.masked_on_top, "Masked on top").changed();

        changed |= ui.checkbox(&mut r.trails_enabled, "Trails").changed();
        if r.trails_enabled {
            changed |= ui.add(egui::Slider::new(&mut r.trail_length, 0.0..=1.0).text("Trail length")).changed();
            changed |= color_edit(ui, "Background", &mut r.trail_background);
        }

        changed |= ui.checkbox(&mut r.connections_enabled, "Connections").changed();
        if r.connections_enabled {
            changed |= ui
                .add(egui::Slider::new(&mut r.connection_distance, 1.0..=80.0).text("Distance"))
                .changed();
            changed |= ui.add(egui::Slider::new(&mut r.connection_opacity, 0.0..=1.0).text("Opacity")).changed();
            changed |= color_edit(ui, "Line color", &mut r.connection_color);
        }
    });

    egui::CollapsingHeader::new("Velocity color").show(ui, |ui| {
        let v = &mut config.velocity_color;
        changed |= ui.checkbox(&mut v.enabled, "Enabled").changed();
        ui.add_enabled_ui(v.enabled, |ui| {
            changed |= enum_combo(ui, "Mode", &mut v.mode, VelocityColorMode::ALL, VelocityColorMode::label);
            changed |= ui.add(egui::Slider::new(&mut v.intensity, 0.0..=5.0).text("Intensity")).changed();
            changed |= color_edit(ui, "Target", &mut v.target_color);
        });
    });

    changed
}
