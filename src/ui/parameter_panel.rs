use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::graphics::GalaxyHandle;
use crate::prelude::*;

pub struct ParameterPanelPlugin;

impl Plugin for ParameterPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, configure_visuals_system)
            .add_systems(Update, ui_system);
    }
}

fn configure_visuals_system(mut contexts: EguiContexts) {
    contexts.ctx_mut().set_visuals(egui::Visuals {
        window_corner_radius: 0.0.into(),
        ..Default::default()
    });
}

/// Shows a slider for `field` and returns true once the user is done with it: the drag was
/// released, or the value changed without a drag (click on the rail, keyboard, typed value).
fn parameter_slider(ui: &mut egui::Ui, store: &mut ParameterStore, field: ParameterField) -> bool {
    let (Some(bounds), Some(mut value)) = (field.bounds(), store.current().get(field).as_f64())
    else {
        return false;
    };

    let mut slider = egui::Slider::new(&mut value, bounds.min..=bounds.max)
        .step_by(bounds.step)
        .text(field.label());
    if field.is_integer() {
        slider = slider.integer();
    }
    let response = ui.add(slider);

    if response.changed() {
        if let Err(err) = store.set(field, ParameterValue::number(field, value)) {
            warn!("Ignoring edit: {err}");
        }
    }
    response.drag_stopped() || (response.changed() && !response.dragged())
}

/// Returns true when the picked color changed this frame.
fn parameter_color(ui: &mut egui::Ui, store: &mut ParameterStore, field: ParameterField) -> bool {
    let ParameterValue::Color(color) = store.current().get(field) else {
        return false;
    };
    let linear = LinearRgba::from(color);
    let mut rgb = [linear.red, linear.green, linear.blue];

    let changed = ui
        .horizontal(|ui| {
            let response = ui.color_edit_button_rgb(&mut rgb);
            ui.label(field.label());
            response.changed()
        })
        .inner;

    if changed {
        let picked = Color::linear_rgb(rgb[0], rgb[1], rgb[2]);
        if let Err(err) = store.set(field, picked.into()) {
            warn!("Ignoring edit: {err}");
        }
    }
    changed
}

fn ui_system(
    mut contexts: EguiContexts,
    mut store: ResMut<ParameterStore>,
    displayed: Res<DisplayedGalaxy<GalaxyHandle>>,
    mut requests: EventWriter<RegenerationRequest>,
    // color edits are committed when the picker popup closes
    mut open_color_edit: Local<Option<ParameterField>>,
) {
    let ctx = contexts.ctx_mut();
    let mut finished = Vec::new();

    egui::SidePanel::left("side_panel")
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.heading("Galaxy");

            for field in ParameterField::ALL {
                if field.is_color() {
                    if parameter_color(ui, &mut store, field) {
                        *open_color_edit = Some(field);
                    }
                } else if parameter_slider(ui, &mut store, field) {
                    finished.push(field);
                }
            }

            ui.separator();
            ui.label(format!("Points: {}", displayed.point_count));
            ui.label(format!("Generation: {}", displayed.generation));
        });

    if open_color_edit.is_some() && !ctx.memory(|mem| mem.any_popup_open()) {
        finished.extend(open_color_edit.take());
    }

    for field in finished {
        if let Some(request) = store.commit(field) {
            requests.write(request);
        }
    }
}
