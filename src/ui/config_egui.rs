use super::commit::{EditSignal, ParameterDraft};
use crate::galaxy::ParamRange;
use crate::prelude::*;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

pub struct ConfigEguiPlugin;

impl Plugin for ConfigEguiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ParameterDraft>()
            .add_systems(Startup, configure_visuals_system)
            .add_systems(Update, ui_system);
    }
}

fn configure_visuals_system(mut contexts: EguiContexts) {
    contexts.ctx_mut().set_visuals(egui::Visuals {
        window_corner_radius: 0.0.into(),
        ..Default::default()
    });
}

/// Slider track plus a numeric field. The field only writes its value once
/// typing is done, so keystrokes never reach the draft.
fn slider<N: egui::emath::Numeric>(
    ui: &mut egui::Ui,
    value: &mut N,
    range: ParamRange<N>,
    label: &str,
) -> EditSignal {
    ui.horizontal(|ui| {
        let track = ui.add(
            egui::Slider::new(&mut *value, range.min..=range.max)
                .step_by(range.step.to_f64())
                .show_value(false),
        );
        let field = ui.add(
            egui::DragValue::new(&mut *value)
                .range(range.min..=range.max)
                .speed(range.step.to_f64())
                .update_while_editing(false),
        );
        ui.label(label);
        EditSignal::from(&track) | EditSignal::from(&field)
    })
    .inner
}

fn color_row(ui: &mut egui::Ui, color: &mut LinearRgba, label: &str) -> EditSignal {
    ui.horizontal(|ui| {
        // same id the color button derives for its popup
        let popup_id = ui.auto_id_with("popup");
        let was_open = ui.memory(|mem| mem.is_popup_open(popup_id));

        let mut rgb = [color.red, color.green, color.blue];
        let response = egui::color_picker::color_edit_button_rgb(ui, &mut rgb);
        ui.label(label);
        if response.changed() {
            *color = LinearRgba::rgb(rgb[0], rgb[1], rgb[2]);
        }

        let is_open = ui.memory(|mem| mem.is_popup_open(popup_id));
        let (pointer_down, pointer_released) =
            ui.input(|i| (i.pointer.any_down(), i.pointer.any_released()));
        EditSignal::popup(
            response.changed(),
            was_open,
            is_open,
            pointer_down,
            pointer_released,
        )
    })
    .inner
}

fn ui_system(
    mut contexts: EguiContexts,
    mut draft: ResMut<ParameterDraft>,
    applied: Res<GalaxyParameters>,
    mut galaxy_commands: EventWriter<GalaxyCommand>,
) {
    if applied.is_changed() {
        draft.sync(&applied);
    }
    let draft = &mut *draft;
    let ctx = contexts.ctx_mut();

    egui::SidePanel::left("side_panel")
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Galaxy");

            let params = &mut draft.draft;
            let signals = [
                slider(ui, &mut params.count, GalaxyParameters::COUNT, "Count"),
                slider(ui, &mut params.size, GalaxyParameters::SIZE, "Size"),
                slider(ui, &mut params.radius, GalaxyParameters::RADIUS, "Radius"),
                slider(ui, &mut params.branches, GalaxyParameters::BRANCHES, "Branches"),
                slider(ui, &mut params.spin, GalaxyParameters::SPIN, "Spin"),
                slider(
                    ui,
                    &mut params.randomness,
                    GalaxyParameters::RANDOMNESS,
                    "Randomness",
                ),
                slider(
                    ui,
                    &mut params.randomness_power,
                    GalaxyParameters::RANDOMNESS_POWER,
                    "Randomness Power",
                ),
                color_row(ui, &mut params.inside_color, "Inside Color"),
                color_row(ui, &mut params.outside_color, "Outside Color"),
            ];

            for signal in signals {
                if let Some(committed) = draft.observe(signal) {
                    galaxy_commands.write(GalaxyCommand::Apply(committed));
                }
            }

            ui.separator();
            if ui.button("Regenerate").clicked() {
                galaxy_commands.write(GalaxyCommand::Reroll);
            }
            ui.label(format!(
                "Generation {} ({} particles)",
                applied.generation, applied.count
            ));
            if draft.is_pending() {
                ui.weak("Release to apply");
            }
        });
}
