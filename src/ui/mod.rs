use bevy::prelude::*;

mod camera;
mod commit;
mod config_egui;
mod fps_widget;

pub use camera::CameraMain;
pub use commit::{EditSignal, ParameterDraft};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            camera::CameraPlugin,
            config_egui::ConfigEguiPlugin,
            fps_widget::FpsWidgetPlugin,
        ));
    }
}
