use crate::prelude::*;
use bevy::diagnostic::{DiagnosticPath, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

pub struct FpsWidgetPlugin;

impl Plugin for FpsWidgetPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_widget)
            .add_systems(Update, update_widget_system)
            .add_plugins(FrameTimeDiagnosticsPlugin::default());
    }
}

#[derive(Component)]
struct FpsText;

fn setup_widget(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Percent(1.),
                top: Val::Percent(1.),
                padding: UiRect::all(Val::Px(6.0)),
                ..default()
            },
            BackgroundColor(Color::linear_rgba(0.0, 0.03, 0.08, 0.5)),
            GlobalZIndex(i32::MAX - 1),
        ))
        .with_children(|parent| {
            parent.spawn((
                FpsText,
                Text("N/A".to_string()),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
            ));
        });
}

fn format_stats(fps: f64, frame_time: f64, particles: u32) -> String {
    format!("FPS: {fps:>6.1} ({frame_time:.2} ms)\nParticles: {particles}")
}

fn update_widget_system(
    diagnostics: Res<DiagnosticsStore>,
    params: Res<GalaxyParameters>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    let smoothed = |path: &DiagnosticPath| {
        diagnostics
            .get(path)
            .and_then(|d| d.smoothed())
            .unwrap_or(0.0)
    };
    let fps = smoothed(&FrameTimeDiagnosticsPlugin::FPS);
    let frame_time = smoothed(&FrameTimeDiagnosticsPlugin::FRAME_TIME);

    for mut text in &mut query {
        text.0 = format_stats(fps, frame_time, params.count);
    }
}
