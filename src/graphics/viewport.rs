use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowBackendScaleFactorChanged, WindowResized};

/// Highest scale factor used for logical sizes (UI, panel, text). Denser
/// displays get theirs clamped. This does not change the render resolution:
/// the surface is always drawn at the window's physical size.
pub const MAX_SCALE_FACTOR: f32 = 2.0;

pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, cap_scale_factor_system)
            .add_systems(Update, on_viewport_change);
    }
}

pub fn capped_scale_factor(device_ratio: f32) -> f32 {
    device_ratio.min(MAX_SCALE_FACTOR)
}

/// The override to install for a window whose backend reports
/// `device_ratio`, or `None` if the native ratio is already within bounds.
fn scale_factor_override(device_ratio: f32) -> Option<f32> {
    (device_ratio > MAX_SCALE_FACTOR).then(|| capped_scale_factor(device_ratio))
}

fn cap_scale_factor(window: &mut Window) {
    let wanted = scale_factor_override(window.resolution.base_scale_factor());
    if window.resolution.scale_factor_override() != wanted {
        window.resolution.set_scale_factor_override(wanted);
    }
}

fn cap_scale_factor_system(mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    for mut window in &mut windows {
        cap_scale_factor(&mut window);
    }
}

/// Camera aspect and surface size follow the window automatically, so a
/// resize only needs the scale factor cap reapplied.
fn on_viewport_change(
    mut resized: EventReader<WindowResized>,
    mut rescaled: EventReader<WindowBackendScaleFactorChanged>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let resized = resized.read().count() > 0;
    let rescaled = rescaled.read().count() > 0;
    if !resized && !rescaled {
        return;
    }

    for mut window in &mut windows {
        cap_scale_factor(&mut window);
        debug!(
            "Viewport {}x{} px at {:.2}x",
            window.resolution.physical_width(),
            window.resolution.physical_height(),
            window.resolution.scale_factor()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_is_capped_at_two() {
        assert_eq!(capped_scale_factor(3.0), 2.0);
        assert_eq!(capped_scale_factor(2.0), 2.0);
        assert_eq!(capped_scale_factor(1.5), 1.5);
    }

    #[test]
    fn override_only_for_dense_displays() {
        assert_eq!(scale_factor_override(1.0), None);
        assert_eq!(scale_factor_override(2.0), None);
        assert_eq!(scale_factor_override(2.75), Some(2.0));
    }

    #[test]
    fn window_override_tracks_backend_ratio() {
        let mut window = Window::default();
        window.resolution.set_scale_factor(3.0);
        cap_scale_factor(&mut window);
        assert_eq!(window.resolution.scale_factor(), 2.0);

        window.resolution.set_scale_factor(1.25);
        cap_scale_factor(&mut window);
        assert_eq!(window.resolution.scale_factor_override(), None);
        assert_eq!(window.resolution.scale_factor(), 1.25);
    }

    #[test]
    fn cap_leaves_physical_resolution_alone() {
        let mut window = Window::default();
        window.resolution.set_physical_resolution(3840, 2160);
        window.resolution.set_scale_factor(3.0);

        cap_scale_factor(&mut window);

        assert_eq!(window.resolution.physical_width(), 3840);
        assert_eq!(window.resolution.physical_height(), 2160);
        assert_eq!(window.resolution.width(), 1920.0);
    }
}
