use crate::graphics::CAMERA_FOV_Y;
use bevy::{
    core_pipeline::tonemapping::Tonemapping,
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
};
use bevy_egui::EguiContexts;
use std::f32::consts::FRAC_PI_2;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(PostUpdate, camera_control_system);
    }
}

const START_POSITION: Vec3 = Vec3::new(3.0, 3.0, 3.0);

fn spawn_camera(mut commands: Commands, mut clearcolor: ResMut<ClearColor>) {
    *clearcolor = ClearColor(Color::BLACK);

    let orbit = CameraMain::looking_at(START_POSITION, Vec3::ZERO);
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_Y,
            near: 0.1,
            far: 100.0,
            ..default()
        }),
        // the additive blend should saturate the way it would on a plain canvas
        Tonemapping::None,
        Transform::from_translation(orbit.translation()).looking_at(orbit.target, Vec3::Y),
        orbit,
    ));
}

/// Orbit camera with damping: input accumulates into pending deltas which
/// are eased into the actual orbit over the following frames.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct CameraMain {
    pub target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,

    pending_yaw: f32,
    pending_pitch: f32,
    pending_zoom: f32, // log-scale
    pending_pan: Vec3,
}

impl CameraMain {
    const ROTATE_SPEED: f32 = 0.005;
    const ZOOM_SPEED: f32 = 0.1;
    const PAN_SPEED: f32 = 0.001;
    /// Fraction of the pending motion applied per 60 Hz frame
    const DAMPING: f32 = 0.05 * 3.0;
    const MIN_DISTANCE: f32 = 0.2;
    const MAX_DISTANCE: f32 = 60.0;
    const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(Self::MIN_DISTANCE);
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 0.0,
            pending_pan: Vec3::ZERO,
        }
    }

    pub fn translation(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    pub fn rotate(&mut self, drag: Vec2) {
        self.pending_yaw -= drag.x * Self::ROTATE_SPEED;
        self.pending_pitch += drag.y * Self::ROTATE_SPEED;
    }

    pub fn zoom(&mut self, scroll: f32) {
        self.pending_zoom -= scroll * Self::ZOOM_SPEED;
    }

    /// Pans in the camera plane, scaled by distance so the galaxy tracks the
    /// pointer at any zoom.
    pub fn pan(&mut self, drag: Vec2, camera: &Transform) {
        let scale = self.distance * Self::PAN_SPEED;
        self.pending_pan += (camera.left() * drag.x + camera.up() * drag.y) * scale;
    }

    /// Eases part of the pending motion into the orbit.
    pub fn step(&mut self, dt: f32) {
        let keep = (1.0 - Self::DAMPING).powf(dt * 60.0);
        let take = 1.0 - keep;

        self.yaw += self.pending_yaw * take;
        self.pitch = (self.pitch + self.pending_pitch * take)
            .clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        self.distance = (self.distance * (self.pending_zoom * take).exp())
            .clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
        self.target += self.pending_pan * take;

        self.pending_yaw *= keep;
        self.pending_pitch *= keep;
        self.pending_zoom *= keep;
        self.pending_pan *= keep;
    }
}

pub fn camera_control_system(
    mut query: Query<(&mut Transform, &mut CameraMain)>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    mut motion_evr: EventReader<MouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
    mut contexts: EguiContexts,
) {
    let Ok((mut transform, mut camera_main)) = query.single_mut() else {
        return;
    };

    let pointer_on_panel = contexts
        .try_ctx_mut()
        .is_some_and(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area());

    let drag: Vec2 = motion_evr.read().map(|ev| ev.delta).sum();
    let mut scroll = 0.0;
    for ev in scroll_evr.read() {
        scroll += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.01,
        };
    }

    if !pointer_on_panel {
        if mouse_buttons.pressed(MouseButton::Left) {
            camera_main.rotate(drag);
        } else if mouse_buttons.any_pressed([MouseButton::Right, MouseButton::Middle]) {
            let camera = *transform;
            camera_main.pan(drag, &camera);
        }
        camera_main.zoom(scroll);
    }

    camera_main.step(time.delta_secs());

    transform.translation = camera_main.translation();
    transform.look_at(camera_main.target, Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looking_at_round_trips_position() {
        let orbit = CameraMain::looking_at(START_POSITION, Vec3::ZERO);
        assert!((orbit.translation() - START_POSITION).length() < 1e-4);
    }

    #[test]
    fn damping_eases_towards_the_requested_rotation() {
        let mut orbit = CameraMain::looking_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        orbit.rotate(Vec2::new(-100.0, 0.0));
        let requested = 100.0 * CameraMain::ROTATE_SPEED;

        orbit.step(1.0 / 60.0);
        assert!(orbit.yaw > 0.0 && orbit.yaw < requested);

        for _ in 0..600 {
            orbit.step(1.0 / 60.0);
        }
        assert!((orbit.yaw - requested).abs() < 1e-3);
        assert!((orbit.distance - 5.0).abs() < 1e-4);
    }

    #[test]
    fn pitch_and_distance_stay_bounded() {
        let mut orbit = CameraMain::looking_at(START_POSITION, Vec3::ZERO);
        orbit.rotate(Vec2::new(0.0, 1.0e6));
        orbit.zoom(-1.0e4);
        for _ in 0..120 {
            orbit.step(1.0 / 60.0);
        }
        assert!(orbit.pitch <= CameraMain::PITCH_LIMIT);
        assert!(orbit.distance <= CameraMain::MAX_DISTANCE);
    }
}
