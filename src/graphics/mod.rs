use bevy::prelude::*;

mod point_cloud;
mod viewport;

pub use point_cloud::{
    build_point_cloud_mesh, sprite_world_size, BevyPointCloudScene, CloudEntity, GalaxyCloud,
    GalaxyPoints, GalaxyPointsMaterial, CAMERA_FOV_Y,
};
pub use viewport::{capped_scale_factor, MAX_SCALE_FACTOR};

pub struct GraphicsPlugin;

impl Plugin for GraphicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            point_cloud::PointCloudRenderPlugin,
            viewport::ViewportPlugin,
        ));
    }
}
