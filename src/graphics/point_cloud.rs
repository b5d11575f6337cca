use crate::prelude::*;
use bevy::{
    pbr::{MaterialPipeline, MaterialPipelineKey, NotShadowCaster},
    prelude::*,
    reflect::TypePath,
    render::{
        mesh::{Indices, MeshVertexBufferLayoutRef, PrimitiveTopology},
        render_asset::RenderAssetUsages,
        render_resource::{
            AsBindGroup, RenderPipelineDescriptor, ShaderRef, SpecializedMeshPipelineError,
        },
        view::NoFrustumCulling,
    },
};
use std::time::Instant;

const SHADER_ASSET_PATH: &str = "shaders/galaxy_points.wgsl";

/// Vertical field of view of the camera looking at the galaxy.
pub const CAMERA_FOV_Y: f32 = 75.0 * std::f32::consts::PI / 180.0;

/// Quad corners, in units of half the point size.
const CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

pub struct PointCloudRenderPlugin;

impl Plugin for PointCloudRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<GalaxyPointsMaterial>::default())
            .init_resource::<GalaxyCloud>()
            .add_systems(PostUpdate, regenerate_galaxy);
    }
}

/// Marker for the entity holding the galaxy mesh.
#[derive(Component)]
pub struct GalaxyPoints;

/// Everything one cloud owns in the world.
#[derive(Debug, Clone)]
pub struct CloudEntity {
    pub entity: Entity,
    mesh: Handle<Mesh>,
    material: Handle<GalaxyPointsMaterial>,
}

/// The controller plus the parameter generation it last built.
#[derive(Resource, Default)]
pub struct GalaxyCloud {
    pub controller: GalaxyController<CloudEntity>,
    built_generation: Option<i32>,
}

/// The ECS world seen as a scene that point clouds can be added to.
pub struct BevyPointCloudScene<'a, 'w, 's> {
    pub commands: &'a mut Commands<'w, 's>,
    pub meshes: &'a mut Assets<Mesh>,
    pub materials: &'a mut Assets<GalaxyPointsMaterial>,
}

impl PointCloudScene for BevyPointCloudScene<'_, '_, '_> {
    type Handle = CloudEntity;

    fn add(&mut self, cloud: PointCloud) -> CloudEntity {
        let mesh = self.meshes.add(build_point_cloud_mesh(&cloud.particles));
        let material = self.materials.add(GalaxyPointsMaterial::new(cloud.size));

        let entity = self
            .commands
            .spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::IDENTITY,
                GalaxyPoints,
                NoFrustumCulling,
                NotShadowCaster,
            ))
            .id();

        CloudEntity {
            entity,
            mesh,
            material,
        }
    }

    fn remove(&mut self, handle: CloudEntity) {
        self.commands.entity(handle.entity).despawn();
        self.meshes.remove(&handle.mesh);
        self.materials.remove(&handle.material);
    }
}

/// One camera-facing quad per particle: every particle contributes four
/// vertices sharing its centre and color, told apart by their corner uv.
pub fn build_point_cloud_mesh(particles: &ParticleBuffer) -> Mesh {
    let vertex_count = particles.len() * CORNERS.len();

    let mut positions = Vec::with_capacity(vertex_count);
    let mut corners = Vec::with_capacity(vertex_count);
    let mut colors = Vec::with_capacity(vertex_count);
    let mut indices = Vec::with_capacity(particles.len() * 6);

    for (i, (&position, &[r, g, b])) in particles
        .positions()
        .iter()
        .zip(particles.colors())
        .enumerate()
    {
        let base = (i * CORNERS.len()) as u32;
        for corner in CORNERS {
            positions.push(position);
            corners.push(corner);
            colors.push([r, g, b, 1.0]);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, corners)
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
    .with_inserted_indices(Indices::U32(indices))
}

fn regenerate_galaxy(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<GalaxyPointsMaterial>>,
    params: Res<GalaxyParameters>,
    mut rng: ResMut<GalaxyRng>,
    mut cloud: ResMut<GalaxyCloud>,
) {
    if cloud.built_generation == Some(params.generation) {
        return;
    }
    // recorded up front so a rejected parameter set is not retried every frame
    cloud.built_generation = Some(params.generation);

    let mut scene = BevyPointCloudScene {
        commands: &mut commands,
        meshes: &mut *meshes,
        materials: &mut *materials,
    };

    let start = Instant::now();
    match cloud
        .controller
        .apply_parameters(&mut scene, &params, &mut rng.0)
    {
        Ok(_) => info!(
            "Galaxy generation {} built: {} particles in {:.1} ms",
            params.generation,
            params.count,
            start.elapsed().as_secs_f64() * 1000.0
        ),
        Err(err) => warn!("Keeping previous galaxy: {err}"),
    }
}

/// World-space width of a sprite for the panel's point `size`.
///
/// An attenuated point covers `size * (viewport_height / 2) / depth` pixels,
/// which in world units at any depth is `size * tan(fov / 2)`.
pub fn sprite_world_size(size: f32) -> f32 {
    size * (CAMERA_FOV_Y * 0.5).tan()
}

/// Additive, depth-write-free billboards colored per vertex.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct GalaxyPointsMaterial {
    /// Sprite width in world units
    #[uniform(0)]
    pub size: f32,
    pub alpha_mode: AlphaMode,
}

impl GalaxyPointsMaterial {
    pub fn new(point_size: f32) -> Self {
        Self {
            size: sprite_world_size(point_size),
            alpha_mode: AlphaMode::Add,
        }
    }
}

impl Material for GalaxyPointsMaterial {
    fn vertex_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            Mesh::ATTRIBUTE_UV_0.at_shader_location(1),
            Mesh::ATTRIBUTE_COLOR.at_shader_location(2),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];
        descriptor.primitive.cull_mode = None;

        // particles never occlude each other
        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
            depth_stencil.depth_write_enabled = false;
        }
        Ok(())
    }
}
