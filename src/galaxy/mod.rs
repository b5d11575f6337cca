use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

mod controller;
mod error;
mod galaxy_config;
mod generator;

pub use controller::{GalaxyController, PointCloudScene};
pub use error::GalaxyError;
pub use galaxy_config::{GalaxyParameters, ParamRange};
pub use generator::{
    branch_angle, generate, place_particle, sample_axis_jitter, Particle, ParticleBuffer,
    PointCloud,
};

/// Environment variable that pins the galaxy rng for reproducible sessions.
pub const SEED_ENV_VAR: &str = "GALAXY_SEED";

/// Requests sent by the parameter panel.
#[derive(Event, Clone, Debug, PartialEq)]
pub enum GalaxyCommand {
    /// A committed edit: rebuild if the shape differs from the current one.
    Apply(GalaxyParameters),
    /// Rebuild with the current parameters and fresh randomness.
    Reroll,
}

/// Random source shared by every regeneration.
#[derive(Resource, Deref, DerefMut)]
pub struct GalaxyRng(pub StdRng);

impl GalaxyRng {
    pub fn from_seed_or_entropy(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => {
                info!("Seeding galaxy rng with {seed}");
                Self(StdRng::seed_from_u64(seed))
            }
            None => Self(StdRng::from_os_rng()),
        }
    }
}

fn seed_from_env() -> Option<u64> {
    let raw = std::env::var(SEED_ENV_VAR).ok()?;
    match raw.trim().parse() {
        Ok(seed) => Some(seed),
        Err(err) => {
            warn!("Ignoring {SEED_ENV_VAR}={raw:?}: {err}");
            None
        }
    }
}

pub struct GalaxyConfigPlugin;

impl Plugin for GalaxyConfigPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GalaxyParameters::default())
            .insert_resource(GalaxyRng::from_seed_or_entropy(seed_from_env()))
            .add_event::<GalaxyCommand>()
            .add_systems(Update, apply_galaxy_commands);
    }
}

/// Folds this frame's panel commands into the parameters resource, bumping
/// `generation` at most once so several commits in a frame cost one rebuild.
pub fn apply_galaxy_commands(
    mut commands: EventReader<GalaxyCommand>,
    mut params: ResMut<GalaxyParameters>,
) {
    let mut rebuild = false;
    for command in commands.read() {
        match command {
            GalaxyCommand::Apply(new_params) => {
                if !params.same_shape(new_params) {
                    let generation = params.generation;
                    *params = GalaxyParameters {
                        generation,
                        ..new_params.clone()
                    };
                    rebuild = true;
                }
            }
            GalaxyCommand::Reroll => rebuild = true,
        }
    }

    if rebuild {
        params.generation += 1;
        info!("Galaxy parameters committed, generation {}", params.generation);
    }
}
