pub use crate::galaxy::{
    generate, GalaxyCommand, GalaxyController, GalaxyError, GalaxyParameters, GalaxyRng,
    ParticleBuffer, PointCloud, PointCloudScene,
};
