use super::{generate, GalaxyError, GalaxyParameters, PointCloud};
use bevy::prelude::*;
use rand::Rng;

/// The part of a render host the controller needs: somewhere to put a point
/// cloud and a way to take it out again.
pub trait PointCloudScene {
    type Handle;

    fn add(&mut self, cloud: PointCloud) -> Self::Handle;

    /// Detaches the cloud and releases everything it owns.
    fn remove(&mut self, handle: Self::Handle);
}

/// Owns the handle of the one galaxy currently in the scene.
#[derive(Debug)]
pub struct GalaxyController<H> {
    current: Option<H>,
    builds: u32,
}

impl<H> Default for GalaxyController<H> {
    fn default() -> Self {
        Self {
            current: None,
            builds: 0,
        }
    }
}

impl<H> GalaxyController<H> {
    pub fn current(&self) -> Option<&H> {
        self.current.as_ref()
    }

    /// Number of clouds built so far.
    pub fn builds(&self) -> u32 {
        self.builds
    }

    /// Replaces the current galaxy with a new one built from `params`.
    ///
    /// Invalid parameters are rejected before the scene is touched, so the
    /// previous galaxy stays visible. Otherwise the previous cloud is removed
    /// and released first, then the new one is generated and added.
    pub fn apply_parameters<S, R>(
        &mut self,
        scene: &mut S,
        params: &GalaxyParameters,
        rng: &mut R,
    ) -> Result<&H, GalaxyError>
    where
        S: PointCloudScene<Handle = H>,
        R: Rng + ?Sized,
    {
        params.validate()?;

        if let Some(previous) = self.current.take() {
            scene.remove(previous);
        }

        let cloud = generate(params, rng)?;
        debug!(
            "Built galaxy: {} particles, {} branches, radius {}",
            cloud.particles.len(),
            params.branches,
            params.radius
        );

        self.builds += 1;
        Ok(&*self.current.insert(scene.add(cloud)))
    }

    /// Removes the current galaxy, if any.
    pub fn clear<S>(&mut self, scene: &mut S)
    where
        S: PointCloudScene<Handle = H>,
    {
        if let Some(previous) = self.current.take() {
            scene.remove(previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct RecordingScene {
        next_id: u32,
        live: Vec<(u32, PointCloud)>,
        removed: Vec<u32>,
    }

    impl PointCloudScene for RecordingScene {
        type Handle = u32;

        fn add(&mut self, cloud: PointCloud) -> u32 {
            let id = self.next_id;
            self.next_id += 1;
            self.live.push((id, cloud));
            id
        }

        fn remove(&mut self, handle: u32) {
            self.live.retain(|(id, _)| *id != handle);
            self.removed.push(handle);
        }
    }

    fn params(count: u32) -> GalaxyParameters {
        GalaxyParameters {
            count,
            ..default()
        }
    }

    #[test]
    fn regeneration_leaves_exactly_one_cloud() {
        let mut scene = RecordingScene::default();
        let mut controller = GalaxyController::default();
        let mut rng = StdRng::seed_from_u64(1);

        let first = *controller
            .apply_parameters(&mut scene, &params(500), &mut rng)
            .unwrap();
        let second = *controller
            .apply_parameters(&mut scene, &params(800), &mut rng)
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(scene.live.len(), 1);
        assert_eq!(scene.live[0].0, second);
        assert_eq!(scene.live[0].1.particles.len(), 800);
        assert_eq!(scene.removed, vec![first]);
        assert_eq!(controller.current(), Some(&second));
        assert_eq!(controller.builds(), 2);
    }

    #[test]
    fn invalid_parameters_keep_the_previous_cloud() {
        let mut scene = RecordingScene::default();
        let mut controller = GalaxyController::default();
        let mut rng = StdRng::seed_from_u64(2);

        let first = *controller
            .apply_parameters(&mut scene, &params(100), &mut rng)
            .unwrap();
        let bad = GalaxyParameters {
            radius: -1.0,
            ..params(100)
        };

        let err = controller
            .apply_parameters(&mut scene, &bad, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            GalaxyError::InvalidParameter {
                name: "radius",
                reason: "must be finite and positive"
            }
        );
        assert_eq!(controller.current(), Some(&first));
        assert_eq!(scene.live.len(), 1);
        assert!(scene.removed.is_empty());
    }

    #[test]
    fn clear_detaches_current_cloud() {
        let mut scene = RecordingScene::default();
        let mut controller = GalaxyController::default();
        let mut rng = StdRng::seed_from_u64(3);

        controller
            .apply_parameters(&mut scene, &params(10), &mut rng)
            .unwrap();
        controller.clear(&mut scene);

        assert!(scene.live.is_empty());
        assert!(controller.current().is_none());
        controller.clear(&mut scene);
        assert_eq!(scene.removed.len(), 1);
    }
}
