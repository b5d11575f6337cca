use galaxy_generator::galaxy::{
    generate, GalaxyController, GalaxyError, GalaxyParameters, PointCloud, PointCloudScene,
};
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Scene that only counts what is attached.
#[derive(Default)]
struct CountingScene {
    attached: Vec<usize>,
    next: usize,
}

impl PointCloudScene for CountingScene {
    type Handle = usize;

    fn add(&mut self, _cloud: PointCloud) -> usize {
        self.next += 1;
        self.attached.push(self.next);
        self.next
    }

    fn remove(&mut self, handle: usize) {
        self.attached.retain(|h| *h != handle);
    }
}

#[test]
fn default_galaxy_fills_every_record() {
    let params = GalaxyParameters::default();
    let cloud = generate(&params, &mut StdRng::seed_from_u64(2024)).unwrap();

    assert_eq!(cloud.particles.len(), params.count as usize);
    assert_eq!(cloud.particles.flat_positions().len(), 3 * params.count as usize);

    let bound = params.radius * (1.0 + std::f32::consts::SQRT_2 * params.randomness) + 1e-3;
    for particle in cloud.particles.iter() {
        assert!(particle.position.is_finite());
        assert!(particle.position.xz().length() <= bound);
        for channel in [particle.color.red, particle.color.green, particle.color.blue] {
            assert!((0.0..=1.0).contains(&channel));
        }
    }
}

#[test]
fn repeated_commits_keep_one_galaxy_attached() {
    let mut scene = CountingScene::default();
    let mut controller = GalaxyController::default();
    let mut rng = StdRng::seed_from_u64(1);

    for branches in 2..8 {
        let params = GalaxyParameters {
            count: 2_000,
            branches,
            ..default()
        };
        controller
            .apply_parameters(&mut scene, &params, &mut rng)
            .unwrap();
        assert_eq!(scene.attached.len(), 1);
    }
    assert_eq!(controller.builds(), 6);
}

#[test]
fn zero_branches_is_reported_not_rendered() {
    let params = GalaxyParameters {
        branches: 0,
        ..default()
    };
    let err = generate(&params, &mut StdRng::seed_from_u64(0)).unwrap_err();
    assert!(matches!(
        err,
        GalaxyError::InvalidParameter {
            name: "branches",
            ..
        }
    ));
    assert!(err.to_string().contains("branches"));
}
