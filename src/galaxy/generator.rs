use super::{GalaxyError, GalaxyParameters};
use bevy::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use std::f32::consts::TAU;

/// Particles per parallel work unit. Each chunk owns an rng seeded from the
/// chunk index, so the output does not depend on thread scheduling.
const CHUNK_SIZE: usize = 4096;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub color: LinearRgba,
}

/// Positions and colors of a point cloud, one record per particle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleBuffer {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
}

impl ParticleBuffer {
    fn with_len(len: usize) -> Self {
        Self {
            positions: vec![[0.0; 3]; len],
            colors: vec![[0.0; 3]; len],
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied().map(Vec3::from_array)
    }

    pub fn color(&self, index: usize) -> Option<LinearRgba> {
        self.colors
            .get(index)
            .map(|&[r, g, b]| LinearRgba::rgb(r, g, b))
    }

    pub fn particle(&self, index: usize) -> Option<Particle> {
        Some(Particle {
            position: self.position(index)?,
            color: self.color(index)?,
        })
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Particle> + '_ {
        self.positions
            .iter()
            .zip(&self.colors)
            .map(|(&p, &[r, g, b])| Particle {
                position: Vec3::from_array(p),
                color: LinearRgba::rgb(r, g, b),
            })
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// `x0, y0, z0, x1, ...`, length `3 * len()`.
    pub fn flat_positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// `r0, g0, b0, r1, ...`, length `3 * len()`.
    pub fn flat_colors(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }
}

impl FromIterator<Particle> for ParticleBuffer {
    fn from_iter<I: IntoIterator<Item = Particle>>(iter: I) -> Self {
        let mut buffer = Self::default();
        for particle in iter {
            buffer.positions.push(particle.position.to_array());
            buffer.colors.push(color_triple(particle.color));
        }
        buffer
    }
}

/// A generated galaxy, ready to be handed to a scene.
#[derive(Clone, Debug, PartialEq)]
pub struct PointCloud {
    pub particles: ParticleBuffer,
    /// Point size in world units
    pub size: f32,
}

fn color_triple(color: LinearRgba) -> [f32; 3] {
    [color.red, color.green, color.blue]
}

/// Arms are filled round-robin: particle `i` lands on arm `i % branches`.
pub fn branch_angle(index: u32, branches: u32) -> f32 {
    (index % branches) as f32 / branches as f32 * TAU
}

fn lerp_color(inside: LinearRgba, outside: LinearRgba, t: f32) -> LinearRgba {
    LinearRgba::rgb(
        inside.red + (outside.red - inside.red) * t,
        inside.green + (outside.green - inside.green) * t,
        inside.blue + (outside.blue - inside.blue) * t,
    )
}

/// Places particle `index` at distance `radius` from the centre, offset by
/// `jitter`. Deterministic: all randomness lives in `radius` and `jitter`.
pub fn place_particle(
    params: &GalaxyParameters,
    index: u32,
    radius: f32,
    jitter: Vec3,
) -> Particle {
    let angle = branch_angle(index, params.branches) + radius * params.spin;

    let position = vec3(
        angle.cos() * radius + jitter.x,
        jitter.y,
        angle.sin() * radius + jitter.z,
    );
    let color = lerp_color(
        params.inside_color,
        params.outside_color,
        radius / params.radius,
    );

    Particle { position, color }
}

/// `±u^power * scale` with `u` uniform in [0, 1) and a fair sign.
/// Large powers push almost every sample towards zero.
pub fn sample_axis_jitter<R: Rng + ?Sized>(rng: &mut R, power: f32, scale: f32) -> f32 {
    let magnitude = rng.random::<f32>().powf(power) * scale;
    if rng.random_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

fn sample_particle<R: Rng + ?Sized>(rng: &mut R, params: &GalaxyParameters, index: u32) -> Particle {
    // uniform over r, not over disk area
    let radius = rng.random::<f32>() * params.radius;

    let scale = params.randomness * radius;
    let jitter = vec3(
        sample_axis_jitter(rng, params.randomness_power, scale),
        sample_axis_jitter(rng, params.randomness_power, scale),
        sample_axis_jitter(rng, params.randomness_power, scale),
    );

    place_particle(params, index, radius, jitter)
}

/// Builds a fresh point cloud for `params`.
///
/// One seed is drawn from `rng`; identical parameters and an identically
/// seeded `rng` give byte-identical buffers.
pub fn generate<R: Rng + ?Sized>(
    params: &GalaxyParameters,
    rng: &mut R,
) -> Result<PointCloud, GalaxyError> {
    params.validate()?;

    let base_seed: u64 = rng.random();
    let mut particles = ParticleBuffer::with_len(params.count as usize);

    let ParticleBuffer { positions, colors } = &mut particles;
    positions
        .par_chunks_mut(CHUNK_SIZE)
        .zip(colors.par_chunks_mut(CHUNK_SIZE))
        .enumerate()
        .for_each(|(chunk, (positions, colors))| {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(chunk as u64));
            let first = chunk * CHUNK_SIZE;

            for (offset, (position, color)) in positions.iter_mut().zip(colors).enumerate() {
                let particle = sample_particle(&mut rng, params, (first + offset) as u32);
                *position = particle.position.to_array();
                *color = color_triple(particle.color);
            }
        });

    Ok(PointCloud {
        particles,
        size: params.size,
    })
}
