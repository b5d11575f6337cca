use super::GalaxyError;
use bevy::prelude::*;

/// Parameters of one generated galaxy.
///
/// `generation` is bumped every time a committed edit is applied, systems
/// downstream compare it against the generation they last built.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct GalaxyParameters {
    pub generation: i32,

    pub count: u32,
    pub size: f32,
    pub radius: f32,
    pub branches: u32,
    pub spin: f32, // radians of twist per unit radius
    pub randomness: f32,
    pub randomness_power: f32,

    pub inside_color: LinearRgba,
    pub outside_color: LinearRgba,
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        Self {
            generation: 0,
            count: 100_000,
            size: 0.01,
            radius: 5.0,
            branches: 5,
            spin: -2.0,
            randomness: 0.2,
            randomness_power: 3.0,
            inside_color: Srgba::rgb_u8(0xff, 0x60, 0x30).into(),
            outside_color: Srgba::rgb_u8(0x1b, 0x39, 0x84).into(),
        }
    }
}

/// Bounds and step for one numeric panel control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamRange<T> {
    pub min: T,
    pub max: T,
    pub step: T,
}

impl GalaxyParameters {
    pub const COUNT: ParamRange<u32> = ParamRange {
        min: 100,
        max: 1_000_000,
        step: 100,
    };
    pub const SIZE: ParamRange<f32> = ParamRange {
        min: 0.001,
        max: 0.1,
        step: 0.001,
    };
    pub const RADIUS: ParamRange<f32> = ParamRange {
        min: 0.01,
        max: 20.0,
        step: 0.01,
    };
    pub const BRANCHES: ParamRange<u32> = ParamRange {
        min: 2,
        max: 20,
        step: 1,
    };
    pub const SPIN: ParamRange<f32> = ParamRange {
        min: -5.0,
        max: 5.0,
        step: 0.001,
    };
    pub const RANDOMNESS: ParamRange<f32> = ParamRange {
        min: 0.0,
        max: 2.0,
        step: 0.001,
    };
    pub const RANDOMNESS_POWER: ParamRange<f32> = ParamRange {
        min: 1.0,
        max: 10.0,
        step: 0.001,
    };

    /// Checks the parameters against the domain the generator accepts.
    ///
    /// This is looser than the panel ranges: `count = 1` or `branches = 1`
    /// are valid here even though the panel never produces them.
    pub fn validate(&self) -> Result<(), GalaxyError> {
        if self.count == 0 {
            return Err(GalaxyError::invalid("count", "must be at least 1"));
        }
        if self.branches == 0 {
            return Err(GalaxyError::invalid("branches", "must be at least 1"));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(GalaxyError::invalid("radius", "must be finite and positive"));
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(GalaxyError::invalid("size", "must be finite and positive"));
        }
        if !self.spin.is_finite() {
            return Err(GalaxyError::invalid("spin", "must be finite"));
        }
        if !self.randomness.is_finite() || self.randomness < 0.0 {
            return Err(GalaxyError::invalid(
                "randomness",
                "must be finite and non-negative",
            ));
        }
        if !self.randomness_power.is_finite() || self.randomness_power < 1.0 {
            return Err(GalaxyError::invalid(
                "randomness_power",
                "must be finite and at least 1",
            ));
        }
        Ok(())
    }

    /// Copy with every numeric field pulled into its panel range.
    pub fn clamped(&self) -> Self {
        let clamp_f = |v: f32, r: ParamRange<f32>| {
            if v.is_nan() {
                r.min
            } else {
                v.clamp(r.min, r.max)
            }
        };
        Self {
            count: self.count.clamp(Self::COUNT.min, Self::COUNT.max),
            size: clamp_f(self.size, Self::SIZE),
            radius: clamp_f(self.radius, Self::RADIUS),
            branches: self.branches.clamp(Self::BRANCHES.min, Self::BRANCHES.max),
            spin: clamp_f(self.spin, Self::SPIN),
            randomness: clamp_f(self.randomness, Self::RANDOMNESS),
            randomness_power: clamp_f(self.randomness_power, Self::RANDOMNESS_POWER),
            ..self.clone()
        }
    }

    /// True if the two parameter sets produce the same galaxy.
    pub fn same_shape(&self, other: &Self) -> bool {
        Self {
            generation: 0,
            ..self.clone()
        } == Self {
            generation: 0,
            ..other.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GalaxyParameters::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_count_and_branches() {
        let params = GalaxyParameters {
            count: 0,
            ..default()
        };
        assert!(matches!(
            params.validate(),
            Err(GalaxyError::InvalidParameter { name: "count", .. })
        ));

        let params = GalaxyParameters {
            branches: 0,
            ..default()
        };
        assert!(matches!(
            params.validate(),
            Err(GalaxyError::InvalidParameter {
                name: "branches",
                ..
            })
        ));
    }

    #[test]
    fn validate_rejects_non_positive_radius() {
        for radius in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let params = GalaxyParameters {
                radius,
                ..default()
            };
            assert!(params.validate().is_err(), "radius {radius} accepted");
        }
    }

    #[test]
    fn validate_accepts_degenerate_cosmetic_values() {
        let params = GalaxyParameters {
            count: 1,
            branches: 1,
            spin: 0.0,
            randomness: 0.0,
            ..default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn clamped_pulls_values_into_panel_ranges() {
        let params = GalaxyParameters {
            count: 5,
            radius: 100.0,
            branches: 50,
            spin: f32::NAN,
            randomness_power: 0.2,
            ..default()
        }
        .clamped();

        assert_eq!(params.count, 100);
        assert_eq!(params.radius, 20.0);
        assert_eq!(params.branches, 20);
        assert_eq!(params.spin, -5.0);
        assert_eq!(params.randomness_power, 1.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn same_shape_ignores_generation() {
        let a = GalaxyParameters::default();
        let b = GalaxyParameters {
            generation: 7,
            ..default()
        };
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&GalaxyParameters { spin: 1.0, ..default() }));
    }
}
