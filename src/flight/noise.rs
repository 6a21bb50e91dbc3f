use bevy::prelude::*;
use noise::{NoiseFn, Perlin};
use rand::Rng;

// Offsets of the sideways flutter channel from the upward one.
const FLUTTER_SIDE_SEED_OFFSET: f32 = 33.3;
const FLUTTER_SIDE_PHASE_OFFSET: f32 = 10.0;

/// Per-plane offsets into the noise domain, one per channel, drawn once when
/// the plane is created.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct NoiseSeeds {
    pub flutter: f32,
    pub turn: f32,
}

impl NoiseSeeds {
    pub fn from_rng(rng: &mut impl Rng) -> Self {
        Self {
            flutter: rng.random_range(0.0..1000.0),
            turn: rng.random_range(1000.0..3000.0),
        }
    }
}

/// Smooth band-limited noise used for wobble and weave.
#[derive(Resource)]
pub struct FlightNoise {
    perlin: Perlin,
}

impl Default for FlightNoise {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl FlightNoise {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    /// Samples the noise field at `(x, y)`, clamped to `[-1, 1]`.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let value = self.perlin.get([x as f64, y as f64]) as f32;
        value.clamp(-1.0, 1.0)
    }

    /// Upward and sideways wobble for the given phase.
    pub fn flutter(&self, seeds: &NoiseSeeds, phase: f32) -> (f32, f32) {
        let up = self.sample(seeds.flutter, phase);
        let side = self.sample(
            seeds.flutter + FLUTTER_SIDE_SEED_OFFSET,
            phase + FLUTTER_SIDE_PHASE_OFFSET,
        );
        (up, side)
    }

    /// Signed turn amount for the given phase.
    pub fn turn(&self, seeds: &NoiseSeeds, phase: f32) -> f32 {
        self.sample(seeds.turn, phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_samples_stay_in_unit_range() {
        let noise = FlightNoise::default();
        for i in 0..2000 {
            let t = i as f32 * 0.037;
            let value = noise.sample(123.4, t);
            assert!((-1.0..=1.0).contains(&value), "sample {} out of range: {}", i, value);
        }
    }

    #[test]
    fn test_noise_is_continuous_in_time() {
        let noise = FlightNoise::default();
        let seeds = NoiseSeeds { flutter: 412.7, turn: 1873.2 };
        let dt = 0.001;
        for i in 0..1000 {
            let t = i as f32 * dt;
            let a = noise.turn(&seeds, t);
            let b = noise.turn(&seeds, t + dt);
            assert!((a - b).abs() < 0.05, "jump at t={}: {} -> {}", t, a, b);
        }
    }

    #[test]
    fn test_noise_varies_over_time() {
        let noise = FlightNoise::default();
        let seeds = NoiseSeeds { flutter: 77.7, turn: 1500.5 };
        let samples: Vec<f32> = (0..50).map(|i| noise.turn(&seeds, i as f32 * 0.5)).collect();
        let min = samples.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = samples.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!(max - min > 0.1, "noise barely moves: {}..{}", min, max);
    }

    #[test]
    fn test_seeds_are_in_their_ranges_and_reproducible() {
        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let a = NoiseSeeds::from_rng(&mut rng_a);
            let b = NoiseSeeds::from_rng(&mut rng_b);
            assert_eq!(a, b);
            assert!((0.0..1000.0).contains(&a.flutter));
            assert!((1000.0..3000.0).contains(&a.turn));
        }
    }
}
