use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// World constants the flight model needs from the physics host.
#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct FlightEnvironment {
    pub gravity: Vec3,
}

impl Default for FlightEnvironment {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

/// Random source for per-plane noise seeds. Seed it for reproducible runs.
#[derive(Resource)]
pub struct FlightRng(pub StdRng);

impl FlightRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::default(),
        }
    }
}

impl Default for FlightRng {
    fn default() -> Self {
        Self(StdRng::from_os_rng())
    }
}
