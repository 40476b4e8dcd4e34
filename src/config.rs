use crate::vec2::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// World geometry: bounds, spawn point, and the initial target placement.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// World width in world units; valid x positions are [0, width].
    pub width: f64,
    /// World height in world units; valid y positions are [0, height].
    pub height: f64,
    /// Common spawn point shared by every rocket in a generation.
    pub start_position: Vec2,
    /// Initial target center; relocatable at runtime via `World::set_target`.
    pub target_position: Vec2,
    /// Radius within which a rocket counts as having reached the target.
    pub target_radius: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1_000.0,
            height: 800.0,
            start_position: Vec2::new(500.0, 750.0),
            target_position: Vec2::new(500.0, 200.0),
            target_radius: 20.0,
        }
    }
}

impl WorldConfig {
    /// Whether `position` lies inside the world bounds (edges inclusive).
    pub fn contains(&self, position: Vec2) -> bool {
        position.x >= 0.0
            && position.x <= self.width
            && position.y >= 0.0
            && position.y <= self.height
    }
}

/// Genetic-algorithm and physics parameters for one run.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GaConfig {
    /// Number of rockets (and genomes) per generation.
    pub population_size: usize,
    /// Number of thrust instructions per genome; also the per-generation
    /// tick budget and the initial fuel of each rocket.
    pub dna_length: usize,
    /// Independent per-gene replacement probability, in [0, 1].
    pub mutation_rate: f64,
    /// Number of top genomes carried over verbatim each generation.
    pub elite_count: usize,
    /// Number of generations the headless driver runs before exiting.
    pub num_generations: usize,
    /// Maximum magnitude of any thrust gene.
    pub thrust_cap: f64,
    /// Velocity magnitude cap applied every tick.
    pub max_velocity: f64,
    /// Drag factor in (0, 1] applied to velocity every tick, after clamping.
    pub velocity_damping: f64,
    /// Optional RNG seed for reproducible runs.
    pub rng_seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            dna_length: 100,
            mutation_rate: 0.03,
            elite_count: 0,
            num_generations: 100,
            thrust_cap: 0.5,
            max_velocity: 10.0,
            velocity_damping: 0.98,
            rng_seed: None,
        }
    }
}

impl GaConfig {
    /// Returns the configured RNG, seeding from entropy if no seed is set.
    pub fn seeded_rng(&self) -> SmallRng {
        match self.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => {
                let seed: u64 = rand::random();
                SmallRng::seed_from_u64(seed)
            }
        }
    }
}

/// Tunable constants of the fitness function. Only the qualitative ordering
/// reached-target > in-bounds miss > out-of-bounds is load-bearing.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FitnessConfig {
    /// Base reward for reaching the target.
    pub target_reward: f64,
    /// Bonus per unit of unused fuel on a successful flight.
    pub fuel_bonus_per_step: f64,
    /// Small positive score assigned to out-of-bounds rockets; must stay
    /// below any in-bounds score.
    pub penalty_floor: f64,
    /// Guard against division by zero in the inverse-distance score.
    pub epsilon: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            target_reward: 1_000.0,
            fuel_bonus_per_step: 10.0,
            penalty_floor: 1e-3,
            epsilon: 1e-9,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub world: WorldConfig,
    pub ga: GaConfig,
    pub fitness: FitnessConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Fails fast on any parameter outside its legal range. The engine never
    /// silently clamps configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ga.population_size == 0 {
            return Err(ConfigError::Invalid("population_size must be non-zero"));
        }
        if self.ga.dna_length == 0 {
            return Err(ConfigError::Invalid("dna_length must be non-zero"));
        }
        if !(0.0..=1.0).contains(&self.ga.mutation_rate) {
            return Err(ConfigError::Invalid("mutation_rate must be in [0, 1]"));
        }
        if self.ga.elite_count > self.ga.population_size {
            return Err(ConfigError::Invalid(
                "elite_count cannot exceed population_size",
            ));
        }
        if self.ga.thrust_cap <= 0.0 || !self.ga.thrust_cap.is_finite() {
            return Err(ConfigError::Invalid("thrust_cap must be positive"));
        }
        if self.ga.max_velocity <= 0.0 || !self.ga.max_velocity.is_finite() {
            return Err(ConfigError::Invalid("max_velocity must be positive"));
        }
        if self.ga.velocity_damping <= 0.0 || self.ga.velocity_damping > 1.0 {
            return Err(ConfigError::Invalid("velocity_damping must be in (0, 1]"));
        }
        if self.world.width <= 0.0 || self.world.height <= 0.0 {
            return Err(ConfigError::Invalid("world dimensions must be positive"));
        }
        if self.world.target_radius <= 0.0 {
            return Err(ConfigError::Invalid("target_radius must be positive"));
        }
        if self.fitness.target_reward <= 0.0 {
            return Err(ConfigError::Invalid("target_reward must be positive"));
        }
        if self.fitness.fuel_bonus_per_step < 0.0 {
            return Err(ConfigError::Invalid(
                "fuel_bonus_per_step must be non-negative",
            ));
        }
        if self.fitness.penalty_floor <= 0.0 {
            return Err(ConfigError::Invalid("penalty_floor must be positive"));
        }
        if self.fitness.epsilon <= 0.0 {
            return Err(ConfigError::Invalid("epsilon must be positive"));
        }
        Ok(())
    }
}
