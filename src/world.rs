use crate::config::{Config, ConfigError};
use crate::evolution::Population;
use crate::rocket::{Rocket, Target, Termination};
use crate::vec2::Vec2;
use log::{debug, info};
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Read-only view of one rocket for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocketSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub alive: bool,
    /// Normalized fitness in [0, 1]; zero until the generation has been
    /// evaluated.
    pub fitness_normalized: f64,
}

/// Running performance counters, refreshed when a generation completes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Best raw fitness in the last evaluated generation.
    pub best_fitness: f64,
    /// Best raw fitness seen since the last restart.
    pub best_fitness_all_time: f64,
    /// Closest final distance to the target in the last evaluated generation.
    pub best_distance: f64,
    /// Rockets that reached the target in the last evaluated generation.
    pub reached_target: usize,
    /// Cumulative reached-target count since the last restart.
    pub total_reached_target: usize,
}

impl Default for GenerationStats {
    fn default() -> Self {
        Self {
            best_fitness: 0.0,
            best_fitness_all_time: 0.0,
            best_distance: f64::INFINITY,
            reached_target: 0,
            total_reached_target: 0,
        }
    }
}

/// The generation controller: owns the population, the per-generation rocket
/// array, the target, and the RNG, and drives the spawn → run → evaluate →
/// evolve cycle. The only component with lifecycle state.
#[derive(Clone)]
pub struct World {
    config: Config,
    rng: SmallRng,
    population: Population,
    rockets: Vec<Rocket>,
    target: Target,
    generation: u64,
    ticks: usize,
    complete: bool,
    stats: GenerationStats,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("generation", &self.generation)
            .field("ticks", &self.ticks)
            .field("complete", &self.complete)
            .field("rocket_count", &self.rockets.len())
            .finish()
    }
}

impl World {
    /// Validates the configuration and spawns generation 0.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = config.ga.seeded_rng();
        let population = Population::new(config.ga.clone(), &mut rng);
        let target = Target {
            position: config.world.target_position,
            radius: config.world.target_radius,
        };
        let mut world = Self {
            config,
            rng,
            population,
            rockets: Vec::new(),
            target,
            generation: 0,
            ticks: 0,
            complete: false,
            stats: GenerationStats::default(),
        };
        world.spawn();
        Ok(world)
    }

    /// Instantiates every rocket at the common start position, each bound to
    /// the genome at its slot index.
    fn spawn(&mut self) {
        let start = self.config.world.start_position;
        self.rockets = self
            .population
            .genomes()
            .iter()
            .map(|genome| Rocket::new(genome.clone(), start))
            .collect();
        self.ticks = 0;
        self.complete = false;
        debug!(
            "generation {} spawned with {} rockets",
            self.generation,
            self.rockets.len()
        );
    }

    /// Advances every active rocket by one physics step. The step that
    /// terminates the last rocket (or exhausts the tick budget, forcing the
    /// stragglers down) also evaluates fitness and marks the generation
    /// complete. Idempotent no-op returning `false` once complete.
    pub fn tick(&mut self) -> bool {
        if self.complete {
            return false;
        }
        for rocket in &mut self.rockets {
            rocket.tick(&self.config.ga, &self.config.world, &self.target);
        }
        self.ticks += 1;

        if self.ticks >= self.config.ga.dna_length {
            for rocket in &mut self.rockets {
                rocket.force_terminate(Termination::TickLimit);
            }
        }
        if self.rockets.iter().all(|r| !r.is_active()) {
            self.evaluate();
            self.complete = true;
        }
        true
    }

    /// Scores every terminated rocket into the population's fitness array,
    /// updates the stats, and normalizes scores for selection and snapshots.
    fn evaluate(&mut self) {
        let mut best_fitness = 0.0_f64;
        let mut best_distance = f64::INFINITY;
        let mut reached = 0;

        for (slot, rocket) in self.rockets.iter().enumerate() {
            let score = rocket.fitness(&self.target, &self.config.fitness);
            self.population.set_fitness(slot, score);
            best_fitness = best_fitness.max(score);
            best_distance = best_distance.min(rocket.position().distance(self.target.position));
            if rocket.termination() == Some(Termination::ReachedTarget) {
                reached += 1;
            }
        }

        self.stats.best_fitness = best_fitness;
        self.stats.best_fitness_all_time = self.stats.best_fitness_all_time.max(best_fitness);
        self.stats.best_distance = best_distance;
        self.stats.reached_target = reached;
        self.stats.total_reached_target += reached;
        self.population.normalize();

        info!(
            "generation {} complete after {} ticks: best fitness {:.4}, best distance {:.1}, {}/{} reached target",
            self.generation,
            self.ticks,
            best_fitness,
            best_distance,
            reached,
            self.rockets.len()
        );
    }

    /// Breeds the next generation and respawns. Only legal once the current
    /// generation is complete; no-op otherwise. The generation counter
    /// increments exactly once per completed generation.
    pub fn advance_generation(&mut self) {
        if !self.complete {
            return;
        }
        self.population.evolve(&mut self.rng);
        self.generation += 1;
        self.spawn();
    }

    /// Convenience for frame-driven callers: one physics tick, rolling into
    /// the next generation automatically at the completion boundary.
    pub fn step(&mut self) {
        if !self.tick() {
            self.advance_generation();
        }
    }

    /// Read-only per-slot view for drawing. Idempotent between ticks.
    pub fn rocket_snapshots(&self) -> Vec<RocketSnapshot> {
        self.rockets
            .iter()
            .enumerate()
            .map(|(slot, rocket)| RocketSnapshot {
                position: rocket.position(),
                velocity: rocket.velocity(),
                alive: rocket.is_active(),
                fitness_normalized: if self.complete {
                    self.population.fitness(slot)
                } else {
                    0.0
                },
            })
            .collect()
    }

    pub fn generation_index(&self) -> u64 {
        self.generation
    }

    pub fn is_generation_complete(&self) -> bool {
        self.complete
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Relocates the target. Takes effect on the next tick evaluated.
    pub fn set_target(&mut self, position: Vec2) {
        self.target.position = position;
    }

    /// Resets to generation 0 with a freshly randomized population and
    /// cleared statistics.
    pub fn restart(&mut self) {
        self.population.reset(&mut self.rng);
        self.generation = 0;
        self.stats = GenerationStats::default();
        self.spawn();
        info!("world restarted with a fresh population");
    }

    /// Restarts under a new configuration, which is validated first. The
    /// target snaps back to its configured position and the RNG is reseeded.
    pub fn restart_with(&mut self, config: Config) -> Result<(), ConfigError> {
        *self = World::new(config)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.ga.population_size = 8;
        config.ga.dna_length = 12;
        config.ga.rng_seed = Some(0xBEEF);
        config
    }

    fn run_generation(world: &mut World) {
        while world.tick() {}
    }

    #[test]
    fn construction_rejects_invalid_config() {
        let mut config = test_config();
        config.ga.population_size = 0;
        assert!(World::new(config).is_err());
    }

    #[test]
    fn generation_completes_within_tick_budget() {
        let mut world = World::new(test_config()).unwrap();
        let mut ticks = 0;
        while !world.is_generation_complete() {
            assert!(world.tick());
            ticks += 1;
            assert!(ticks <= 12, "generation must complete within dna_length ticks");
        }
        // Every rocket is terminated and scored.
        assert!(world.rocket_snapshots().iter().all(|s| !s.alive));
        assert!(world.population().fitnesses().iter().all(|&f| f > 0.0));
    }

    #[test]
    fn tick_is_noop_once_complete() {
        let mut world = World::new(test_config()).unwrap();
        run_generation(&mut world);
        let before = world.rocket_snapshots();
        assert!(!world.tick());
        assert!(!world.tick());
        assert_eq!(world.rocket_snapshots(), before);
        assert_eq!(world.generation_index(), 0);
    }

    #[test]
    fn advance_generation_increments_counter_and_respawns() {
        let mut world = World::new(test_config()).unwrap();

        // Not legal before completion.
        world.advance_generation();
        assert_eq!(world.generation_index(), 0);

        run_generation(&mut world);
        world.advance_generation();
        assert_eq!(world.generation_index(), 1);
        assert!(!world.is_generation_complete());
        let start = world.rocket_snapshots();
        assert!(start.iter().all(|s| s.alive));
        assert!(start
            .iter()
            .all(|s| s.position == Config::default().world.start_position));
    }

    #[test]
    fn population_arrays_stay_sized_across_generations() {
        let mut world = World::new(test_config()).unwrap();
        for _ in 0..3 {
            run_generation(&mut world);
            assert_eq!(world.population().genomes().len(), 8);
            assert_eq!(world.population().fitnesses().len(), 8);
            world.advance_generation();
            assert_eq!(world.population().genomes().len(), 8);
            assert_eq!(world.population().fitnesses().len(), 8);
        }
    }

    #[test]
    fn snapshots_are_idempotent_between_ticks() {
        let mut world = World::new(test_config()).unwrap();
        world.tick();
        world.tick();
        assert_eq!(world.rocket_snapshots(), world.rocket_snapshots());
    }

    #[test]
    fn normalized_fitness_lands_in_unit_interval() {
        let mut world = World::new(test_config()).unwrap();
        run_generation(&mut world);
        let snapshots = world.rocket_snapshots();
        assert!(snapshots
            .iter()
            .all(|s| (0.0..=1.0).contains(&s.fitness_normalized)));
        assert!(snapshots.iter().any(|s| s.fitness_normalized == 1.0));
    }

    #[test]
    fn set_target_takes_effect_on_next_tick() {
        let mut config = test_config();
        config.ga.velocity_damping = 1.0;
        let mut world = World::new(config.clone()).unwrap();
        // Park the target on the spawn point: every rocket reaches it on the
        // very next tick.
        world.set_target(config.world.start_position);
        world.tick();
        run_generation(&mut world);
        assert_eq!(world.stats().reached_target, 8);
    }

    #[test]
    fn restart_resets_generation_and_stats() {
        let mut world = World::new(test_config()).unwrap();
        run_generation(&mut world);
        world.advance_generation();
        run_generation(&mut world);
        world.advance_generation();
        assert_eq!(world.generation_index(), 2);

        world.restart();
        assert_eq!(world.generation_index(), 0);
        assert_eq!(*world.stats(), GenerationStats::default());
        assert!(!world.is_generation_complete());
        assert!(world.rocket_snapshots().iter().all(|s| s.alive));
    }

    #[test]
    fn restart_with_swaps_configuration() {
        let mut world = World::new(test_config()).unwrap();
        let mut next = test_config();
        next.ga.population_size = 3;
        world.restart_with(next).unwrap();
        assert_eq!(world.rocket_snapshots().len(), 3);

        let mut bad = test_config();
        bad.ga.mutation_rate = 2.0;
        assert!(world.restart_with(bad).is_err());
        // Failed restart leaves the world untouched.
        assert_eq!(world.rocket_snapshots().len(), 3);
    }

    #[test]
    fn seeded_runs_are_deterministic() {
        let config = test_config();
        let mut a = World::new(config.clone()).unwrap();
        let mut b = World::new(config).unwrap();
        for _ in 0..40 {
            a.step();
            b.step();
        }
        assert_eq!(a.generation_index(), b.generation_index());
        assert_eq!(a.rocket_snapshots(), b.rocket_snapshots());
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn step_rolls_into_the_next_generation() {
        let mut world = World::new(test_config()).unwrap();
        run_generation(&mut world);
        assert!(world.is_generation_complete());
        world.step();
        assert_eq!(world.generation_index(), 1);
        assert!(!world.is_generation_complete());
    }
}
