use crate::config::{FitnessConfig, GaConfig, WorldConfig};
use crate::evolution::Genome;
use crate::vec2::Vec2;
use serde::{Deserialize, Serialize};

/// Why a rocket stopped flying. Absorbing: once set, the rocket ignores all
/// further ticks for the rest of the generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Came within the target radius.
    ReachedTarget,
    /// Left the world bounds.
    OutOfBounds,
    /// Burned its last unit of fuel.
    ExhaustedFuel,
    /// Forced down at the generation tick budget.
    TickLimit,
}

/// One agent: a genome being integrated into a trajectory. Spawned fresh at
/// the start of each generation and discarded after fitness extraction; the
/// genome it carries is an immutable copy valid for this generation only.
#[derive(Debug, Clone)]
pub struct Rocket {
    genome: Genome,
    position: Vec2,
    velocity: Vec2,
    fuel: usize,
    tick_index: usize,
    termination: Option<Termination>,
}

impl Rocket {
    /// Spawns a rocket at `start` with a full tank: one unit of fuel per
    /// gene.
    pub fn new(genome: Genome, start: Vec2) -> Self {
        let fuel = genome.len();
        Self {
            genome,
            position: start,
            velocity: Vec2::ZERO,
            fuel,
            tick_index: 0,
            termination: None,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn fuel(&self) -> usize {
        self.fuel
    }

    pub fn is_active(&self) -> bool {
        self.termination.is_none()
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// Advances the rocket by one discrete time step.
    ///
    /// While active, the scheduled thrust gene becomes this tick's
    /// acceleration; velocity is updated add-then-damp (accelerate, clamp to
    /// `max_velocity`, then apply drag), position integrates the new
    /// velocity, and one unit of fuel burns. Termination checks run in
    /// priority order: target reached, then out of bounds, then fuel or
    /// instruction exhaustion. Terminated rockets are skipped without error.
    pub fn tick(&mut self, ga: &GaConfig, world: &WorldConfig, target: &Target) {
        if self.termination.is_some() {
            return;
        }
        if self.fuel == 0 {
            self.termination = Some(Termination::ExhaustedFuel);
            return;
        }
        if self.tick_index >= self.genome.len() {
            self.termination = Some(Termination::TickLimit);
            return;
        }

        let acceleration = self.genome.genes()[self.tick_index];
        self.velocity = ((self.velocity + acceleration).limit(ga.max_velocity))
            * ga.velocity_damping;
        self.position += self.velocity;
        self.fuel -= 1;
        self.tick_index += 1;

        if self.position.distance(target.position) <= target.radius {
            self.termination = Some(Termination::ReachedTarget);
        } else if !world.contains(self.position) {
            self.termination = Some(Termination::OutOfBounds);
        } else if self.fuel == 0 {
            self.termination = Some(Termination::ExhaustedFuel);
        } else if self.tick_index >= self.genome.len() {
            self.termination = Some(Termination::TickLimit);
        }
    }

    /// Forces termination with the given reason if still active, as when the
    /// generation tick budget runs out.
    pub fn force_terminate(&mut self, reason: Termination) {
        if self.termination.is_none() {
            self.termination = Some(reason);
        }
    }

    /// Scores the terminal state. Reaching the target earns the base reward
    /// plus a bonus per unit of unused fuel; flying out of bounds earns the
    /// penalty floor; everything else scores inverse distance to the target.
    /// Always finite and strictly positive.
    pub fn fitness(&self, target: &Target, fitness: &FitnessConfig) -> f64 {
        match self.termination {
            Some(Termination::ReachedTarget) => {
                fitness.target_reward + self.fuel as f64 * fitness.fuel_bonus_per_step
            }
            Some(Termination::OutOfBounds) => fitness.penalty_floor,
            _ => 1.0 / (self.position.distance(target.position) + fitness.epsilon),
        }
    }
}

/// The goal: a position and a capture radius. Owned by the world and
/// relocatable between ticks; read-only to rocket physics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub position: Vec2,
    pub radius: f64,
}
