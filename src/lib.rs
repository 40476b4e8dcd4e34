//! Darwin's Rockets: a genetic-algorithm engine that evolves a population of
//! rocket agents toward a spatial target.
//!
//! Each rocket's behavior is encoded as a fixed-length sequence of 2D thrust
//! vectors (its DNA). A generation spawns one rocket per genome, integrates
//! the DNA into a trajectory tick by tick, scores every terminal state, and
//! breeds the next generation by fitness-weighted selection, crossover, and
//! mutation.
//!
//! The crate is the headless core only: rendering and input layers consume
//! [`world::World`] through `tick`, `rocket_snapshots`, and the generation
//! signals, and feed back target relocations and restart commands.

pub mod config;
pub mod evolution;
pub mod rocket;
pub mod vec2;
pub mod world;
