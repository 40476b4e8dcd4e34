use darwin_rockets::config::Config;
use darwin_rockets::world::World;
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();
    log::info!("Booting Darwin's Rockets...");

    // 1. Load and validate configuration
    let config = match Config::load(Path::new("config.toml")) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = config.validate() {
        log::error!("Invalid configuration: {}", e);
        process::exit(1);
    }
    log::info!("Configuration loaded and validated.");

    let num_generations = config.ga.num_generations;

    // 2. Build the world (spawns generation 0)
    let mut world = match World::new(config) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to construct world: {}", e);
            process::exit(1);
        }
    };

    // 3. Run the evolution headlessly
    log::info!("--- Starting Evolution ({} generations) ---", num_generations);
    while world.generation_index() < num_generations as u64 {
        world.step();
    }

    // 4. Final report
    let stats = *world.stats();
    log::info!("--- Evolution Complete ---");
    println!(
        "Ran {} generations: best fitness {:.4}, best distance {:.1}, {} rockets reached the target in total",
        world.generation_index(),
        stats.best_fitness_all_time,
        stats.best_distance,
        stats.total_reached_target
    );
}
