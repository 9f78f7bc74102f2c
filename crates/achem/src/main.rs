use achem::{AppConfig, AsciiRenderer, Evolution, ScenarioDefinition, random_soup};
use achem_core::TickCounters;
use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of ticks to simulate
    #[arg(long, default_value = "1000")]
    ticks: u64,

    /// RNG seed (overrides configuration)
    #[arg(long)]
    seed: Option<u64>,

    /// Grid side length (overrides configuration)
    #[arg(long)]
    size: Option<i32>,

    /// RON scenario file; a random soup is generated when omitted
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Print the grid every N ticks (0 disables printing)
    #[arg(long)]
    render_every: Option<u64>,

    /// Disable rule table mutation
    #[arg(long)]
    no_evolution: bool,
}

impl Args {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(seed) = self.seed {
            config.simulation.seed = seed;
        }
        if let Some(size) = self.size {
            config.simulation.grid_size = size;
        }
        if let Some(every) = self.render_every {
            config.output.render_every = every;
        }
        if self.no_evolution {
            config.evolution.enabled = false;
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = AppConfig::load()?;
    args.apply(&mut config);
    config.simulation.validate()?;

    log::info!(
        "Starting achem: {} ticks, seed {}",
        args.ticks,
        config.simulation.seed
    );

    let mut rng = Xoshiro256StarStar::seed_from_u64(config.simulation.seed);
    let sim = match &args.scenario {
        Some(path) => ScenarioDefinition::from_file(path)?.build(&config.simulation)?,
        None => random_soup(&config, &mut rng)?,
    };
    let mut sim = sim.with_renderer(AsciiRenderer::stdout(
        config.output.render_every,
        config.output.show_states,
    ));

    let evolution = Evolution::from_config(&config.evolution);
    let mut counters = TickCounters::default();

    for _ in 0..args.ticks {
        sim.tick(&mut counters, &mut rng);
        evolution.step(&mut sim, &mut rng, &mut counters)?;
    }

    log::info!(
        "Finished {} ticks: {} moves ({} rejected), {} reactions, {} mutations",
        sim.ticks(),
        counters.atoms_moved,
        counters.moves_rejected,
        counters.reactions,
        counters.mutations
    );
    log::info!(
        "{} rules catalysed by enzymes at the end of the run",
        sim.map().enzyme_index().len()
    );

    Ok(())
}
