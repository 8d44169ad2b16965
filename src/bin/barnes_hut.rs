use std::path::PathBuf;

use barnes_hut_2d::{
    loader::load_universe,
    scenario::{collision_universe, galaxy_universe, is_frame, Scenario},
    BarnesHut, Execution, Simulation, Universe, Vector,
};
use clap::Parser;
use color_eyre::eyre::Result;
use rand::{rngs::StdRng, SeedableRng};

#[derive(Parser, Debug)]
#[command(about = "2D Barnes-Hut gravity simulation")]
struct Args {
    scenario: Scenario,

    /// Number of generations to simulate.
    #[arg(long)]
    generations: Option<usize>,
    #[arg(long)]
    time_step: Option<f64>,
    #[arg(long)]
    theta: Option<f64>,
    /// Keep every n-th generation as a frame.
    #[arg(long)]
    frequency: Option<usize>,

    /// Body file for the Jupiter scenario.
    #[arg(long, default_value = "data/jupiter_moons.txt")]
    input: PathBuf,

    /// Compute forces with this many threads.
    #[arg(long, conflicts_with = "rayon")]
    threads: Option<usize>,
    #[arg(long)]
    rayon: bool,

    /// Seed for the galaxy scenarios.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let mut parameters = args.scenario.parameters();
    if let Some(generations) = args.generations {
        parameters.num_generations = generations;
    }
    if let Some(time_step) = args.time_step {
        parameters.time_step = time_step;
    }
    if let Some(theta) = args.theta {
        parameters.theta = theta;
    }
    if let Some(frequency) = args.frequency {
        parameters.frequency = frequency;
    }
    parameters.validate()?;

    let execution = match (args.threads, args.rayon) {
        (Some(num_threads), _) => Execution::threads(num_threads)?,
        (None, true) => rayon_execution()?,
        (None, false) => Execution::SingleThreaded,
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut simulation = Simulation::new(BarnesHut::new(parameters.theta)).execution(execution);
    let initial = match args.scenario {
        Scenario::Jupiter => {
            let loaded = load_universe(&args.input)?;
            println!(
                "Loaded {} bodies from {}.",
                loaded.universe.len(),
                args.input.display()
            );
            for (name, body) in loaded.names.iter().zip(loaded.universe.bodies()) {
                println!(
                    "{name}: position ({:.2}, {:.2}), velocity ({:.2}, {:.2}), mass {:.3e}, radius {:.2}",
                    body.position.x,
                    body.position.y,
                    body.velocity.x,
                    body.velocity.y,
                    body.mass,
                    body.radius
                );
            }

            simulation = simulation.gravitational_constant(loaded.gravitational_constant);
            loaded.universe
        }
        Scenario::Galaxy => galaxy_universe(&mut rng, parameters.width),
        Scenario::Collision => collision_universe(&mut rng, parameters.width),
    };

    println!(
        "{:?}: {} bodies, width {:.3e}, {} generations, time step {:.3e}, theta {}",
        args.scenario,
        initial.len(),
        initial.width(),
        parameters.num_generations,
        parameters.time_step,
        parameters.theta
    );

    let num_generations = parameters.num_generations;
    let report_every = (num_generations / 10).max(1);

    let mut accelerations = vec![Vector::zeros(); initial.len()];
    let mut frames = vec![initial.clone()];
    let mut current = initial;
    for generation in 1..=num_generations {
        current = simulation.step(&current, parameters.time_step, &mut accelerations);

        if is_frame(generation, parameters.frequency)? {
            frames.push(current.clone());
        }
        if generation % report_every == 0 {
            println!("{generation} out of {num_generations} generations done.");
        }
    }

    for (i, frame) in frames.iter().enumerate() {
        print_frame(i * parameters.frequency, frame);
    }

    Ok(())
}

fn print_frame(generation: usize, frame: &Universe) {
    let inside = frame
        .bodies()
        .iter()
        .filter(|body| frame.contains(&body.position))
        .count();

    match frame.center_of_mass() {
        Some((mass, center)) => println!(
            "generation {generation}: {inside}/{} bodies in domain, mass {mass:.3e} at ({:.3e}, {:.3e})",
            frame.len(),
            center.x,
            center.y
        ),
        None => println!(
            "generation {generation}: no bodies in domain out of {}",
            frame.len()
        ),
    }
}

#[cfg(feature = "rayon")]
fn rayon_execution() -> Result<Execution> {
    Ok(Execution::RayonIter)
}

#[cfg(not(feature = "rayon"))]
fn rayon_execution() -> Result<Execution> {
    color_eyre::eyre::bail!("--rayon requires the `rayon` feature")
}
