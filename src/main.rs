use clap::{Args, Parser, Subcommand};
use dla_generator::config::AppConfig;
use dla_generator::sampler::{metropolis_hastings, normal_pdf};
use dla_generator::{braille, render, AggregationEngine, Termination};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dla-generator")]
#[command(about = "Diffusion-Limited Aggregation grid generator")]
struct Cli {
    /// JSON config file (defaults to the user config dir if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Grow an aggregate and write it out
    Grow(GrowArgs),
    /// Draw samples from a standard normal with Metropolis-Hastings
    Sample(SampleArgs),
}

#[derive(Args, Debug)]
struct GrowArgs {
    // === Simulation Parameters ===
    /// Side length of the square field
    #[arg(short = 'n', long)]
    size: Option<usize>,

    /// Random seed for a reproducible run
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Stop after this many particles even if the field is not filled
    #[arg(long = "max-attempts")]
    max_attempts: Option<u64>,

    /// Random walk steps per particle
    #[arg(long = "walk-steps")]
    walk_steps: Option<usize>,

    /// Radius of the entry circle before any growth
    #[arg(long = "initial-radius")]
    initial_radius: Option<f64>,

    // === Output ===
    /// Write the final grid as a grayscale PNG
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Write an animated GIF of the growth
    #[arg(long)]
    gif: Option<PathBuf>,

    /// Print a Braille preview to stdout
    #[arg(long, default_value = "false")]
    preview: bool,

    /// Maximum preview width in characters
    #[arg(long = "preview-width", default_value = "80")]
    preview_width: usize,

    /// Save the effective configuration to this file
    #[arg(long = "save-config")]
    save_config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SampleArgs {
    /// Number of samples to draw
    #[arg(short = 'c', long, default_value = "10000")]
    count: usize,

    /// Half-width of the uniform jump proposal
    #[arg(long)]
    alpha: Option<f64>,

    /// Accepted samples to discard before output
    #[arg(long)]
    burn: Option<usize>,

    /// Random seed
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Print every sample as a JSON array instead of a summary
    #[arg(long, default_value = "false")]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so previews and samples can be piped
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Grow(args) => grow(config, args),
        Command::Sample(args) => sample(config, args),
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn grow(mut config: AppConfig, args: GrowArgs) -> Result<(), Box<dyn std::error::Error>> {
    // CLI flags override the config file
    if let Some(size) = args.size {
        config.size = size;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.max_attempts.is_some() {
        config.simulation.max_particle_attempts = args.max_attempts;
    }
    if let Some(steps) = args.walk_steps {
        config.simulation.max_walk_steps = steps;
    }
    if let Some(radius) = args.initial_radius {
        config.simulation.initial_radius = radius;
    }

    if let Some(path) = &args.save_config {
        config.save_to_file(path)?;
        info!(path = %path.display(), "Saved config");
    }

    info!(
        size = config.size,
        seed = ?config.seed,
        walk_steps = config.simulation.max_walk_steps,
        "Growing aggregate"
    );

    let mut engine = AggregationEngine::new(
        config.size,
        config.simulation.clone(),
        seeded_rng(config.seed),
    )?;
    let stats = engine.run();
    let (grid, _, attachments) = engine.into_parts();

    if let Some(path) = &args.output {
        render::save_png(&grid, path, &config.render)?;
        info!(path = %path.display(), "Saved PNG");
    }
    if let Some(path) = &args.gif {
        render::save_growth_gif(grid.size(), &attachments, path, &config.render)?;
        info!(path = %path.display(), attachments = attachments.len(), "Saved growth GIF");
    }
    if args.preview {
        for line in braille::render_to_braille(&grid, args.preview_width) {
            println!("{}", line);
        }
    }

    let status = match stats.termination {
        Termination::BoundaryReached => "complete",
        Termination::AttemptLimit => "stopped at attempt limit",
    };
    println!(
        "{}: {} cells occupied, radius {:.2}, {} particles released ({} stuck, {} escaped, {} exhausted)",
        status,
        grid.occupied_count(),
        grid.radius(),
        stats.attempts,
        stats.particles_stuck,
        stats.escaped,
        stats.exhausted
    );
    Ok(())
}

fn sample(mut config: AppConfig, args: SampleArgs) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(alpha) = args.alpha {
        config.sampler.alpha = alpha;
    }
    if let Some(burn) = args.burn {
        config.sampler.burn = burn;
    }

    let mut rng = seeded_rng(args.seed.or(config.seed));
    let samples = metropolis_hastings(
        |x| normal_pdf(x, 0.0, 1.0),
        args.count,
        &config.sampler,
        &mut rng,
    )?;

    if args.json {
        println!("{}", serde_json::to_string(&samples)?);
        return Ok(());
    }

    let n = samples.len().max(1) as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    println!(
        "{} samples (alpha {}, burn {}): mean {:.4}, std {:.4}",
        samples.len(),
        config.sampler.alpha,
        config.sampler.burn,
        mean,
        variance.sqrt()
    );
    Ok(())
}
