use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use log::{LevelFilter, info, warn};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use structopt::StructOpt;

use ste::{log::build_logger_for_verbosity, prelude::*};

#[derive(StructOpt, Default)]
enum Command {
    /// Exhaustive permutation search, only sensible for tiny instances
    Naive,
    /// Cutting-plane search driven by HiGHS with lazy subtour elimination
    #[default]
    Highs,
}

#[derive(StructOpt)]
struct Opts {
    /// Instance file ('p tsp <n>' header plus one 'x y' line per city);
    /// a random instance is generated if omitted
    #[structopt(short, long)]
    instance: Option<PathBuf>,

    /// Write the tour here instead of stdout
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// Which subtour to eliminate per round: shortest, longest or random
    #[structopt(short, long, default_value = "shortest")]
    policy: SelectionPolicy,

    /// Seed for instance generation and the random selection policy
    #[structopt(short, long, default_value = "1234")]
    seed: u64,

    /// Number of cities of the generated instance
    #[structopt(short = "n", long, default_value = "15")]
    nodes: NumNodes,

    /// Edge length of the square the generated cities live on
    #[structopt(long, default_value = "1000")]
    extent: f64,

    /// Abort each solver round after this many seconds
    #[structopt(short, long)]
    timeout: Option<u64>,

    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    #[structopt(subcommand)]
    cmd: Option<Command>,
}

fn load_instance(opts: &Opts) -> anyhow::Result<TspInstance> {
    if let Some(path) = &opts.instance {
        TspInstance::try_read_tsp_file(path)
            .with_context(|| format!("reading instance {}", path.display()))
    } else {
        info!(
            "generating random instance with {} cities (seed {})",
            opts.nodes, opts.seed
        );
        let mut rng = Pcg64Mcg::seed_from_u64(opts.seed);
        Ok(TspInstance::random_euclidean(&mut rng, opts.nodes, opts.extent))
    }
}

fn write_tour(tour: &Tour, path: &Option<PathBuf>) -> anyhow::Result<()> {
    if let Some(path) = path {
        tour.try_write_tour_file(path)?;
    } else {
        tour.try_write_tour(std::io::stdout().lock())?;
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    build_logger_for_verbosity(LevelFilter::Info, opts.verbose);

    let instance = load_instance(&opts)?;

    let tour = match opts.cmd.unwrap_or_default() {
        Command::Naive => {
            if instance.number_of_nodes() > 12 {
                warn!(
                    "naive search over {} cities will take a while",
                    instance.number_of_nodes()
                );
            }
            naive_solver(&instance)
        }
        Command::Highs => {
            let mut separator = SubtourSeparator::with_rng(
                opts.policy,
                Pcg64Mcg::seed_from_u64(opts.seed.wrapping_add(1)),
            );
            let tour = highs_tsp_solver(&instance, &mut separator, opts.timeout.map(Duration::from_secs))?;

            info!(
                "{} policy: {} incumbents seen, {} cuts added",
                separator.policy(),
                separator.num_callbacks(),
                separator.num_cuts()
            );
            tour
        }
    };

    info!("tour cost {:.3}", tour.cost());
    write_tour(&tour, &opts.output)?;

    Ok(())
}
