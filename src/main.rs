use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use taxicab::config::DEFAULT_STRIDE;
use taxicab::report::group_thousands;
use taxicab::{Config, Engine, Strategy};

/// Count the numbers up to a bound that are a sum of two cubes in two or
/// more ways
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Inclusive upper bound
    bound: u64,

    /// Width of each segment processed per pass
    #[arg(long, default_value_t = DEFAULT_STRIDE)]
    stride: u64,

    /// Hash-table bucket count (power of two); derived from the stride if
    /// omitted
    #[arg(long)]
    buckets: Option<usize>,

    /// How each segment's sums are aggregated
    #[arg(long, value_enum, default_value_t = StrategyArg::Hash)]
    strategy: StrategyArg,

    /// Process segments on all cores
    #[cfg(feature = "parallel")]
    #[arg(long)]
    parallel: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Hash,
    Sort,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Hash => Strategy::Hash,
            StrategyArg::Sort => Strategy::Sort,
        }
    }
}

impl Args {
    fn config(&self) -> Config {
        let config = Config::default()
            .with_stride(self.stride)
            .with_strategy(self.strategy.into());
        match self.buckets {
            Some(buckets) => config.with_bucket_count(buckets),
            None => config,
        }
    }
}

/// Label and size of the per-segment storage shown in the header
fn storage_line(config: &Config, bound: u64) -> (&'static str, usize) {
    match config.strategy {
        Strategy::Hash => ("table size", config.bucket_count_for(bound)),
        Strategy::Sort => ("buffer size", config.expected_sums(bound)),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = args.config();
    let engine = Engine::new(config.clone()).context("invalid configuration")?;

    let (storage, size) = storage_line(&config, args.bound);
    println!(
        "finding all ramanujan numbers up to {}\n\
         using the following configuration:\n  \
         strategy: {:>11}\n  \
         {:>11}: {:>9}\n      \
         stride: {:>9}",
        group_thousands(args.bound),
        config.strategy,
        storage,
        group_thousands(size as u64),
        group_thousands(config.stride),
    );

    let start = Instant::now();

    #[cfg(feature = "parallel")]
    let report = if args.parallel {
        engine.run_parallel(args.bound)
    } else {
        engine.run(args.bound)
    };
    #[cfg(not(feature = "parallel"))]
    let report = engine.run(args.bound);

    let report = report.with_context(|| format!("counting up to {} failed", args.bound))?;
    let elapsed = start.elapsed();

    println!("{}", report);
    println!("     elapsed = {:>13.3} s", elapsed.as_secs_f64());

    Ok(())
}
