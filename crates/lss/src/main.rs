//! Command-line search for a linear secret-sharing scheme realizing an
//! access structure.

use std::error::Error;
use std::process::ExitCode;
use std::thread;
use std::time::Instant;

use clap::Parser;
use console::style;
use lss::access_structure::AccessStructure;
use lss::config::CoordinatorConfig;
use lss::construction::Construction;
use lss::coordinator::{Coordinator, SearchOutcome};
use lss::parameters::SchemeParametersBuilder;
use lss::report::{OutputTarget, Report, RunOutcome};
use lss::search::SearchAlgorithm;
use lss::validator::Validator;
use tracing::Level;

/// Share sizes given as `1,2,1`, or as a single size for every participant.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ShareSizes(Vec<usize>);

fn parse_share_sizes(raw: &str) -> lss::Result<ShareSizes> {
    raw.split(',')
        .map(|size| {
            size.trim().parse::<usize>().map_err(|_| {
                lss::Error::UnspecifiedInput(format!("Invalid share size '{}' in '{}'", size, raw))
            })
        })
        .collect::<lss::Result<Vec<_>>>()
        .map(ShareSizes)
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of participants
    participants: usize,

    /// Share size of each participant, separated by commas, or a single
    /// share size for every participant
    #[arg(value_parser = parse_share_sizes)]
    parameters: ShareSizes,

    /// Order of the finite field, a prime power
    order: u64,

    /// Dimension of the secret
    k: usize,

    /// Minimal qualified sets, as letters (e.g. `ab bc`)
    #[arg(required = true)]
    minimal: Vec<String>,

    /// Seed of the random number generator (default: random)
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Fraction of the edges of the search tree to skip
    #[arg(short = 'S', long, default_value_t = 0.0)]
    skip: f64,

    /// Output file, `-` for the standard output
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Overwrite the output file if it exists
    #[arg(short, long)]
    force: bool,

    /// Be verbose
    #[arg(short, long)]
    verbose: bool,

    /// Search for a scheme realizing the dual access structure
    #[arg(short, long)]
    dual: bool,

    /// Number of worker threads (default: available parallelism)
    #[arg(short = 'P', long)]
    processors: Option<usize>,

    /// Capacity of the task queue
    #[arg(short = 'Q', long = "queuesize", default_value_t = 100)]
    queue_size: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("     error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode, Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .init();

    let input = AccessStructure::from_letters(args.participants, &args.minimal)?;
    let access_structure = if args.dual {
        input.dual()
    } else {
        input.clone()
    };
    let parameters = SchemeParametersBuilder::new()
        .set_access_structure(access_structure)
        .set_share_sizes(&args.parameters.0)
        .set_field_order(args.order)
        .set_secret_size(args.k)
        .build_arc()?;

    let workers = match args.processors {
        Some(workers) => workers,
        None => thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    let config = CoordinatorConfig::new(workers, args.queue_size, args.skip, seed)?
        .with_progress(args.verbose);
    let target = OutputTarget::resolve(&args.output, args.force)?;

    let algorithm = SearchAlgorithm::new(&parameters);
    if args.verbose {
        println!(
            "{} GF({})",
            style("     field:").magenta().bold(),
            parameters.field().order()
        );
        println!(
            "{} {}",
            style("    access:").magenta().bold(),
            parameters.access_structure()
        );
        println!(
            "{} {}",
            style("    height:").magenta().bold(),
            algorithm.height()
        );
        println!("{} {}", style("      seed:").magenta().bold(), seed);
    }

    let start = Instant::now();
    let outcome = match Coordinator::new(&algorithm, config.clone()).run()? {
        SearchOutcome::Found(candidates) => {
            let construction = Construction::assemble(&parameters, &candidates)?;
            match Validator::new(&parameters).validate(construction.matrix())? {
                None => RunOutcome::Valid(construction),
                Some(violation) => RunOutcome::Invalid(construction, violation),
            }
        }
        SearchOutcome::Exhausted => RunOutcome::Exhausted,
    };
    let elapsed = start.elapsed();

    Report::new(&parameters, &input, &config, args.dual, elapsed, &outcome).write_to(&target)?;

    match &outcome {
        RunOutcome::Valid(_) => {
            if target != OutputTarget::Stdout {
                println!(
                    "{} saved to {}",
                    style("construction:").green().bold(),
                    target
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::Invalid(_, violation) => {
            eprintln!(
                "{} A construction was found but failed validation: {}",
                style("     error:").red().bold(),
                violation
            );
            Ok(ExitCode::FAILURE)
        }
        RunOutcome::Exhausted => {
            eprintln!(
                "{} No construction exists for these parameters.",
                style("     error:").red().bold()
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_share_sizes, Args, ShareSizes};
    use clap::Parser;

    #[test]
    fn parses_share_sizes_per_participant() {
        let args = Args::try_parse_from(["linear-construction", "3", "1,1,1", "2", "1", "ab", "bc"])
            .unwrap();
        assert_eq!(args.participants, 3);
        assert_eq!(args.parameters, ShareSizes(vec![1, 1, 1]));
        assert_eq!(args.order, 2);
        assert_eq!(args.k, 1);
        assert_eq!(args.minimal, vec!["ab", "bc"]);
        assert!(!args.dual);
        assert_eq!(args.output, "-");
    }

    #[test]
    fn parses_broadcast_share_size_and_options() {
        let args = Args::try_parse_from([
            "linear-construction",
            "3",
            "2",
            "5",
            "2",
            "ab",
            "bc",
            "ac",
            "-d",
            "-S",
            "0.5",
            "-s",
            "7",
            "-o",
            "out.txt",
            "-P",
            "4",
            "-Q",
            "10",
        ])
        .unwrap();
        assert_eq!(args.parameters, ShareSizes(vec![2]));
        assert_eq!(args.order, 5);
        assert_eq!(args.k, 2);
        assert_eq!(args.minimal, vec!["ab", "bc", "ac"]);
        assert!(args.dual);
        assert_eq!(args.skip, 0.5);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.output, "out.txt");
        assert_eq!(args.processors, Some(4));
        assert_eq!(args.queue_size, 10);
    }

    #[test]
    fn rejects_malformed_invocations() {
        assert!(Args::try_parse_from(["linear-construction", "3", "1,x", "2", "1", "ab"]).is_err());
        assert!(Args::try_parse_from(["linear-construction", "3", "1", "2", "1"]).is_err());
        assert!(parse_share_sizes("1,,2").is_err());
        assert_eq!(parse_share_sizes("1, 2").unwrap(), ShareSizes(vec![1, 2]));
    }
}
