//! Cohort command-line interface

use clap::{Parser, Subcommand};
use cohort::cli::{output, run, show};
use std::path::PathBuf;

/// Cohort command-line tool
#[derive(Parser)]
#[command(name = "cohort")]
#[command(author, version, about = "Filtered cohort join over clinical CSV datasets", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (table, json, csv)
    #[arg(short = 'f', long, global = true)]
    format: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, filter and join the datasets
    Run {
        /// Configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Dataset base location, prefixed to `<name>.csv` (http(s)://, file:// or a path)
        #[arg(short, long = "base-url")]
        base_url: Option<String>,

        /// Fixed run clock, in the configured timestamp pattern
        #[arg(long)]
        now: Option<String>,

        /// Print at most this many rows
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Load one dataset and print its schema and first rows
    Show {
        /// Dataset name, e.g. patients
        dataset: String,

        /// Configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Dataset base location, prefixed to `<name>.csv` (http(s)://, file:// or a path)
        #[arg(short, long = "base-url")]
        base_url: Option<String>,

        /// Number of rows to print
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(&cli.color);

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Commands::Run {
            config,
            base_url,
            now,
            limit,
        } => {
            let config = run::RunConfig {
                config,
                base_url,
                now,
                limit,
                verbose: cli.verbose,
                output_format: cli.format.clone(),
                output_file: cli.output.clone(),
            };
            run::run(config).await
        }

        Commands::Show {
            dataset,
            config,
            base_url,
            limit,
        } => {
            let config = show::ShowConfig {
                dataset,
                config,
                base_url,
                limit,
                verbose: cli.verbose,
                output_format: cli.format.clone(),
                output_file: cli.output.clone(),
            };
            show::show(config).await
        }
    };

    if let Err(e) = result {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}
