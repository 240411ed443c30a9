//! essaygrade CLI, the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "essaygrade",
    version,
    about = "Deterministic five-competency ENEM essay scoring"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a single essay
    Grade {
        /// Essay text file (reads stdin when omitted)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Rubric TOML used to display the criteria
        #[arg(long)]
        rubric: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade every .txt essay in a directory
    Batch {
        /// Directory containing .txt essays
        #[arg(long)]
        dir: PathBuf,

        /// Max concurrent essays (default from config)
        #[arg(long)]
        parallelism: Option<usize>,

        /// Output directory (default from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Rubric TOML used to display the criteria
        #[arg(long)]
        rubric: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two grading reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Grade change in points tolerated before flagging
        #[arg(long, default_value = "0")]
        threshold: f64,

        /// Exit code 1 if regressions found
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate vocabulary and rubric TOML files
    Validate {
        /// Vocabulary file to check
        #[arg(long)]
        vocabulary: Option<PathBuf>,

        /// Rubric file to check
        #[arg(long)]
        rubric: Option<PathBuf>,
    },

    /// Create a starter config and an editable vocabulary
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("essaygrade=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            file,
            format,
            rubric,
            config,
        } => commands::grade::execute(file, format, rubric, config),
        Commands::Batch {
            dir,
            parallelism,
            output,
            rubric,
            config,
        } => commands::batch::execute(dir, parallelism, output, rubric, config).await,
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_regression, format),
        Commands::Validate { vocabulary, rubric } => commands::validate::execute(vocabulary, rubric),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
