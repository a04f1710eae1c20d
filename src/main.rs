mod commands;

use clap::{Args, Parser, Subcommand};
use flatpack::config::parse_bool;
use flatpack::error::Result;
use flatpack::logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flatpack")]
#[command(version)]
#[command(
    about = "Flatten Git working files into a single text stream with a tree header",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    args: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview redaction decisions (no file bodies, no hashing)
    Plan(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Path to the Git repository (default: current directory)
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Include untracked files, respecting .gitignore (default: true).
    /// Use --include-untracked=false or --include-untracked false to disable.
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = parse_bool
    )]
    include_untracked: Option<bool>,
}

fn main() {
    logging::init();

    if let Err(e) = run() {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Plan(args)) => commands::plan(
            &args.repo,
            args.output.as_deref(),
            args.include_untracked,
        ),
        None => commands::dump(
            &cli.args.repo,
            cli.args.output.as_deref(),
            cli.args.include_untracked,
        ),
    }
}
