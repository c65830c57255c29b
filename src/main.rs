//! Lit CLI - tangles literate documents into source files.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lit")]
#[command(version, about = "Reconstructs source files from literate documents", long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Put the generated files in DIR
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out: PathBuf,

    /// Verbose output
    #[arg(long)]
    verbose: bool,

    /// Print version
    #[arg(
        short = 'v',
        long = "version",
        action = clap::ArgAction::Version,
        value_parser = clap::value_parser!(bool)
    )]
    version: Option<bool>,

    /// Literate source document
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match lit::tangle_file(&cli.file, &cli.out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
