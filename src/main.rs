use clap::Parser;
use std::path::PathBuf;
use std::process::exit;
use tarback::backup::job::{run, RunOptions};
use tracing::error;
use tracing::Level;

/// Create a tar snapshot of the paths listed in a configuration file
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Location of config file
    configuration: PathBuf,

    /// Log configuration contents and the archiver command line
    #[arg(short, long)]
    verbose: bool,

    /// Print the archiver command instead of running it
    #[arg(long)]
    dry_run: bool,

    /// Only list existing snapshots
    #[arg(long)]
    list: bool,
}

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let options = RunOptions::builder()
        .dry_run(args.dry_run)
        .list_only(args.list)
        .build();

    match run(&args.configuration, options) {
        Ok(outcome) => exit(outcome.exit_code()),
        Err(e) => {
            error!("{e}");
            exit(1);
        }
    }
}
