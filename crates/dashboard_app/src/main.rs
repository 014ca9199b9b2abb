mod app;
mod effects;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

/// Media-mentions dashboard: process an uploaded CSV into chart panels with
/// generated insights, render the dashboard bundle, and optionally export it.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// CSV file of media-mention records to upload.
    input: PathBuf,

    /// Directory for the rendered dashboard bundle.
    #[arg(short, long, default_value = "out")]
    output_dir: PathBuf,

    /// Request a document export once the dashboard is ready.
    #[arg(long)]
    export: bool,

    /// Log destination: terminal, file, or both.
    #[arg(long, default_value = "terminal")]
    log: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::initialize(logging::destination_from_flag(&args.log));
    app::run(args.input, args.output_dir, args.export)
}
