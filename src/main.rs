use clap::Parser;
use log::{error, info};

use egg2yolo::{process_dataset, Args};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!("Starting the conversion process...");
    info!("Output directory: {}", args.output.display());

    // Per-image failures are already counted; only setup and manifest errors land here
    if let Err(e) = process_dataset(&args) {
        error!("Failed to process dataset: {}", e);
    }
}
