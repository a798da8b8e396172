use clap::Parser;
use log::{error, info};

use egg2yolo::{analyze_dataset, StatsArgs};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = StatsArgs::parse();

    if !args.data.exists() {
        error!("The specified dataset directory does not exist: {}", args.data.display());
        return;
    }

    info!("Analysing dataset at {}...", args.data.display());
    match analyze_dataset(&args.data) {
        Ok(analysis) => analysis.print_report(),
        Err(e) => error!("Failed to analyse dataset: {}", e),
    }
}
