use clap::Parser;

use log::{error, info};

use labelme2yolo_seg::{process_dataset, Args};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!("Starting the conversion process...");

    match process_dataset(&args) {
        Ok(summary) => {
            summary.print_summary();
            info!("Conversion process completed successfully.");
        }
        Err(e) => {
            error!("Failed to process dataset: {}", e);
            std::process::exit(1);
        }
    }
}
