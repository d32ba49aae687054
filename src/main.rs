use chrono::{Datelike, Utc};
use clap::Parser;
use rating_processor::{
    args::Args,
    database::db::DbClient,
    model::{eligibility::EligibilityMetadata, rating_updater::PlackettLuceModel, replay::ReplayModel}
};
use std::process::exit;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .with_writer(std::io::stderr)
        .init();

    let mut client = match DbClient::connect(&args.connection_string).await {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            error!("Application cannot start without a valid database connection");
            exit(1);
        }
    };

    let latest_data_date = match client.get_latest_data_date().await {
        Ok(date) => date,
        Err(e) => {
            error!("Failed to fetch the latest data date: {}", e);
            exit(1);
        }
    };

    let mut contests = match client.get_contests(latest_data_date).await {
        Ok(contests) => contests,
        Err(e) => {
            error!("Failed to fetch contests: {}", e);
            exit(1);
        }
    };

    let current_year = args.current_year.unwrap_or_else(|| Utc::now().year());
    let metadata = match EligibilityMetadata::load_from_dir(&args.metadata_dir, current_year) {
        Ok(metadata) => metadata,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };

    info!(
        "Replaying {} contests (latest data date {}, current year {})",
        contests.len(),
        latest_data_date,
        current_year
    );

    let mut model = ReplayModel::new(PlackettLuceModel::new(), metadata, latest_data_date, current_year);
    // The failing contest is logged by the model
    if model.process(&mut contests).is_err() {
        error!("Processing aborted, nothing was saved");
        exit(1);
    }

    let politicians = model.finish();

    if args.dry_run {
        info!("Dry run: skipping save of {} politicians", politicians.len());
        return;
    }

    if let Err(e) = client.save_results(&politicians, &contests).await {
        error!("Failed to save results, transaction rolled back: {}", e);
        exit(1);
    }

    info!("Processing complete");
}
