mod availability;
mod calendar;
mod catalog;
mod config;
mod connectivity;
mod error;
mod grid;
mod outage;
mod report;
mod storage;
mod types;

use chrono::Local;
use std::process::ExitCode;
use tracing::{debug, info, warn};

use crate::error::UpdateError;
use crate::report::{ReportWriter, WrittenReport};

#[tokio::main]
async fn main() -> ExitCode {
    // Inicializa o sistema de logging (tracing)
    tracing_subscriber::fmt::init();

    println!("--------------------- Service Availability Update Tool ---------------------");
    println!("\nThis tool will update the service availability data for the previous month.");
    println!("This tool will also create a backup of the current data.");
    println!("\nPlease make sure you are connected to VPN before updating.\n");

    match run().await {
        Ok(written) => {
            println!("Backup written to {}", written.backup.display());
            println!("Data available at {}", written.report.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Uma execução completa: nada é gravado se qualquer etapa anterior à escrita falhar.
async fn run() -> Result<WrittenReport, UpdateError> {
    // Sem VPN nada mais é lido: a verificação vem antes das credenciais.
    let locations = config::Locations::load()?;
    let catalog_path = locations.catalog_path();
    connectivity::check_share_reachable(&catalog_path)?;

    let db = config::DbSettings::load()?;
    debug!("{:?}", db);

    let catalog = catalog::load_catalog(&catalog_path)?;
    info!("{} serviços no catálogo", catalog.len());

    let store = storage::OutageStore::connect(&db).await?;
    let outages = store.fetch_outages().await?;
    info!("{} outages recuperados do banco de dados", outages.len());

    let now = Local::now().naive_local();
    let records = availability::build_report(&catalog, &outages, now.date());
    for anomaly in availability::anomalies(&records) {
        warn!(
            "Outage maior que o mês: {} {}-{:02} ({:.1} de {} minutos)",
            anomaly.service, anomaly.year, anomaly.month, anomaly.outage_mins, anomaly.month_mins
        );
    }
    println!("Records collected");

    let writer = ReportWriter::new(locations.report_path(), locations.backup_path());
    let written = writer.write(&records, now)?;

    if locations.open_folder {
        println!("Opening data folder...");
        report::open_report_folder(&locations.share_dir);
    }
    Ok(written)
}
