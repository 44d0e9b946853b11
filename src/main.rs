use std::sync::Arc;

use clap::Parser;
use futures::StreamExt;
use tokio::io::{BufWriter, Stdout};
use tracing::info;

use ledger_agg::prelude::*;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    if let Err(e) = setup_logging() {
        eprintln!("{e}");
    }

    CliApp::new("ledger-agg")
        .run(|writer| run_aggregation(writer, args))
        .await
}

/// Seed a ledger, run the requested aggregation and write the CSV report
async fn run_aggregation(mut writer: BufWriter<Stdout>, args: CliArgs) -> Result<(), AppError> {
    let ledger = Arc::new(seed_ledger(args.accounts, args.payments)?);
    let engine = AggregationEngine::new(Arc::clone(&ledger));

    match args.command {
        Command::Sum { workers } => {
            let total = engine.sum_payments(workers).await;
            info!(workers, total = total.minor(), "Sum complete");
            write_total(workers, total, &mut writer).await?;
        }
        Command::Filter { account, workers } => {
            let payments = engine.filter_payments(account, workers).await?;
            info!(account, workers, matches = payments.len(), "Filter complete");
            write_payments(&payments, &mut writer).await?;
        }
        Command::Progress { unit_size, buffer } => {
            let mut stream = engine
                .with_progress_buffer(buffer)
                .sum_with_progress(unit_size);

            let mut records = Vec::with_capacity(stream.chunk_count());
            while let Some(record) = stream.next().await {
                info!(
                    items = record.items_processed,
                    partial_sum = record.partial_sum.minor(),
                    "Chunk complete"
                );
                records.push(record);
            }
            write_progress(&records, &mut writer).await?;
        }
    }

    Ok(())
}
