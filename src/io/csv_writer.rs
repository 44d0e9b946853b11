use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::error::IoError;
use crate::domain::{Money, Payment};
use crate::engine::ProgressRecord;

#[derive(Serialize)]
struct TotalRow {
    workers: usize,
    total: Money,
}

/// Serialize rows with a header line and write them to an async writer
async fn write_rows<T, W>(rows: impl IntoIterator<Item = T>, mut writer: W) -> Result<(), IoError>
where
    T: Serialize,
    W: AsyncWrite + Unpin + Send,
{
    let mut csv_writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        csv_writer.serialize(row)?;
    }
    let buffer = csv_writer
        .into_inner()
        .map_err(|e| IoError::Io(e.into_error()))?;

    writer.write_all(&buffer).await?;
    writer.flush().await?;
    Ok(())
}

/// Write progress records as `items_processed,partial_sum` CSV
pub async fn write_progress<W>(records: &[ProgressRecord], writer: W) -> Result<(), IoError>
where
    W: AsyncWrite + Unpin + Send,
{
    if records.is_empty() {
        return write_header("items_processed,partial_sum", writer).await;
    }
    write_rows(records, writer).await
}

/// Write payments as `id,account_id,amount,category,status` CSV
pub async fn write_payments<W>(payments: &[Payment], writer: W) -> Result<(), IoError>
where
    W: AsyncWrite + Unpin + Send,
{
    if payments.is_empty() {
        return write_header("id,account_id,amount,category,status", writer).await;
    }
    write_rows(payments, writer).await
}

/// Write a single `workers,total` row
pub async fn write_total<W>(workers: usize, total: Money, writer: W) -> Result<(), IoError>
where
    W: AsyncWrite + Unpin + Send,
{
    write_rows([TotalRow { workers, total }], writer).await
}

// csv only emits headers alongside the first record
async fn write_header<W>(header: &str, mut writer: W) -> Result<(), IoError>
where
    W: AsyncWrite + Unpin + Send,
{
    writer.write_all(header.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
