use clap::{Parser, Subcommand};

use crate::domain::AccountId;

/// Chunk size used by `progress` when `--unit-size` is not given
pub const DEFAULT_PROGRESS_UNIT: usize = 1_000_000;

/// Run parallel aggregations over a seeded in-memory ledger
#[derive(Parser, Debug)]
#[command(name = "ledger-agg", version)]
pub struct CliArgs {
    /// Number of accounts to register
    #[arg(long, default_value_t = 1)]
    pub accounts: usize,

    /// Number of payments to seed; amounts run 1..=payments, round-robin over accounts
    #[arg(long, default_value_t = 1_000)]
    pub payments: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Total of all payments
    Sum {
        #[arg(long, default_value_t = 4)]
        workers: usize,
    },

    /// Payments belonging to one account
    Filter {
        #[arg(long)]
        account: AccountId,

        #[arg(long, default_value_t = 4)]
        workers: usize,
    },

    /// Partial sums per chunk of payments
    Progress {
        #[arg(long, default_value_t = DEFAULT_PROGRESS_UNIT)]
        unit_size: usize,

        /// Capacity of the progress channel
        #[arg(long, default_value_t = 16)]
        buffer: usize,
    },
}
