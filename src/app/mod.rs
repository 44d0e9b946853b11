pub mod cli;
pub mod config;
pub mod error;
pub mod seed;

// Re-export commonly used types
pub use cli::CliApp;
pub use config::{CliArgs, Command, DEFAULT_PROGRESS_UNIT};
pub use error::AppError;
pub use seed::seed_ledger;
