pub mod csv_writer;
pub mod error;

// Re-export commonly used types
pub use csv_writer::{write_payments, write_progress, write_total};
pub use error::IoError;
