pub mod aggregator;
pub mod error;
pub mod partition;
pub mod progress;

// Re-export commonly used types
pub use aggregator::AggregationEngine;
pub use error::EngineError;
pub use partition::{Partition, chunk, partition};
pub use progress::{ProgressRecord, ProgressStream};
