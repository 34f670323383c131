//! Services for loading, storing and aggregating the symptom log

pub mod aggregator;
pub mod store;
pub mod tally;

pub use aggregator::Aggregator;
pub use store::LogStore;
pub use tally::Tally;
