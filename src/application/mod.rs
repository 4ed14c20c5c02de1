// Application layer: aggregation use cases and the service the CLI drives.

mod aggregator;
pub mod error;
mod reporting;
mod service;

pub use aggregator::*;
pub use error::*;
pub use reporting::*;
pub use service::*;
