//! Lookup pipeline module

pub mod delay;
pub mod orchestrator;
pub mod traits;

pub use delay::DelayPolicy;
pub use orchestrator::{LookupOrchestrator, ProcessedRecords};
pub use traits::AddressSource;
