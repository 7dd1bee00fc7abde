mod accumulator;
mod config;
mod error;
mod link_ops;

pub use accumulator::SegmentAccumulator;
pub use config::LinkingConfig;
pub use error::{LinkingDiagnostic, LinkingError, SegmentFault};
pub use link_ops::{link_trips, LinkingOutcome};
