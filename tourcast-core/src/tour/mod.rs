mod anchor;
mod assembly;
mod attributes;
mod config;
mod error;
mod extract_ops;

pub use anchor::{AnchorContext, TourAnchor};
pub use assembly::{assemble_day, ProtoTour};
pub use attributes::{activity_durations, build_tour, TourBuild};
pub use config::{DistanceThresholds, SubtourPolicy, TourConfig};
pub use error::{TourDiagnostic, TourError};
pub use extract_ops::{extract_tours, TourExtractionOutcome};
