use serde::Serialize;

use crate::model::PersonDay;

/// fatal linker errors. per-segment problems are not errors; they are
/// collected as [`LinkingDiagnostic`] values so one bad segment cannot
/// block the rest of its person-day.
#[derive(thiserror::Error, Debug)]
pub enum LinkingError {
    #[error("invalid linking configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid mode hierarchy: {0}")]
    Ranking(#[from] crate::ranking::RankingError),
}

/// why a segment was excluded from linking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentFault {
    /// arrival timestamp precedes departure.
    ArriveBeforeDepart,
    /// origin or destination coordinate is NaN or infinite.
    NonFiniteCoordinate,
}

/// a segment excluded from linking, surfaced to the caller instead of
/// aborting the run.
#[derive(Debug, Clone, Serialize)]
pub struct LinkingDiagnostic {
    pub segment_id: u64,
    pub person_day: PersonDay,
    pub fault: SegmentFault,
}
