use serde::Serialize;

use crate::model::PersonDay;

/// fatal tour builder errors. day-level anomalies are not errors; they
/// are collected as [`TourDiagnostic`] values and the affected day
/// yields zero tours.
#[derive(thiserror::Error, Debug)]
pub enum TourError {
    #[error("invalid tour configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid mode hierarchy: {0}")]
    Ranking(#[from] crate::ranking::RankingError),
}

/// a person-day the tour builder could not anchor, surfaced to the
/// caller instead of guessing a synthetic home.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TourDiagnostic {
    /// no household home location could be resolved for the person-day;
    /// the day yields zero tours.
    MissingHomeAnchor { person_day: PersonDay },
}
