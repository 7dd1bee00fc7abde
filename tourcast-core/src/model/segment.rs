use chrono::NaiveDateTime;
use geo::Point;
use serde::{Deserialize, Serialize};

use super::{ModeType, PersonDay, PurposeCategory};

/// one reported trip leg from the survey instrument: a continuous,
/// single-mode movement. segments are read-only inputs to the trip linker
/// and are never persisted past linking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTripSegment {
    pub segment_id: u64,
    pub day_id: u64,
    pub person_id: u64,
    pub hh_id: u64,
    pub depart_time: NaiveDateTime,
    pub arrive_time: NaiveDateTime,
    pub origin: Point<f64>,
    pub destination: Point<f64>,
    pub o_purpose: PurposeCategory,
    pub d_purpose: PurposeCategory,
    pub mode_type: ModeType,
    pub distance_meters: f64,
    pub duration_minutes: f64,
}

impl RawTripSegment {
    pub fn person_day(&self) -> PersonDay {
        PersonDay {
            person_id: self.person_id,
            day_id: self.day_id,
        }
    }

    /// sort key establishing the per-day sequence position: depart time
    /// ascending, ties broken by segment id ascending. all downstream
    /// sequence-dependent logic relies on this ordering.
    pub fn sequence_key(&self) -> (NaiveDateTime, u64) {
        (self.depart_time, self.segment_id)
    }
}
