use chrono::NaiveDateTime;
use geo::Point;
use serde::{Deserialize, Serialize};

use super::{HalfTour, ModeType, PersonDay, PurposeCategory};

/// one complete, mode-coherent trip from the traveler's true origin
/// activity to true destination activity, merged across mode-transfer
/// waypoints.
///
/// constituent segments are exclusively owned and contiguous in per-day
/// sequence order; a linked trip never skips or reorders segments. the
/// `tour_id` and `half_tour` fields are `None` until the tour builder
/// runs, and are the only mutation a linked trip ever receives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedTrip {
    /// unique within a person: `day_id * 1000` plus the 1-based position
    /// of the trip within its day.
    pub linked_trip_id: u64,
    pub day_id: u64,
    pub person_id: u64,
    pub hh_id: u64,
    /// ids of the constituent raw segments, in sequence order.
    pub segment_ids: Vec<u64>,
    /// representative mode, chosen by the configured mode hierarchy over
    /// the constituent segments (not by time share).
    pub mode_type: ModeType,
    /// origin purpose of the first constituent segment.
    pub o_purpose: PurposeCategory,
    /// destination purpose of the last constituent segment.
    pub d_purpose: PurposeCategory,
    pub origin: Point<f64>,
    pub destination: Point<f64>,
    pub depart_time: NaiveDateTime,
    pub arrive_time: NaiveDateTime,
    /// sum of constituent segment distances.
    pub distance_meters: f64,
    /// sum of constituent segment durations plus inter-segment dwell.
    pub duration_minutes: f64,
    pub tour_id: Option<u64>,
    pub half_tour: Option<HalfTour>,
}

impl LinkedTrip {
    pub fn person_day(&self) -> PersonDay {
        PersonDay {
            person_id: self.person_id,
            day_id: self.day_id,
        }
    }

    pub fn sequence_key(&self) -> (NaiveDateTime, u64) {
        (self.depart_time, self.linked_trip_id)
    }
}
