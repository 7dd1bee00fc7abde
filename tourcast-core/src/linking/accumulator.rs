use crate::model::{LinkedTrip, RawTripSegment};
use crate::ranking::ModeHierarchy;

/// builds one linked trip from a run of contiguous segments. segments are
/// appended in per-day sequence order; callers decide when a run ends via
/// the continuation predicate.
#[derive(Debug)]
pub struct SegmentAccumulator {
    segments: Vec<RawTripSegment>,
}

impl SegmentAccumulator {
    pub fn new(first: RawTripSegment) -> SegmentAccumulator {
        SegmentAccumulator {
            segments: vec![first],
        }
    }

    pub fn push(&mut self, segment: RawTripSegment) {
        self.segments.push(segment);
    }

    pub fn last(&self) -> &RawTripSegment {
        // invariant: never empty, constructed with a first segment
        &self.segments[self.segments.len() - 1]
    }

    /// derives the linked trip: origin fields from the first segment,
    /// destination fields from the last, representative mode from the
    /// hierarchy, distance and duration summed over constituents plus
    /// inter-segment dwell.
    pub fn finalize(self, linked_trip_id: u64, hierarchy: &ModeHierarchy) -> LinkedTrip {
        let first = &self.segments[0];
        let last = &self.segments[self.segments.len() - 1];

        let mode_type = hierarchy
            .dominant(self.segments.iter().map(|s| s.mode_type))
            .unwrap_or(first.mode_type);

        let distance_meters: f64 = self.segments.iter().map(|s| s.distance_meters).sum();

        let mut duration_minutes: f64 = self.segments.iter().map(|s| s.duration_minutes).sum();
        for pair in self.segments.windows(2) {
            let dwell = pair[1].depart_time - pair[0].arrive_time;
            duration_minutes += (dwell.num_seconds().max(0) as f64) / 60.0;
        }

        LinkedTrip {
            linked_trip_id,
            day_id: first.day_id,
            person_id: first.person_id,
            hh_id: first.hh_id,
            segment_ids: self.segments.iter().map(|s| s.segment_id).collect(),
            mode_type,
            o_purpose: first.o_purpose,
            d_purpose: last.d_purpose,
            origin: first.origin,
            destination: last.destination,
            depart_time: first.depart_time,
            arrive_time: last.arrive_time,
            distance_meters,
            duration_minutes,
            tour_id: None,
            half_tour: None,
        }
    }
}
