use itertools::Itertools;
use rayon::prelude::*;

use super::{LinkingConfig, LinkingDiagnostic, LinkingError, SegmentAccumulator, SegmentFault};
use crate::model::{LinkedTrip, PersonDay, RawTripSegment};
use crate::util::geo_ops;

/// result of linking a dataset: the linked trips in (person, day, depart)
/// order, plus per-segment exclusion diagnostics.
#[derive(Debug)]
pub struct LinkingOutcome {
    pub linked_trips: Vec<LinkedTrip>,
    pub diagnostics: Vec<LinkingDiagnostic>,
}

/// merges raw trip segments into mode-complete linked trips.
///
/// partitioning into (person, day) groups happens here: segments may
/// arrive in any order and are sorted by depart time with segment id as
/// tie-break, the ordering every downstream sequence rule depends on.
/// partitions are independent and processed in parallel.
///
/// malformed segments are excluded and reported in the outcome rather
/// than failing the run; only malformed configuration is fatal.
pub fn link_trips(
    segments: Vec<RawTripSegment>,
    config: &LinkingConfig,
) -> Result<LinkingOutcome, LinkingError> {
    config.validate()?;

    let n_segments = segments.len();
    let (valid, diagnostics) = screen_segments(segments);

    let partitions = partition_segments(valid);
    log::info!(
        "linking {} segments across {} person-day partitions",
        n_segments - diagnostics.len(),
        partitions.len()
    );

    let linked_trips: Vec<LinkedTrip> = partitions
        .into_par_iter()
        .map(|(_, day_segments)| link_person_day(day_segments, config))
        .flatten()
        .collect();

    log::info!(
        "linking complete: {} linked trips, {} segments excluded",
        linked_trips.len(),
        diagnostics.len()
    );
    Ok(LinkingOutcome {
        linked_trips,
        diagnostics,
    })
}

/// excludes segments the linker cannot reason about, recording a
/// diagnostic per exclusion (skip-and-record, never abort).
fn screen_segments(
    segments: Vec<RawTripSegment>,
) -> (Vec<RawTripSegment>, Vec<LinkingDiagnostic>) {
    let mut valid = Vec::with_capacity(segments.len());
    let mut diagnostics = Vec::new();
    for segment in segments {
        match segment_fault(&segment) {
            None => valid.push(segment),
            Some(fault) => {
                log::warn!(
                    "excluding segment {} from linking: {fault:?}",
                    segment.segment_id
                );
                diagnostics.push(LinkingDiagnostic {
                    segment_id: segment.segment_id,
                    person_day: segment.person_day(),
                    fault,
                });
            }
        }
    }
    (valid, diagnostics)
}

fn segment_fault(segment: &RawTripSegment) -> Option<SegmentFault> {
    if segment.arrive_time < segment.depart_time {
        return Some(SegmentFault::ArriveBeforeDepart);
    }
    if !geo_ops::is_finite_point(&segment.origin) || !geo_ops::is_finite_point(&segment.destination)
    {
        return Some(SegmentFault::NonFiniteCoordinate);
    }
    None
}

/// groups segments by (person, day), each group in per-day sequence
/// order, groups in ascending key order for deterministic output.
fn partition_segments(
    segments: Vec<RawTripSegment>,
) -> Vec<(PersonDay, Vec<RawTripSegment>)> {
    let sorted: Vec<RawTripSegment> = segments
        .into_iter()
        .sorted_by_key(|s| (s.person_day(), s.sequence_key()))
        .collect();
    let chunks = sorted.into_iter().chunk_by(|s| s.person_day());
    chunks
        .into_iter()
        .map(|(key, group)| (key, group.collect()))
        .collect()
}

/// the finite-state accumulator of one person-day: extend the open
/// accumulator while the continuation predicate holds, otherwise
/// finalize it and start a new one.
fn link_person_day(segments: Vec<RawTripSegment>, config: &LinkingConfig) -> Vec<LinkedTrip> {
    let mut runs: Vec<SegmentAccumulator> = Vec::new();
    let mut open: Option<SegmentAccumulator> = None;

    for segment in segments {
        match open.take() {
            None => open = Some(SegmentAccumulator::new(segment)),
            Some(mut accumulator) => {
                if continues(accumulator.last(), &segment, config) {
                    accumulator.push(segment);
                    open = Some(accumulator);
                } else {
                    runs.push(accumulator);
                    open = Some(SegmentAccumulator::new(segment));
                }
            }
        }
    }
    if let Some(accumulator) = open {
        runs.push(accumulator);
    }

    runs.into_iter()
        .enumerate()
        .map(|(idx, accumulator)| {
            let day_id = accumulator.last().day_id;
            let linked_trip_id = day_id * 1000 + idx as u64 + 1;
            accumulator.finalize(linked_trip_id, &config.mode_hierarchy)
        })
        .collect()
}

/// the continuation predicate: the previous segment ended at a
/// change-mode waypoint, the dwell before the next departure is within
/// the configured maximum, and the spatial gap at the transfer point is
/// within the buffer distance.
fn continues(prev: &RawTripSegment, next: &RawTripSegment, config: &LinkingConfig) -> bool {
    if prev.d_purpose != config.change_mode_purpose {
        return false;
    }
    let dwell = next.depart_time - prev.arrive_time;
    if dwell.num_seconds() > config.max_dwell_minutes * 60 {
        return false;
    }
    geo_ops::haversine_meters(&prev.destination, &next.origin) <= config.dwell_buffer_meters
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{ModeType, PurposeCategory};
    use chrono::{NaiveDate, NaiveDateTime};
    use geo::Point;
    use std::collections::HashSet;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .expect("valid date")
            .and_hms_opt(hour, minute, 0)
            .expect("valid time")
    }

    const HOME: (f64, f64) = (-122.4194, 37.7749);
    const STOP: (f64, f64) = (-122.4100, 37.7800);
    const PLATFORM: (f64, f64) = (-122.4000, 37.7850);
    const WORK: (f64, f64) = (-122.3900, 37.7900);

    #[allow(clippy::too_many_arguments)]
    fn segment(
        segment_id: u64,
        person_id: u64,
        depart: NaiveDateTime,
        arrive: NaiveDateTime,
        origin: (f64, f64),
        destination: (f64, f64),
        d_purpose: PurposeCategory,
        mode_type: ModeType,
    ) -> RawTripSegment {
        RawTripSegment {
            segment_id,
            day_id: 1,
            person_id,
            hh_id: 10,
            depart_time: depart,
            arrive_time: arrive,
            origin: Point::new(origin.0, origin.1),
            destination: Point::new(destination.0, destination.1),
            o_purpose: PurposeCategory::Home,
            d_purpose,
            mode_type,
            distance_meters: 1000.0,
            duration_minutes: (arrive - depart).num_minutes() as f64,
        }
    }

    /// the canonical multi-modal commute: walk to a stop, ride transit,
    /// walk to work, drive home. two linked trips, transit representative
    /// outbound.
    fn commute_segments() -> Vec<RawTripSegment> {
        vec![
            segment(
                1,
                100,
                at(8, 0),
                at(8, 10),
                HOME,
                STOP,
                PurposeCategory::ChangeMode,
                ModeType::Walk,
            ),
            segment(
                2,
                100,
                at(8, 15),
                at(8, 18),
                STOP,
                PLATFORM,
                PurposeCategory::ChangeMode,
                ModeType::Transit,
            ),
            segment(
                3,
                100,
                at(8, 20),
                at(9, 0),
                PLATFORM,
                WORK,
                PurposeCategory::Work,
                ModeType::Walk,
            ),
            segment(
                4,
                100,
                at(17, 0),
                at(17, 30),
                WORK,
                HOME,
                PurposeCategory::Home,
                ModeType::Car,
            ),
        ]
    }

    #[test]
    fn test_multimodal_commute_links_to_two_trips() {
        let outcome = link_trips(commute_segments(), &LinkingConfig::default()).expect("links");
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.linked_trips.len(), 2);

        let outbound = &outcome.linked_trips[0];
        assert_eq!(outbound.segment_ids, vec![1, 2, 3]);
        assert_eq!(outbound.mode_type, ModeType::Transit);
        assert_eq!(outbound.d_purpose, PurposeCategory::Work);
        assert_eq!(outbound.depart_time, at(8, 0));
        assert_eq!(outbound.arrive_time, at(9, 0));

        let inbound = &outcome.linked_trips[1];
        assert_eq!(inbound.segment_ids, vec![4]);
        assert_eq!(inbound.mode_type, ModeType::Car);
        assert_eq!(inbound.d_purpose, PurposeCategory::Home);
    }

    #[test]
    fn test_linked_duration_includes_dwell_gaps() {
        let outcome = link_trips(commute_segments(), &LinkingConfig::default()).expect("links");
        // 10 + 3 + 40 minutes of travel plus 5 + 2 minutes of dwell
        let outbound = &outcome.linked_trips[0];
        assert_eq!(outbound.duration_minutes, 60.0);
        assert_eq!(outbound.distance_meters, 3000.0);
    }

    #[test]
    fn test_segments_conserved_and_disjoint() {
        let segments = commute_segments();
        let input_ids: HashSet<u64> = segments.iter().map(|s| s.segment_id).collect();
        let outcome = link_trips(segments, &LinkingConfig::default()).expect("links");

        let mut seen: HashSet<u64> = HashSet::new();
        for trip in &outcome.linked_trips {
            for id in &trip.segment_ids {
                assert!(seen.insert(*id), "segment {id} assigned twice");
            }
        }
        assert_eq!(seen, input_ids);
    }

    #[test]
    fn test_no_change_mode_yields_one_to_one() {
        let segments = vec![
            segment(
                1,
                100,
                at(8, 0),
                at(8, 30),
                HOME,
                WORK,
                PurposeCategory::Work,
                ModeType::Car,
            ),
            segment(
                2,
                100,
                at(9, 0),
                at(9, 30),
                WORK,
                STOP,
                PurposeCategory::Shop,
                ModeType::Car,
            ),
        ];
        let outcome = link_trips(segments, &LinkingConfig::default()).expect("links");
        assert_eq!(outcome.linked_trips.len(), 2);
    }

    #[test]
    fn test_dwell_over_maximum_breaks_the_link() {
        let segments = vec![
            segment(
                1,
                100,
                at(8, 0),
                at(8, 10),
                HOME,
                STOP,
                PurposeCategory::ChangeMode,
                ModeType::Walk,
            ),
            // 150 minute gap at the transfer point
            segment(
                2,
                100,
                at(10, 40),
                at(11, 0),
                STOP,
                WORK,
                PurposeCategory::Work,
                ModeType::Transit,
            ),
        ];
        let outcome = link_trips(segments, &LinkingConfig::default()).expect("links");
        assert_eq!(outcome.linked_trips.len(), 2);
    }

    #[test]
    fn test_spatial_gap_over_buffer_breaks_the_link() {
        let segments = vec![
            segment(
                1,
                100,
                at(8, 0),
                at(8, 10),
                HOME,
                STOP,
                PurposeCategory::ChangeMode,
                ModeType::Walk,
            ),
            // next origin ~1km from previous destination
            segment(
                2,
                100,
                at(8, 15),
                at(8, 40),
                PLATFORM,
                WORK,
                PurposeCategory::Work,
                ModeType::Transit,
            ),
        ];
        let outcome = link_trips(segments, &LinkingConfig::default()).expect("links");
        assert_eq!(outcome.linked_trips.len(), 2);
    }

    #[test]
    fn test_persons_are_isolated() {
        let segments = vec![
            segment(
                1,
                100,
                at(8, 0),
                at(8, 10),
                HOME,
                STOP,
                PurposeCategory::ChangeMode,
                ModeType::Walk,
            ),
            segment(
                2,
                200,
                at(8, 12),
                at(8, 40),
                STOP,
                WORK,
                PurposeCategory::Work,
                ModeType::Transit,
            ),
        ];
        let outcome = link_trips(segments, &LinkingConfig::default()).expect("links");
        assert_eq!(outcome.linked_trips.len(), 2);
        let persons: Vec<u64> = outcome.linked_trips.iter().map(|t| t.person_id).collect();
        assert_eq!(persons, vec![100, 200]);
    }

    #[test]
    fn test_malformed_segment_excluded_not_fatal() {
        let mut segments = commute_segments();
        // arrival precedes departure
        segments.push(segment(
            99,
            100,
            at(12, 0),
            at(11, 0),
            WORK,
            STOP,
            PurposeCategory::Shop,
            ModeType::Car,
        ));
        let outcome = link_trips(segments, &LinkingConfig::default()).expect("links");
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].segment_id, 99);
        assert_eq!(
            outcome.diagnostics[0].fault,
            SegmentFault::ArriveBeforeDepart
        );
        // the rest of the person-day still links
        assert_eq!(outcome.linked_trips.len(), 2);
    }

    #[test]
    fn test_unsorted_input_is_ordered_at_the_boundary() {
        let mut segments = commute_segments();
        segments.reverse();
        let outcome = link_trips(segments, &LinkingConfig::default()).expect("links");
        assert_eq!(outcome.linked_trips.len(), 2);
        assert_eq!(outcome.linked_trips[0].segment_ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_trip_count_bounded_by_segment_count() {
        let segments = commute_segments();
        let n = segments.len();
        let outcome = link_trips(segments, &LinkingConfig::default()).expect("links");
        assert!(outcome.linked_trips.len() <= n);
    }

    #[test]
    fn test_empty_mode_hierarchy_is_fatal() {
        let hierarchy = crate::ranking::ModeHierarchy::new(vec![]);
        assert!(hierarchy.is_err());
    }
}
