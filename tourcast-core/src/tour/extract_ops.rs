use std::collections::HashMap;

use itertools::Itertools;
use rayon::prelude::*;

use super::{
    activity_durations, assemble_day, build_tour, AnchorContext, TourConfig, TourDiagnostic,
    TourError,
};
use crate::model::{HalfTour, Household, LinkedTrip, Person, PersonDay, Tour};

/// result of tour extraction: the input linked trips updated with tour
/// id and half-tour labels, the tours, and per-day anchor diagnostics.
#[derive(Debug)]
pub struct TourExtractionOutcome {
    pub linked_trips: Vec<LinkedTrip>,
    pub tours: Vec<Tour>,
    pub diagnostics: Vec<TourDiagnostic>,
}

struct DayResult {
    linked_trips: Vec<LinkedTrip>,
    tours: Vec<Tour>,
    diagnostic: Option<TourDiagnostic>,
}

/// assembles linked trips into tours, per person-day.
///
/// person and household records supply the home anchor and the usual
/// work/school locations; a person-day whose home cannot be resolved
/// yields zero tours and a diagnostic rather than a guessed anchor.
/// person-day partitions are independent and processed in parallel;
/// output ordering is deterministic: partitions ascending, tours by
/// origin departure within each day.
pub fn extract_tours(
    persons: &[Person],
    households: &[Household],
    linked_trips: Vec<LinkedTrip>,
    config: &TourConfig,
) -> Result<TourExtractionOutcome, TourError> {
    config.validate()?;

    let persons_by_id: HashMap<u64, &Person> =
        persons.iter().map(|p| (p.person_id, p)).collect();
    let households_by_id: HashMap<u64, &Household> =
        households.iter().map(|h| (h.hh_id, h)).collect();

    let partitions = partition_trips(linked_trips);
    log::info!(
        "extracting tours across {} person-day partitions",
        partitions.len()
    );

    let results: Vec<DayResult> = partitions
        .into_par_iter()
        .map(|(key, trips)| {
            let ctx = persons_by_id.get(&key.person_id).and_then(|person| {
                let home = households_by_id.get(&person.hh_id).and_then(|hh| hh.home)?;
                Some(AnchorContext::new(
                    home,
                    person.work,
                    person.school,
                    person.category(),
                    config,
                ))
            });
            match ctx {
                Some(ctx) => extract_person_day(key, trips, &ctx, config),
                None => {
                    log::warn!(
                        "no home anchor for person {} day {}; day yields zero tours",
                        key.person_id,
                        key.day_id
                    );
                    DayResult {
                        linked_trips: trips,
                        tours: Vec::new(),
                        diagnostic: Some(TourDiagnostic::MissingHomeAnchor { person_day: key }),
                    }
                }
            }
        })
        .collect();

    let mut outcome = TourExtractionOutcome {
        linked_trips: Vec::new(),
        tours: Vec::new(),
        diagnostics: Vec::new(),
    };
    for result in results {
        outcome.linked_trips.extend(result.linked_trips);
        outcome.tours.extend(result.tours);
        outcome.diagnostics.extend(result.diagnostic);
    }
    log::info!(
        "tour extraction complete: {} tours, {} unanchored person-days",
        outcome.tours.len(),
        outcome.diagnostics.len()
    );
    Ok(outcome)
}

fn partition_trips(trips: Vec<LinkedTrip>) -> Vec<(PersonDay, Vec<LinkedTrip>)> {
    let sorted: Vec<LinkedTrip> = trips
        .into_iter()
        .sorted_by_key(|t| (t.person_day(), t.sequence_key()))
        .collect();
    let chunks = sorted.into_iter().chunk_by(|t| t.person_day());
    chunks
        .into_iter()
        .map(|(key, group)| (key, group.collect()))
        .collect()
}

/// one person-day: cut tour boundaries, number tours 1-based by origin
/// departure, derive attributes, label the trips, and flag the primary
/// tour of the day.
fn extract_person_day(
    key: PersonDay,
    mut trips: Vec<LinkedTrip>,
    ctx: &AnchorContext,
    config: &TourConfig,
) -> DayResult {
    let mut protos = assemble_day(&trips, ctx, config);
    protos.sort_by_key(|p| trips[p.trip_indices[0]].sequence_key());
    let durations = activity_durations(&trips, config);

    // ids must exist before any tour is built so subtours can reference
    // their parent regardless of close order
    let tour_ids: HashMap<usize, u64> = protos
        .iter()
        .enumerate()
        .map(|(i, p)| (p.frame_id, day_tour_id(key.day_id, i)))
        .collect();

    let mut builds = Vec::with_capacity(protos.len());
    for (i, proto) in protos.iter().enumerate() {
        let parent_tour_id = proto
            .parent_frame_id
            .and_then(|frame_id| tour_ids.get(&frame_id))
            .copied();
        builds.push(build_tour(
            proto,
            day_tour_id(key.day_id, i),
            i as u32 + 1,
            parent_tour_id,
            &trips,
            &durations,
            ctx,
            config,
        ));
    }

    for build in &builds {
        for idx in &build.outbound_trips {
            trips[*idx].tour_id = Some(build.tour.tour_id);
            trips[*idx].half_tour = Some(HalfTour::Outbound);
        }
        for idx in &build.inbound_trips {
            trips[*idx].tour_id = Some(build.tour.tour_id);
            trips[*idx].half_tour = Some(HalfTour::Inbound);
        }
    }

    let mut tours: Vec<Tour> = builds.into_iter().map(|b| b.tour).collect();
    let primary_id = tours
        .iter()
        .min_by_key(|t| {
            (
                config.purpose_priority.rank(t.primary_purpose, ctx.category),
                t.origin_depart_time,
                t.tour_id,
            )
        })
        .map(|t| t.tour_id);
    if let Some(primary_id) = primary_id {
        for tour in &mut tours {
            tour.is_primary = tour.tour_id == primary_id;
        }
    }

    DayResult {
        linked_trips: trips,
        tours,
        diagnostic: None,
    }
}

fn day_tour_id(day_id: u64, position: usize) -> u64 {
    day_id * 100 + position as u64 + 1
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{ModeType, PersonType, PurposeCategory, TourCategory};
    use chrono::{NaiveDate, NaiveDateTime};
    use geo::Point;

    const HOME: (f64, f64) = (-122.4194, 37.7749);
    const WORK: (f64, f64) = (-122.3900, 37.7900);
    const MEAL: (f64, f64) = (-122.3850, 37.7920);

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .expect("valid date")
            .and_hms_opt(hour, minute, 0)
            .expect("valid time")
    }

    fn worker() -> Person {
        Person {
            person_id: 100,
            hh_id: 10,
            person_type: PersonType::FullTimeWorker,
            work: Some(Point::new(WORK.0, WORK.1)),
            school: None,
        }
    }

    fn household() -> Household {
        Household {
            hh_id: 10,
            home: Some(Point::new(HOME.0, HOME.1)),
        }
    }

    fn trip(
        day_id: u64,
        pos: u64,
        origin: (f64, f64),
        destination: (f64, f64),
        d_purpose: PurposeCategory,
        depart: NaiveDateTime,
        arrive: NaiveDateTime,
    ) -> LinkedTrip {
        LinkedTrip {
            linked_trip_id: day_id * 1000 + pos,
            day_id,
            person_id: 100,
            hh_id: 10,
            segment_ids: vec![pos],
            mode_type: ModeType::Car,
            o_purpose: PurposeCategory::Home,
            d_purpose,
            origin: Point::new(origin.0, origin.1),
            destination: Point::new(destination.0, destination.1),
            depart_time: depart,
            arrive_time: arrive,
            distance_meters: 1000.0,
            duration_minutes: (arrive - depart).num_minutes() as f64,
            tour_id: None,
            half_tour: None,
        }
    }

    fn lunch_day(day_id: u64) -> Vec<LinkedTrip> {
        vec![
            trip(day_id, 1, HOME, WORK, PurposeCategory::Work, at(8, 0), at(8, 30)),
            trip(day_id, 2, WORK, MEAL, PurposeCategory::Meal, at(12, 0), at(12, 10)),
            trip(day_id, 3, MEAL, WORK, PurposeCategory::Work, at(13, 0), at(13, 10)),
            trip(day_id, 4, WORK, HOME, PurposeCategory::Home, at(17, 0), at(17, 30)),
        ]
    }

    #[test]
    fn test_lunch_subtour_day_end_to_end() {
        let persons = vec![worker()];
        let households = vec![household()];
        let outcome =
            extract_tours(&persons, &households, lunch_day(1), &TourConfig::default())
                .expect("extracts");

        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.tours.len(), 2);

        let parent = &outcome.tours[0];
        assert_eq!(parent.tour_id, 101);
        assert_eq!(parent.tour_num, 1);
        assert_eq!(parent.category, TourCategory::HomeBased);
        assert_eq!(parent.primary_purpose, PurposeCategory::Work);
        assert_eq!(parent.parent_tour_id, None);
        assert!(parent.is_primary);
        assert!(parent.ends_at_origin);

        let subtour = &outcome.tours[1];
        assert_eq!(subtour.tour_id, 102);
        assert_eq!(subtour.tour_num, 2);
        assert_eq!(subtour.category, TourCategory::WorkBased);
        assert_eq!(subtour.primary_purpose, PurposeCategory::Meal);
        assert_eq!(subtour.parent_tour_id, Some(101));
        assert!(!subtour.is_primary);
        assert_eq!(subtour.day_id, parent.day_id);

        // the subtour's window is nested within the parent's work dwell
        assert!(subtour.origin_depart_time > parent.dest_arrive_time);
        assert!(subtour.origin_arrive_time < parent.dest_depart_time);
    }

    #[test]
    fn test_every_trip_labelled_with_its_tour_and_half() {
        let persons = vec![worker()];
        let households = vec![household()];
        let outcome =
            extract_tours(&persons, &households, lunch_day(1), &TourConfig::default())
                .expect("extracts");

        let labels: Vec<(Option<u64>, Option<HalfTour>)> = outcome
            .linked_trips
            .iter()
            .map(|t| (t.tour_id, t.half_tour))
            .collect();
        assert_eq!(
            labels,
            vec![
                (Some(101), Some(HalfTour::Outbound)),
                (Some(102), Some(HalfTour::Outbound)),
                (Some(102), Some(HalfTour::Inbound)),
                (Some(101), Some(HalfTour::Inbound)),
            ]
        );
    }

    #[test]
    fn test_missing_home_anchor_yields_diagnostic_not_error() {
        let persons = vec![worker()];
        let households = vec![Household {
            hh_id: 10,
            home: None,
        }];
        let outcome =
            extract_tours(&persons, &households, lunch_day(1), &TourConfig::default())
                .expect("extracts");

        assert!(outcome.tours.is_empty());
        assert_eq!(outcome.diagnostics.len(), 1);
        let TourDiagnostic::MissingHomeAnchor { person_day } = &outcome.diagnostics[0];
        assert_eq!(person_day.person_id, 100);
        // trips pass through unlabelled
        assert!(outcome.linked_trips.iter().all(|t| t.tour_id.is_none()));
    }

    #[test]
    fn test_unknown_person_yields_diagnostic() {
        let households = vec![household()];
        let outcome = extract_tours(&[], &households, lunch_day(1), &TourConfig::default())
            .expect("extracts");
        assert!(outcome.tours.is_empty());
        assert_eq!(outcome.diagnostics.len(), 1);
    }

    #[test]
    fn test_no_trips_yields_no_tours_and_no_diagnostic() {
        let persons = vec![worker()];
        let households = vec![household()];
        let outcome = extract_tours(&persons, &households, vec![], &TourConfig::default())
            .expect("extracts");
        assert!(outcome.tours.is_empty());
        assert!(outcome.diagnostics.is_empty());
        assert!(outcome.linked_trips.is_empty());
    }

    #[test]
    fn test_tour_numbering_is_scoped_per_day() {
        let persons = vec![worker()];
        let households = vec![household()];
        let mut trips = lunch_day(1);
        trips.extend(lunch_day(2));
        let outcome = extract_tours(&persons, &households, trips, &TourConfig::default())
            .expect("extracts");

        let day2: Vec<&Tour> = outcome.tours.iter().filter(|t| t.day_id == 2).collect();
        assert_eq!(day2.len(), 2);
        // numbering restarts at 1, independent of day 1's tour count
        assert_eq!(day2[0].tour_num, 1);
        assert_eq!(day2[0].tour_id, 201);
        assert_eq!(day2[1].parent_tour_id, Some(201));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let persons = vec![worker()];
        let households = vec![household()];
        let first =
            extract_tours(&persons, &households, lunch_day(1), &TourConfig::default())
                .expect("extracts");
        let second = extract_tours(
            &persons,
            &households,
            lunch_day(1),
            &TourConfig::default(),
        )
        .expect("extracts");

        let ids = |tours: &[Tour]| -> Vec<(u64, u32, Option<u64>)> {
            tours
                .iter()
                .map(|t| (t.tour_id, t.tour_num, t.parent_tour_id))
                .collect()
        };
        assert_eq!(ids(&first.tours), ids(&second.tours));
    }

    #[test]
    fn test_invalid_configuration_is_fatal() {
        let config = TourConfig {
            default_activity_duration_minutes: -1,
            ..Default::default()
        };
        let result = extract_tours(&[worker()], &[household()], lunch_day(1), &config);
        assert!(matches!(result, Err(TourError::InvalidConfiguration(_))));
    }
}
