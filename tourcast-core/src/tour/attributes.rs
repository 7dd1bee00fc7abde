use std::cmp::Ordering;

use chrono::NaiveDateTime;

use super::{AnchorContext, ProtoTour, TourConfig};
use crate::model::{LinkedTrip, Tour};

/// a fully-derived tour plus the half-tour membership of its trips,
/// expressed as indices into the day's linked trip slice.
#[derive(Debug)]
pub struct TourBuild {
    pub tour: Tour,
    pub outbound_trips: Vec<usize>,
    pub inbound_trips: Vec<usize>,
}

/// activity duration in minutes at each trip's destination: arrival to
/// the next trip's departure, over the whole day sequence. the final
/// destination of the day has no next departure and is assigned the
/// configured default instead of zero, so end-of-day activities are not
/// systematically under-weighted in tie-breaks.
pub fn activity_durations(trips: &[LinkedTrip], config: &TourConfig) -> Vec<f64> {
    let mut durations = Vec::with_capacity(trips.len());
    for pair in trips.windows(2) {
        let dwell = pair[1].depart_time - pair[0].arrive_time;
        durations.push((dwell.num_seconds().max(0) as f64) / 60.0);
    }
    if !trips.is_empty() {
        durations.push(config.default_activity_duration_minutes as f64);
    }
    durations
}

/// derives a tour's attributes from its boundary: primary purpose,
/// half-tour split, stop counts, mode, and the four timestamps.
///
/// the primary destination is the non-anchor destination with the best
/// (lowest) priority rank; rank ties go to the longer activity
/// duration, then to the earlier visit. the closing trip arrives at the
/// anchor and is never a candidate; an anchor-to-anchor loop with no
/// other destination falls back to its last trip.
pub fn build_tour(
    proto: &ProtoTour,
    tour_id: u64,
    tour_num: u32,
    parent_tour_id: Option<u64>,
    trips: &[LinkedTrip],
    durations: &[f64],
    ctx: &AnchorContext,
    config: &TourConfig,
) -> TourBuild {
    let indices = &proto.trip_indices;
    let first = &trips[indices[0]];
    let last = &trips[indices[indices.len() - 1]];

    let winner_pos = primary_destination(proto, trips, durations, ctx, config);
    let winner = &trips[indices[winner_pos]];

    let outbound_trips: Vec<usize> = indices[..=winner_pos].to_vec();
    let inbound_trips: Vec<usize> = indices[winner_pos + 1..].to_vec();

    let hierarchy = &config.mode_hierarchy;
    let outbound_mode = hierarchy.dominant(outbound_trips.iter().map(|i| trips[*i].mode_type));
    let inbound_mode = hierarchy.dominant(inbound_trips.iter().map(|i| trips[*i].mode_type));
    let mode_type = hierarchy
        .dominant(outbound_mode.into_iter().chain(inbound_mode))
        .unwrap_or(first.mode_type);

    let dest_depart_time: Option<NaiveDateTime> = inbound_trips
        .first()
        .map(|i| trips[*i].depart_time);
    let origin_arrive_time = proto.closed.then_some(last.arrive_time);

    let tour = Tour {
        tour_id,
        person_id: first.person_id,
        hh_id: first.hh_id,
        day_id: first.day_id,
        tour_num,
        parent_tour_id,
        category: proto.category,
        primary_purpose: winner.d_purpose,
        origin_depart_time: first.depart_time,
        dest_arrive_time: winner.arrive_time,
        dest_depart_time,
        origin_arrive_time,
        origin_linked_trip_id: first.linked_trip_id,
        dest_linked_trip_id: winner.linked_trip_id,
        outbound_stop_count: (outbound_trips.len() - 1) as u32,
        inbound_stop_count: inbound_trips.len().saturating_sub(1) as u32,
        mode_type,
        is_primary: false,
        starts_at_origin: ctx.matches_anchor(&proto.anchor, &first.origin, first.o_purpose),
        ends_at_origin: proto.closed,
    };

    TourBuild {
        tour,
        outbound_trips,
        inbound_trips,
    }
}

/// position (within the proto's trip list) of the trip arriving at the
/// primary destination.
fn primary_destination(
    proto: &ProtoTour,
    trips: &[LinkedTrip],
    durations: &[f64],
    ctx: &AnchorContext,
    config: &TourConfig,
) -> usize {
    let candidates = proto
        .trip_indices
        .iter()
        .enumerate()
        .filter(|(_, idx)| {
            let trip = &trips[**idx];
            !ctx.matches_anchor(&proto.anchor, &trip.destination, trip.d_purpose)
        })
        .min_by(|(pos_a, idx_a), (pos_b, idx_b)| {
            let rank_a = config
                .purpose_priority
                .rank(trips[**idx_a].d_purpose, ctx.category);
            let rank_b = config
                .purpose_priority
                .rank(trips[**idx_b].d_purpose, ctx.category);
            rank_a
                .cmp(&rank_b)
                .then(
                    durations[**idx_b]
                        .partial_cmp(&durations[**idx_a])
                        .unwrap_or(Ordering::Equal),
                )
                .then(pos_a.cmp(pos_b))
        });

    match candidates {
        Some((pos, _)) => pos,
        // anchor-to-anchor loop: every destination is the anchor
        None => proto.trip_indices.len() - 1,
    }
}
