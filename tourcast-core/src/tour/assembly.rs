use super::{AnchorContext, TourAnchor, TourConfig};
use crate::model::{LinkedTrip, TourCategory};

/// a tour boundary found by the state machine, before numbering and
/// attribute derivation. trip indices point into the day's ordered
/// linked trip slice and are exclusively owned: a trip inside a subtour
/// belongs to the subtour, not the enclosing tour.
#[derive(Debug)]
pub struct ProtoTour {
    pub frame_id: usize,
    pub parent_frame_id: Option<usize>,
    pub anchor: TourAnchor,
    pub category: TourCategory,
    pub trip_indices: Vec<usize>,
    /// false only when the day ended with the tour still open.
    pub closed: bool,
}

struct TourFrame {
    frame_id: usize,
    parent_frame_id: Option<usize>,
    anchor: TourAnchor,
    category: TourCategory,
    trip_indices: Vec<usize>,
}

impl TourFrame {
    fn into_proto(self, closed: bool) -> ProtoTour {
        ProtoTour {
            frame_id: self.frame_id,
            parent_frame_id: self.parent_frame_id,
            anchor: self.anchor,
            category: self.category,
            trip_indices: self.trip_indices,
            closed,
        }
    }
}

/// walks one person-day's ordered linked trips and cuts them into tour
/// boundaries.
///
/// the machine is one procedure parameterized by an anchor, held in an
/// explicit frame stack: the bottom frame is always home-anchored, and a
/// subtour is the same machine running on a frame anchored at the
/// secondary location. a subtour frame is only opened when a contiguous
/// return to its anchor exists later in the day (checked by lookahead),
/// so every frame above the bottom one is guaranteed to close; only the
/// home frame can remain open at day end.
pub fn assemble_day(
    trips: &[LinkedTrip],
    ctx: &AnchorContext,
    config: &TourConfig,
) -> Vec<ProtoTour> {
    let mut stack: Vec<TourFrame> = Vec::new();
    let mut finished: Vec<ProtoTour> = Vec::new();
    let mut next_frame_id = 0usize;

    for (i, trip) in trips.iter().enumerate() {
        match stack.last() {
            None => {
                stack.push(TourFrame {
                    frame_id: next_frame_id,
                    parent_frame_id: None,
                    anchor: TourAnchor::Home,
                    category: TourCategory::HomeBased,
                    trip_indices: Vec::new(),
                });
                next_frame_id += 1;
            }
            Some(top) => {
                if let Some(anchor) = subtour_candidate(trips, i, top, ctx, config) {
                    let parent_frame_id = Some(top.frame_id);
                    stack.push(TourFrame {
                        frame_id: next_frame_id,
                        parent_frame_id,
                        anchor,
                        category: TourCategory::WorkBased,
                        trip_indices: Vec::new(),
                    });
                    next_frame_id += 1;
                }
            }
        }

        if let Some(frame) = stack.last_mut() {
            frame.trip_indices.push(i);
            if ctx.matches_anchor(&frame.anchor, &trip.destination, trip.d_purpose) {
                if let Some(done) = stack.pop() {
                    finished.push(done.into_proto(true));
                }
            }
        }
    }

    // diary days commonly end mid-activity; emit the open tour anyway
    while let Some(frame) = stack.pop() {
        finished.push(frame.into_proto(false));
    }
    finished
}

/// decides whether trip `i` departs a location that anchors a subtour:
/// the departure location must be policy-eligible, and some later trip
/// must return to it before any arrival at the enclosing frame's anchor
/// or at home. a non-contiguous revisit never forms a subtour.
fn subtour_candidate(
    trips: &[LinkedTrip],
    i: usize,
    top: &TourFrame,
    ctx: &AnchorContext,
    config: &TourConfig,
) -> Option<TourAnchor> {
    // the first trip of a frame departs the anchor itself
    let prev = &trips[*top.trip_indices.last()?];
    let location = &trips[i].origin;
    let anchor = ctx.secondary_anchor(location, prev.d_purpose, config.subtour_policy)?;

    for trip in &trips[i..] {
        if ctx.matches_home(&trip.destination, trip.d_purpose)
            || ctx.matches_anchor(&top.anchor, &trip.destination, trip.d_purpose)
        {
            return None;
        }
        if ctx.matches_anchor(&anchor, &trip.destination, trip.d_purpose) {
            return Some(anchor);
        }
    }
    None
}
