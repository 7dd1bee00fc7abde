use geo::Point;

use super::{SubtourPolicy, TourConfig};
use crate::model::{LocationType, PersonCategory, PurposeCategory};
use crate::util::geo_ops;

/// the location a tour departs from and returns to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TourAnchor {
    Home,
    Secondary {
        location: Point<f64>,
        location_type: LocationType,
    },
}

/// per-person anchor recognition context: the household home, the usual
/// work and school locations when reported, and the match tolerances.
///
/// recognition is hybrid, matching either by reported purpose category
/// or by coordinate proximity. diaries frequently carry one without the
/// other, such as a home arrival geocoded a block away or a work arrival
/// at a client site labelled work-related.
#[derive(Debug, Clone)]
pub struct AnchorContext {
    pub home: Point<f64>,
    pub work: Option<Point<f64>>,
    pub school: Option<Point<f64>>,
    pub category: PersonCategory,
    thresholds: super::DistanceThresholds,
}

impl AnchorContext {
    pub fn new(
        home: Point<f64>,
        work: Option<Point<f64>>,
        school: Option<Point<f64>>,
        category: PersonCategory,
        config: &TourConfig,
    ) -> AnchorContext {
        AnchorContext {
            home,
            work,
            school,
            category,
            thresholds: config.distance_thresholds.clone(),
        }
    }

    pub fn matches_home(&self, point: &Point<f64>, purpose: PurposeCategory) -> bool {
        purpose == PurposeCategory::Home
            || geo_ops::haversine_meters(point, &self.home)
                <= self.thresholds.meters_for(LocationType::Home)
    }

    /// whether a trip end is at the person's usual workplace.
    pub fn matches_work(&self, point: &Point<f64>, purpose: PurposeCategory) -> bool {
        if matches!(
            purpose,
            PurposeCategory::Work | PurposeCategory::WorkRelated
        ) {
            return true;
        }
        match &self.work {
            Some(work) => {
                geo_ops::haversine_meters(point, work)
                    <= self.thresholds.meters_for(LocationType::Work)
            }
            None => false,
        }
    }

    /// whether a trip end closes a tour anchored at `anchor`.
    pub fn matches_anchor(
        &self,
        anchor: &TourAnchor,
        point: &Point<f64>,
        purpose: PurposeCategory,
    ) -> bool {
        match anchor {
            TourAnchor::Home => self.matches_home(point, purpose),
            TourAnchor::Secondary {
                location,
                location_type: LocationType::Work,
            } => {
                matches!(
                    purpose,
                    PurposeCategory::Work | PurposeCategory::WorkRelated
                ) || geo_ops::haversine_meters(point, location)
                    <= self.thresholds.meters_for(LocationType::Work)
            }
            TourAnchor::Secondary {
                location,
                location_type,
            } => {
                geo_ops::haversine_meters(point, location)
                    <= self.thresholds.meters_for(*location_type)
            }
        }
    }

    /// candidate secondary anchor at a departure location, per the
    /// subtour policy. `arrival_purpose` is the purpose of the trip that
    /// brought the traveler here. `None` when the location cannot anchor
    /// a subtour (home can never be a secondary anchor).
    pub fn secondary_anchor(
        &self,
        location: &Point<f64>,
        arrival_purpose: PurposeCategory,
        policy: SubtourPolicy,
    ) -> Option<TourAnchor> {
        if self.matches_home(location, arrival_purpose) {
            return None;
        }
        let at_work = self.matches_work(location, arrival_purpose);
        match policy {
            SubtourPolicy::ContiguousWorkplace if !at_work => None,
            _ => Some(TourAnchor::Secondary {
                location: *location,
                location_type: if at_work {
                    LocationType::Work
                } else {
                    LocationType::Other
                },
            }),
        }
    }
}
