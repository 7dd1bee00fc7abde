use geo::Point;
use serde::{Deserialize, Serialize};

use super::{PersonCategory, PersonType};

/// household context consumed by the tour builder. the home location is
/// the anchor for all home-based tours of the household's members; a
/// missing home makes every person-day of the household unanchorable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Household {
    pub hh_id: u64,
    pub home: Option<Point<f64>>,
}

/// minimal person context for tour extraction: the usual work and school
/// locations (when reported) and the person type driving purpose
/// priorities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub person_id: u64,
    pub hh_id: u64,
    pub person_type: PersonType,
    pub work: Option<Point<f64>>,
    pub school: Option<Point<f64>>,
}

impl Person {
    pub fn category(&self) -> PersonCategory {
        self.person_type.category()
    }
}

/// the partition key of the whole computation. person-days are fully
/// independent: no shared mutable state, no cross-partition ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonDay {
    pub person_id: u64,
    pub day_id: u64,
}
