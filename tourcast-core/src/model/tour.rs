use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{ModeType, PurposeCategory, TourCategory};

/// a closed (or, at day boundary, open) loop of travel anchored at home
/// or, for subtours, at a secondary anchor such as the usual workplace.
///
/// tours are immutable once emitted. tour numbering is 1-based and scoped
/// to the day, deliberately diverging from the legacy per-survey-period
/// numbering; ids are unique within a person, not globally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tour {
    /// `day_id * 100 + tour_num`; unique within a person.
    pub tour_id: u64,
    pub person_id: u64,
    pub hh_id: u64,
    pub day_id: u64,
    /// 1-based position within the day, over home-based tours and
    /// subtours together, ordered by origin departure.
    pub tour_num: u32,
    /// id of the enclosing tour for subtours; `None` for home-based tours.
    pub parent_tour_id: Option<u64>,
    pub category: TourCategory,
    pub primary_purpose: PurposeCategory,
    pub origin_depart_time: NaiveDateTime,
    /// arrival at the primary destination.
    pub dest_arrive_time: NaiveDateTime,
    /// departure from the primary destination; `None` when the day ends
    /// at the primary destination.
    pub dest_depart_time: Option<NaiveDateTime>,
    /// arrival back at the anchor; `None` for an open tour.
    pub origin_arrive_time: Option<NaiveDateTime>,
    pub origin_linked_trip_id: u64,
    /// linked trip arriving at the primary destination.
    pub dest_linked_trip_id: u64,
    pub outbound_stop_count: u32,
    pub inbound_stop_count: u32,
    /// derived from the outbound and inbound half-tour modes via the
    /// shared mode hierarchy.
    pub mode_type: ModeType,
    /// tour with the best-priority primary purpose across the day.
    pub is_primary: bool,
    pub starts_at_origin: bool,
    /// false only for an open tour at day end.
    pub ends_at_origin: bool,
}
