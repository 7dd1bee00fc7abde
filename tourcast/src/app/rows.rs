use chrono::NaiveDateTime;
use geo::Point;
use serde::{Deserialize, Serialize};
use tourcast_core::model::{
    CodebookError, HalfTour, Household, LinkedTrip, ModeType, Person, PersonType, PurposeCategory,
    RawTripSegment, Tour,
};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(thiserror::Error, Debug)]
pub enum RowError {
    #[error("unparseable timestamp '{0}', expected %Y-%m-%d %H:%M:%S")]
    Timestamp(String),
    #[error(transparent)]
    Codebook(#[from] CodebookError),
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, RowError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_err(|_| RowError::Timestamp(raw.to_string()))
}

fn optional_point(lon: Option<f64>, lat: Option<f64>) -> Option<Point<f64>> {
    match (lon, lat) {
        (Some(lon), Some(lat)) => Some(Point::new(lon, lat)),
        _ => None,
    }
}

fn format_timestamp(t: &NaiveDateTime) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Deserialize)]
pub struct HouseholdRow {
    pub hh_id: u64,
    pub home_lon: Option<f64>,
    pub home_lat: Option<f64>,
}

impl From<HouseholdRow> for Household {
    fn from(row: HouseholdRow) -> Household {
        Household {
            hh_id: row.hh_id,
            home: optional_point(row.home_lon, row.home_lat),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PersonRow {
    pub person_id: u64,
    pub hh_id: u64,
    pub person_type: u16,
    pub work_lon: Option<f64>,
    pub work_lat: Option<f64>,
    pub school_lon: Option<f64>,
    pub school_lat: Option<f64>,
}

impl TryFrom<PersonRow> for Person {
    type Error = RowError;

    fn try_from(row: PersonRow) -> Result<Person, RowError> {
        Ok(Person {
            person_id: row.person_id,
            hh_id: row.hh_id,
            person_type: PersonType::try_from(row.person_type)?,
            work: optional_point(row.work_lon, row.work_lat),
            school: optional_point(row.school_lon, row.school_lat),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SegmentRow {
    pub segment_id: u64,
    pub day_id: u64,
    pub person_id: u64,
    pub hh_id: u64,
    pub depart_time: String,
    pub arrive_time: String,
    pub o_lon: f64,
    pub o_lat: f64,
    pub d_lon: f64,
    pub d_lat: f64,
    pub o_purpose: u16,
    pub d_purpose: u16,
    pub mode_type: u16,
    pub distance_meters: f64,
    pub duration_minutes: f64,
}

impl TryFrom<SegmentRow> for RawTripSegment {
    type Error = RowError;

    fn try_from(row: SegmentRow) -> Result<RawTripSegment, RowError> {
        Ok(RawTripSegment {
            segment_id: row.segment_id,
            day_id: row.day_id,
            person_id: row.person_id,
            hh_id: row.hh_id,
            depart_time: parse_timestamp(&row.depart_time)?,
            arrive_time: parse_timestamp(&row.arrive_time)?,
            origin: Point::new(row.o_lon, row.o_lat),
            destination: Point::new(row.d_lon, row.d_lat),
            o_purpose: PurposeCategory::try_from(row.o_purpose)?,
            d_purpose: PurposeCategory::try_from(row.d_purpose)?,
            mode_type: ModeType::try_from(row.mode_type)?,
            distance_meters: row.distance_meters,
            duration_minutes: row.duration_minutes,
        })
    }
}

/// flat output row for linked_trips.csv. constituent segment ids are
/// space-separated in one column.
#[derive(Debug, Serialize)]
pub struct LinkedTripRow {
    pub linked_trip_id: u64,
    pub day_id: u64,
    pub person_id: u64,
    pub hh_id: u64,
    pub segment_ids: String,
    pub mode_type: u16,
    pub o_purpose: u16,
    pub d_purpose: u16,
    pub o_lon: f64,
    pub o_lat: f64,
    pub d_lon: f64,
    pub d_lat: f64,
    pub depart_time: String,
    pub arrive_time: String,
    pub distance_meters: f64,
    pub duration_minutes: f64,
    pub tour_id: Option<u64>,
    pub half_tour: Option<&'static str>,
}

impl From<&LinkedTrip> for LinkedTripRow {
    fn from(trip: &LinkedTrip) -> LinkedTripRow {
        LinkedTripRow {
            linked_trip_id: trip.linked_trip_id,
            day_id: trip.day_id,
            person_id: trip.person_id,
            hh_id: trip.hh_id,
            segment_ids: trip
                .segment_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<String>>()
                .join(" "),
            mode_type: trip.mode_type.code(),
            o_purpose: trip.o_purpose.code(),
            d_purpose: trip.d_purpose.code(),
            o_lon: trip.origin.x(),
            o_lat: trip.origin.y(),
            d_lon: trip.destination.x(),
            d_lat: trip.destination.y(),
            depart_time: format_timestamp(&trip.depart_time),
            arrive_time: format_timestamp(&trip.arrive_time),
            distance_meters: trip.distance_meters,
            duration_minutes: trip.duration_minutes,
            tour_id: trip.tour_id,
            half_tour: trip.half_tour.map(|h| match h {
                HalfTour::Outbound => "outbound",
                HalfTour::Inbound => "inbound",
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TourRow {
    pub tour_id: u64,
    pub person_id: u64,
    pub hh_id: u64,
    pub day_id: u64,
    pub tour_num: u32,
    pub parent_tour_id: Option<u64>,
    pub category: &'static str,
    pub primary_purpose: u16,
    pub origin_depart_time: String,
    pub dest_arrive_time: String,
    pub dest_depart_time: Option<String>,
    pub origin_arrive_time: Option<String>,
    pub origin_linked_trip_id: u64,
    pub dest_linked_trip_id: u64,
    pub outbound_stop_count: u32,
    pub inbound_stop_count: u32,
    pub mode_type: u16,
    pub is_primary: bool,
    pub starts_at_origin: bool,
    pub ends_at_origin: bool,
}

impl From<&Tour> for TourRow {
    fn from(tour: &Tour) -> TourRow {
        TourRow {
            tour_id: tour.tour_id,
            person_id: tour.person_id,
            hh_id: tour.hh_id,
            day_id: tour.day_id,
            tour_num: tour.tour_num,
            parent_tour_id: tour.parent_tour_id,
            category: match tour.category {
                tourcast_core::model::TourCategory::HomeBased => "home_based",
                tourcast_core::model::TourCategory::WorkBased => "work_based",
            },
            primary_purpose: tour.primary_purpose.code(),
            origin_depart_time: format_timestamp(&tour.origin_depart_time),
            dest_arrive_time: format_timestamp(&tour.dest_arrive_time),
            dest_depart_time: tour.dest_depart_time.as_ref().map(format_timestamp),
            origin_arrive_time: tour.origin_arrive_time.as_ref().map(format_timestamp),
            origin_linked_trip_id: tour.origin_linked_trip_id,
            dest_linked_trip_id: tour.dest_linked_trip_id,
            outbound_stop_count: tour.outbound_stop_count,
            inbound_stop_count: tour.inbound_stop_count,
            mode_type: tour.mode_type.code(),
            is_primary: tour.is_primary,
            starts_at_origin: tour.starts_at_origin,
            ends_at_origin: tour.ends_at_origin,
        }
    }
}
