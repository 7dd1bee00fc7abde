mod codebook;
mod linked_trip;
mod person;
mod segment;
mod tour;

pub use codebook::{
    CodebookError, HalfTour, LocationType, ModeType, PersonCategory, PersonType, PurposeCategory,
    TourCategory,
};
pub use linked_trip::LinkedTrip;
pub use person::{Household, Person, PersonDay};
pub use segment::RawTripSegment;
pub use tour::Tour;
