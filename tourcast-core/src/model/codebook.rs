use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum CodebookError {
    #[error("unknown purpose category code: {0}")]
    UnknownPurposeCategory(u16),
    #[error("unknown mode type code: {0}")]
    UnknownModeType(u16),
    #[error("unknown person type code: {0}")]
    UnknownPersonType(u16),
}

/// survey destination/origin purpose categories. codes follow the canonical
/// trip codebook; `ChangeMode` is the reserved sentinel marking a waypoint
/// where the traveler only switched transportation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum PurposeCategory {
    Home,
    Work,
    WorkRelated,
    School,
    SchoolRelated,
    Escort,
    Shop,
    Meal,
    SocialRecreation,
    Errand,
    ChangeMode,
    Overnight,
    Other,
    NotImputable,
}

impl PurposeCategory {
    pub fn code(&self) -> u16 {
        u16::from(*self)
    }
}

impl From<PurposeCategory> for u16 {
    fn from(value: PurposeCategory) -> Self {
        use PurposeCategory as P;
        match value {
            P::Home => 1,
            P::Work => 2,
            P::WorkRelated => 3,
            P::School => 4,
            P::SchoolRelated => 5,
            P::Escort => 6,
            P::Shop => 7,
            P::Meal => 8,
            P::SocialRecreation => 9,
            P::Errand => 10,
            P::ChangeMode => 11,
            P::Overnight => 12,
            P::Other => 13,
            P::NotImputable => 996,
        }
    }
}

impl TryFrom<u16> for PurposeCategory {
    type Error = CodebookError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        use PurposeCategory as P;
        match value {
            1 => Ok(P::Home),
            2 => Ok(P::Work),
            3 => Ok(P::WorkRelated),
            4 => Ok(P::School),
            5 => Ok(P::SchoolRelated),
            6 => Ok(P::Escort),
            7 => Ok(P::Shop),
            8 => Ok(P::Meal),
            9 => Ok(P::SocialRecreation),
            10 => Ok(P::Errand),
            11 => Ok(P::ChangeMode),
            12 => Ok(P::Overnight),
            13 => Ok(P::Other),
            996 => Ok(P::NotImputable),
            other => Err(CodebookError::UnknownPurposeCategory(other)),
        }
    }
}

/// aggregated travel mode categories from the canonical trip codebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum ModeType {
    Walk,
    Bike,
    Bikeshare,
    Scootershare,
    Taxi,
    Tnc,
    Other,
    Car,
    Carshare,
    SchoolBus,
    ShuttleOrVanpool,
    Ferry,
    Transit,
    LongDistancePassenger,
    Missing,
}

impl ModeType {
    pub fn code(&self) -> u16 {
        u16::from(*self)
    }
}

impl From<ModeType> for u16 {
    fn from(value: ModeType) -> Self {
        use ModeType as M;
        match value {
            M::Walk => 1,
            M::Bike => 2,
            M::Bikeshare => 3,
            M::Scootershare => 4,
            M::Taxi => 5,
            M::Tnc => 6,
            M::Other => 7,
            M::Car => 8,
            M::Carshare => 9,
            M::SchoolBus => 10,
            M::ShuttleOrVanpool => 11,
            M::Ferry => 12,
            M::Transit => 13,
            M::LongDistancePassenger => 14,
            M::Missing => 995,
        }
    }
}

impl TryFrom<u16> for ModeType {
    type Error = CodebookError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        use ModeType as M;
        match value {
            1 => Ok(M::Walk),
            2 => Ok(M::Bike),
            3 => Ok(M::Bikeshare),
            4 => Ok(M::Scootershare),
            5 => Ok(M::Taxi),
            6 => Ok(M::Tnc),
            7 => Ok(M::Other),
            8 => Ok(M::Car),
            9 => Ok(M::Carshare),
            10 => Ok(M::SchoolBus),
            11 => Ok(M::ShuttleOrVanpool),
            12 => Ok(M::Ferry),
            13 => Ok(M::Transit),
            14 => Ok(M::LongDistancePassenger),
            995 => Ok(M::Missing),
            other => Err(CodebookError::UnknownModeType(other)),
        }
    }
}

/// survey person type codes, used to derive a [`PersonCategory`] for
/// purpose priority lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum PersonType {
    FullTimeWorker,
    PartTimeWorker,
    Retired,
    NonWorker,
    UniversityStudent,
    HighSchoolStudent,
    Child5To15,
    ChildUnder5,
}

impl PersonType {
    pub fn code(&self) -> u16 {
        u16::from(*self)
    }

    /// collapses the detailed person type into the category used by the
    /// purpose priority table.
    pub fn category(&self) -> PersonCategory {
        use PersonType as T;
        match self {
            T::FullTimeWorker | T::PartTimeWorker => PersonCategory::Worker,
            T::UniversityStudent | T::HighSchoolStudent | T::Child5To15 => PersonCategory::Student,
            T::Retired | T::NonWorker | T::ChildUnder5 => PersonCategory::Other,
        }
    }
}

impl From<PersonType> for u16 {
    fn from(value: PersonType) -> Self {
        use PersonType as T;
        match value {
            T::FullTimeWorker => 1,
            T::PartTimeWorker => 2,
            T::Retired => 3,
            T::NonWorker => 4,
            T::UniversityStudent => 5,
            T::HighSchoolStudent => 6,
            T::Child5To15 => 7,
            T::ChildUnder5 => 8,
        }
    }
}

impl TryFrom<u16> for PersonType {
    type Error = CodebookError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        use PersonType as T;
        match value {
            1 => Ok(T::FullTimeWorker),
            2 => Ok(T::PartTimeWorker),
            3 => Ok(T::Retired),
            4 => Ok(T::NonWorker),
            5 => Ok(T::UniversityStudent),
            6 => Ok(T::HighSchoolStudent),
            7 => Ok(T::Child5To15),
            8 => Ok(T::ChildUnder5),
            other => Err(CodebookError::UnknownPersonType(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonCategory {
    Worker,
    Student,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Home,
    Work,
    School,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TourCategory {
    HomeBased,
    WorkBased,
}

/// position of a linked trip relative to its tour's primary destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HalfTour {
    Outbound,
    Inbound,
}
