use serde::{Deserialize, Serialize};
use uom::si::f64::{Length, Time};

use super::TourError;
use crate::model::LocationType;
use crate::ranking::{ModeHierarchy, PurposePriority};

/// how a repeated non-anchor location qualifies as a subtour anchor.
/// in both variants the revisit must be contiguous: a return to the
/// enclosing tour's anchor in between disqualifies the subtour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtourPolicy {
    /// only the person's usual workplace can anchor a subtour.
    ContiguousWorkplace,
    /// any non-home location departed from and contiguously returned to
    /// can anchor a subtour.
    ContiguousAnyLocation,
}

/// coordinate-match tolerances per known location type. survey
/// geocoding jitters by tens of meters, so anchor recognition compares
/// within a radius rather than exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceThresholds {
    pub home_meters: f64,
    pub work_meters: f64,
    pub school_meters: f64,
    pub other_meters: f64,
}

impl DistanceThresholds {
    pub fn meters_for(&self, location_type: LocationType) -> f64 {
        match location_type {
            LocationType::Home => self.home_meters,
            LocationType::Work => self.work_meters,
            LocationType::School => self.school_meters,
            LocationType::Other => self.other_meters,
        }
    }

    fn validate(&self) -> Result<(), TourError> {
        for (name, value) in [
            ("home_meters", self.home_meters),
            ("work_meters", self.work_meters),
            ("school_meters", self.school_meters),
            ("other_meters", self.other_meters),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TourError::InvalidConfiguration(format!(
                    "{name} must be finite and non-negative, found {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for DistanceThresholds {
    fn default() -> Self {
        DistanceThresholds {
            home_meters: 100.0,
            work_meters: 100.0,
            school_meters: 100.0,
            other_meters: 100.0,
        }
    }
}

/// configuration for assembling linked trips into tours.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    pub distance_thresholds: DistanceThresholds,
    pub purpose_priority: PurposePriority,
    pub mode_hierarchy: ModeHierarchy,
    /// assumed activity duration for the final destination of a day,
    /// which has no subsequent departure to measure against. prevents
    /// end-of-day activities from losing every duration tie-break.
    pub default_activity_duration_minutes: i64,
    pub subtour_policy: SubtourPolicy,
}

impl TourConfig {
    /// default last-activity duration as a unit-carrying time value.
    pub fn default_activity_duration(&self) -> Time {
        Time::new::<uom::si::time::minute>(self.default_activity_duration_minutes as f64)
    }

    /// anchor-match tolerance as a unit-carrying length value.
    pub fn threshold(&self, location_type: LocationType) -> Length {
        Length::new::<uom::si::length::meter>(self.distance_thresholds.meters_for(location_type))
    }

    pub fn validate(&self) -> Result<(), TourError> {
        self.distance_thresholds.validate()?;
        if self.default_activity_duration_minutes <= 0 {
            return Err(TourError::InvalidConfiguration(format!(
                "default_activity_duration_minutes must be positive, found {}",
                self.default_activity_duration_minutes
            )));
        }
        Ok(())
    }
}

impl Default for TourConfig {
    fn default() -> Self {
        TourConfig {
            distance_thresholds: DistanceThresholds::default(),
            purpose_priority: PurposePriority::default(),
            mode_hierarchy: ModeHierarchy::default(),
            default_activity_duration_minutes: 240,
            subtour_policy: SubtourPolicy::ContiguousWorkplace,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TourConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let config = TourConfig {
            distance_thresholds: DistanceThresholds {
                work_meters: -5.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_default_duration_rejected() {
        let config = TourConfig {
            default_activity_duration_minutes: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_uom_accessors_carry_units() {
        let config = TourConfig::default();
        let hours = config
            .default_activity_duration()
            .get::<uom::si::time::hour>();
        assert_eq!(hours, 4.0);
        let meters = config
            .threshold(LocationType::Home)
            .get::<uom::si::length::meter>();
        assert_eq!(meters, 100.0);
    }
}
