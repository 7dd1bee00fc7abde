use serde::{Deserialize, Serialize};
use uom::si::f64::{Length, Time};

use super::LinkingError;
use crate::model::PurposeCategory;
use crate::ranking::ModeHierarchy;

/// configuration for merging raw trip segments into linked trips.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkingConfig {
    /// maximum dwell between a change-mode arrival and the next departure
    /// for the two segments to remain one trip.
    pub max_dwell_minutes: i64,
    /// spatial tolerance between a segment's destination and the next
    /// segment's origin at a transfer point. absorbs GPS noise, such as
    /// boarding a vehicle a few meters from where the walk leg ended.
    pub dwell_buffer_meters: f64,
    /// destination purpose marking a mode-transfer waypoint.
    pub change_mode_purpose: PurposeCategory,
    pub mode_hierarchy: ModeHierarchy,
}

impl LinkingConfig {
    /// maximum dwell as a unit-carrying time value.
    pub fn max_dwell(&self) -> Time {
        Time::new::<uom::si::time::minute>(self.max_dwell_minutes as f64)
    }

    /// dwell buffer as a unit-carrying length value.
    pub fn dwell_buffer(&self) -> Length {
        Length::new::<uom::si::length::meter>(self.dwell_buffer_meters)
    }

    /// malformed configuration aborts before processing begins; this is
    /// the only fatal error class in the linker.
    pub fn validate(&self) -> Result<(), LinkingError> {
        if self.max_dwell_minutes <= 0 {
            return Err(LinkingError::InvalidConfiguration(format!(
                "max_dwell_minutes must be positive, found {}",
                self.max_dwell_minutes
            )));
        }
        if !self.dwell_buffer_meters.is_finite() || self.dwell_buffer_meters < 0.0 {
            return Err(LinkingError::InvalidConfiguration(format!(
                "dwell_buffer_meters must be finite and non-negative, found {}",
                self.dwell_buffer_meters
            )));
        }
        Ok(())
    }
}

impl Default for LinkingConfig {
    fn default() -> Self {
        LinkingConfig {
            max_dwell_minutes: 120,
            dwell_buffer_meters: 100.0,
            change_mode_purpose: PurposeCategory::ChangeMode,
            mode_hierarchy: ModeHierarchy::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(LinkingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_non_positive_dwell_rejected() {
        let config = LinkingConfig {
            max_dwell_minutes: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_buffer_rejected() {
        let config = LinkingConfig {
            dwell_buffer_meters: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_uom_accessors_carry_units() {
        let config = LinkingConfig::default();
        let seconds = config.max_dwell().get::<uom::si::time::second>();
        assert_eq!(seconds, 120.0 * 60.0);
        let meters = config.dwell_buffer().get::<uom::si::length::meter>();
        assert_eq!(meters, 100.0);
    }
}
