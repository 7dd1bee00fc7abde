use serde::{Deserialize, Serialize};

use super::RankingError;
use crate::model::ModeType;

/// ordered list of mode codes, ascending in importance. the
/// highest-ranked mode appearing among a collection of trips or segments
/// is the "main" mode, reflecting the modeling convention that the main
/// mode of a multi-modal trip is the highest-capacity transit-like mode,
/// not the mode used longest.
///
/// shared read-only configuration: the linker and the tour builder both
/// rank against the same hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<ModeType>", into = "Vec<ModeType>")]
pub struct ModeHierarchy {
    order: Vec<ModeType>,
}

impl ModeHierarchy {
    /// an empty hierarchy is malformed configuration and aborts before
    /// any processing begins.
    pub fn new(order: Vec<ModeType>) -> Result<ModeHierarchy, RankingError> {
        if order.is_empty() {
            return Err(RankingError::EmptyModeHierarchy);
        }
        for (i, mode) in order.iter().enumerate() {
            if order[..i].contains(mode) {
                return Err(RankingError::DuplicateMode(*mode));
            }
        }
        Ok(ModeHierarchy { order })
    }

    /// rank of a mode, 1-based in hierarchy order. modes absent from the
    /// hierarchy rank 0, below every listed mode.
    pub fn rank(&self, mode: ModeType) -> usize {
        self.order
            .iter()
            .position(|m| *m == mode)
            .map(|idx| idx + 1)
            .unwrap_or(0)
    }

    /// the highest-ranked mode among `modes`. ties (all-unranked inputs)
    /// keep the earliest occurrence, so the result is deterministic for a
    /// given input order. `None` only for an empty input.
    pub fn dominant<I>(&self, modes: I) -> Option<ModeType>
    where
        I: IntoIterator<Item = ModeType>,
    {
        modes.into_iter().fold(None, |best, mode| match best {
            None => Some(mode),
            Some(current) => {
                if self.rank(mode) > self.rank(current) {
                    Some(mode)
                } else {
                    Some(current)
                }
            }
        })
    }
}

impl Default for ModeHierarchy {
    fn default() -> Self {
        ModeHierarchy {
            order: vec![
                ModeType::Walk,
                ModeType::Bike,
                ModeType::Car,
                ModeType::Transit,
            ],
        }
    }
}

impl TryFrom<Vec<ModeType>> for ModeHierarchy {
    type Error = RankingError;

    fn try_from(order: Vec<ModeType>) -> Result<Self, Self::Error> {
        ModeHierarchy::new(order)
    }
}

impl From<ModeHierarchy> for Vec<ModeType> {
    fn from(value: ModeHierarchy) -> Self {
        value.order
    }
}
