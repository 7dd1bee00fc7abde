mod mode_hierarchy;
mod purpose_priority;

pub use mode_hierarchy::ModeHierarchy;
pub use purpose_priority::PurposePriority;

#[derive(thiserror::Error, Debug)]
pub enum RankingError {
    #[error("mode hierarchy must not be empty")]
    EmptyModeHierarchy,
    #[error("mode hierarchy contains duplicate mode: {0:?}")]
    DuplicateMode(crate::model::ModeType),
}
