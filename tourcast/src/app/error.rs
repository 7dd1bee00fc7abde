use tourcast_core::linking::LinkingError;
use tourcast_core::tour::TourError;

#[derive(thiserror::Error, Debug)]
pub enum TourcastError {
    #[error("failure reading {filepath}: {error}")]
    ReadError { filepath: String, error: String },
    #[error("failure parsing run configuration {filepath}: {error}")]
    ConfigError { filepath: String, error: String },
    #[error("failure writing {filepath}: {error}")]
    WriteError { filepath: String, error: String },
    #[error(transparent)]
    Linking(#[from] LinkingError),
    #[error(transparent)]
    Tour(#[from] TourError),
}
