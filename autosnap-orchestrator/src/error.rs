use autosnap_core::SnapError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("No filter pipeline given")]
    MissingPipeline,

    #[error(transparent)]
    Fetch(SnapError),

    #[error("Gave up after {attempts} inventory refetches; last action error: {last_error}")]
    RefetchLimitExceeded { attempts: u32, last_error: String },
}
