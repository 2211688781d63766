use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedsumError {
    /// Invalid target, parameter, or override combination.
    #[error("config error: {0}")]
    Config(String),

    /// Spill-file open/truncate/map failure.
    #[error("spill error: {0}")]
    Spill(String),

    /// Ancestry lookup miss during seed recovery.
    #[error("unable to find id {id} in stage {stage}")]
    UnknownAncestor { id: u64, stage: usize },

    /// Catch all for unexpected internal problems.
    #[error("internal error: {0}")]
    Internal(String),

    /// Propagated I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
