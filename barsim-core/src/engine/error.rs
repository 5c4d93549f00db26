use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A required collaborator was not supplied to the builder.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The engine already replayed its bars. Build a new one for another run.
    #[error("engine has already completed its run")]
    AlreadyCompleted,
}
