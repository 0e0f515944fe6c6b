use thiserror::Error;
use tmc_link::LinkError;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("run configuration error: {0}")]
    Config(String),

    #[error("engine link error: {0}")]
    Link(#[from] LinkError),
}

pub type RunResult<T> = Result<T, RunError>;
