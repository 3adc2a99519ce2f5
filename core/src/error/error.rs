use thiserror::Error;

/// Errors surfaced by plan reads and by the log stream.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("invalid value for plan ID")]
    InvalidPlanId,
    #[error("plan {plan_id} not found")]
    NotFound { plan_id: String },
    #[error("plan {plan_id} does not have a log URL")]
    MissingLogUrl { plan_id: String },
    #[error("invalid log URL {url:?}: {reason}")]
    InvalidLogUrl { url: String, reason: String },
    #[error("transport error: {0}")]
    Transport(#[source] anyhow::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("log stream cancelled")]
    Cancelled,
    #[error("log stream already failed; open a new stream")]
    ReaderFailed,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlanError {
    pub fn transport(err: impl Into<anyhow::Error>) -> Self {
        PlanError::Transport(err.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PlanError::Cancelled)
    }
}

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        PlanError::Parse(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Plan(#[from] PlanError),
    #[error("command failed: {0}")]
    Command(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}
