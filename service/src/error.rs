use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("aggregation graph for chain {0} is no longer running")]
    ChannelClosed(String),

    #[error("governance error: {0}")]
    Governance(#[from] referenda_governance::GovernanceError),

    #[error("logging already initialised: {0}")]
    Logging(String),
}
