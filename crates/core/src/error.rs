#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Settings unavailable: {0}")]
    Settings(String),

    #[error("Catalog parse failed: {0}")]
    Parse(String),

    #[error("{0}")]
    Mutation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
