use thiserror::Error;

/// Outcomes of a prediction query that are not a probability.
///
/// None of these are crashes: the caller reports them and carries on.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no fixture found between teams {team_a} and {team_b}")]
    FixtureNotFound { team_a: u32, team_b: u32 },

    #[error("insufficient statistics for team {team_id}")]
    InsufficientStats { team_id: u32 },

    #[error("upstream unavailable: {0:#}")]
    Upstream(#[source] anyhow::Error),

    #[error("local fixture store unreadable: {0:#}")]
    Storage(#[source] anyhow::Error),
}

impl PredictError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PredictError::FixtureNotFound { .. })
    }
}
