use flotilla_core::CoreError;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Setup-time failures. A running simulation never fails; anomalies during a
/// tick degrade to no-ops.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Invalid team or stat configuration.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The configuration lists no teams.
    #[error("simulation needs at least one team")]
    NoTeams,

    /// `per_team_capacity` is zero.
    #[error("per-team capacity must be at least 1")]
    ZeroCapacity,

    /// The population does not fit the entity id range.
    #[error("population of {slots} slots exceeds the supported maximum")]
    TooManySlots {
        /// Requested slot count (`teams × per_team_capacity`), saturated.
        slots: usize,
    },

    /// A numeric setting is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
