use crate::entity::TeamId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building or editing the static team/entity model.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A team was configured without any spawn point.
    #[error("team \"{name}\" has no spawn points")]
    NoSpawnPoints {
        /// The offending team's display name.
        name: String,
    },

    /// The requested team does not exist in the roster.
    #[error("unknown team: {0}")]
    UnknownTeam(TeamId),

    /// The requested spawn point index is out of range for its team.
    #[error("{team} has no spawn point #{index}")]
    UnknownSpawnPoint {
        /// The team that was addressed.
        team: TeamId,
        /// The out-of-range spawn point index.
        index: usize,
    },

    /// A base stat is not a finite, positive number.
    #[error("invalid stat {name}: {value}")]
    InvalidStat {
        /// The stat's field name.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
}
