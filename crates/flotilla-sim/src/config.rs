use flotilla_core::{EntityStats, SpawnPoint, TeamConfig, TeamId, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Tuning constants for the flocking and combat pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// Same-team neighbours closer than this feed cohesion and alignment.
    pub cohesion_radius: f32,
    /// Opposing entities closer than this are targeting candidates.
    pub engage_radius: f32,
    /// Any neighbour at or within this distance pushes the entity away.
    pub separation_radius: f32,
    /// Scale applied to each neighbour offset before it is summed into cohesion.
    pub cohesion_offset_scale: f32,
    /// Separation push is `-offset / (distance * separation_falloff)`.
    pub separation_falloff: f32,
    /// Weight of the averaged cohesion vector.
    pub cohesion_weight: f32,
    /// Weight of the averaged separation vector.
    pub separation_weight: f32,
    /// Weight of the averaged alignment vector.
    pub alignment_weight: f32,
    /// Weight of the direction toward a locked target.
    pub target_weight: f32,
    /// Minimum cosine between heading and target bearing needed to fire.
    pub facing_threshold: f32,
    /// Chance per candidate sighting of locking onto it.
    pub acquire_probability: f32,
    /// A target held this many ticks may be swapped for another candidate.
    pub target_age_limit: u32,
    /// Maximum heading change in degrees per second.
    pub max_turn_degrees_per_second: f32,
    /// Turn-rate multiplier while engaging the locked target.
    pub dogfight_multiplier: f32,
    /// Blend factor of the fast velocity stage.
    pub velocity_blend: f32,
    /// Blend factor of the slow smoothing buffer.
    pub smoothing: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            cohesion_radius: 100.0,
            engage_radius: 350.0,
            separation_radius: 50.0,
            cohesion_offset_scale: 0.1,
            separation_falloff: 0.1,
            cohesion_weight: 0.01,
            separation_weight: 0.5,
            alignment_weight: 0.1,
            target_weight: 2.0,
            facing_threshold: 0.5,
            acquire_probability: 0.03,
            target_age_limit: 5000,
            max_turn_degrees_per_second: 100.0,
            dogfight_multiplier: 2.0,
            velocity_blend: 0.5,
            smoothing: 0.1,
        }
    }
}

impl SteeringConfig {
    fn validate(&self) -> SimResult<()> {
        let finite = [
            ("cohesion_radius", self.cohesion_radius),
            ("engage_radius", self.engage_radius),
            ("separation_radius", self.separation_radius),
            ("cohesion_offset_scale", self.cohesion_offset_scale),
            ("cohesion_weight", self.cohesion_weight),
            ("separation_weight", self.separation_weight),
            ("alignment_weight", self.alignment_weight),
            ("target_weight", self.target_weight),
            ("facing_threshold", self.facing_threshold),
            ("max_turn_degrees_per_second", self.max_turn_degrees_per_second),
            ("dogfight_multiplier", self.dogfight_multiplier),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SimError::InvalidConfig(format!("{name} must be finite, got {value}")));
        }
        if !(self.separation_falloff.is_finite() && self.separation_falloff > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "separation_falloff must be positive, got {}",
                self.separation_falloff
            )));
        }
        let unit = [
            ("acquire_probability", self.acquire_probability),
            ("velocity_blend", self.velocity_blend),
            ("smoothing", self.smoothing),
        ];
        if let Some((name, value)) = unit.iter().find(|(_, v)| !(0.0..=1.0).contains(v)) {
            return Err(SimError::InvalidConfig(format!("{name} must be within 0..=1, got {value}")));
        }
        Ok(())
    }
}

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for deterministic simulation.
    pub seed: u64,
    /// Slots reserved for each team.
    pub per_team_capacity: usize,
    /// Seconds between spawn attempts.
    pub spawn_interval: f32,
    /// Seconds before the first spawn attempt.
    pub initial_spawn_delay: f32,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited,
    /// which is only safe when the caller drains events every tick.
    pub max_events: usize,
    /// Run the neighbour scan on the rayon pool.
    pub parallel: bool,
    /// Team whose members are picked at random as the player entity.
    pub focus_team: Option<TeamId>,
    /// Base stats of every entity.
    pub stats: EntityStats,
    /// Flocking and combat tuning.
    pub steering: SteeringConfig,
    /// Participating teams, in id order.
    pub teams: Vec<TeamConfig>,
}

/// Default bound on retained events.
pub const DEFAULT_MAX_EVENTS: usize = 4096;

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            per_team_capacity: 1024,
            spawn_interval: 0.3,
            initial_spawn_delay: 1.0,
            max_events: DEFAULT_MAX_EVENTS,
            parallel: true,
            focus_team: None,
            stats: EntityStats::default(),
            steering: SteeringConfig::default(),
            teams: default_teams(),
        }
    }
}

/// Two teams facing each other across the origin.
fn default_teams() -> Vec<TeamConfig> {
    vec![
        TeamConfig::new(
            "Red",
            SpawnPoint::new(Vec3::new(-600.0, 0.0, 0.0), Vec3::X),
        )
        .with_spawn_point(SpawnPoint::new(Vec3::new(-600.0, 150.0, 100.0), Vec3::X)),
        TeamConfig::new(
            "Blue",
            SpawnPoint::new(Vec3::new(600.0, 0.0, 0.0), Vec3::NEG_X),
        )
        .with_spawn_point(SpawnPoint::new(Vec3::new(600.0, -150.0, -100.0), Vec3::NEG_X)),
    ]
}

impl SimConfig {
    /// Set the RNG seed for deterministic simulation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of slots per team.
    pub fn with_per_team_capacity(mut self, capacity: usize) -> Self {
        self.per_team_capacity = capacity;
        self
    }

    /// Set the seconds between spawn attempts.
    pub fn with_spawn_interval(mut self, seconds: f32) -> Self {
        self.spawn_interval = seconds;
        self
    }

    /// Set the delay before the first spawn attempt.
    pub fn with_initial_spawn_delay(mut self, seconds: f32) -> Self {
        self.initial_spawn_delay = seconds;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Choose between the rayon and the single-threaded neighbour scan.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Pick the player entity at random from this team.
    pub fn with_focus_team(mut self, team: Option<TeamId>) -> Self {
        self.focus_team = team;
        self
    }

    /// Replace the base entity stats.
    pub fn with_stats(mut self, stats: EntityStats) -> Self {
        self.stats = stats;
        self
    }

    /// Replace the steering constants.
    pub fn with_steering(mut self, steering: SteeringConfig) -> Self {
        self.steering = steering;
        self
    }

    /// Replace the team list.
    pub fn with_teams(mut self, teams: Vec<TeamConfig>) -> Self {
        self.teams = teams;
        self
    }

    /// Total number of entity slots.
    pub fn slot_count(&self) -> usize {
        self.teams.len().saturating_mul(self.per_team_capacity)
    }

    /// Check everything that can be checked without building the population.
    pub fn validate(&self) -> SimResult<()> {
        if self.teams.is_empty() {
            return Err(SimError::NoTeams);
        }
        if self.teams.len() > usize::from(u16::MAX) + 1 {
            return Err(SimError::InvalidConfig(format!(
                "{} teams configured, at most {} supported",
                self.teams.len(),
                usize::from(u16::MAX) + 1
            )));
        }
        if self.per_team_capacity == 0 {
            return Err(SimError::ZeroCapacity);
        }
        let slots = self.slot_count();
        if i32::try_from(slots).is_err() {
            return Err(SimError::TooManySlots { slots });
        }
        for (name, value) in [
            ("spawn_interval", self.spawn_interval),
            ("initial_spawn_delay", self.initial_spawn_delay),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if let Some(team) = self.focus_team.filter(|t| t.index() >= self.teams.len()) {
            return Err(SimError::InvalidConfig(format!("{team} does not exist")));
        }
        self.stats.validate()?;
        self.steering.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = SimConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.per_team_capacity, 1024);
        assert!((config.spawn_interval - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.teams.len(), 2);
        assert_eq!(config.slot_count(), 2048);
        assert_eq!(config.max_events, DEFAULT_MAX_EVENTS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_builder_chain() {
        let config = SimConfig::default()
            .with_seed(123)
            .with_per_team_capacity(16)
            .with_spawn_interval(0.1)
            .with_max_events(500)
            .with_parallel(false);
        assert_eq!(config.seed, 123);
        assert_eq!(config.per_team_capacity, 16);
        assert_eq!(config.max_events, 500);
        assert!(!config.parallel);
    }

    #[test]
    fn validate_rejects_empty_teams_and_zero_capacity() {
        let no_teams = SimConfig::default().with_teams(Vec::new());
        assert!(matches!(no_teams.validate(), Err(SimError::NoTeams)));

        let empty = SimConfig::default().with_per_team_capacity(0);
        assert!(matches!(empty.validate(), Err(SimError::ZeroCapacity)));
    }

    #[test]
    fn validate_rejects_oversized_population() {
        let huge = SimConfig::default().with_per_team_capacity(usize::MAX / 2);
        assert!(matches!(huge.validate(), Err(SimError::TooManySlots { .. })));
    }

    #[test]
    fn validate_rejects_bad_numbers() {
        let config = SimConfig::default().with_spawn_interval(f32::NAN);
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        let steering = SteeringConfig {
            acquire_probability: 1.5,
            ..SteeringConfig::default()
        };
        let config = SimConfig::default().with_steering(steering);
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        let config = SimConfig::default().with_focus_team(Some(TeamId(7)));
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn config_parses_partial_json() {
        let config: SimConfig = serde_json::from_str(
            r#"{
                "seed": 7,
                "per_team_capacity": 8,
                "steering": { "engage_radius": 200.0 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.per_team_capacity, 8);
        assert_eq!(config.steering.engage_radius, 200.0);
        assert_eq!(config.steering.cohesion_radius, 100.0);
        assert_eq!(config.teams.len(), 2);
    }

    #[test]
    fn config_json_roundtrip_keeps_teams() {
        let config = SimConfig::default().with_focus_team(Some(TeamId(1)));
        let json = serde_json::to_string(&config).unwrap();
        let back: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
