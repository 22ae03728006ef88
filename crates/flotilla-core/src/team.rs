use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entity::TeamId;
use crate::error::{CoreError, CoreResult};

/// A place where a team's entities enter play.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// World position of the spawn point.
    pub position: Vec3,
    /// Direction newly spawned entities fly in.
    pub forward: Vec3,
    /// Unavailable points are skipped by the spawn scheduler.
    #[serde(default = "available_by_default")]
    pub available: bool,
}

fn available_by_default() -> bool {
    true
}

impl SpawnPoint {
    /// Create an available spawn point.
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward,
            available: true,
        }
    }
}

/// Static description of one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamConfig {
    /// Display name.
    pub name: String,
    /// Where members enter play. Must not be empty.
    pub spawn_points: Vec<SpawnPoint>,
    /// Waypoint members fly toward when they have no target.
    #[serde(default)]
    pub rally_point: Vec3,
}

impl TeamConfig {
    /// Create a team with a single spawn point and a rally point at the origin.
    pub fn new(name: impl Into<String>, spawn_point: SpawnPoint) -> Self {
        Self {
            name: name.into(),
            spawn_points: vec![spawn_point],
            rally_point: Vec3::ZERO,
        }
    }

    /// Add another spawn point.
    pub fn with_spawn_point(mut self, point: SpawnPoint) -> Self {
        self.spawn_points.push(point);
        self
    }

    /// Set the rally point.
    pub fn with_rally_point(mut self, rally_point: Vec3) -> Self {
        self.rally_point = rally_point;
        self
    }
}

/// The validated set of teams taking part in a simulation.
#[derive(Debug, Clone)]
pub struct TeamRoster {
    teams: Vec<TeamConfig>,
}

impl TeamRoster {
    /// Build a roster, rejecting teams without spawn points.
    ///
    /// An empty team list is accepted here; callers decide whether a
    /// population without teams makes sense.
    pub fn new(teams: Vec<TeamConfig>) -> CoreResult<Self> {
        if let Some(team) = teams.iter().find(|t| t.spawn_points.is_empty()) {
            return Err(CoreError::NoSpawnPoints {
                name: team.name.clone(),
            });
        }
        Ok(Self { teams })
    }

    /// Number of teams.
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// Returns `true` if the roster has no teams.
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Look up a team's configuration.
    pub fn get(&self, team: TeamId) -> Option<&TeamConfig> {
        self.teams.get(team.index())
    }

    /// Iterate over all teams with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (TeamId, &TeamConfig)> {
        self.teams
            .iter()
            .enumerate()
            .map(|(i, t)| (TeamId(i as u16), t))
    }

    /// Display name of a team, or `"?"` for unknown ids.
    pub fn name(&self, team: TeamId) -> &str {
        self.get(team).map_or("?", |t| t.name.as_str())
    }

    /// Rally point of a team, or the origin for unknown ids.
    pub fn rally_point(&self, team: TeamId) -> Vec3 {
        self.get(team).map_or(Vec3::ZERO, |t| t.rally_point)
    }

    /// Pick one of the team's spawn points uniformly, available or not.
    pub fn random_spawn_point<R: Rng>(&self, team: TeamId, rng: &mut R) -> Option<SpawnPoint> {
        let points = &self.get(team)?.spawn_points;
        if points.is_empty() {
            return None;
        }
        Some(points[rng.random_range(0..points.len())])
    }

    /// Toggle whether a spawn point may currently be used.
    pub fn set_spawn_point_available(
        &mut self,
        team: TeamId,
        index: usize,
        available: bool,
    ) -> CoreResult<()> {
        let config = self
            .teams
            .get_mut(team.index())
            .ok_or(CoreError::UnknownTeam(team))?;
        let point = config
            .spawn_points
            .get_mut(index)
            .ok_or(CoreError::UnknownSpawnPoint { team, index })?;
        point.available = available;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn two_teams() -> Vec<TeamConfig> {
        vec![
            TeamConfig::new("Red", SpawnPoint::new(Vec3::new(-100.0, 0.0, 0.0), Vec3::X))
                .with_spawn_point(SpawnPoint::new(Vec3::new(-100.0, 50.0, 0.0), Vec3::X)),
            TeamConfig::new("Blue", SpawnPoint::new(Vec3::new(100.0, 0.0, 0.0), Vec3::NEG_X))
                .with_rally_point(Vec3::new(0.0, 10.0, 0.0)),
        ]
    }

    #[test]
    fn roster_rejects_team_without_spawn_points() {
        let mut teams = two_teams();
        teams[1].spawn_points.clear();
        let err = TeamRoster::new(teams).unwrap_err();
        assert!(matches!(err, CoreError::NoSpawnPoints { ref name } if name == "Blue"));
    }

    #[test]
    fn roster_lookup_and_names() {
        let roster = TeamRoster::new(two_teams()).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.name(TeamId(0)), "Red");
        assert_eq!(roster.name(TeamId(9)), "?");
        assert_eq!(roster.rally_point(TeamId(1)), Vec3::new(0.0, 10.0, 0.0));
        let ids: Vec<_> = roster.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![TeamId(0), TeamId(1)]);
    }

    #[test]
    fn random_spawn_point_belongs_to_team() {
        let roster = TeamRoster::new(two_teams()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let point = roster.random_spawn_point(TeamId(0), &mut rng).unwrap();
            assert_eq!(point.position.x, -100.0);
        }
        assert!(roster.random_spawn_point(TeamId(5), &mut rng).is_none());
    }

    #[test]
    fn toggle_spawn_point_availability() {
        let mut roster = TeamRoster::new(two_teams()).unwrap();
        roster
            .set_spawn_point_available(TeamId(1), 0, false)
            .unwrap();
        assert!(!roster.get(TeamId(1)).unwrap().spawn_points[0].available);

        assert!(matches!(
            roster.set_spawn_point_available(TeamId(1), 3, false),
            Err(CoreError::UnknownSpawnPoint { index: 3, .. })
        ));
        assert!(matches!(
            roster.set_spawn_point_available(TeamId(4), 0, false),
            Err(CoreError::UnknownTeam(TeamId(4)))
        ));
    }

    #[test]
    fn spawn_point_availability_defaults_to_true() {
        let point: SpawnPoint =
            serde_json::from_str(r#"{"position": [1.0, 2.0, 3.0], "forward": [0.0, 0.0, 1.0]}"#)
                .unwrap();
        assert!(point.available);
        assert_eq!(point.position, Vec3::new(1.0, 2.0, 3.0));
    }
}
