use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Identifier of an entity slot. Slot `i` always carries id `i`.
///
/// The value `-1` is reserved for the sentinel record returned by failed
/// lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub i32);

impl EntityId {
    /// Id carried by the sentinel record.
    pub const SENTINEL: Self = Self(-1);

    /// Id of the slot at `index`. The store rejects populations whose slot
    /// count does not fit in an `i32`, so the cast never truncates.
    pub fn from_index(index: usize) -> Self {
        Self(index as i32)
    }

    /// Slot index for this id, or `None` for negative ids.
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Team an entity fights for. Teams are numbered in configuration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct TeamId(pub u16);

impl TeamId {
    /// Position of this team in the roster.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team {}", self.0)
    }
}

/// Per-entity base stats applied on initialisation and after every death.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityStats {
    /// Health a fresh entity starts with.
    pub health: f32,
    /// Damage dealt per shot.
    pub damage: f32,
    /// Seconds between shots.
    pub rate_of_fire: f32,
    /// Distance travelled per second at unit velocity.
    pub speed: f32,
    /// Base turning speed; doubled while dogfighting.
    pub turning_speed: f32,
}

impl Default for EntityStats {
    fn default() -> Self {
        Self {
            health: 100.0,
            damage: 3.0,
            rate_of_fire: 0.5,
            speed: 10.0,
            turning_speed: 50.0,
        }
    }
}

impl EntityStats {
    /// Reject non-finite values, non-positive health/speed/turning speed,
    /// and negative damage or fire interval.
    pub fn validate(&self) -> CoreResult<()> {
        let positive = [
            ("health", self.health),
            ("speed", self.speed),
            ("turning_speed", self.turning_speed),
        ];
        let non_negative = [("damage", self.damage), ("rate_of_fire", self.rate_of_fire)];

        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(CoreError::InvalidStat { name, value });
            }
        }
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::InvalidStat { name, value });
            }
        }
        Ok(())
    }
}

/// One simulated combat agent occupying a fixed slot.
///
/// `id` and `team` are fixed at construction and only readable; every other
/// field is plain state mutated by the simulation passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    team: TeamId,
    /// Whether the entity takes part in movement and combat.
    pub active: bool,
    /// Set on the tick a shot is fired; cleared at the start of the next
    /// flocking pass.
    pub shooting: bool,
    /// Remaining health.
    pub health: f32,
    /// Damage dealt per shot.
    pub damage: f32,
    /// Seconds between shots.
    pub rate_of_fire: f32,
    /// Seconds until the next shot is allowed; may go negative.
    pub fire_cooldown: f32,
    /// Distance travelled per second at unit velocity.
    pub speed: f32,
    /// Base turning speed.
    pub turning_speed: f32,
    /// World position.
    pub position: Vec3,
    /// Current heading; roughly unit length once the entity is steering.
    pub velocity: Vec3,
    /// Slow exponential average of the steering output.
    pub smoothed_velocity: Vec3,
    /// Waypoint used when there is no combat target.
    pub destination: Vec3,
    /// Enemy currently pursued.
    pub target: Option<EntityId>,
    /// Ticks since `target` was acquired.
    pub target_age: u32,
}

impl Entity {
    /// Create an inactive entity with default stats.
    pub fn new(id: EntityId, team: TeamId, stats: &EntityStats) -> Self {
        Self {
            id,
            team,
            active: false,
            shooting: false,
            health: stats.health,
            damage: stats.damage,
            rate_of_fire: stats.rate_of_fire,
            fire_cooldown: 0.0,
            speed: stats.speed,
            turning_speed: stats.turning_speed,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            smoothed_velocity: Vec3::ZERO,
            destination: Vec3::ZERO,
            target: None,
            target_age: 0,
        }
    }

    /// The inactive record returned when a lookup finds nothing.
    pub fn sentinel() -> Self {
        Self::new(EntityId::SENTINEL, TeamId::default(), &EntityStats::default())
    }

    /// This entity's slot id.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The team this entity fights for.
    pub fn team(&self) -> TeamId {
        self.team
    }

    /// Whether this is the lookup sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.id == EntityId::SENTINEL
    }

    /// Active with health left.
    pub fn is_alive(&self) -> bool {
        self.active && self.health > 0.0
    }

    /// Inactive and not waiting for its death to be processed.
    pub fn is_spawnable(&self) -> bool {
        !self.active && self.health > 0.0
    }

    /// Drop the current target and restart the engagement clock.
    pub fn clear_target(&mut self) {
        self.target = None;
        self.target_age = 0;
    }

    /// Return to the default inactive state, keeping `id` and `team`.
    pub fn reset(&mut self, stats: &EntityStats) {
        *self = Self::new(self.id, self.team, stats);
    }

    /// Activate at `position`, heading along `forward` at full speed.
    pub fn spawn(&mut self, position: Vec3, forward: Vec3, destination: Vec3) {
        self.position = position;
        self.velocity = forward * self.speed;
        self.destination = destination;
        self.active = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_index_roundtrip() {
        assert_eq!(EntityId::from_index(7).index(), Some(7));
        assert_eq!(EntityId::SENTINEL.index(), None);
        assert_eq!(EntityId(12).to_string(), "#12");
    }

    #[test]
    fn new_entity_is_inactive_with_defaults() {
        let e = Entity::new(EntityId(3), TeamId(1), &EntityStats::default());
        assert!(!e.active);
        assert_eq!(e.health, 100.0);
        assert_eq!(e.damage, 3.0);
        assert_eq!(e.target, None);
        assert_eq!(e.team(), TeamId(1));
        assert!(e.is_spawnable());
        assert!(!e.is_alive());
    }

    #[test]
    fn reset_keeps_identity() {
        let mut e = Entity::new(EntityId(5), TeamId(2), &EntityStats::default());
        e.spawn(Vec3::new(1.0, 2.0, 3.0), Vec3::X, Vec3::ZERO);
        e.health = -4.0;
        e.target = Some(EntityId(9));
        e.shooting = true;

        e.reset(&EntityStats::default());

        assert_eq!(e.id(), EntityId(5));
        assert_eq!(e.team(), TeamId(2));
        assert!(!e.active);
        assert!(!e.shooting);
        assert_eq!(e.health, 100.0);
        assert_eq!(e.target, None);
        assert_eq!(e.position, Vec3::ZERO);
    }

    #[test]
    fn spawn_scales_forward_by_speed() {
        let mut e = Entity::new(EntityId(0), TeamId(0), &EntityStats::default());
        e.spawn(Vec3::ONE, Vec3::Z, Vec3::new(0.0, 0.0, 50.0));
        assert!(e.is_alive());
        assert_eq!(e.velocity, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(e.destination.z, 50.0);
    }

    #[test]
    fn sentinel_is_recognisable() {
        let s = Entity::sentinel();
        assert!(s.is_sentinel());
        assert!(!s.active);
        assert_eq!(s.id(), EntityId(-1));
    }

    #[test]
    fn stats_validation() {
        assert!(EntityStats::default().validate().is_ok());

        let bad = EntityStats {
            speed: 0.0,
            ..EntityStats::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(CoreError::InvalidStat { name: "speed", .. })
        ));

        let bad = EntityStats {
            damage: f32::NAN,
            ..EntityStats::default()
        };
        assert!(bad.validate().is_err());

        let harmless = EntityStats {
            damage: 0.0,
            ..EntityStats::default()
        };
        assert!(harmless.validate().is_ok());
    }

    #[test]
    fn stats_deserialize_with_defaults() {
        let stats: EntityStats = serde_json::from_str(r#"{"damage": 7.5}"#).unwrap();
        assert_eq!(stats.damage, 7.5);
        assert_eq!(stats.health, 100.0);
    }
}
