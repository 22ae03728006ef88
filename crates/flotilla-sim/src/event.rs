use std::collections::VecDeque;
use std::fmt;

use flotilla_core::{EntityId, TeamId, Vec3};

/// What kind of simulation event occurred.
///
/// Events are the edge-triggered side of the presentation boundary: a
/// renderer spawns a laser per [`SimEventKind::ShotFired`] and an explosion
/// per [`SimEventKind::EntityDied`] instead of polling flags.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEventKind {
    /// An inactive slot entered play.
    Spawned {
        /// The activated entity.
        entity: EntityId,
        /// Its team.
        team: TeamId,
        /// Where it appeared.
        position: Vec3,
    },
    /// An entity locked onto an enemy.
    TargetAcquired {
        /// The pursuing entity.
        entity: EntityId,
        /// The enemy it now pursues.
        target: EntityId,
    },
    /// An entity fired at its target.
    ShotFired {
        /// The entity that fired.
        shooter: EntityId,
        /// The entity that was hit.
        target: EntityId,
        /// Muzzle position.
        origin: Vec3,
        /// Unit direction from shooter to target.
        direction: Vec3,
        /// Distance the shot travelled.
        distance: f32,
    },
    /// An entity's health ran out; it has been reset and moved to a spawn point.
    EntityDied {
        /// The dead entity.
        entity: EntityId,
        /// Its team.
        team: TeamId,
        /// Last position before respawn relocation.
        position: Vec3,
        /// Last velocity before the reset.
        velocity: Vec3,
    },
    /// Every slot was returned to its initial state.
    PopulationReset,
}

impl SimEventKind {
    /// Check whether a given entity is involved in this event.
    pub fn involves(&self, id: EntityId) -> bool {
        match self {
            Self::Spawned { entity, .. } | Self::EntityDied { entity, .. } => *entity == id,
            Self::TargetAcquired { entity, target } => *entity == id || *target == id,
            Self::ShotFired {
                shooter, target, ..
            } => *shooter == id || *target == id,
            Self::PopulationReset => false,
        }
    }
}

impl fmt::Display for SimEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawned {
                entity,
                team,
                position,
            } => write!(
                f,
                "{entity} ({team}) spawned at ({:.1}, {:.1}, {:.1})",
                position.x, position.y, position.z
            ),
            Self::TargetAcquired { entity, target } => write!(f, "{entity} locked onto {target}"),
            Self::ShotFired {
                shooter,
                target,
                distance,
                ..
            } => write!(f, "{shooter} fired at {target} ({distance:.1} units)"),
            Self::EntityDied { entity, team, .. } => write!(f, "{entity} ({team}) destroyed"),
            Self::PopulationReset => write!(f, "population reset"),
        }
    }
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimEvent {
    /// The simulation tick when this event occurred.
    pub tick: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
}

impl SimEvent {
    /// Create a new simulation event at the given tick.
    pub fn new(tick: u64, kind: SimEventKind) -> Self {
        Self { tick, kind }
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[tick {}] {}", self.tick, self.kind)
    }
}

/// Accumulates events during a simulation run.
///
/// A bounded log keeps the newest `max_events` entries; the oldest is
/// dropped from the front on overflow.
#[derive(Debug, Default)]
pub struct EventLog {
    events: VecDeque<SimEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push_back(event);
        while self.max_events > 0 && self.events.len() > self.max_events {
            self.events.pop_front();
        }
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &VecDeque<SimEvent> {
        &self.events
    }

    /// Maximum number of retained events (0 = unlimited).
    pub fn max_events(&self) -> usize {
        self.max_events
    }

    /// Return all events that occurred at the given tick.
    pub fn events_at_tick(&self, tick: u64) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.tick == tick).collect()
    }

    /// Return all events involving the given entity.
    pub fn events_for_entity(&self, id: EntityId) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Remove and return every recorded event, oldest first.
    pub fn drain(&mut self) -> Vec<SimEvent> {
        Vec::from(std::mem::take(&mut self.events))
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn died(id: i32) -> SimEventKind {
        SimEventKind::EntityDied {
            entity: EntityId(id),
            team: TeamId(0),
            position: Vec3::ZERO,
            velocity: Vec3::X,
        }
    }

    #[test]
    fn event_log_push_and_query() {
        let mut log = EventLog::new(0);
        log.push(SimEvent::new(1, died(4)));
        assert_eq!(log.len(), 1);
        assert_eq!(log.events_at_tick(1).len(), 1);
        assert_eq!(log.events_for_entity(EntityId(4)).len(), 1);
        assert!(log.events_for_entity(EntityId(5)).is_empty());
    }

    #[test]
    fn event_log_max_events_trims() {
        let mut log = EventLog::new(2);
        for i in 0..5 {
            log.push(SimEvent::new(i, died(1)));
        }
        assert_eq!(log.len(), 2);
        // Oldest events were dropped, newest remain
        assert_eq!(log.events()[0].tick, 3);
        assert_eq!(log.events()[1].tick, 4);
    }

    #[test]
    fn bounded_log_never_exceeds_capacity() {
        let mut log = EventLog::new(64);
        for i in 0..10_000 {
            log.push(SimEvent::new(i, died(1)));
            assert!(log.len() <= 64);
        }
        assert_eq!(log.events().front().map(|e| e.tick), Some(10_000 - 64));
        assert_eq!(log.events().back().map(|e| e.tick), Some(9_999));
    }

    #[test]
    fn event_kind_involves_entity() {
        let shot = SimEventKind::ShotFired {
            shooter: EntityId(1),
            target: EntityId(2),
            origin: Vec3::ZERO,
            direction: Vec3::X,
            distance: 10.0,
        };
        assert!(shot.involves(EntityId(1)));
        assert!(shot.involves(EntityId(2)));
        assert!(!shot.involves(EntityId(3)));

        let lock = SimEventKind::TargetAcquired {
            entity: EntityId(3),
            target: EntityId(8),
        };
        assert!(lock.involves(EntityId(8)));
        assert!(!SimEventKind::PopulationReset.involves(EntityId(0)));
    }

    #[test]
    fn event_log_drain_empties() {
        let mut log = EventLog::new(0);
        log.push(SimEvent::new(1, died(0)));
        log.push(SimEvent::new(2, SimEventKind::PopulationReset));
        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[1].kind, SimEventKind::PopulationReset);
        assert!(log.is_empty());
    }

    #[test]
    fn event_display_is_readable() {
        let event = SimEvent::new(
            12,
            SimEventKind::ShotFired {
                shooter: EntityId(1),
                target: EntityId(2),
                origin: Vec3::ZERO,
                direction: Vec3::X,
                distance: 42.0,
            },
        );
        assert_eq!(event.to_string(), "[tick 12] #1 fired at #2 (42.0 units)");
        assert_eq!(
            died(3).to_string(),
            "#3 (team 0) destroyed"
        );
    }

    #[test]
    fn event_log_clear() {
        let mut log = EventLog::new(0);
        log.push(SimEvent::new(1, died(0)));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }
}
