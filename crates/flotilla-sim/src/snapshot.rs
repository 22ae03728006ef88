use flotilla_core::{Entity, EntityId, TeamId, Vec3};

/// Entity state as it stood at the end of a tick.
///
/// Snapshots are shared behind an `Arc`; a handle obtained from
/// [`crate::Simulation::snapshot`] stays valid and unchanged while later ticks
/// run.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    tick: u64,
    entities: Vec<Entity>,
}

impl Snapshot {
    pub(crate) fn new(tick: u64, entities: Vec<Entity>) -> Self {
        Self { tick, entities }
    }

    /// Overwrite in place; lengths always match since the population is fixed.
    pub(crate) fn copy_from(&mut self, tick: u64, live: &[Entity]) {
        self.tick = tick;
        self.entities.copy_from_slice(live);
    }

    /// Tick this snapshot was published at (0 before the first tick).
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// All records in slot order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the population is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Record at slot `index`.
    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    /// Record with the given id, or the sentinel.
    pub fn get_entity(&self, id: EntityId) -> Entity {
        self.entities
            .iter()
            .find(|e| e.id() == id)
            .copied()
            .unwrap_or_else(Entity::sentinel)
    }

    /// Nearest living entity not on `exclude_team`, or the sentinel.
    /// Ties go to the lowest slot.
    pub fn get_closest_entity(&self, position: Vec3, exclude_team: Option<TeamId>) -> Entity {
        self.entities
            .iter()
            .filter(|e| e.is_alive() && Some(e.team()) != exclude_team)
            .map(|e| (e.position.distance(position), e))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map_or_else(Entity::sentinel, |(_, e)| *e)
    }

    /// Iterate over active records.
    pub fn active(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.active)
    }

    /// Number of active entities on `team`.
    pub fn active_count(&self, team: TeamId) -> usize {
        self.active().filter(|e| e.team() == team).count()
    }
}
