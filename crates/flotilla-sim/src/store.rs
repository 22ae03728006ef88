use std::sync::Arc;

use flotilla_core::{Entity, EntityId, EntityStats, TeamId};

use crate::snapshot::Snapshot;

/// The double-buffered entity arena.
///
/// `live` is mutated by the passes of the current tick; `snapshot` holds the
/// previous tick's state and is only replaced by [`EntityStore::publish`].
/// Both are sized once and never grow.
#[derive(Debug)]
pub struct EntityStore {
    live: Vec<Entity>,
    snapshot: Arc<Snapshot>,
}

impl EntityStore {
    /// Build `team_count × per_team_capacity` inactive slots. Teams occupy
    /// contiguous blocks: slot `i` belongs to team `i / per_team_capacity`.
    pub fn new(team_count: usize, per_team_capacity: usize, stats: &EntityStats) -> Self {
        let live: Vec<Entity> = (0..team_count * per_team_capacity)
            .map(|i| {
                let team = TeamId((i / per_team_capacity) as u16);
                Entity::new(EntityId::from_index(i), team, stats)
            })
            .collect();
        let snapshot = Arc::new(Snapshot::new(0, live.clone()));
        Self { live, snapshot }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Returns `true` if there are no slots.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// The buffer being written this tick.
    pub fn live(&self) -> &[Entity] {
        &self.live
    }

    /// Mutable access to the buffer being written this tick.
    pub fn live_mut(&mut self) -> &mut [Entity] {
        &mut self.live
    }

    /// The last published state.
    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    /// Copy the live buffer into the snapshot. The existing snapshot
    /// allocation is reused unless a reader still holds it.
    pub fn publish(&mut self, tick: u64) {
        match Arc::get_mut(&mut self.snapshot) {
            Some(snapshot) => snapshot.copy_from(tick, &self.live),
            None => self.snapshot = Arc::new(Snapshot::new(tick, self.live.clone())),
        }
    }

    /// Return every slot to its initial inactive state.
    pub fn reset_all(&mut self, stats: &EntityStats) {
        for entity in &mut self.live {
            entity.reset(stats);
        }
    }
}
