use flotilla_core::{Entity, TeamId, Vec3};
use rayon::prelude::*;

use crate::snapshot::Snapshot;

const INITIAL_LIFETIME: f32 = 6.0;
const RETIRED_LIFETIME: f32 = -10.0;
const SIZE_STEP: f32 = 0.1;
const SPIN_STEP: f32 = 0.1;

/// What a renderer needs to draw one slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    /// World position.
    pub position: Vec3,
    /// Unit direction of travel since the previous sync.
    pub heading: Vec3,
    /// Owning team, for colouring.
    pub team: TeamId,
    /// Health at the last sync.
    pub health: f32,
    /// Whether the entity fired on the synced tick.
    pub shooting: bool,
    /// Draw scale in `0..=1`, ramping up after a spawn.
    pub size: f32,
    /// Remaining particle lifetime in seconds.
    pub lifetime: f32,
    /// Idle rotation of retired slots.
    pub spin: f32,
    /// False for inactive slots and the player.
    pub visible: bool,
}

impl RenderState {
    fn new(team: TeamId) -> Self {
        Self {
            position: Vec3::ZERO,
            heading: Vec3::ZERO,
            team,
            health: 0.0,
            shooting: false,
            size: 0.0,
            lifetime: INITIAL_LIFETIME,
            spin: 0.0,
            visible: false,
        }
    }

    fn follow(&mut self, entity: &Entity, is_player: bool) {
        self.heading = (entity.position - self.position).normalize_or_zero();
        self.position = entity.position;
        self.team = entity.team();
        self.health = entity.health;
        self.shooting = entity.shooting;
        self.lifetime = (self.lifetime + 1.0).clamp(0.1, 10.0);
        self.spin = 0.0;
        self.size = (self.size + SIZE_STEP).clamp(0.0, 1.0);
        self.visible = !is_player;
    }

    fn retire(&mut self) {
        self.position = Vec3::ZERO;
        self.shooting = false;
        self.lifetime = RETIRED_LIFETIME;
        self.spin += SPIN_STEP;
        self.size = 0.0;
        self.visible = false;
    }
}

/// Render states for every slot, refreshed from published snapshots.
#[derive(Debug, Clone, Default)]
pub struct RenderBuffer {
    states: Vec<RenderState>,
}

impl RenderBuffer {
    /// Create a buffer shaped after `snapshot`.
    pub fn new(snapshot: &Snapshot) -> Self {
        Self {
            states: snapshot
                .entities()
                .iter()
                .map(|e| RenderState::new(e.team()))
                .collect(),
        }
    }

    /// Bring every slot up to date with `snapshot`. The `player` slot is
    /// tracked but kept invisible.
    pub fn sync(&mut self, snapshot: &Snapshot, player: Option<usize>) {
        let entities = snapshot.entities();
        if self.states.len() != entities.len() {
            *self = Self::new(snapshot);
        }
        self.states
            .par_iter_mut()
            .zip(entities.par_iter())
            .enumerate()
            .for_each(|(index, (state, entity))| {
                if entity.active {
                    state.follow(entity, player == Some(index));
                } else {
                    state.retire();
                }
            });
    }

    /// All render states, one per slot.
    pub fn states(&self) -> &[RenderState] {
        &self.states
    }

    /// Number of slots a renderer should draw.
    pub fn visible_count(&self) -> usize {
        self.states.iter().filter(|s| s.visible).count()
    }
}
