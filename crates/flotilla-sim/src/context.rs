use flotilla_core::TeamRoster;
use rand::rngs::StdRng;

use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::inbox::Inbox;
use crate::store::EntityStore;

/// Mutable context passed to each pass during a tick.
///
/// Fields are public so a pass can borrow disjoint parts at once, e.g. the
/// live buffer mutably while pushing events.
pub struct SimContext<'a> {
    /// Live and published entity buffers.
    pub store: &'a mut EntityStore,
    /// Externally queued damage and reset requests.
    pub inbox: &'a Inbox,
    /// Team configuration, including spawn points.
    pub teams: &'a TeamRoster,
    /// Run configuration.
    pub config: &'a SimConfig,
    /// Current tick and its duration.
    pub clock: &'a SimClock,
    /// Event sink.
    pub events: &'a mut EventLog,
    /// Seeded RNG for spawn and respawn placement.
    pub rng: &'a mut StdRng,
    /// Slot of the designated player entity, if any.
    pub player: Option<usize>,
}

impl SimContext<'_> {
    /// Emit a simulation event at the current tick.
    pub fn emit(&mut self, kind: SimEventKind) {
        self.events.push(SimEvent::new(self.clock.tick(), kind));
    }

    /// Current tick number.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Duration of the current tick in seconds.
    pub fn delta_time(&self) -> f32 {
        self.clock.delta_time()
    }
}
