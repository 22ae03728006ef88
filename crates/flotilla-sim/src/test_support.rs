use flotilla_core::{SpawnPoint, TeamConfig, TeamRoster, Vec3};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::event::EventLog;
use crate::inbox::Inbox;
use crate::store::EntityStore;
use crate::system::System;

/// Two teams with one spawn point each, far apart.
pub(crate) fn duel_config(per_team_capacity: usize) -> SimConfig {
    SimConfig::default()
        .with_per_team_capacity(per_team_capacity)
        .with_initial_spawn_delay(1000.0)
        .with_teams(vec![
            TeamConfig::new("Red", SpawnPoint::new(Vec3::new(-1000.0, 0.0, 0.0), Vec3::X)),
            TeamConfig::new("Blue", SpawnPoint::new(Vec3::new(1000.0, 0.0, 0.0), Vec3::NEG_X)),
        ])
}

/// Owns everything a [`SimContext`] borrows so single passes can be driven
/// in isolation.
pub(crate) struct Harness {
    pub store: EntityStore,
    pub inbox: Inbox,
    pub teams: TeamRoster,
    pub config: SimConfig,
    pub clock: SimClock,
    pub events: EventLog,
    pub rng: StdRng,
    pub player: Option<usize>,
}

impl Harness {
    pub fn new(config: SimConfig) -> Self {
        let store = EntityStore::new(config.teams.len(), config.per_team_capacity, &config.stats);
        let inbox = Inbox::new(store.len());
        let teams = TeamRoster::new(config.teams.clone()).unwrap();
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            store,
            inbox,
            teams,
            clock: SimClock::new(),
            events: EventLog::new(0),
            rng,
            player: None,
            config,
        }
    }

    /// Activate slot `index` at `position` heading along `velocity`.
    pub fn place(&mut self, index: usize, position: Vec3, velocity: Vec3) {
        let entity = &mut self.store.live_mut()[index];
        entity.active = true;
        entity.position = position;
        entity.velocity = velocity;
    }

    pub fn publish(&mut self) {
        self.store.publish(self.clock.tick());
    }

    pub fn run<S: System>(&mut self, system: &mut S, delta_time: f32) {
        self.clock.advance(delta_time);
        let mut ctx = SimContext {
            store: &mut self.store,
            inbox: &self.inbox,
            teams: &self.teams,
            config: &self.config,
            clock: &self.clock,
            events: &mut self.events,
            rng: &mut self.rng,
            player: self.player,
        };
        system.tick(&mut ctx);
    }
}
