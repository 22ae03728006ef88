use std::sync::Arc;

use flotilla_core::{Entity, EntityId, TeamId, TeamRoster, Vec3};
use log::{debug, info, trace};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::damage::DamagePass;
use crate::error::SimResult;
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::flocking::FlockingPass;
use crate::focus::FocusTracker;
use crate::inbox::Inbox;
use crate::presentation::RenderBuffer;
use crate::snapshot::Snapshot;
use crate::spawn::SpawnScheduler;
use crate::store::EntityStore;
use crate::system::System;

/// The top-level simulation orchestrator.
///
/// Owns the entity store, clock, RNG, event log, and the fixed pass
/// pipeline. Each tick applies a pending reset, refreshes the player
/// designation, runs spawn, damage, and flocking in that order, and then
/// publishes the live buffer as the new snapshot.
pub struct Simulation {
    config: SimConfig,
    teams: TeamRoster,
    store: EntityStore,
    inbox: Arc<Inbox>,
    clock: SimClock,
    rng: StdRng,
    events: EventLog,
    systems: Vec<Box<dyn System>>,
    focus: FocusTracker,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.clock.tick())
            .field("slots", &self.store.len())
            .field("systems", &self.systems.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl Simulation {
    /// Validate `config` and build a population of inactive slots.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let teams = TeamRoster::new(config.teams.clone())?;
        let store = EntityStore::new(teams.len(), config.per_team_capacity, &config.stats);
        let inbox = Arc::new(Inbox::new(store.len()));
        let systems: Vec<Box<dyn System>> = vec![
            Box::new(SpawnScheduler::new(&config)),
            Box::new(DamagePass::new()),
            Box::new(FlockingPass::new()),
        ];
        info!(
            "simulation ready: {} teams, {} slots, seed {}",
            teams.len(),
            store.len(),
            config.seed
        );
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            events: EventLog::new(config.max_events),
            focus: FocusTracker::new(config.focus_team),
            clock: SimClock::new(),
            config,
            teams,
            store,
            inbox,
            systems,
        })
    }

    /// Advance the simulation by one tick of `delta_time` seconds.
    pub fn tick(&mut self, delta_time: f32) {
        let tick = self.clock.advance(delta_time);

        if self.inbox.take_reset() {
            self.store.reset_all(&self.config.stats);
            self.inbox.clear_damage();
            self.focus.reset();
            for system in &mut self.systems {
                system.reset();
            }
            self.events.push(SimEvent::new(tick, SimEventKind::PopulationReset));
            info!("population reset at tick {tick}");
        }

        let player = self.focus.update(self.store.live(), &mut self.rng);

        for system in &mut self.systems {
            let mut ctx = SimContext {
                store: &mut self.store,
                inbox: &self.inbox,
                teams: &self.teams,
                config: &self.config,
                clock: &self.clock,
                events: &mut self.events,
                rng: &mut self.rng,
                player,
            };
            trace!("tick {tick}: running {}", system.name());
            system.tick(&mut ctx);
        }

        self.store.publish(tick);
        trace!(
            "tick {tick}: {} active, {} events",
            self.store.snapshot().active().count(),
            self.events.len()
        );
    }

    /// Advance the simulation by `n` ticks of `delta_time` seconds each.
    pub fn run(&mut self, n: u64, delta_time: f32) {
        for _ in 0..n {
            self.tick(delta_time);
        }
    }

    /// The most recently published snapshot. The handle stays valid and
    /// unchanged across later ticks.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(self.store.snapshot())
    }

    /// Published record for `id`, or the sentinel.
    pub fn get_entity(&self, id: EntityId) -> Entity {
        self.store.snapshot().get_entity(id)
    }

    /// Nearest published living entity not on `exclude_team`, or the
    /// sentinel.
    pub fn get_closest_entity(&self, position: Vec3, exclude_team: Option<TeamId>) -> Entity {
        self.store.snapshot().get_closest_entity(position, exclude_team)
    }

    /// Queue damage against `id`, applied at the start of the next tick.
    pub fn damage_entity(&self, id: EntityId, amount: f32) {
        self.inbox.damage_entity(id, amount);
    }

    /// Request a full population reset at the start of the next tick.
    pub fn reset_entities(&self) {
        self.inbox.reset_entities();
    }

    /// Shared handle for sending damage and reset requests from other
    /// threads.
    pub fn inbox(&self) -> Arc<Inbox> {
        Arc::clone(&self.inbox)
    }

    /// Enable or disable a team's spawn point.
    pub fn set_spawn_point_available(&mut self, team: TeamId, index: usize, available: bool) -> SimResult<()> {
        self.teams.set_spawn_point_available(team, index, available)?;
        Ok(())
    }

    /// Pin the player to `id`, or return to automatic selection. Ids outside
    /// the population are ignored.
    pub fn set_player(&mut self, id: Option<EntityId>) {
        match id {
            None => self.focus.set_pinned(None),
            Some(id) => match id.index().filter(|&i| i < self.store.len()) {
                Some(index) => self.focus.set_pinned(Some(index)),
                None => debug!("ignoring player designation of unknown {id}"),
            },
        }
    }

    /// Slot currently designated as the player.
    pub fn player(&self) -> Option<EntityId> {
        self.focus.current().map(EntityId::from_index)
    }

    /// Apply `edit` to every slot between ticks and republish, so the change
    /// is visible to queries immediately.
    pub fn edit_entities(&mut self, edit: impl FnOnce(&mut [Entity])) {
        edit(self.store.live_mut());
        self.store.publish(self.clock.tick());
    }

    /// Refresh `buffer` from the current snapshot.
    pub fn sync_render(&self, buffer: &mut RenderBuffer) {
        buffer.sync(self.store.snapshot(), self.focus.current());
    }

    /// Events recorded so far.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Take all recorded events, leaving the log empty.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn teams(&self) -> &TeamRoster {
        &self.teams
    }

    /// Names of the per-tick passes, in execution order.
    pub fn passes(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|system| system.name())
    }

    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Stop the simulation and return its final snapshot.
    pub fn shutdown(self) -> Arc<Snapshot> {
        info!(
            "simulation stopped at tick {} ({:.1}s simulated)",
            self.clock.tick(),
            self.clock.elapsed_seconds()
        );
        Arc::clone(self.store.snapshot())
    }
}
