use flotilla_core::kinematics::random_in_unit_sphere;
use log::{debug, trace};

use crate::config::SimConfig;
use crate::context::SimContext;
use crate::event::SimEventKind;
use crate::system::System;

/// Brings inactive slots into play, at most one per interval.
///
/// When the timer lapses the scheduler takes the lowest inactive slot, picks
/// a random spawn point of that slot's team, and activates the slot there if
/// the point is available. A missed attempt is dropped, not queued; the timer
/// restarts either way.
#[derive(Debug)]
pub struct SpawnScheduler {
    interval: f32,
    timer: f32,
}

impl SpawnScheduler {
    /// Create a scheduler whose first attempt happens after the configured
    /// initial delay.
    pub fn new(config: &SimConfig) -> Self {
        Self {
            interval: config.spawn_interval,
            timer: config.initial_spawn_delay,
        }
    }

    /// Seconds until the next attempt.
    pub fn time_until_next(&self) -> f32 {
        self.timer.max(0.0)
    }
}

impl System for SpawnScheduler {
    fn name(&self) -> &str {
        "spawn"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) {
        self.timer -= ctx.delta_time();
        if self.timer > 0.0 {
            return;
        }
        self.timer = self.interval;

        let tick = ctx.tick();
        let live = ctx.store.live_mut();
        let Some(index) = live.iter().position(|e| e.is_spawnable()) else {
            trace!("no free slot to spawn into at tick {tick}");
            return;
        };

        let team = live[index].team();
        let Some(point) = ctx.teams.random_spawn_point(team, &mut *ctx.rng) else {
            return;
        };
        if !point.available {
            debug!("spawn point for {team} unavailable, skipping attempt");
            return;
        }

        let position = point.position + random_in_unit_sphere(&mut *ctx.rng);
        let entity = &mut live[index];
        entity.spawn(position, point.forward, ctx.teams.rally_point(team));
        let entity = entity.id();
        ctx.emit(SimEventKind::Spawned {
            entity,
            team,
            position,
        });
    }

    fn reset(&mut self) {
        self.timer = self.interval;
    }
}
