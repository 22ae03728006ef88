use log::debug;

use crate::context::SimContext;
use crate::event::{SimEvent, SimEventKind};
use crate::system::System;

/// Applies externally queued damage and recycles dead entities.
///
/// Runs before the flocking pass. Any slot whose health is at or below zero,
/// whether from queued damage or from a kill in the previous flocking pass,
/// is reported as dead, reset to default stats, deactivated, and moved to a
/// random spawn point of its team to wait for the spawn scheduler.
#[derive(Debug, Default)]
pub struct DamagePass;

impl DamagePass {
    /// Create the pass.
    pub fn new() -> Self {
        Self
    }
}

impl System for DamagePass {
    fn name(&self) -> &str {
        "damage"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) {
        let tick = ctx.clock.tick();
        let stats = &ctx.config.stats;

        for (index, entity) in ctx.store.live_mut().iter_mut().enumerate() {
            entity.health -= ctx.inbox.take_damage(index);
            if entity.health > 0.0 {
                continue;
            }

            ctx.events.push(SimEvent::new(
                tick,
                SimEventKind::EntityDied {
                    entity: entity.id(),
                    team: entity.team(),
                    position: entity.position,
                    velocity: entity.velocity,
                },
            ));
            debug!("{} ({}) destroyed at tick {tick}", entity.id(), entity.team());

            entity.reset(stats);
            if let Some(point) = ctx.teams.random_spawn_point(entity.team(), &mut *ctx.rng) {
                entity.position = point.position;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use flotilla_core::{EntityId, Vec3};

    use super::*;
    use crate::test_support::{Harness, duel_config};

    #[test]
    fn queued_damage_reduces_health() {
        let mut h = Harness::new(duel_config(2));
        h.place(0, Vec3::ZERO, Vec3::X);
        h.inbox.damage_entity(EntityId(0), 30.0);

        h.run(&mut DamagePass::new(), 0.1);

        let e = h.store.live()[0];
        assert!(e.active);
        assert_eq!(e.health, 70.0);
        assert_eq!(h.inbox.pending_damage(EntityId(0)), 0.0);
        assert!(h.events.is_empty());
    }

    #[test]
    fn lethal_external_damage_resets_and_relocates() {
        let mut h = Harness::new(duel_config(2));
        h.place(2, Vec3::new(5.0, 5.0, 5.0), Vec3::Y);
        h.store.live_mut()[2].target = Some(EntityId(0));
        h.inbox.damage_entity(EntityId(2), 150.0);

        h.run(&mut DamagePass::new(), 0.1);

        let e = h.store.live()[2];
        assert!(!e.active);
        assert_eq!(e.health, 100.0);
        assert_eq!(e.target, None);
        assert_eq!(e.position, Vec3::new(1000.0, 0.0, 0.0));
        assert_eq!(h.inbox.pending_damage(EntityId(2)), 0.0);

        let died: Vec<_> = h.events.events_for_entity(EntityId(2));
        assert_eq!(died.len(), 1);
        assert!(matches!(
            died[0].kind,
            SimEventKind::EntityDied { position, velocity, .. }
                if position == Vec3::new(5.0, 5.0, 5.0) && velocity == Vec3::Y
        ));
    }

    #[test]
    fn combat_kills_are_processed_on_the_next_pass() {
        let mut h = Harness::new(duel_config(1));
        h.place(1, Vec3::new(3.0, 0.0, 0.0), Vec3::X);
        let victim = &mut h.store.live_mut()[1];
        victim.health = -2.0;
        victim.active = false;

        h.run(&mut DamagePass::new(), 0.1);

        let e = h.store.live()[1];
        assert!(!e.active);
        assert_eq!(e.health, 100.0);
        assert_eq!(h.events.len(), 1);
    }

    #[test]
    fn healthy_inactive_slots_are_left_alone() {
        let mut h = Harness::new(duel_config(2));
        let before = h.store.live().to_vec();
        h.run(&mut DamagePass::new(), 0.1);
        assert_eq!(h.store.live(), &before[..]);
    }
}
