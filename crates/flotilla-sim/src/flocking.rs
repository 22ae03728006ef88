use std::sync::Arc;

use flotilla_core::kinematics::rotate_towards;
use flotilla_core::{Entity, EntityId, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::SteeringConfig;
use crate::context::SimContext;
use crate::event::{SimEvent, SimEventKind};
use crate::system::System;

/// Neighbourhood of one entity, gathered from the snapshot.
#[derive(Debug, Default, Clone, PartialEq)]
struct NeighborScan {
    cohesion: Vec3,
    alignment: Vec3,
    flock_count: u32,
    separation: Vec3,
    separation_count: u32,
    /// Opposing slots within engage range, in index order.
    enemies: Vec<usize>,
}

impl NeighborScan {
    /// Zero the sums, keeping the enemy list's allocation.
    fn clear(&mut self) {
        self.cohesion = Vec3::ZERO;
        self.alignment = Vec3::ZERO;
        self.flock_count = 0;
        self.separation = Vec3::ZERO;
        self.separation_count = 0;
        self.enemies.clear();
    }
}

/// Gather flocking sums and combat candidates for `me` at slot `index` into
/// `scan`, overwriting whatever it held.
///
/// Reads only the snapshot and `me`'s own position, neither of which other
/// entities modify during the pass, so scans may run in any order.
fn scan_neighbors(
    index: usize,
    me: &Entity,
    snapshot: &[Entity],
    steering: &SteeringConfig,
    scan: &mut NeighborScan,
) {
    scan.clear();
    for (i, other) in snapshot.iter().enumerate() {
        if i == index || !other.active {
            continue;
        }
        let offset = other.position - me.position;
        let distance = offset.length();

        if other.team() == me.team() {
            if distance < steering.cohesion_radius {
                scan.cohesion += offset * steering.cohesion_offset_scale;
                scan.alignment += other.velocity;
                scan.flock_count += 1;
            }
        } else if distance < steering.engage_radius {
            scan.enemies.push(i);
        }

        if distance > 0.0 && distance <= steering.separation_radius {
            scan.separation -= offset / (distance * steering.separation_falloff);
            scan.separation_count += 1;
        }
    }
}

/// SplitMix64 finaliser.
fn mix(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Targeting RNG for one entity on one tick.
fn targeting_rng(seed: u64, tick: u64, index: usize) -> StdRng {
    StdRng::seed_from_u64(mix(seed ^ mix(tick ^ mix(index as u64))))
}

/// Steering, target acquisition, weapon fire, and motion integration.
///
/// The pass runs in two phases. The neighbour scan reads only the published
/// snapshot and may run on the rayon pool. The resolve phase then walks the
/// population strictly in slot order: it is the only phase that writes, and
/// its cross-entity writes (health loss, same-tick deactivation of killed
/// targets) are therefore equivalent to a single sequential pass.
///
/// Scan buffers are kept per slot and refilled in place every tick.
#[derive(Debug, Default)]
pub struct FlockingPass {
    scans: Vec<NeighborScan>,
}

impl FlockingPass {
    /// Create the pass.
    pub fn new() -> Self {
        Self::default()
    }

    fn scan_all(&mut self, live: &[Entity], snapshot: &[Entity], steering: &SteeringConfig, parallel: bool) {
        let scan = |(index, (scan, me)): (usize, (&mut NeighborScan, &Entity))| {
            if me.active {
                scan_neighbors(index, me, snapshot, steering, scan);
            }
        };
        self.scans.resize_with(live.len(), NeighborScan::default);
        if parallel {
            self.scans
                .par_iter_mut()
                .zip(live.par_iter())
                .enumerate()
                .for_each(scan);
        } else {
            self.scans.iter_mut().zip(live.iter()).enumerate().for_each(scan);
        }
    }
}

impl System for FlockingPass {
    fn name(&self) -> &str {
        "flocking"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) {
        let steering = ctx.config.steering;
        let seed = ctx.config.seed;
        let tick = ctx.clock.tick();
        let delta_time = ctx.clock.delta_time();
        let player = ctx.player;
        let snapshot = Arc::clone(ctx.store.snapshot());
        let snapshot = snapshot.entities();

        for entity in ctx.store.live_mut() {
            entity.shooting = false;
        }
        self.scan_all(ctx.store.live(), snapshot, &steering, ctx.config.parallel);

        let live = ctx.store.live_mut();
        for (index, scan) in self.scans.iter().enumerate() {
            let mut me = live[index];
            if !me.active {
                // never scanned, or killed earlier in this pass
                continue;
            }

            me.fire_cooldown -= delta_time;
            let mut turn_multiplier = 1.0;
            let mut target_facing = 0.0;

            let locked = me
                .target
                .and_then(EntityId::index)
                .and_then(|i| snapshot.get(i))
                .filter(|t| t.active);
            let target_dir = match locked {
                Some(target) => {
                    let dir = (target.position - me.position).normalize_or_zero();
                    target_facing = dir.dot(me.velocity.normalize_or_zero());
                    dir * steering.target_weight
                }
                None => {
                    me.clear_target();
                    (me.destination - me.position).normalize_or_zero()
                }
            };

            let mut rng = None;
            for &candidate in &scan.enemies {
                let candidate_id = EntityId::from_index(candidate);
                let may_retarget = me.target.is_none() || me.target_age >= steering.target_age_limit;

                if may_retarget && player != Some(candidate) {
                    let roll: f32 = rng
                        .get_or_insert_with(|| targeting_rng(seed, tick, index))
                        .random();
                    if roll < steering.acquire_probability {
                        me.target = Some(candidate_id);
                        me.target_age = 0;
                        ctx.events.push(SimEvent::new(
                            tick,
                            SimEventKind::TargetAcquired {
                                entity: me.id(),
                                target: candidate_id,
                            },
                        ));
                    }
                } else if me.target == Some(candidate_id) {
                    turn_multiplier = steering.dogfight_multiplier;

                    let target = &mut live[candidate];
                    if !target.active {
                        me.clear_target();
                        continue;
                    }

                    if target_facing > steering.facing_threshold && me.fire_cooldown <= 0.0 {
                        target.health -= me.damage;
                        me.shooting = true;
                        me.fire_cooldown = me.rate_of_fire;

                        let line = target.position - me.position;
                        ctx.events.push(SimEvent::new(
                            tick,
                            SimEventKind::ShotFired {
                                shooter: me.id(),
                                target: candidate_id,
                                origin: me.position,
                                direction: line.normalize_or_zero(),
                                distance: line.length(),
                            },
                        ));
                    }
                    if target.health <= 0.0 {
                        target.active = false;
                    }
                }
            }

            let mut cohesion = scan.cohesion;
            let mut alignment = scan.alignment;
            let mut separation = scan.separation;
            if scan.flock_count > 0 {
                cohesion /= scan.flock_count as f32;
                alignment /= scan.flock_count as f32;
            }
            if scan.separation_count > 0 {
                separation /= scan.separation_count as f32;
            }

            let blended = cohesion * steering.cohesion_weight
                + separation * steering.separation_weight
                + alignment * steering.alignment_weight
                + target_dir
                + me.velocity;
            let desired = (blended + Vec3::splat(f32::EPSILON)).normalize_or_zero();

            let max_turn = (steering.max_turn_degrees_per_second * delta_time).to_radians() * turn_multiplier;
            // desired is unit length, so the magnitude snaps to it
            let steered = rotate_towards(me.velocity, desired, max_turn, f32::INFINITY);

            me.velocity = me.velocity.lerp(
                me.smoothed_velocity.lerp(steered, steering.velocity_blend),
                steering.velocity_blend,
            );
            me.position += me.velocity * me.speed * delta_time;
            me.smoothed_velocity = me.smoothed_velocity.lerp(steered, steering.smoothing);
            me.target_age = me.target_age.saturating_add(1);

            live[index] = me;
        }
    }
}
