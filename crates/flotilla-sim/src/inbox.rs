use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use flotilla_core::EntityId;

/// Commands that collaborators may send from any thread at any time.
///
/// Damage is accumulated per slot as `f32` bits in an `AtomicU32`; adds are
/// compare-exchange loops, so concurrent callers never overwrite each other.
/// The simulation drains the accumulator once per tick and applies a pending
/// reset only at the start of a tick.
#[derive(Debug)]
pub struct Inbox {
    damage: Box<[AtomicU32]>,
    reset_pending: AtomicBool,
}

impl Inbox {
    /// Create an inbox for `slots` entities with no pending damage.
    pub fn new(slots: usize) -> Self {
        Self {
            damage: (0..slots).map(|_| AtomicU32::new(0.0f32.to_bits())).collect(),
            reset_pending: AtomicBool::new(false),
        }
    }

    /// Number of slots covered.
    pub fn len(&self) -> usize {
        self.damage.len()
    }

    /// Returns `true` if the inbox covers no slots.
    pub fn is_empty(&self) -> bool {
        self.damage.is_empty()
    }

    /// Queue `amount` damage against `id` for the next tick. Unknown ids and
    /// amounts that are not finite and positive are ignored.
    pub fn damage_entity(&self, id: EntityId, amount: f32) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        let Some(slot) = id.index().and_then(|i| self.damage.get(i)) else {
            return;
        };
        // The closure always returns Some, so the update cannot fail.
        let _ = slot.fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
            Some((f32::from_bits(bits) + amount).to_bits())
        });
    }

    /// Damage queued against `id` so far; zero for unknown ids.
    pub fn pending_damage(&self, id: EntityId) -> f32 {
        id.index()
            .and_then(|i| self.damage.get(i))
            .map_or(0.0, |slot| f32::from_bits(slot.load(Ordering::Acquire)))
    }

    /// Take and zero the damage queued for slot `index`.
    pub(crate) fn take_damage(&self, index: usize) -> f32 {
        self.damage
            .get(index)
            .map_or(0.0, |slot| f32::from_bits(slot.swap(0.0f32.to_bits(), Ordering::AcqRel)))
    }

    /// Zero every slot's queued damage.
    pub(crate) fn clear_damage(&self) {
        for slot in self.damage.iter() {
            slot.store(0.0f32.to_bits(), Ordering::Release);
        }
    }

    /// Request a full population reset at the start of the next tick.
    pub fn reset_entities(&self) {
        self.reset_pending.store(true, Ordering::Release);
    }

    /// Whether a reset has been requested and not yet applied.
    pub fn reset_pending(&self) -> bool {
        self.reset_pending.load(Ordering::Acquire)
    }

    /// Consume a pending reset request.
    pub(crate) fn take_reset(&self) -> bool {
        self.reset_pending.swap(false, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn damage_accumulates_and_drains() {
        let inbox = Inbox::new(4);
        inbox.damage_entity(EntityId(2), 10.0);
        inbox.damage_entity(EntityId(2), 5.5);
        assert_eq!(inbox.pending_damage(EntityId(2)), 15.5);
        assert_eq!(inbox.take_damage(2), 15.5);
        assert_eq!(inbox.pending_damage(EntityId(2)), 0.0);
    }

    #[test]
    fn invalid_ids_are_ignored() {
        let inbox = Inbox::new(2);
        inbox.damage_entity(EntityId(-1), 10.0);
        inbox.damage_entity(EntityId(2), 10.0);
        assert_eq!(inbox.pending_damage(EntityId(0)), 0.0);
        assert_eq!(inbox.pending_damage(EntityId(1)), 0.0);
        assert_eq!(inbox.pending_damage(EntityId(9)), 0.0);
        assert_eq!(inbox.take_damage(9), 0.0);
    }

    #[test]
    fn non_finite_and_negative_amounts_are_ignored() {
        let inbox = Inbox::new(1);
        inbox.damage_entity(EntityId(0), 5.0);
        inbox.damage_entity(EntityId(0), f32::NAN);
        inbox.damage_entity(EntityId(0), f32::INFINITY);
        inbox.damage_entity(EntityId(0), -50.0);
        inbox.damage_entity(EntityId(0), 0.0);
        assert_eq!(inbox.pending_damage(EntityId(0)), 5.0);
    }

    #[test]
    fn concurrent_damage_is_additive() {
        let inbox = Inbox::new(1);
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..1000 {
                        inbox.damage_entity(EntityId(0), 1.0);
                    }
                });
            }
        });
        assert_eq!(inbox.pending_damage(EntityId(0)), 8000.0);
    }

    #[test]
    fn reset_flag_is_taken_once() {
        let inbox = Inbox::new(1);
        assert!(!inbox.take_reset());
        inbox.reset_entities();
        inbox.reset_entities();
        assert!(inbox.reset_pending());
        assert!(inbox.take_reset());
        assert!(!inbox.take_reset());
    }

    #[test]
    fn clear_damage_zeroes_all_slots() {
        let inbox = Inbox::new(3);
        inbox.damage_entity(EntityId(0), 1.0);
        inbox.damage_entity(EntityId(2), 2.0);
        inbox.clear_damage();
        assert_eq!(inbox.pending_damage(EntityId(0)), 0.0);
        assert_eq!(inbox.pending_damage(EntityId(2)), 0.0);
    }
}
