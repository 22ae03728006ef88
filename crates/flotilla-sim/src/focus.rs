use flotilla_core::{Entity, TeamId};
use rand::Rng;

/// Chooses which slot, if any, is the player.
///
/// The player is never selected as a new target and is hidden from the
/// render buffer. A pinned slot always wins; otherwise, when a focus team is
/// set, the tracker follows one active member of that team and picks a new
/// one at random once it leaves play.
#[derive(Debug, Clone, Default)]
pub struct FocusTracker {
    team: Option<TeamId>,
    pinned: Option<usize>,
    current: Option<usize>,
}

impl FocusTracker {
    /// Create a tracker that follows `team`, or nothing.
    pub fn new(team: Option<TeamId>) -> Self {
        Self {
            team,
            pinned: None,
            current: None,
        }
    }

    /// Pin the player to a slot, or release the pin.
    pub fn set_pinned(&mut self, index: Option<usize>) {
        self.pinned = index;
        self.current = index;
    }

    /// The slot currently designated as player.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Refresh the designation against the live population.
    pub fn update<R: Rng>(&mut self, live: &[Entity], rng: &mut R) -> Option<usize> {
        if self.pinned.is_some() {
            self.current = self.pinned;
            return self.current;
        }
        let Some(team) = self.team else {
            self.current = None;
            return None;
        };

        let keep = self
            .current
            .and_then(|i| live.get(i))
            .is_some_and(|e| e.active && e.team() == team);
        if !keep {
            let candidates: Vec<usize> = live
                .iter()
                .enumerate()
                .filter(|(_, e)| e.active && e.team() == team)
                .map(|(i, _)| i)
                .collect();
            self.current = if candidates.is_empty() {
                None
            } else {
                Some(candidates[rng.random_range(0..candidates.len())])
            };
        }
        self.current
    }

    /// Forget the followed slot; the pin is kept.
    pub fn reset(&mut self) {
        self.current = self.pinned;
    }
}

#[cfg(test)]
mod tests {
    use flotilla_core::{EntityId, EntityStats, Vec3};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn population() -> Vec<Entity> {
        let stats = EntityStats::default();
        (0..6)
            .map(|i| Entity::new(EntityId::from_index(i), TeamId((i / 3) as u16), &stats))
            .collect()
    }

    #[test]
    fn no_team_means_no_player() {
        let mut live = population();
        live[0].spawn(Vec3::ZERO, Vec3::X, Vec3::ZERO);
        let mut focus = FocusTracker::new(None);
        assert_eq!(focus.update(&live, &mut StdRng::seed_from_u64(1)), None);
    }

    #[test]
    fn follows_active_member_of_team() {
        let mut live = population();
        live[4].spawn(Vec3::ZERO, Vec3::X, Vec3::ZERO);
        live[1].spawn(Vec3::ZERO, Vec3::X, Vec3::ZERO);
        let mut rng = StdRng::seed_from_u64(1);
        let mut focus = FocusTracker::new(Some(TeamId(1)));

        assert_eq!(focus.update(&live, &mut rng), Some(4));
        live[5].spawn(Vec3::ZERO, Vec3::X, Vec3::ZERO);
        assert_eq!(focus.update(&live, &mut rng), Some(4));

        live[4].active = false;
        assert_eq!(focus.update(&live, &mut rng), Some(5));

        live[5].active = false;
        assert_eq!(focus.update(&live, &mut rng), None);
    }

    #[test]
    fn pin_overrides_team() {
        let live = population();
        let mut focus = FocusTracker::new(Some(TeamId(0)));
        focus.set_pinned(Some(2));
        assert_eq!(focus.update(&live, &mut StdRng::seed_from_u64(1)), Some(2));

        focus.set_pinned(None);
        focus.reset();
        assert_eq!(focus.current(), None);
    }
}
