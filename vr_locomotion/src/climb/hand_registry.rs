use cgmath::Vector3;

use crate::{
    climb_log,
    host::{Body, HapticFeedback, OverlapActor},
    vr_config::Handedness,
};

use super::{HandClimbState, OverlapTracker};

#[derive(Clone, Debug)]
struct HandSlot {
    state: HandClimbState,
    overlaps: OverlapTracker,
}

/// Both hands, indexed by [`Handedness`], with at most one climbing at a time
///
/// Pairing is decided once, after spawning. An unpaired hand still climbs but
/// can't evict its sibling.
#[derive(Clone, Debug, Default)]
pub struct HandRegistry {
    slots: [Option<HandSlot>; 2],
    paired: bool,
}

impl HandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, hand: Handedness, haptic_effect: Option<String>) {
        self.slots[hand.index()] = Some(HandSlot {
            state: HandClimbState::new(hand, haptic_effect),
            overlaps: OverlapTracker::default(),
        });
    }

    /// Link left and right. Only succeeds when both hands exist.
    pub fn pair(&mut self) -> bool {
        self.paired = self.slots.iter().all(Option::is_some);
        self.paired
    }

    pub fn is_paired(&self) -> bool {
        self.paired
    }

    pub fn contains(&self, hand: Handedness) -> bool {
        self.slots[hand.index()].is_some()
    }

    pub fn get(&self, hand: Handedness) -> Option<&HandClimbState> {
        self.slots[hand.index()].as_ref().map(|slot| &slot.state)
    }

    fn get_mut(&mut self, hand: Handedness) -> Option<&mut HandClimbState> {
        self.slots[hand.index()].as_mut().map(|slot| &mut slot.state)
    }

    /// The hand currently driving the body, if any
    pub fn climbing_hand(&self) -> Option<Handedness> {
        Handedness::BOTH
            .into_iter()
            .find(|hand| self.get(*hand).is_some_and(HandClimbState::is_climbing))
    }

    /// Start climbing with `hand` if it's touching something climbable
    ///
    /// The paired hand is forced off the wall first, within this call.
    pub fn grip(&mut self, hand: Handedness, hand_position: Vector3<f32>, body: &mut dyn Body) -> bool {
        if !self.get(hand).is_some_and(HandClimbState::can_grip) {
            return false;
        }

        if self.paired {
            if let Some(other) = self.get_mut(hand.other()) {
                other.force_stop_climbing();
            }
        }

        match self.get_mut(hand) {
            Some(state) => {
                state.start_climbing(hand_position, body);
                true
            }
            None => false,
        }
    }

    pub fn release(&mut self, hand: Handedness, body: &mut dyn Body) -> bool {
        self.get_mut(hand).is_some_and(|state| state.release(body))
    }

    /// Feed this frame's overlap set for `hand`, firing begin/end handling on changes
    pub fn refresh_overlaps(
        &mut self,
        hand: Handedness,
        overlapping: &[OverlapActor],
        haptics: &mut dyn HapticFeedback,
    ) {
        let Some(slot) = self.slots[hand.index()].as_mut() else {
            return;
        };

        let changes = slot.overlaps.update(overlapping);
        if changes.began {
            slot.state.handle_overlap_begin(overlapping, haptics);
        }
        if changes.ended {
            slot.state.handle_overlap_end(overlapping);
        }
        if changes.began || changes.ended {
            climb_log!(TRACE, "{:?} hand overlaps changed, can climb: {}", hand, slot.state.can_climb());
        }
    }

    pub fn update_climbing(&self, hand: Handedness, hand_position: Vector3<f32>, body: &mut dyn Body) {
        if let Some(state) = self.get(hand) {
            state.update_climbing(hand_position, body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        climb::ClimbPhase,
        host::{MovementMode, simulated::SimulatedBody},
    };
    use cgmath::vec3;

    struct NoHaptics;

    impl HapticFeedback for NoHaptics {
        fn play_haptic_effect(&mut self, _effect: &str, _hand: Handedness) {}
    }

    fn climbable() -> Vec<OverlapActor> {
        vec![OverlapActor {
            id: 7,
            tags: vec!["Climbable".to_string()],
        }]
    }

    fn ready_pair() -> HandRegistry {
        let mut registry = HandRegistry::new();
        registry.insert(Handedness::Left, None);
        registry.insert(Handedness::Right, None);
        assert!(registry.pair());
        registry.refresh_overlaps(Handedness::Left, &climbable(), &mut NoHaptics);
        registry.refresh_overlaps(Handedness::Right, &climbable(), &mut NoHaptics);
        registry
    }

    #[test]
    fn test_grip_evicts_sibling_immediately() {
        let mut registry = ready_pair();
        let mut body = SimulatedBody::default();

        assert!(registry.grip(Handedness::Left, vec3(0.0, 0.0, 0.0), &mut body));
        assert_eq!(registry.climbing_hand(), Some(Handedness::Left));

        assert!(registry.grip(Handedness::Right, vec3(1.0, 0.0, 0.0), &mut body));

        assert!(!registry.get(Handedness::Left).unwrap().is_climbing());
        assert_eq!(registry.get(Handedness::Left).unwrap().phase(), ClimbPhase::ClimbReady);
        assert_eq!(registry.climbing_hand(), Some(Handedness::Right));
        assert_eq!(body.movement_mode(), MovementMode::Flying);
    }

    #[test]
    fn test_evicted_sibling_no_longer_moves_body() {
        let mut registry = ready_pair();
        let mut body = SimulatedBody::default();

        registry.grip(Handedness::Left, vec3(0.0, 0.0, 0.0), &mut body);
        registry.grip(Handedness::Right, vec3(5.0, 0.0, 0.0), &mut body);

        registry.update_climbing(Handedness::Left, vec3(0.0, -50.0, 0.0), &mut body);
        assert_eq!(body.position(), vec3(0.0, 0.0, 0.0));

        registry.update_climbing(Handedness::Right, vec3(5.0, -10.0, 0.0), &mut body);
        assert_eq!(body.position(), vec3(0.0, 10.0, 0.0));
    }

    #[test]
    fn test_grip_without_contact_is_noop() {
        let mut registry = HandRegistry::new();
        registry.insert(Handedness::Left, None);
        registry.insert(Handedness::Right, None);
        registry.pair();
        let mut body = SimulatedBody::default();

        assert!(!registry.grip(Handedness::Left, vec3(0.0, 0.0, 0.0), &mut body));
        assert_eq!(registry.climbing_hand(), None);
        assert_eq!(body.movement_mode(), MovementMode::Walking);
    }

    #[test]
    fn test_regrip_while_climbing_is_noop() {
        let mut registry = ready_pair();
        let mut body = SimulatedBody::default();

        registry.grip(Handedness::Left, vec3(0.0, 0.0, 0.0), &mut body);
        assert!(!registry.grip(Handedness::Left, vec3(9.0, 9.0, 9.0), &mut body));
        assert_eq!(
            registry.get(Handedness::Left).unwrap().climb_origin(),
            vec3(0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_release_of_idle_hand_is_noop() {
        let mut registry = ready_pair();
        let mut body = SimulatedBody::default();

        registry.grip(Handedness::Left, vec3(0.0, 0.0, 0.0), &mut body);
        assert!(!registry.release(Handedness::Right, &mut body));
        assert_eq!(registry.climbing_hand(), Some(Handedness::Left));
        assert_eq!(body.movement_mode(), MovementMode::Flying);
    }

    #[test]
    fn test_missing_hand_is_ignored() {
        let mut registry = HandRegistry::new();
        registry.insert(Handedness::Left, None);
        let mut body = SimulatedBody::default();

        assert!(!registry.pair());
        assert!(!registry.grip(Handedness::Right, vec3(0.0, 0.0, 0.0), &mut body));
        assert!(!registry.release(Handedness::Right, &mut body));
        registry.refresh_overlaps(Handedness::Right, &climbable(), &mut NoHaptics);
        assert!(registry.get(Handedness::Right).is_none());
    }

    #[test]
    fn test_unpaired_hand_still_climbs() {
        let mut registry = HandRegistry::new();
        registry.insert(Handedness::Left, None);
        registry.pair();
        registry.refresh_overlaps(Handedness::Left, &climbable(), &mut NoHaptics);
        let mut body = SimulatedBody::default();

        assert!(registry.grip(Handedness::Left, vec3(0.0, 0.0, 0.0), &mut body));
    }
}
