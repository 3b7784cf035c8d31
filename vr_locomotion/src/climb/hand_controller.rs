use cgmath::{Vector3, vec3};

use crate::{
    climb_log,
    host::{ActorId, Body, HapticFeedback, MovementMode, OverlapActor},
    vr_config::Handedness,
};

/// Tag marking world objects a hand may grab onto
pub const CLIMBABLE_TAG: &str = "Climbable";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClimbPhase {
    /// Not touching anything climbable
    Idle,
    /// Touching something climbable, not gripping
    ClimbReady,
    /// Gripping; this hand drives the body
    Climbing,
}

/// True when any overlapping actor carries the climbable tag
pub fn touches_climbable(overlapping: &[OverlapActor]) -> bool {
    overlapping.iter().any(|actor| actor.has_tag(CLIMBABLE_TAG))
}

/// Climbing state of one hand
#[derive(Clone, Debug)]
pub struct HandClimbState {
    hand: Handedness,
    can_climb: bool,
    is_climbing: bool,
    climb_origin: Vector3<f32>,
    haptic_effect: Option<String>,
}

impl HandClimbState {
    pub fn new(hand: Handedness, haptic_effect: Option<String>) -> Self {
        HandClimbState {
            hand,
            can_climb: false,
            is_climbing: false,
            climb_origin: vec3(0.0, 0.0, 0.0),
            haptic_effect,
        }
    }

    pub fn hand(&self) -> Handedness {
        self.hand
    }

    pub fn can_climb(&self) -> bool {
        self.can_climb
    }

    pub fn is_climbing(&self) -> bool {
        self.is_climbing
    }

    /// World position of the hand when the current grip started
    pub fn climb_origin(&self) -> Vector3<f32> {
        self.climb_origin
    }

    pub fn phase(&self) -> ClimbPhase {
        if self.is_climbing {
            ClimbPhase::Climbing
        } else if self.can_climb {
            ClimbPhase::ClimbReady
        } else {
            ClimbPhase::Idle
        }
    }

    /// Something started overlapping the hand; `overlapping` is the full current set
    ///
    /// Pulses the controller when this is the contact that made climbing possible.
    pub fn handle_overlap_begin(
        &mut self,
        overlapping: &[OverlapActor],
        haptics: &mut dyn HapticFeedback,
    ) {
        let can_climb = touches_climbable(overlapping);

        if !self.can_climb && can_climb && !self.is_climbing {
            if let Some(effect) = &self.haptic_effect {
                climb_log!(DEBUG, "{:?} hand touched climbable, playing {}", self.hand, effect);
                haptics.play_haptic_effect(effect, self.hand);
            }
        }

        self.can_climb = can_climb;
    }

    /// Something stopped overlapping the hand; `overlapping` is the full current set
    pub fn handle_overlap_end(&mut self, overlapping: &[OverlapActor]) {
        self.can_climb = touches_climbable(overlapping);
    }

    pub(crate) fn can_grip(&self) -> bool {
        self.can_climb && !self.is_climbing
    }

    pub(crate) fn start_climbing(&mut self, hand_position: Vector3<f32>, body: &mut dyn Body) {
        self.climb_origin = hand_position;
        self.is_climbing = true;
        body.set_movement_mode(MovementMode::Flying);
        climb_log!(DEBUG, "{:?} hand gripped at {:?}", self.hand, hand_position);
    }

    /// Drop the climbing flag without touching the body
    pub(crate) fn force_stop_climbing(&mut self) {
        self.is_climbing = false;
    }

    /// Let go; gravity applies again. No-op unless climbing.
    pub fn release(&mut self, body: &mut dyn Body) -> bool {
        if !self.is_climbing {
            return false;
        }

        self.is_climbing = false;
        body.set_movement_mode(MovementMode::Falling);
        climb_log!(DEBUG, "{:?} hand released", self.hand);
        true
    }

    /// Pull the body so the gripped point stays put in the world
    pub fn update_climbing(&self, hand_position: Vector3<f32>, body: &mut dyn Body) {
        if !self.is_climbing {
            return;
        }

        let hand_offset = hand_position - self.climb_origin;
        body.add_world_offset(-hand_offset);
    }
}

/// Which overlap edges happened since the previous frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlapChanges {
    pub began: bool,
    pub ended: bool,
}

/// Turns per-frame overlap sets into begin/end notifications
#[derive(Clone, Debug, Default)]
pub struct OverlapTracker {
    current: Vec<ActorId>,
}

impl OverlapTracker {
    pub fn update(&mut self, overlapping: &[OverlapActor]) -> OverlapChanges {
        let began = overlapping
            .iter()
            .any(|actor| !self.current.contains(&actor.id));
        let ended = self
            .current
            .iter()
            .any(|id| !overlapping.iter().any(|actor| actor.id == *id));

        self.current = overlapping.iter().map(|actor| actor.id).collect();

        OverlapChanges { began, ended }
    }
}
