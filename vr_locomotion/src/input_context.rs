use cgmath::{Vector2, Zero};

use crate::{input_log, vr_config::Handedness, vr_config::TeleportButton};

/// Raw controller state for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hand {
    pub trigger_value: f32,
    pub squeeze_value: f32,
    pub a_value: f32,
    pub thumbstick: Vector2<f32>,
}

impl Default for Hand {
    fn default() -> Self {
        Hand {
            trigger_value: 0.0,
            squeeze_value: 0.0,
            a_value: 0.0,
            thumbstick: Vector2::zero(),
        }
    }
}

impl Hand {
    fn button_value(&self, button: TeleportButton) -> f32 {
        match button {
            TeleportButton::Trigger => self.trigger_value,
            TeleportButton::AButton => self.a_value,
            TeleportButton::Squeeze => self.squeeze_value,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputContext {
    pub left_hand: Hand,
    pub right_hand: Hand,
}

impl InputContext {
    pub fn hand(&self, hand: Handedness) -> &Hand {
        match hand {
            Handedness::Left => &self.left_hand,
            Handedness::Right => &self.right_hand,
        }
    }
}

/// Actions the host binds to the locomotion controller
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LocomotionAction {
    MoveForward(f32),
    MoveRight(f32),
    BeginTeleport,
    Grip(Handedness),
    Release(Handedness),
}

/// Turns per-frame controller values into discrete actions
///
/// The left thumbstick drives smooth movement, each squeeze grips and releases
/// its hand, and releasing the teleport button on the right controller commits
/// a teleport.
#[derive(Clone, Debug)]
pub struct ActionMapper {
    teleport_button: TeleportButton,
    threshold: f32,
    was_teleport_pressed: bool,
    was_squeeze_pressed: [bool; 2],
}

impl ActionMapper {
    pub fn new(teleport_button: TeleportButton, threshold: f32) -> Self {
        ActionMapper {
            teleport_button,
            threshold,
            was_teleport_pressed: false,
            was_squeeze_pressed: [false; 2],
        }
    }

    pub fn update(&mut self, input: &InputContext) -> Vec<LocomotionAction> {
        let mut actions = Vec::new();

        let stick = input.left_hand.thumbstick;
        if stick.y != 0.0 {
            actions.push(LocomotionAction::MoveForward(stick.y));
        }
        if stick.x != 0.0 {
            actions.push(LocomotionAction::MoveRight(stick.x));
        }

        for hand in Handedness::BOTH {
            // Squeeze stays a teleport button when mapped so; don't double up as grip
            if hand == Handedness::Right && self.teleport_button == TeleportButton::Squeeze {
                continue;
            }

            let is_pressed = input.hand(hand).squeeze_value >= self.threshold;
            let was_pressed = self.was_squeeze_pressed[hand.index()];
            self.was_squeeze_pressed[hand.index()] = is_pressed;

            if is_pressed && !was_pressed {
                actions.push(LocomotionAction::Grip(hand));
            } else if !is_pressed && was_pressed {
                actions.push(LocomotionAction::Release(hand));
            }
        }

        let is_pressed = input.right_hand.button_value(self.teleport_button) >= self.threshold;
        let button_just_released = !is_pressed && self.was_teleport_pressed;
        self.was_teleport_pressed = is_pressed;

        if button_just_released {
            input_log!(DEBUG, "teleport button released");
            actions.push(LocomotionAction::BeginTeleport);
        }

        actions
    }
}
