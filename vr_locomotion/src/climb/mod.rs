// Hand-over-hand climbing
//
// Each hand tracks whether it touches something tagged climbable. Gripping
// such a hand switches the body to gravity-free movement and pulls it so the
// gripped point stays fixed in the world.

pub mod hand_controller;
pub mod hand_registry;

pub use hand_controller::{
    CLIMBABLE_TAG, ClimbPhase, HandClimbState, OverlapChanges, OverlapTracker, touches_climbable,
};
pub use hand_registry::HandRegistry;
