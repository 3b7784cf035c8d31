//! Services the locomotion code consumes from the host engine
//!
//! Nothing here inherits from an engine actor. The controller is handed an
//! object implementing these traits each frame and only talks to the scene
//! through them. [`simulated::SimulatedHost`] is a self-contained
//! implementation used by the headless runtime and the tests.
pub mod simulated;

use cgmath::{Vector2, Vector3};

use crate::{blinker::BlinkerParams, config::ArchSegmentAsset, pose::Pose, vr_config::Handedness};

pub type ActorId = u32;

/// An actor currently overlapping one of the hands
#[derive(Clone, Debug, PartialEq)]
pub struct OverlapActor {
    pub id: ActorId,
    pub tags: Vec<String>,
}

impl OverlapActor {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovementMode {
    Walking,
    /// Gravity applies, no ground contact assumed
    Falling,
    /// Gravity-free, used while a hand is climbing
    Flying,
}

/// Engine-owned visual segment of the teleport arch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SegmentHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeRequest {
    pub from_alpha: f32,
    pub to_alpha: f32,
    pub duration: f32,
    pub color: Vector3<f32>,
}

pub const FADE_BLACK: Vector3<f32> = Vector3::new(0.0, 0.0, 0.0);

/// The character the player is driving
pub trait Body {
    fn position(&self) -> Vector3<f32>;
    fn set_position(&mut self, position: Vector3<f32>);
    fn add_world_offset(&mut self, offset: Vector3<f32>);
    fn velocity(&self) -> Vector3<f32>;
    fn capsule_half_height(&self) -> f32;
    fn movement_mode(&self) -> MovementMode;
    fn set_movement_mode(&mut self, mode: MovementMode);
    /// Request movement along `direction` (scaled by input strength) for this frame
    fn add_movement_input(&mut self, direction: Vector3<f32>);
}

/// The tracked headset and controllers, parented under the body
pub trait VrRig {
    /// World pose of the headset camera
    fn camera_pose(&self) -> Pose;
    /// Shift the tracking root (camera and hands) in world space
    fn offset_tracking_root(&mut self, offset: Vector3<f32>);
    /// Spawn a hand actor of `class` following `hand`. Returns false when the class can't be spawned.
    fn spawn_hand(&mut self, hand: Handedness, class: &str) -> bool;
    /// World pose of a spawned hand
    fn hand_pose(&self, hand: Handedness) -> Option<Pose>;
    /// Every actor currently overlapping the hand's collision volume
    fn overlapping_actors(&self, hand: Handedness) -> Vec<OverlapActor>;
}

pub trait HapticFeedback {
    fn play_haptic_effect(&mut self, effect: &str, hand: Handedness);
}

/// Player-controller level services: projection, viewport and camera fades
pub trait ScreenServices {
    /// Pixel coordinates of a world point, `None` if it can't be projected
    fn project_world_to_screen(&self, world: Vector3<f32>) -> Option<Vector2<f32>>;
    fn viewport_size(&self) -> Option<(u32, u32)>;
    fn has_camera_fader(&self) -> bool;
    fn start_camera_fade(&mut self, request: FadeRequest);
}

pub trait SegmentHost {
    fn spawn_segment(&mut self, asset: Option<&ArchSegmentAsset>) -> SegmentHandle;
    fn set_segment_visible(&mut self, segment: SegmentHandle, visible: bool);
    /// Positions and tangents are in the local frame of the right hand
    fn set_segment_start_and_end(
        &mut self,
        segment: SegmentHandle,
        start: Vector3<f32>,
        start_tangent: Vector3<f32>,
        end: Vector3<f32>,
        end_tangent: Vector3<f32>,
    );
}

/// Post-process vignette material
pub trait BlinkerHost {
    /// Instantiate the blinker material. Returns false when the material is unavailable.
    fn create_blinker(&mut self, material: &str, initial_radius: f32) -> bool;
    fn set_blinker_params(&mut self, params: &BlinkerParams);
}

/// Everything [`LocomotionController`](crate::locomotion_controller::LocomotionController) needs from the host
pub trait LocomotionHost:
    Body + VrRig + HapticFeedback + ScreenServices + SegmentHost + BlinkerHost
{
}

impl<T> LocomotionHost for T where
    T: Body + VrRig + HapticFeedback + ScreenServices + SegmentHost + BlinkerHost
{
}
