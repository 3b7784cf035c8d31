use std::sync::Arc;

use cgmath::{InnerSpace, Vector2, Vector3, Zero, vec3};

use crate::{
    blinker::BlinkerParams,
    config::ArchSegmentAsset,
    pose::Pose,
    vr_config::Handedness,
    world::CollisionWorld,
};

use super::{
    Body, BlinkerHost, FadeRequest, HapticFeedback, MovementMode, OverlapActor, ScreenServices,
    SegmentHandle, SegmentHost, VrRig,
};

pub const DEFAULT_CAPSULE_HALF_HEIGHT: f32 = 88.0;
pub const DEFAULT_WALK_SPEED: f32 = 300.0;
pub const DEFAULT_GRAVITY: f32 = 980.0;
pub const DEFAULT_HAND_RADIUS: f32 = 8.0;
/// Standing eye height above the tracking origin
pub const DEFAULT_EYE_HEIGHT: f32 = 160.0;

/// Kinematic character body
///
/// Movement input is gathered during the frame and consumed by [`SimulatedBody::step`].
#[derive(Clone, Debug)]
pub struct SimulatedBody {
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
    pub capsule_half_height: f32,
    pub movement_mode: MovementMode,
    pub walk_speed: f32,
    pub gravity: f32,
    /// Height of the ground a falling body lands on
    pub floor_height: f32,
    pending_input: Vector3<f32>,
}

impl Default for SimulatedBody {
    fn default() -> Self {
        SimulatedBody {
            position: Vector3::zero(),
            velocity: Vector3::zero(),
            capsule_half_height: DEFAULT_CAPSULE_HALF_HEIGHT,
            movement_mode: MovementMode::Walking,
            walk_speed: DEFAULT_WALK_SPEED,
            gravity: DEFAULT_GRAVITY,
            floor_height: 0.0,
            pending_input: Vector3::zero(),
        }
    }
}

impl SimulatedBody {
    pub fn pending_input(&self) -> Vector3<f32> {
        self.pending_input
    }

    /// Integrate one frame of movement
    pub fn step(&mut self, dt: f32) {
        let mut input = self.pending_input;
        self.pending_input = Vector3::zero();
        if input.magnitude2() > 1.0 {
            input = input.normalize();
        }

        match self.movement_mode {
            MovementMode::Walking => {
                self.velocity = vec3(input.x, 0.0, input.z) * self.walk_speed;
            }
            MovementMode::Flying => {
                self.velocity = input * self.walk_speed;
            }
            MovementMode::Falling => {
                self.velocity.x = input.x * self.walk_speed;
                self.velocity.z = input.z * self.walk_speed;
                self.velocity.y -= self.gravity * dt;
            }
        }

        self.position += self.velocity * dt;

        let resting_height = self.floor_height + self.capsule_half_height;
        if self.movement_mode == MovementMode::Falling && self.position.y <= resting_height {
            self.position.y = resting_height;
            self.velocity.y = 0.0;
            self.movement_mode = MovementMode::Walking;
        }
    }
}

impl Body for SimulatedBody {
    fn position(&self) -> Vector3<f32> {
        self.position
    }

    fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    fn add_world_offset(&mut self, offset: Vector3<f32>) {
        self.position += offset;
    }

    fn velocity(&self) -> Vector3<f32> {
        self.velocity
    }

    fn capsule_half_height(&self) -> f32 {
        self.capsule_half_height
    }

    fn movement_mode(&self) -> MovementMode {
        self.movement_mode
    }

    fn set_movement_mode(&mut self, mode: MovementMode) {
        if mode != MovementMode::Falling {
            self.velocity = Vector3::zero();
        }
        self.movement_mode = mode;
    }

    fn add_movement_input(&mut self, direction: Vector3<f32>) {
        self.pending_input += direction;
    }
}

/// State of one spawned arch segment
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatedSegment {
    pub asset: Option<ArchSegmentAsset>,
    pub visible: bool,
    pub start: Vector3<f32>,
    pub start_tangent: Vector3<f32>,
    pub end: Vector3<f32>,
    pub end_tangent: Vector3<f32>,
}

/// Host with no renderer: a body, a tracked rig and a static collision world
///
/// Every visible side effect (fades, haptics, segments, blinker) is recorded so
/// callers can inspect it after a frame.
pub struct SimulatedHost {
    pub body: SimulatedBody,
    world: Arc<CollisionWorld>,
    /// Tracking origin relative to the body
    root_offset: Vector3<f32>,
    /// Headset pose relative to the tracking origin
    headset: Pose,
    /// Controller poses relative to the tracking origin, whether or not a hand is spawned
    controllers: [Pose; 2],
    /// Class of each spawned hand
    hands: [Option<String>; 2],
    hand_spawn_enabled: [bool; 2],
    pub hand_radius: f32,

    pub viewport: Option<(u32, u32)>,
    /// Horizontal field of view in degrees
    pub field_of_view: f32,
    pub has_fader: bool,

    pub fades: Vec<FadeRequest>,
    pub haptics: Vec<(String, Handedness)>,
    pub segments: Vec<SimulatedSegment>,
    pub blinker_material: Option<String>,
    pub blinker_params: Option<BlinkerParams>,
}

impl SimulatedHost {
    pub fn new(world: Arc<CollisionWorld>) -> Self {
        let standing = Pose::from_position(vec3(0.0, DEFAULT_EYE_HEIGHT, 0.0));
        SimulatedHost {
            body: SimulatedBody::default(),
            world,
            root_offset: vec3(0.0, -DEFAULT_CAPSULE_HALF_HEIGHT, 0.0),
            headset: standing,
            controllers: [
                Pose::from_position(vec3(-20.0, 120.0, -30.0)),
                Pose::from_position(vec3(20.0, 120.0, -30.0)),
            ],
            hands: [None, None],
            hand_spawn_enabled: [true, true],
            hand_radius: DEFAULT_HAND_RADIUS,
            viewport: Some((1920, 1080)),
            field_of_view: 90.0,
            has_fader: true,
            fades: Vec::new(),
            haptics: Vec::new(),
            segments: Vec::new(),
            blinker_material: None,
            blinker_params: None,
        }
    }

    pub fn world(&self) -> &Arc<CollisionWorld> {
        &self.world
    }

    fn tracking_origin(&self) -> Vector3<f32> {
        self.body.position + self.root_offset
    }

    pub fn root_offset(&self) -> Vector3<f32> {
        self.root_offset
    }

    /// Move the headset within tracking space, as a player walking around the room would
    pub fn set_headset_pose(&mut self, pose: Pose) {
        self.headset = pose;
    }

    pub fn set_controller_pose(&mut self, hand: Handedness, pose: Pose) {
        self.controllers[hand.index()] = pose;
    }

    pub fn controller_pose(&self, hand: Handedness) -> Pose {
        self.controllers[hand.index()]
    }

    /// Make the next spawn of `hand` fail
    pub fn fail_hand_spawn(&mut self, hand: Handedness) {
        self.hand_spawn_enabled[hand.index()] = false;
    }

    pub fn hand_class(&self, hand: Handedness) -> Option<&str> {
        self.hands[hand.index()].as_deref()
    }

    pub fn visible_segment_count(&self) -> usize {
        self.segments.iter().filter(|segment| segment.visible).count()
    }

    pub fn step(&mut self, dt: f32) {
        self.body.step(dt);
    }
}

impl Body for SimulatedHost {
    fn position(&self) -> Vector3<f32> {
        self.body.position()
    }

    fn set_position(&mut self, position: Vector3<f32>) {
        self.body.set_position(position);
    }

    fn add_world_offset(&mut self, offset: Vector3<f32>) {
        self.body.add_world_offset(offset);
    }

    fn velocity(&self) -> Vector3<f32> {
        self.body.velocity()
    }

    fn capsule_half_height(&self) -> f32 {
        self.body.capsule_half_height()
    }

    fn movement_mode(&self) -> MovementMode {
        self.body.movement_mode()
    }

    fn set_movement_mode(&mut self, mode: MovementMode) {
        self.body.set_movement_mode(mode);
    }

    fn add_movement_input(&mut self, direction: Vector3<f32>) {
        self.body.add_movement_input(direction);
    }
}

impl VrRig for SimulatedHost {
    fn camera_pose(&self) -> Pose {
        Pose::new(
            self.tracking_origin() + self.headset.position,
            self.headset.rotation,
        )
    }

    fn offset_tracking_root(&mut self, offset: Vector3<f32>) {
        self.root_offset += offset;
    }

    fn spawn_hand(&mut self, hand: Handedness, class: &str) -> bool {
        if class.is_empty() || !self.hand_spawn_enabled[hand.index()] {
            return false;
        }

        self.hands[hand.index()] = Some(class.to_owned());
        true
    }

    fn hand_pose(&self, hand: Handedness) -> Option<Pose> {
        self.hands[hand.index()].as_ref()?;
        let local = self.controllers[hand.index()];
        Some(Pose::new(
            self.tracking_origin() + local.position,
            local.rotation,
        ))
    }

    fn overlapping_actors(&self, hand: Handedness) -> Vec<OverlapActor> {
        match self.hand_pose(hand) {
            Some(pose) => self.world.overlapping_actors(pose.position, self.hand_radius),
            None => Vec::new(),
        }
    }
}

impl HapticFeedback for SimulatedHost {
    fn play_haptic_effect(&mut self, effect: &str, hand: Handedness) {
        self.haptics.push((effect.to_owned(), hand));
    }
}

impl ScreenServices for SimulatedHost {
    /// Pinhole projection through the headset camera
    fn project_world_to_screen(&self, world: Vector3<f32>) -> Option<Vector2<f32>> {
        let (width, height) = self.viewport?;
        let local = self.camera_pose().inverse_transform_position(world);
        let depth = -local.z;
        if depth <= f32::EPSILON {
            return None;
        }

        let focal = 1.0 / (self.field_of_view.to_radians() * 0.5).tan();
        let aspect = width as f32 / height as f32;
        let ndc_x = local.x / depth * focal;
        let ndc_y = local.y / depth * focal * aspect;

        Some(Vector2::new(
            (ndc_x * 0.5 + 0.5) * width as f32,
            (0.5 - ndc_y * 0.5) * height as f32,
        ))
    }

    fn viewport_size(&self) -> Option<(u32, u32)> {
        self.viewport
    }

    fn has_camera_fader(&self) -> bool {
        self.has_fader
    }

    fn start_camera_fade(&mut self, request: FadeRequest) {
        self.fades.push(request);
    }
}

impl SegmentHost for SimulatedHost {
    fn spawn_segment(&mut self, asset: Option<&ArchSegmentAsset>) -> SegmentHandle {
        self.segments.push(SimulatedSegment {
            asset: asset.cloned(),
            visible: false,
            start: Vector3::zero(),
            start_tangent: Vector3::zero(),
            end: Vector3::zero(),
            end_tangent: Vector3::zero(),
        });
        SegmentHandle(self.segments.len() as u32 - 1)
    }

    fn set_segment_visible(&mut self, segment: SegmentHandle, visible: bool) {
        if let Some(segment) = self.segments.get_mut(segment.0 as usize) {
            segment.visible = visible;
        }
    }

    fn set_segment_start_and_end(
        &mut self,
        segment: SegmentHandle,
        start: Vector3<f32>,
        start_tangent: Vector3<f32>,
        end: Vector3<f32>,
        end_tangent: Vector3<f32>,
    ) {
        if let Some(segment) = self.segments.get_mut(segment.0 as usize) {
            segment.start = start;
            segment.start_tangent = start_tangent;
            segment.end = end;
            segment.end_tangent = end_tangent;
        }
    }
}

impl BlinkerHost for SimulatedHost {
    fn create_blinker(&mut self, material: &str, initial_radius: f32) -> bool {
        if material.is_empty() {
            return false;
        }

        self.blinker_material = Some(material.to_owned());
        self.blinker_params = Some(BlinkerParams {
            radius: initial_radius,
            center: crate::blinker::SCREEN_CENTER,
        });
        true
    }

    fn set_blinker_params(&mut self, params: &BlinkerParams) {
        self.blinker_params = Some(*params);
    }
}
