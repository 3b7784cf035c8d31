use std::time::Duration;

use cgmath::Vector3;

use crate::{
    blinker::{Blinker, BlinkerParams},
    blinker_log,
    climb::HandRegistry,
    climb_log,
    config::LocomotionConfig,
    host::{FADE_BLACK, FadeRequest, LocomotionHost},
    input_context::{ActionMapper, InputContext, LocomotionAction},
    pose::UP,
    scheduler::DeferredTask,
    teleport::{
        DestinationMarker, NavMeshProjector, ProjectilePathPredictor, TeleportConfig,
        TeleportPathRenderer, TeleportResolution, TeleportTargetResolver, TeleportUI,
    },
    teleport_log,
    time::Time,
    vr_config::Handedness,
};

/// Per-frame driver for a VR character: recentering, blinker, teleport and climbing
///
/// The controller owns no engine objects. Everything it does to the world goes
/// through the [`LocomotionHost`] handed to each call.
pub struct LocomotionController {
    config: LocomotionConfig,
    resolver: TeleportTargetResolver,
    renderer: TeleportPathRenderer,
    marker: DestinationMarker,
    hands: HandRegistry,
    blinker: Blinker,
    blinker_enabled: bool,
    actions: ActionMapper,
    pending_teleport: DeferredTask<Vector3<f32>>,
    last_resolution: TeleportResolution,
    teleports_executed: u32,
    warned_no_aiming_hand: bool,
}

impl LocomotionController {
    pub fn new(
        config: LocomotionConfig,
        predictor: Box<dyn ProjectilePathPredictor>,
        projector: Box<dyn NavMeshProjector>,
    ) -> Self {
        let resolver = TeleportTargetResolver::new(TeleportConfig::from(&config), predictor, projector);
        LocomotionController {
            renderer: TeleportPathRenderer::new(config.arch_segment.clone()),
            blinker: Blinker::from_config(&config),
            actions: ActionMapper::new(config.teleport_button, config.trigger_threshold),
            resolver,
            marker: DestinationMarker::default(),
            hands: HandRegistry::new(),
            blinker_enabled: false,
            pending_teleport: DeferredTask::new(),
            last_resolution: TeleportResolution::invalid(),
            teleports_executed: 0,
            warned_no_aiming_hand: false,
            config,
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn marker(&self) -> &DestinationMarker {
        &self.marker
    }

    pub fn hands(&self) -> &HandRegistry {
        &self.hands
    }

    pub fn renderer(&self) -> &TeleportPathRenderer {
        &self.renderer
    }

    pub fn last_resolution(&self) -> &TeleportResolution {
        &self.last_resolution
    }

    pub fn blinker_params(&self) -> Option<BlinkerParams> {
        self.blinker.current()
    }

    pub fn teleports_executed(&self) -> u32 {
        self.teleports_executed
    }

    pub fn is_teleport_pending(&self) -> bool {
        self.pending_teleport.is_armed()
    }

    /// One-time setup: hide the marker, create the blinker, spawn and pair the hands
    pub fn begin_play(&mut self, host: &mut impl LocomotionHost) {
        self.marker = DestinationMarker::default();

        self.blinker_enabled = match &self.config.blinker_material {
            Some(material) => host.create_blinker(material, self.config.blinker_initial_radius),
            None => false,
        };
        if self.config.blinker_material.is_some() && !self.blinker_enabled {
            blinker_log!(WARN, "blinker material could not be created");
        }

        let Some(class) = self.config.hand_class.clone() else {
            climb_log!(WARN, "no hand class configured, hands won't be spawned");
            return;
        };

        for hand in Handedness::BOTH {
            if host.spawn_hand(hand, &class) {
                self.hands.insert(hand, self.config.haptic_effect.clone());
            } else {
                climb_log!(WARN, "failed to spawn {:?} hand of class {}", hand, class);
            }
        }

        if !self.hands.pair() {
            climb_log!(WARN, "hands not paired, climbing won't hand over between them");
        }
    }

    pub fn tick(&mut self, host: &mut impl LocomotionHost, time: &Time) {
        self.recenter(host);
        self.update_hands(host);
        self.update_blinker(host);
        self.update_destination_marker(host);

        if let Some(destination) = self.pending_teleport.advance(time.elapsed) {
            self.execute_teleport(host, destination);
        }
    }

    /// Poll controllers and run whatever actions they produce this frame
    pub fn handle_input(&mut self, host: &mut impl LocomotionHost, input: &InputContext) {
        for action in self.actions.update(input) {
            self.apply_action(host, action);
        }
    }

    pub fn apply_action(&mut self, host: &mut impl LocomotionHost, action: LocomotionAction) {
        match action {
            LocomotionAction::MoveForward(axis) => self.move_forward(host, axis),
            LocomotionAction::MoveRight(axis) => self.move_right(host, axis),
            LocomotionAction::BeginTeleport => {
                self.begin_teleport(host);
            }
            LocomotionAction::Grip(hand) => {
                self.grip(host, hand);
            }
            LocomotionAction::Release(hand) => {
                self.release(host, hand);
            }
        }
    }

    pub fn move_forward(&mut self, host: &mut impl LocomotionHost, axis: f32) {
        let forward = host.camera_pose().forward();
        host.add_movement_input(forward * axis);
    }

    pub fn move_right(&mut self, host: &mut impl LocomotionHost, axis: f32) {
        let right = host.camera_pose().right();
        host.add_movement_input(right * axis);
    }

    /// Fade out and schedule a move to the marked destination
    ///
    /// Ignored without a visible marker or a camera fader. Calling again before
    /// the fade finishes retargets the pending teleport instead of queueing another.
    pub fn begin_teleport(&mut self, host: &mut impl LocomotionHost) -> bool {
        let Some(destination) = self.marker.destination() else {
            teleport_log!(DEBUG, "teleport requested without a destination");
            return false;
        };
        if !host.has_camera_fader() {
            teleport_log!(WARN, "teleport requested but there is no camera to fade");
            return false;
        }

        self.start_fade(host, 0.0, 1.0);
        let delay = Duration::try_from_secs_f32(self.config.fade_duration).unwrap_or_default();
        if self.pending_teleport.arm(delay, destination).is_some() {
            teleport_log!(DEBUG, "pending teleport retargeted to {:?}", destination);
        } else {
            teleport_log!(INFO, "teleporting to {:?} in {:?}", destination, delay);
        }
        true
    }

    pub fn grip(&mut self, host: &mut impl LocomotionHost, hand: Handedness) -> bool {
        let Some(pose) = host.hand_pose(hand) else {
            return false;
        };
        self.hands.grip(hand, pose.position, host)
    }

    pub fn release(&mut self, host: &mut impl LocomotionHost, hand: Handedness) -> bool {
        self.hands.release(hand, host)
    }

    /// Move the body under the headset, horizontally, without moving the headset
    fn recenter(&mut self, host: &mut impl LocomotionHost) {
        let mut camera_offset = host.camera_pose().position - host.position();
        camera_offset.y = 0.0;

        host.add_world_offset(camera_offset);
        host.offset_tracking_root(-camera_offset);
    }

    fn update_hands(&mut self, host: &mut impl LocomotionHost) {
        for hand in Handedness::BOTH {
            if !self.hands.contains(hand) {
                continue;
            }

            let overlapping = host.overlapping_actors(hand);
            self.hands.refresh_overlaps(hand, &overlapping, host);

            if let Some(pose) = host.hand_pose(hand) {
                self.hands.update_climbing(hand, pose.position, host);
            }
        }
    }

    fn update_blinker(&mut self, host: &mut impl LocomotionHost) {
        if !self.blinker_enabled {
            return;
        }

        let camera = host.camera_pose();
        if let Some(params) = self.blinker.update(host.velocity(), &camera, &*host) {
            host.set_blinker_params(&params);
        }
    }

    fn update_destination_marker(&mut self, host: &mut impl LocomotionHost) {
        let Some(aim) = host.hand_pose(Handedness::Right) else {
            if !self.warned_no_aiming_hand {
                teleport_log!(WARN, "no right hand to aim teleports with");
                self.warned_no_aiming_hand = true;
            }
            self.last_resolution = TeleportResolution::invalid();
            TeleportUI::clear(&mut self.marker, &mut self.renderer, host);
            return;
        };

        self.last_resolution = self.resolver.resolve(&aim, aim.forward());
        TeleportUI::apply(
            &self.last_resolution,
            &aim,
            &mut self.marker,
            &mut self.renderer,
            host,
        );
    }

    fn execute_teleport(&mut self, host: &mut impl LocomotionHost, destination: Vector3<f32>) {
        let target = destination + UP * host.capsule_half_height();
        host.set_position(target);
        self.teleports_executed += 1;
        teleport_log!(INFO, "teleported to {:?}", target);

        self.start_fade(host, 1.0, 0.0);
    }

    fn start_fade(&self, host: &mut impl LocomotionHost, from_alpha: f32, to_alpha: f32) {
        host.start_camera_fade(FadeRequest {
            from_alpha,
            to_alpha,
            duration: self.config.fade_duration,
            color: FADE_BLACK,
        });
    }
}
