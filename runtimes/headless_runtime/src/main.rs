// Headless Runtime - drives the locomotion controller without a renderer
//
// Builds a small demo level, feeds scripted controller input for a number of
// frames, and prints a JSON summary of where the body ended up.

use std::{path::PathBuf, sync::Arc, time::Duration};

use cgmath::{Deg, Quaternion, Rotation3, vec3};
use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing::info;

use vr_locomotion::{
    ArchSegmentAsset, BallisticPredictor, CollisionWorld, CurveKey, Hand, Handedness,
    InputContext, LocomotionConfig, LocomotionController, NavCell, NavMesh, Pose, SimulatedHost,
    StaticActor, Time,
    climb::CLIMBABLE_TAG,
    host::Body,
    logging::{DEFAULT_LOG_ENV, init_logging},
    teleport::CollisionChannels,
};

const LEDGE_HEIGHT: f32 = 100.0;
/// Spawn in front of the climbing wall, on the floor
const CLIMB_START_X: f32 = 1100.0;
/// Frames spent on each climbing stroke
const STROKE_FRAMES: usize = 30;
/// Controller travel per frame while pulling
const STROKE_STEP: f32 = 3.0;
/// Teleport button is held this long out of every cycle
const TELEPORT_CYCLE: usize = 90;
const TELEPORT_HOLD: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Scenario {
    Teleport,
    Climb,
}

#[derive(Parser)]
#[command(name = "headless_runtime")]
#[command(about = "Runs the VR locomotion controller against a scripted demo level")]
struct Args {
    /// JSON configuration file; a demo configuration is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(short, long, default_value = "600")]
    frames: usize,

    /// Seconds per frame
    #[arg(long, default_value = "0.0111")]
    dt: f32,

    #[arg(short, long, value_enum, default_value = "teleport")]
    scenario: Scenario,
}

fn demo_config() -> LocomotionConfig {
    LocomotionConfig {
        hand_class: Some("BP_HandController".to_owned()),
        haptic_effect: Some("HE_ClimbContact".to_owned()),
        blinker_material: Some("M_Blinker".to_owned()),
        blinker_curve: Some(vec![
            CurveKey { speed: 0.0, radius: 1.0 },
            CurveKey { speed: 1.5, radius: 0.6 },
            CurveKey { speed: 3.0, radius: 0.4 },
        ]),
        arch_segment: Some(ArchSegmentAsset {
            mesh: "SM_BeamSegment".to_owned(),
            material: "M_TeleportBeam".to_owned(),
        }),
        ..LocomotionConfig::default()
    }
}

/// Floor, a raised ledge ahead of the spawn, and a climbable wall off to the side
fn demo_level() -> (CollisionWorld, NavMesh) {
    let mut world = CollisionWorld::new();
    world.add(StaticActor::new(
        "floor",
        vec3(-2000.0, -10.0, -2000.0),
        vec3(2000.0, 0.0, 2000.0),
    ));
    world.add(StaticActor::new(
        "ledge",
        vec3(-200.0, 0.0, -900.0),
        vec3(200.0, LEDGE_HEIGHT, -700.0),
    ));
    world.add(
        StaticActor::new(
            "climbing_wall",
            vec3(900.0, 0.0, -40.0),
            vec3(1300.0, 400.0, -32.0),
        )
        .with_tag(CLIMBABLE_TAG)
        .with_channels(CollisionChannels::WORLD_STATIC),
    );

    let nav = NavMesh::new(vec![
        NavCell::rectangle(-2000.0, -2000.0, 2000.0, -900.0, 0.0),
        NavCell::rectangle(-2000.0, -700.0, 2000.0, 2000.0, 0.0),
        NavCell::rectangle(-2000.0, -900.0, -200.0, -700.0, 0.0),
        NavCell::rectangle(200.0, -900.0, 2000.0, -700.0, 0.0),
        NavCell::rectangle(-200.0, -900.0, 200.0, -700.0, LEDGE_HEIGHT),
    ]);

    (world, nav)
}

/// Trigger held for a few frames out of every cycle, thumbstick pushing forward in between
fn teleport_input(frame: usize) -> InputContext {
    let phase = frame % TELEPORT_CYCLE;
    let mut input = InputContext::default();
    if phase < TELEPORT_HOLD {
        input.right_hand.trigger_value = 1.0;
    } else if phase > TELEPORT_CYCLE / 2 {
        input.left_hand.thumbstick.y = 1.0;
    }
    input
}

/// Hand-over-hand: grip with one hand and pull it down while the other reaches up
fn climb_input(frame: usize, host: &mut SimulatedHost) -> InputContext {
    let stroke = frame / STROKE_FRAMES;
    let active = if stroke % 2 == 0 {
        Handedness::Right
    } else {
        Handedness::Left
    };

    for hand in Handedness::BOTH {
        let mut pose = host.controller_pose(hand);
        pose.position.y += if hand == active { -STROKE_STEP } else { STROKE_STEP };
        host.set_controller_pose(hand, pose);
    }

    let squeeze = |hand: Handedness| if hand == active { 1.0 } else { 0.0 };
    InputContext {
        left_hand: Hand {
            squeeze_value: squeeze(Handedness::Left),
            ..Hand::default()
        },
        right_hand: Hand {
            squeeze_value: squeeze(Handedness::Right),
            ..Hand::default()
        },
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(DEFAULT_LOG_ENV);

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => LocomotionConfig::load(path)?,
        None => demo_config(),
    };

    info!(
        "Running {:?} scenario for {} frames at {}s per frame",
        args.scenario, args.frames, args.dt
    );

    let (world, nav) = demo_level();
    let world = Arc::new(world);
    let predictor = BallisticPredictor::new(
        world.clone(),
        config.gravity,
        config.simulation_frequency,
    );

    let mut host = SimulatedHost::new(world);
    host.body.gravity = config.gravity;
    let half_height = host.body.capsule_half_height;

    match args.scenario {
        Scenario::Teleport => {
            host.body.position = vec3(0.0, half_height, 0.0);
            // Aim the right controller slightly upward for a longer arc
            let right = host.controller_pose(Handedness::Right);
            host.set_controller_pose(
                Handedness::Right,
                Pose::new(right.position, Quaternion::from_angle_x(Deg(20.0))),
            );
        }
        Scenario::Climb => {
            host.body.position = vec3(CLIMB_START_X, half_height, 0.0);
        }
    }

    let mut controller = LocomotionController::new(config, Box::new(predictor), Box::new(nav));
    controller.begin_play(&mut host);

    let dt = Duration::try_from_secs_f32(args.dt.max(0.0))?;
    let mut time = Time::new(dt, Duration::ZERO);
    let mut max_height = host.position().y;

    for frame in 0..args.frames {
        let input = match args.scenario {
            Scenario::Teleport => teleport_input(frame),
            // Let go of everything for the last stroke
            Scenario::Climb if frame + STROKE_FRAMES >= args.frames => InputContext::default(),
            Scenario::Climb => climb_input(frame, &mut host),
        };

        // Tick first so overlaps and the marker are current when actions run
        controller.tick(&mut host, &time);
        controller.handle_input(&mut host, &input);
        host.step(args.dt);

        max_height = max_height.max(host.position().y);
        time = time.advance(dt);
    }

    let position = host.position();
    let summary = json!({
        "scenario": format!("{:?}", args.scenario),
        "frames": args.frames,
        "elapsed_seconds": time.total.as_secs_f32(),
        "body_position": [position.x, position.y, position.z],
        "max_body_height": max_height,
        "movement_mode": format!("{:?}", host.movement_mode()),
        "teleports_executed": controller.teleports_executed(),
        "teleport_pending": controller.is_teleport_pending(),
        "marker": controller.marker().destination().map(|p| [p.x, p.y, p.z]),
        "climbing_hand": controller.hands().climbing_hand().map(|hand| format!("{:?}", hand)),
        "haptic_pulses": host.haptics.len(),
        "arch_segments": {
            "pooled": controller.renderer().pool_size(),
            "visible": host.visible_segment_count(),
        },
        "blinker": controller.blinker_params().map(|params| json!({
            "radius": params.radius,
            "center": [params.center.x, params.center.y],
        })),
        "fades": host.fades.len(),
    });

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
