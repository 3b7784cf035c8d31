use cgmath::{InnerSpace, Point3, Vector3, vec3};
use collision::Aabb3;

use crate::{
    host::{ActorId, OverlapActor},
    teleport::CollisionChannels,
};

/// Box-shaped static actor
#[derive(Clone, Debug)]
pub struct StaticActor {
    pub id: ActorId,
    pub name: String,
    pub bounds: Aabb3<f32>,
    pub tags: Vec<String>,
    pub channels: CollisionChannels,
    /// Only hit by complex traces (detail geometry without simple collision)
    pub complex_only: bool,
}

impl StaticActor {
    pub fn new(name: impl Into<String>, min: Vector3<f32>, max: Vector3<f32>) -> Self {
        StaticActor {
            id: 0,
            name: name.into(),
            bounds: Aabb3::new(
                Point3::new(min.x, min.y, min.z),
                Point3::new(max.x, max.y, max.z),
            ),
            tags: Vec::new(),
            channels: CollisionChannels::all(),
            complex_only: false,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_channels(mut self, channels: CollisionChannels) -> Self {
        self.channels = channels;
        self
    }

    pub fn complex_only(mut self) -> Self {
        self.complex_only = true;
        self
    }

    fn blocks(&self, channel: CollisionChannels, trace_complex: bool) -> bool {
        self.channels.intersects(channel) && (trace_complex || !self.complex_only)
    }

    /// Distance from `point` to the closest point of the box (0 inside)
    fn distance_to(&self, point: Vector3<f32>) -> f32 {
        let closest = vec3(
            point.x.clamp(self.bounds.min.x, self.bounds.max.x),
            point.y.clamp(self.bounds.min.y, self.bounds.max.y),
            point.z.clamp(self.bounds.min.z, self.bounds.max.z),
        );
        (point - closest).magnitude()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepHit {
    /// Fraction of the segment travelled before contact
    pub time: f32,
    /// Sphere center at contact
    pub location: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub actor: ActorId,
}

/// Static scene used when no engine physics is available
#[derive(Clone, Debug, Default)]
pub struct CollisionWorld {
    actors: Vec<StaticActor>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mut actor: StaticActor) -> ActorId {
        let id = self.actors.len() as ActorId + 1;
        actor.id = id;
        self.actors.push(actor);
        id
    }

    pub fn actors(&self) -> &[StaticActor] {
        &self.actors
    }

    pub fn actor(&self, id: ActorId) -> Option<&StaticActor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    /// Actors touching a sphere, regardless of trace channel
    pub fn overlapping_actors(&self, center: Vector3<f32>, radius: f32) -> Vec<OverlapActor> {
        self.actors
            .iter()
            .filter(|actor| actor.distance_to(center) <= radius)
            .map(|actor| OverlapActor {
                id: actor.id,
                tags: actor.tags.clone(),
            })
            .collect()
    }

    /// First contact of a sphere moving from `start` to `end`
    pub fn sweep_sphere(
        &self,
        start: Vector3<f32>,
        end: Vector3<f32>,
        radius: f32,
        channel: CollisionChannels,
        trace_complex: bool,
    ) -> Option<SweepHit> {
        let delta = end - start;

        self.actors
            .iter()
            .filter(|actor| actor.blocks(channel, trace_complex))
            .filter_map(|actor| {
                sweep_inflated_box(start, delta, &actor.bounds, radius).map(|(time, normal)| {
                    SweepHit {
                        time,
                        location: start + delta * time,
                        normal,
                        actor: actor.id,
                    }
                })
            })
            .min_by(|a, b| a.time.total_cmp(&b.time))
    }
}

/// Slab test of the segment `start + delta * t`, `t` in 0..=1, against `bounds` grown by `radius`
///
/// This treats the swept sphere as a swept box, which is slightly generous at
/// the box corners.
fn sweep_inflated_box(
    start: Vector3<f32>,
    delta: Vector3<f32>,
    bounds: &Aabb3<f32>,
    radius: f32,
) -> Option<(f32, Vector3<f32>)> {
    let mut t_enter = 0.0f32;
    let mut t_exit = 1.0f32;
    let mut normal = vec3(0.0, 0.0, 0.0);

    for axis in 0..3 {
        let lo = bounds.min[axis] - radius;
        let hi = bounds.max[axis] + radius;
        let s = start[axis];
        let d = delta[axis];

        if d.abs() < f32::EPSILON {
            if s < lo || s > hi {
                return None;
            }
            continue;
        }

        let (mut t0, mut t1) = ((lo - s) / d, (hi - s) / d);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        if t0 > t_enter {
            t_enter = t0;
            normal = vec3(0.0, 0.0, 0.0);
            normal[axis] = -d.signum();
        }
        t_exit = t_exit.min(t1);

        if t_enter > t_exit {
            return None;
        }
    }

    if normal == vec3(0.0, 0.0, 0.0) {
        // Started inside
        normal = if delta.magnitude2() > 0.0 {
            -delta.normalize()
        } else {
            vec3(0.0, 1.0, 0.0)
        };
    }

    Some((t_enter, normal))
}
