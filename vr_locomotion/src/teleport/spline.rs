use cgmath::{Vector3, vec3};

use crate::pose::Pose;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplinePoint {
    pub position: Vector3<f32>,
    pub tangent: Vector3<f32>,
}

/// Curve through the teleport arc, stored in the local frame of the hand that owns it
///
/// Tangents are computed once per rebuild; readers take them as stored.
#[derive(Clone, Debug, Default)]
pub struct TeleportSpline {
    points: Vec<SplinePoint>,
}

impl TeleportSpline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every control point with `world_points`, converted into `frame`'s local space
    pub fn rebuild(&mut self, world_points: &[Vector3<f32>], frame: &Pose) {
        self.points.clear();

        let local: Vec<Vector3<f32>> = world_points
            .iter()
            .map(|p| frame.inverse_transform_position(*p))
            .collect();

        for (i, position) in local.iter().enumerate() {
            self.points.push(SplinePoint {
                position: *position,
                tangent: auto_tangent(&local, i),
            });
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Local position and tangent at a control point
    pub fn location_and_tangent_at(&self, index: usize) -> Option<(Vector3<f32>, Vector3<f32>)> {
        self.points.get(index).map(|p| (p.position, p.tangent))
    }
}

/// Catmull-Rom tangent; one-sided at the ends
fn auto_tangent(points: &[Vector3<f32>], index: usize) -> Vector3<f32> {
    let last = points.len().saturating_sub(1);
    if last == 0 {
        return vec3(0.0, 0.0, 0.0);
    }

    match index {
        0 => points[1] - points[0],
        i if i == last => points[last] - points[last - 1],
        i => (points[i + 1] - points[i - 1]) * 0.5,
    }
}
