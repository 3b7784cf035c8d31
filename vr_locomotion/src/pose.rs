use cgmath::{InnerSpace, One, Quaternion, Rotation, Vector3, vec3};

/// Local forward axis of every tracked object (camera, controllers)
pub const FORWARD: Vector3<f32> = vec3(0.0, 0.0, -1.0);
pub const RIGHT: Vector3<f32> = vec3(1.0, 0.0, 0.0);
pub const UP: Vector3<f32> = vec3(0.0, 1.0, 0.0);

/// World-space position and orientation, sampled fresh each frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
}

impl Pose {
    pub fn new(position: Vector3<f32>, rotation: Quaternion<f32>) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            rotation: Quaternion::one(),
        }
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(FORWARD)
    }

    pub fn right(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(RIGHT)
    }

    /// Express a world-space position in this pose's local frame
    pub fn inverse_transform_position(&self, world: Vector3<f32>) -> Vector3<f32> {
        self.rotation
            .normalize()
            .conjugate()
            .rotate_vector(world - self.position)
    }

    pub fn transform_position(&self, local: Vector3<f32>) -> Vector3<f32> {
        self.position + self.rotation.normalize().rotate_vector(local)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Pose::from_position(vec3(0.0, 0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Rotation3};

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_identity_axes() {
        let pose = Pose::default();
        assert_close(pose.forward(), FORWARD);
        assert_close(pose.right(), RIGHT);
    }

    #[test]
    fn test_yaw_rotates_forward() {
        let pose = Pose::new(vec3(0.0, 0.0, 0.0), Quaternion::from_angle_y(Deg(90.0)));
        assert_close(pose.forward(), vec3(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_local_round_trip() {
        let pose = Pose::new(vec3(3.0, 1.0, -2.0), Quaternion::from_angle_y(Deg(35.0)));
        let world = vec3(10.0, 4.0, 7.0);
        let local = pose.inverse_transform_position(world);
        assert_close(pose.transform_position(local), world);
    }
}
