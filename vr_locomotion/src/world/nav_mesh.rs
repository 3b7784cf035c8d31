use cgmath::{InnerSpace, Vector3, vec3};
use ordered_float::OrderedFloat;

use crate::teleport::NavMeshProjector;

/// Cells steeper than this (normal Y component) count as walls
const MIN_WALKABLE_NORMAL_Y: f32 = 0.1;

/// Convex walkable polygon
#[derive(Clone, Debug, PartialEq)]
pub struct NavCell {
    pub vertices: Vec<Vector3<f32>>,
}

impl NavCell {
    pub fn new(vertices: Vec<Vector3<f32>>) -> Self {
        NavCell { vertices }
    }

    /// Axis-aligned rectangle at `height`
    pub fn rectangle(min_x: f32, min_z: f32, max_x: f32, max_z: f32, height: f32) -> Self {
        NavCell::new(vec![
            vec3(min_x, height, min_z),
            vec3(max_x, height, min_z),
            vec3(max_x, height, max_z),
            vec3(min_x, height, max_z),
        ])
    }

    /// Unnormalized plane normal, `None` for degenerate or steep (wall-like) cells
    fn plane_normal(&self) -> Option<Vector3<f32>> {
        if self.vertices.len() < 3 {
            return None;
        }

        let normal = (self.vertices[1] - self.vertices[0]).cross(self.vertices[2] - self.vertices[0]);
        let length = normal.magnitude();
        if length < f32::EPSILON || (normal.y / length).abs() < MIN_WALKABLE_NORMAL_Y {
            return None;
        }
        Some(normal)
    }

    /// Surface height of the cell plane at `(x, z)`
    fn height_at(&self, normal: Vector3<f32>, x: f32, z: f32) -> f32 {
        let origin = self.vertices[0];
        origin.y - (normal.x * (x - origin.x) + normal.z * (z - origin.z)) / normal.y
    }

    /// Closest walkable point: straight below/above `point` when it is over the
    /// cell, otherwise the nearest point on the cell boundary
    pub fn closest_point(&self, point: Vector3<f32>) -> Option<Vector3<f32>> {
        let normal = self.plane_normal()?;
        self.closest_on_polygon(&self.vertices, normal, point)
    }

    /// Like [`NavCell::closest_point`], restricted to the part of the cell inside
    /// the box `point ± extent`
    pub fn closest_point_within(
        &self,
        point: Vector3<f32>,
        extent: Vector3<f32>,
    ) -> Option<Vector3<f32>> {
        let normal = self.plane_normal()?;

        let mut clipped = self.vertices.clone();
        for axis in 0..3 {
            clipped = clip_axis(&clipped, axis, point[axis] - extent[axis], true);
            clipped = clip_axis(&clipped, axis, point[axis] + extent[axis], false);
        }

        self.closest_on_polygon(&clipped, normal, point)
    }

    /// `polygon` is the cell or a convex piece of it, so it shares the cell plane
    fn closest_on_polygon(
        &self,
        polygon: &[Vector3<f32>],
        normal: Vector3<f32>,
        point: Vector3<f32>,
    ) -> Option<Vector3<f32>> {
        if area_xz(polygon) > f32::EPSILON && contains_xz(polygon, point) {
            return Some(vec3(point.x, self.height_at(normal, point.x, point.z), point.z));
        }

        (0..polygon.len())
            .map(|i| closest_on_segment(point, polygon[i], polygon[(i + 1) % polygon.len()]))
            .min_by_key(|candidate| OrderedFloat((*candidate - point).magnitude2()))
    }
}

/// XZ point-in-polygon test: inside when on the same side of every edge
fn contains_xz(polygon: &[Vector3<f32>], point: Vector3<f32>) -> bool {
    let mut sign = None;

    for i in 0..polygon.len() {
        let v1 = polygon[i];
        let v2 = polygon[(i + 1) % polygon.len()];

        let edge = vec3(v2.x - v1.x, 0.0, v2.z - v1.z);
        let to_point = vec3(point.x - v1.x, 0.0, point.z - v1.z);
        let cross = edge.x * to_point.z - edge.z * to_point.x;

        if cross.abs() < f32::EPSILON {
            continue;
        }

        let current_sign = cross > 0.0;
        match sign {
            None => sign = Some(current_sign),
            Some(prev_sign) if prev_sign != current_sign => return false,
            _ => {}
        }
    }

    true
}

/// Shoelace area of the polygon's XZ footprint
fn area_xz(polygon: &[Vector3<f32>]) -> f32 {
    let twice: f32 = (0..polygon.len())
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % polygon.len()];
            a.x * b.z - b.x * a.z
        })
        .sum();
    (twice * 0.5).abs()
}

/// One Sutherland-Hodgman pass against the plane `p[axis] = bound`
fn clip_axis(
    polygon: &[Vector3<f32>],
    axis: usize,
    bound: f32,
    keep_above: bool,
) -> Vec<Vector3<f32>> {
    let inside = |p: &Vector3<f32>| {
        if keep_above {
            p[axis] >= bound
        } else {
            p[axis] <= bound
        }
    };

    let mut clipped = Vec::with_capacity(polygon.len() + 1);
    for i in 0..polygon.len() {
        let current = polygon[i];
        let next = polygon[(i + 1) % polygon.len()];

        if inside(&current) {
            clipped.push(current);
        }
        if inside(&current) != inside(&next) {
            let t = (bound - current[axis]) / (next[axis] - current[axis]);
            let mut crossing = current + (next - current) * t;
            crossing[axis] = bound;
            clipped.push(crossing);
        }
    }
    clipped
}

fn closest_on_segment
/// Walkable surfaces as a set of convex cells
#[derive(Clone, Debug, Default)]
pub struct NavMesh {
    cells: Vec<NavCell>,
}

impl NavMesh {
    pub fn new(cells: Vec<NavCell>) -> Self {
        NavMesh { cells }
    }

    pub fn add_cell(&mut self, cell: NavCell) {
        self.cells.push(cell);
    }

    pub fn cells(&self) -> &[NavCell] {
        &self.cells
    }
}

impl NavMeshProjector for NavMesh {
    fn project_point(&self, point: Vector3<f32>, extent: Vector3<f32>) -> Option<Vector3<f32>> {
        self.cells
            .iter()
            .filter_map(|cell| cell.closest_point_within(point, extent))
            .min_by_key(|candidate| OrderedFloat((*candidate - point).magnitude2()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_level_mesh() -> NavMesh {
        NavMesh::new(vec![
            NavCell::rectangle(-500.0, -500.0, 500.0, 500.0, 0.0),
            NavCell::rectangle(600.0, -100.0, 800.0, 100.0, 300.0),
        ])
    }

    #[test]
    fn test_point_above_cell_drops_onto_it() {
        let mesh = two_level_mesh();
        let projected = mesh.project_point(vec3(10.0, 40.0, -20.0), vec3(100.0, 100.0, 100.0));
        assert_eq!(projected, Some(vec3(10.0, 0.0, -20.0)));
    }

    #[test]
    fn test_point_off_the_edge_snaps_to_boundary() {
        let mesh = two_level_mesh();
        let projected = mesh.project_point(vec3(550.0, 0.0, 0.0), vec3(100.0, 100.0, 100.0));
        assert_eq!(projected, Some(vec3(500.0, 0.0, 0.0)));
    }

    #[test]
    fn test_out_of_extent_fails() {
        let mesh = two_level_mesh();
        assert!(mesh
            .project_point(vec3(0.0, 250.0, 0.0), vec3(100.0, 100.0, 100.0))
            .is_none());
    }

    #[test]
    fn test_tall_extent_reaches_upper_level() {
        let mesh = two_level_mesh();

        let narrow = mesh.project_point(vec3(700.0, 150.0, 0.0), vec3(50.0, 100.0, 50.0));
        assert!(narrow.is_none());

        let tall = mesh.project_point(vec3(700.0, 150.0, 0.0), vec3(50.0, 200.0, 50.0));
        assert_eq!(tall, Some(vec3(700.0, 300.0, 0.0)));
    }

    #[test]
    fn test_nearest_cell_wins() {
        let mesh = two_level_mesh();
        let projected = mesh.project_point(vec3(700.0, 280.0, 0.0), vec3(500.0, 500.0, 500.0));
        assert_eq!(projected, Some(vec3(700.0, 300.0, 0.0)));
    }

    #[test]
    fn test_vertical_cells_are_ignored() {
        let wall = NavCell::new(vec![
            vec3(0.0, 0.0, 0.0),
            vec3(100.0, 0.0, 0.0),
            vec3(100.0, 100.0, 0.0),
            vec3(0.0, 100.0, 0.0),
        ]);
        assert!(wall.closest_point(vec3(50.0, 50.0, 5.0)).is_none());
    }
    #[test]
    fn test_sloped_cell_with_flat_extent() {
        // Ramp rising along X: y = x - 10
        let ramp = NavMesh::new(vec![NavCell::new(vec![
            vec3(10.0, 0.0, -10.0),
            vec3(110.0, 100.0, -10.0),
            vec3(110.0, 100.0, 10.0),
            vec3(10.0, 0.0, 10.0),
        ])]);
        let point = vec3(0.0, 50.0, 0.0);
        let extent = vec3(100.0, 5.0, 100.0);

        let projected = ramp.project_point(point, extent).unwrap();

        assert!((projected - vec3(55.0, 45.0, 0.0)).magnitude() < 1e-3);
        let offset = projected - point;
        assert!(offset.y.abs() <= extent.y + 1e-3);
    }

    #[test]
    fn test_clipped_cell_keeps_plane_height() {
        let cell = NavCell::rectangle(-500.0, -500.0, 500.0, 500.0, 20.0);
        let projected = cell.closest_point_within(vec3(480.0, 30.0, 0.0), vec3(10.0, 15.0, 10.0));
        assert_eq!(projected, Some(vec3(480.0, 20.0, 0.0)));
    }
}
