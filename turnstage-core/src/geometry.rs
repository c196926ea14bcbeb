/// Mesh primitives and the procedural demo turntable
use nalgebra::{Point3, Vector3};
use std::f32::consts::TAU;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Triangle from bare positions; the normal is derived from the winding
    pub fn flat(p0: Point3<f32>, p1: Point3<f32>, p2: Point3<f32>) -> Self {
        let normal = (p1 - p0).cross(&(p2 - p0)).normalize();
        Self::new(
            Vertex::new(p0, normal),
            Vertex::new(p1, normal),
            Vertex::new(p2, normal),
        )
    }

    /// Face normal from the vertex winding
    pub fn face_normal(&self) -> Vector3<f32> {
        let [v0, v1, v2] = &self.vertices;
        (v1.position - v0.position)
            .cross(&(v2.position - v0.position))
            .normalize()
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Quad as two triangles; corners wound counter-clockwise seen from the
    /// face side.
    fn push_quad(&mut self, corners: [Point3<f32>; 4]) {
        let [a, b, c, d] = corners;
        self.push(Triangle::flat(a, b, c));
        self.push(Triangle::flat(a, c, d));
    }

    /// Axis-aligned box, used for the heading marker on the platform rim
    fn push_box(&mut self, center: Point3<f32>, half: Vector3<f32>) {
        let p = |sx: f32, sy: f32, sz: f32| {
            Point3::new(
                center.x + sx * half.x,
                center.y + sy * half.y,
                center.z + sz * half.z,
            )
        };
        // +X / -X
        self.push_quad([p(1.0, -1.0, -1.0), p(1.0, 1.0, -1.0), p(1.0, 1.0, 1.0), p(1.0, -1.0, 1.0)]);
        self.push_quad([p(-1.0, -1.0, 1.0), p(-1.0, 1.0, 1.0), p(-1.0, 1.0, -1.0), p(-1.0, -1.0, -1.0)]);
        // +Y / -Y
        self.push_quad([p(-1.0, 1.0, -1.0), p(-1.0, 1.0, 1.0), p(1.0, 1.0, 1.0), p(1.0, 1.0, -1.0)]);
        self.push_quad([p(-1.0, -1.0, 1.0), p(-1.0, -1.0, -1.0), p(1.0, -1.0, -1.0), p(1.0, -1.0, 1.0)]);
        // +Z / -Z
        self.push_quad([p(-1.0, -1.0, 1.0), p(1.0, -1.0, 1.0), p(1.0, 1.0, 1.0), p(-1.0, 1.0, 1.0)]);
        self.push_quad([p(1.0, -1.0, -1.0), p(-1.0, -1.0, -1.0), p(-1.0, 1.0, -1.0), p(1.0, 1.0, -1.0)]);
    }

    /// Procedural demo model: an octagonal platform with a marker block on
    /// the rim at heading zero, so the current rotation is visible in any
    /// renderer.
    pub fn turntable(radius: f32, height: f32) -> Self {
        const SIDES: usize = 8;

        let mut mesh = Self::new();
        let top = height / 2.0;
        let bottom = -height / 2.0;
        let rim = |i: usize, y: f32| {
            let a = i as f32 / SIDES as f32 * TAU;
            Point3::new(radius * a.cos(), y, radius * a.sin())
        };

        for i in 0..SIDES {
            let j = (i + 1) % SIDES;
            // Top fan, wound to face +Y
            mesh.push(Triangle::flat(Point3::new(0.0, top, 0.0), rim(j, top), rim(i, top)));
            // Bottom fan, wound to face -Y
            mesh.push(Triangle::flat(Point3::new(0.0, bottom, 0.0), rim(i, bottom), rim(j, bottom)));
            // Outward side wall
            mesh.push_quad([rim(i, bottom), rim(i, top), rim(j, top), rim(j, bottom)]);
        }

        // Heading marker standing on the rim at angle zero
        let marker_height = height.max(radius * 0.3);
        mesh.push_box(
            Point3::new(radius * 0.8, top + marker_height / 2.0, 0.0),
            Vector3::new(radius * 0.08, marker_height / 2.0, radius * 0.08),
        );

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_triangle_normal_follows_winding() {
        let triangle = Triangle::flat(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert!((triangle.face_normal() - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_turntable_triangle_count() {
        // 8 top + 8 bottom + 16 wall + 12 marker
        let mesh = Mesh::turntable(2.0, 0.5);
        assert_eq!(mesh.triangles.len(), 44);
    }

    #[test]
    fn test_turntable_normals_are_unit_length() {
        let mesh = Mesh::turntable(2.0, 0.5);
        for triangle in &mesh.triangles {
            assert!((triangle.face_normal().norm() - 1.0).abs() < 1e-4);
            for vertex in &triangle.vertices {
                assert!((vertex.normal.norm() - 1.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_marker_sits_on_positive_x_rim() {
        let mesh = Mesh::turntable(2.0, 0.5);
        let above_platform = mesh
            .triangles
            .iter()
            .flat_map(|t| t.vertices.iter())
            .filter(|v| v.position.y > 0.26);
        for vertex in above_platform {
            assert!(vertex.position.x > 0.0);
            assert!(vertex.position.z.abs() < 0.5);
        }
    }
}
