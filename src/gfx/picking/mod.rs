//! # Ray Picking
//!
//! Ray construction from the camera and ray/bounds intersection against scene
//! nodes. This is the geometric half of interaction hit testing; the
//! [`interaction`](crate::interaction) module decides which nodes are candidates
//! and what to do with the hits.
//!
//! ## How it works
//!
//! 1. **Pointer to Ray**: unproject a normalized-device-coordinate point through
//!    the camera and shoot a ray from the eye through it
//! 2. **Ray-Node Intersection**: test the ray against each candidate's
//!    world-space bounding box
//! 3. **Ordering**: hits are returned nearest first
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::{Vector2, Vector3, Zero};
//! use haggis_interaction::gfx::camera::OrbitCamera;
//! use haggis_interaction::gfx::picking::{Raycaster, AABB};
//! use haggis_interaction::gfx::scene::{Node, SceneGraph};
//!
//! let mut scene = SceneGraph::new();
//! let cube = scene.insert(Node::object("cube").with_bounds(AABB::unit()), None);
//!
//! let camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
//! let mut raycaster = Raycaster::new();
//! assert!(raycaster.set_from_camera(Vector2::new(0.0, 0.0), &camera));
//!
//! let hits = raycaster.intersect_objects(&scene, &[cube]);
//! assert_eq!(hits[0].object, cube);
//! ```

use crate::gfx::{camera::Camera, scene::NodeId, scene::SceneGraph};
use cgmath::{
    ElementWise, EuclideanSpace, InnerSpace, Matrix4, Vector2, Vector3, Vector4, Zero,
};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vector3::zero(),
            direction: -Vector3::unit_z(),
        }
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl AABB {
    /// Create a new AABB
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Unit cube centered at the origin
    pub fn unit() -> Self {
        Self::new(Vector3::new(-0.5, -0.5, -0.5), Vector3::new(0.5, 0.5, 0.5))
    }

    /// Create an AABB from center position and size
    pub fn from_center_size(center: Vector3<f32>, size: Vector3<f32>) -> Self {
        let half_size = size * 0.5;
        Self::new(center - half_size, center + half_size)
    }

    /// Create AABB from a set of vertices
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        if vertices.is_empty() {
            return Self::new(Vector3::zero(), Vector3::zero());
        }

        let mut min = Vector3::new(vertices[0][0], vertices[0][1], vertices[0][2]);
        let mut max = min;

        for vertex in vertices.iter().skip(1) {
            let v = Vector3::new(vertex[0], vertex[1], vertex[2]);
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }

        Self::new(min, max)
    }

    /// Test ray-AABB intersection
    /// Returns the distance to intersection point, or None if no intersection
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Apply a transformation matrix to the AABB
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        // Transform all 8 corners of the AABB and compute new bounds
        let corners = [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ];

        let mut transformed_corners = Vec::with_capacity(8);
        for corner in &corners {
            let homogeneous = Vector4::new(corner.x, corner.y, corner.z, 1.0);
            let transformed = matrix * homogeneous;
            transformed_corners.push([
                transformed.x / transformed.w,
                transformed.y / transformed.w,
                transformed.z / transformed.w,
            ]);
        }

        Self::from_vertices(&transformed_corners)
    }
}

/// A single ray hit.
///
/// `point` is `None` for the synthetic whole-scene hit, which has no geometry
/// and sorts after every real hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Node that was hit
    pub object: NodeId,
    /// Distance from the ray origin to the hit point
    pub distance: f32,
    /// World space intersection point
    pub point: Option<Vector3<f32>>,
}

impl Intersection {
    /// Synthetic hit standing for the whole scene behind every object.
    pub fn scene(root: NodeId) -> Self {
        Self {
            object: root,
            distance: f32::INFINITY,
            point: None,
        }
    }

    pub fn is_scene(&self) -> bool {
        self.point.is_none()
    }
}

/// Builds picking rays and intersects them with scene nodes.
#[derive(Debug, Clone, Default)]
pub struct Raycaster {
    pub ray: Ray,
}

impl Raycaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aims the ray from the camera eye through `ndc` (z fixed mid-frustum).
    ///
    /// Returns false and leaves the ray untouched if the camera cannot
    /// unproject the point.
    pub fn set_from_camera(&mut self, ndc: Vector2<f32>, camera: &dyn Camera) -> bool {
        let Some(target) = camera.unproject(Vector3::new(ndc.x, ndc.y, 0.5)) else {
            return false;
        };

        let origin = camera.position();
        let direction = target - origin;
        if direction.magnitude2() <= f32::EPSILON {
            return false;
        }

        self.ray = Ray::new(origin.to_vec(), direction);
        true
    }

    /// Intersects the ray with each candidate's world bounds.
    ///
    /// Candidates are tested individually, not their descendants. Nodes that are
    /// missing from the graph, hidden (directly or through an ancestor) or have
    /// no bounds are skipped. Hits come back nearest first.
    pub fn intersect_objects(&self, scene: &SceneGraph, candidates: &[NodeId]) -> Vec<Intersection> {
        let mut hits: Vec<Intersection> = candidates
            .iter()
            .filter(|&&id| scene.world_visible(id))
            .filter_map(|&id| {
                let bounds = scene.world_bounds(id)?;
                let distance = bounds.intersect_ray(&self.ray)?;
                Some(Intersection {
                    object: id,
                    distance,
                    point: Some(self.ray.point_at(distance)),
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
