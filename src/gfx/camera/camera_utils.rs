use cgmath::{Matrix4, Point3, SquareMatrix, Vector3};
use std::{cell::RefCell, rc::Rc};

/// Shared handle to the camera used for picking.
///
/// The host keeps moving the camera between input events, so the interaction
/// layer only ever borrows it for the duration of a hit test.
pub type CameraHandle = Rc<RefCell<dyn Camera>>;

pub trait Camera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;

    /// World-space position of the eye; picking rays start here.
    fn position(&self) -> Point3<f32>;

    /// Maps a point from normalized device coordinates back into world space.
    ///
    /// Returns `None` when the view-projection matrix is singular or the point
    /// lands on the plane at infinity.
    fn unproject(&self, ndc: Vector3<f32>) -> Option<Point3<f32>> {
        let inverse = self.build_view_projection_matrix().invert()?;
        let world = inverse * ndc.extend(1.0);

        if world.w.abs() <= f32::EPSILON {
            return None;
        }

        Some(Point3::new(
            world.x / world.w,
            world.y / world.w,
            world.z / world.w,
        ))
    }
}

/// Wraps a concrete camera into the shared handle the interaction manager expects.
pub fn shared_camera<C: Camera + 'static>(camera: C) -> CameraHandle {
    Rc::new(RefCell::new(camera))
}
