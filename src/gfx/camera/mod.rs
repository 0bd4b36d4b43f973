pub mod camera_utils;
pub mod orbit_camera;

// Re-export main types
pub use camera_utils::{shared_camera, Camera, CameraHandle};
pub use orbit_camera::{OrbitCamera, OrbitCameraBounds};
