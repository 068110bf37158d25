//! Camera trait and the orbit camera driving the viewport.

pub use self::camera3d::Camera3d;
pub use self::orbit3d::{CameraLimits, CameraState, OrbitCamera3d, StandardView};

mod camera3d;
mod orbit3d;
