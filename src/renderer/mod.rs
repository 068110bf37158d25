//! The rendering seam of the viewport and its implementations.

pub use self::recording::{RecordedChannel, RecordingBackend};
pub use self::renderer::{ChannelData, DrawCall, Primitive, RenderBackend};
pub use self::wgpu_backend::WgpuBackend;

mod recording;
mod renderer;
mod wgpu_backend;
