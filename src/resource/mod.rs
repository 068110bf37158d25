//! Geometry buffers and the GPU resources backing them.

pub use self::buffers::{
    BufferError, BufferState, BufferUpdate, GeometryBuffers, ObjectRange, ObjectShape,
};
pub use self::channel::Channel;
pub use self::gpu_buffer::{BufferType, GpuBuffer, VertexIndex, INDEX_FORMAT};

mod buffers;
mod channel;
mod gpu_buffer;
