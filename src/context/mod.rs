//! The GPU context shared by the wgpu backend and its buffers.

pub use self::context::{Context, ContextError};

mod context;
