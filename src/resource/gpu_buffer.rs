//! Wrapper for a wgpu buffer holding one channel.

use crate::context::Context;

/// Element type of every index channel.
pub type VertexIndex = u32;

/// Index format matching [`VertexIndex`].
pub const INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint32;

/// Type of gpu buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferType {
    /// A vertex buffer (bindable as vertex data).
    Array,
    /// An index buffer (bindable as index data).
    ElementArray,
}

impl BufferType {
    /// Converts to wgpu buffer usages.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::BufferUsages {
        match self {
            BufferType::Array => wgpu::BufferUsages::VERTEX,
            BufferType::ElementArray => wgpu::BufferUsages::INDEX,
        }
    }
}

/// A GPU buffer that is written in place while it is large enough and
/// recreated when it is not.
pub struct GpuBuffer {
    label: &'static str,
    usage: wgpu::BufferUsages,
    buffer: Option<wgpu::Buffer>,
    len: usize,
}

impl GpuBuffer {
    /// Creates a buffer that is not yet allocated on the GPU.
    pub fn new(label: &'static str, buf_type: BufferType) -> GpuBuffer {
        GpuBuffer {
            label,
            usage: buf_type.to_wgpu() | wgpu::BufferUsages::COPY_DST,
            buffer: None,
            len: 0,
        }
    }

    /// Number of valid bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Does the buffer hold no data?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The wgpu buffer, if anything was uploaded yet.
    #[inline]
    pub fn buffer(&self) -> Option<&wgpu::Buffer> {
        if self.is_empty() {
            None
        } else {
            self.buffer.as_ref()
        }
    }

    /// Replaces the content of the buffer.
    pub fn write(&mut self, ctxt: &Context, bytes: &[u8]) {
        self.len = bytes.len();

        if bytes.is_empty() {
            return;
        }

        match self.buffer {
            Some(ref buffer) if bytes.len() <= buffer.size() as usize => {
                ctxt.write_buffer(buffer, 0, bytes);
            }
            _ => {
                self.buffer = Some(ctxt.create_buffer_init(Some(self.label), bytes, self.usage));
            }
        }
    }
}
