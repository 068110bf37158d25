use crate::resource::Channel;
use glamx::Mat4;

/// Primitive topology of a draw call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// One point per index (or per vertex).
    Points,
    /// One segment per pair of indices (or of vertices).
    Lines,
    /// One triangle per triple of indices.
    Triangles,
}

/// Data of one uploaded channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChannelData<'a> {
    /// Flattened floating point components.
    Floats(&'a [f32]),
    /// Flattened vertex indices.
    Indices(&'a [u32]),
}

impl<'a> ChannelData<'a> {
    /// The raw bytes of the data.
    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            ChannelData::Floats(data) => bytemuck::cast_slice(data),
            ChannelData::Indices(data) => bytemuck::cast_slice(data),
        }
    }

    /// Number of scalars.
    pub fn len(&self) -> usize {
        match *self {
            ChannelData::Floats(data) => data.len(),
            ChannelData::Indices(data) => data.len(),
        }
    }

    /// Is there no data at all?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A draw command issued by the geometry buffer cache.
///
/// `first` and `count` are expressed in scalars of the index channel, or in
/// vertices of the position channel when `indices` is `None`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    /// Primitive topology.
    pub primitive: Primitive,
    /// Channel bound as vertex positions.
    pub positions: Channel,
    /// Channel bound as vertex colors.
    pub colors: Channel,
    /// Channel bound as index list, if any.
    pub indices: Option<Channel>,
    /// First index (or vertex) drawn.
    pub first: u32,
    /// Number of indices (or vertices) drawn.
    pub count: u32,
    /// Point size or line width, in pixels. Ignored for triangles.
    pub size: f32,
}

/// The host rendering API the viewport draws with.
///
/// Implement this trait to plug the viewport into a rendering pipeline. The
/// viewport uploads named channels, then for every frame sets the camera,
/// issues its draw calls, and presents.
pub trait RenderBackend {
    /// Replaces the content of a channel.
    fn upload(&mut self, channel: Channel, data: ChannelData<'_>);

    /// Sets the camera matrices used by the following draw calls.
    fn set_camera(&mut self, view: Mat4, projection: Mat4);

    /// Draws a range of the uploaded channels.
    fn draw(&mut self, call: &DrawCall);

    /// Ends the frame and presents it.
    fn present(&mut self);
}
