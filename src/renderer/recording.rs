//! A [`RenderBackend`] that records everything it receives.

use crate::renderer::{ChannelData, DrawCall, RenderBackend};
use crate::resource::Channel;
use glamx::Mat4;
use std::collections::HashMap;

/// Content of one recorded channel.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedChannel {
    /// Floating point components.
    Floats(Vec<f32>),
    /// Vertex indices.
    Indices(Vec<u32>),
}

impl RecordedChannel {
    /// Number of scalars.
    pub fn len(&self) -> usize {
        match self {
            RecordedChannel::Floats(data) => data.len(),
            RecordedChannel::Indices(data) => data.len(),
        }
    }

    /// Is the channel empty?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A backend without any GPU, used by the tests and by headless tools.
///
/// It keeps the last content of every channel, the sequence of uploads, the
/// draw calls of the last frame, and the number of presented frames.
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    channels: HashMap<Channel, RecordedChannel>,
    uploads: Vec<Channel>,
    current: Vec<DrawCall>,
    last_frame: Vec<DrawCall>,
    camera: Option<(Mat4, Mat4)>,
    frames: usize,
}

impl RecordingBackend {
    /// Creates an empty recorder.
    pub fn new() -> RecordingBackend {
        RecordingBackend::default()
    }

    /// The last uploaded content of a channel.
    pub fn channel(&self, channel: Channel) -> Option<&RecordedChannel> {
        self.channels.get(&channel)
    }

    /// The last uploaded floats of a channel.
    pub fn floats(&self, channel: Channel) -> &[f32] {
        match self.channels.get(&channel) {
            Some(RecordedChannel::Floats(data)) => data,
            _ => &[],
        }
    }

    /// The last uploaded indices of a channel.
    pub fn indices(&self, channel: Channel) -> &[u32] {
        match self.channels.get(&channel) {
            Some(RecordedChannel::Indices(data)) => data,
            _ => &[],
        }
    }

    /// Every upload since the last call to [`RecordingBackend::clear_uploads`].
    pub fn uploads(&self) -> &[Channel] {
        &self.uploads
    }

    /// Number of uploads since the last clear.
    pub fn upload_count(&self) -> usize {
        self.uploads.len()
    }

    /// Forgets the upload log, keeping the channel contents.
    pub fn clear_uploads(&mut self) {
        self.uploads.clear();
    }

    /// The draw calls of the last presented frame.
    pub fn last_frame(&self) -> &[DrawCall] {
        &self.last_frame
    }

    /// The camera matrices `(view, projection)` last set.
    pub fn camera(&self) -> Option<(Mat4, Mat4)> {
        self.camera
    }

    /// Number of presented frames.
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl RenderBackend for RecordingBackend {
    fn upload(&mut self, channel: Channel, data: ChannelData<'_>) {
        let recorded = match data {
            ChannelData::Floats(data) => RecordedChannel::Floats(data.to_vec()),
            ChannelData::Indices(data) => RecordedChannel::Indices(data.to_vec()),
        };
        self.channels.insert(channel, recorded);
        self.uploads.push(channel);
    }

    fn set_camera(&mut self, view: Mat4, projection: Mat4) {
        self.camera = Some((view, projection));
        self.current.clear();
    }

    fn draw(&mut self, call: &DrawCall) {
        self.current.push(*call);
    }

    fn present(&mut self) {
        self.last_frame = std::mem::take(&mut self.current);
        self.frames += 1;
    }
}
