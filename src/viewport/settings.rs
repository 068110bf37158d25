//! Display configuration shared by the viewport components.

use crate::camera::{CameraLimits, CameraState};
use crate::color::{self, Color};
use crate::scene::{ElementColors, ElementFlags};

/// Display configuration of a viewport.
///
/// The controller receives it at construction and hands references to the
/// scene registry and the buffer cache; nothing looks settings up by name.
///
/// # Example
/// ```
/// # use meshview::prelude::*;
/// let settings = DisplaySettings::default()
///     .with_point_size(8.0)
///     .with_visible(ElementFlags::FACES | ElementFlags::EDGES);
/// assert!(!settings.visible.contains(ElementFlags::VERTICES));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplaySettings {
    /// Element classes displayed for newly added meshes.
    pub visible: ElementFlags,
    /// Per-class colors given to newly added meshes.
    pub colors: ElementColors,
    /// Front face color of objects that are not highlighted.
    pub base_color: Color,
    /// Front face color of the highlighted object.
    pub highlight_color: Color,
    /// Point size used to draw vertices, in pixels.
    pub point_size: f32,
    /// Line width used to draw edges, in pixels.
    pub line_width: f32,
    /// Length of the displayed face normals, in world units.
    pub normal_scale: f32,
    /// Initial camera parameters.
    pub camera: CameraState,
    /// Camera clamping configuration.
    pub camera_limits: CameraLimits,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            visible: ElementFlags::VERTICES | ElementFlags::EDGES | ElementFlags::FACES,
            colors: ElementColors::default(),
            base_color: color::NEUTRAL_GRAY,
            highlight_color: color::RED,
            point_size: 5.0,
            line_width: 1.0,
            normal_scale: 0.1,
            camera: CameraState::default(),
            camera_limits: CameraLimits::default(),
        }
    }
}

impl DisplaySettings {
    /// Sets the element classes displayed for new meshes.
    pub fn with_visible(mut self, visible: ElementFlags) -> Self {
        self.visible = visible;
        self
    }

    /// Sets the per-class colors of new meshes.
    pub fn with_colors(mut self, colors: ElementColors) -> Self {
        self.colors = colors;
        self
    }

    /// Sets the base and highlight colors.
    pub fn with_highlight(mut self, base: Color, highlight: Color) -> Self {
        self.base_color = base;
        self.highlight_color = highlight;
        self
    }

    /// Sets the vertex point size.
    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size.max(0.0);
        self
    }

    /// Sets the edge line width.
    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width.max(0.0);
        self
    }

    /// Sets the length of displayed normals.
    pub fn with_normal_scale(mut self, scale: f32) -> Self {
        self.normal_scale = scale.max(0.0);
        self
    }

    /// Sets the initial camera and its limits.
    pub fn with_camera(mut self, camera: CameraState, limits: CameraLimits) -> Self {
        self.camera = camera;
        self.camera_limits = limits;
        self
    }
}
