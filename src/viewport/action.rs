//! Discrete input events handled by the viewport controller, and what the
//! controller reports back.

use crate::camera::{CameraState, StandardView};
use crate::color::Color;
use crate::mesh::SubdivisionScheme;
use crate::scene::{ColorTarget, ElementClass, EntityAttributes, Selection, SelectionPath};

/// A user action, with its value already extracted from the GUI widget.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewportAction<M> {
    /// Replaces the mesh of an object, or appends a new object if `object`
    /// is `None`.
    LoadMesh {
        /// Target object.
        object: Option<usize>,
        /// The new mesh.
        mesh: M,
    },
    /// Subdivides the mesh of an object `k` times.
    Subdivide {
        /// Target object.
        object: usize,
        /// Subdivision scheme.
        scheme: SubdivisionScheme,
        /// Number of levels.
        k: usize,
    },
    /// Reverses the face cycles of one object, or of every object.
    FlipNormals {
        /// Target object, `None` for all.
        object: Option<usize>,
    },
    /// Moves every mesh so that the scene centroid lies on the origin.
    CenterObjects,
    /// Sets the color of one element class on every object.
    Recolor {
        /// The recolored part.
        target: ColorTarget,
        /// Its new color.
        color: Color,
    },
    /// Shows or hides an element class on every object.
    SetVisible {
        /// The element class.
        class: ElementClass,
        /// Whether it is displayed.
        visible: bool,
    },
    /// Sets the vertex point size.
    SetPointSize(f32),
    /// Sets the edge line width.
    SetLineWidth(f32),
    /// Sets the length of the displayed normals.
    SetNormalScale(f32),
    /// Rotates the camera by angle deltas, in degrees.
    Orbit {
        /// Azimuth delta.
        d_azimuth: f32,
        /// Elevation delta.
        d_elevation: f32,
    },
    /// Rotates the camera by a mouse drag, in pixels.
    Drag {
        /// Horizontal delta.
        dx: f32,
        /// Vertical delta.
        dy: f32,
    },
    /// Zooms by scroll notches; positive values zoom in.
    Scroll(f32),
    /// One zoom step towards the target.
    ZoomIn,
    /// One zoom step away from the target.
    ZoomOut,
    /// Sets the camera distance.
    SetDistance(f32),
    /// Sets the vertical field of view, in degrees.
    SetFov(f32),
    /// Sets the camera azimuth, in degrees.
    SetAzimuth(f32),
    /// Sets the camera elevation, in degrees.
    SetElevation(f32),
    /// Moves the camera to a preset viewpoint.
    SetView(StandardView),
    /// Fits the visible geometry in the field of view.
    ZoomExtents,
    /// The viewport was resized, in pixels.
    Resize {
        /// New width.
        width: f32,
        /// New height.
        height: f32,
    },
    /// An outline node was selected through its tag.
    Select(Selection),
    /// An outline node was selected through its row/column path.
    SelectPath(SelectionPath),
    /// The outline selection was cleared.
    ClearSelection,
}

/// How an action affects the viewport state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Changes entity counts or adjacency: full buffer rebuild.
    Topology,
    /// Changes display state only: partial buffer update or redraw.
    Attribute,
    /// Changes the camera only: redraw.
    Camera,
    /// Changes the highlighted object: color update.
    Selection,
}

impl<M> ViewportAction<M> {
    /// The kind of this action.
    pub fn kind(&self) -> ActionKind {
        match self {
            ViewportAction::LoadMesh { .. }
            | ViewportAction::Subdivide { .. }
            | ViewportAction::FlipNormals { .. }
            | ViewportAction::CenterObjects => ActionKind::Topology,
            ViewportAction::Recolor { .. }
            | ViewportAction::SetVisible { .. }
            | ViewportAction::SetPointSize(_)
            | ViewportAction::SetLineWidth(_)
            | ViewportAction::SetNormalScale(_) => ActionKind::Attribute,
            ViewportAction::Orbit { .. }
            | ViewportAction::Drag { .. }
            | ViewportAction::Scroll(_)
            | ViewportAction::ZoomIn
            | ViewportAction::ZoomOut
            | ViewportAction::SetDistance(_)
            | ViewportAction::SetFov(_)
            | ViewportAction::SetAzimuth(_)
            | ViewportAction::SetElevation(_)
            | ViewportAction::SetView(_)
            | ViewportAction::ZoomExtents
            | ViewportAction::Resize { .. } => ActionKind::Camera,
            ViewportAction::Select(_)
            | ViewportAction::SelectPath(_)
            | ViewportAction::ClearSelection => ActionKind::Selection,
        }
    }
}

/// Something the GUI around the viewport should reflect.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewportNotice {
    /// The camera parameters changed; sliders should follow.
    CameraChanged(CameraState),
    /// An object became the highlighted object.
    ObjectSelected(usize),
    /// An entity was selected, with its attributes.
    EntitySelected(EntityAttributes),
    /// The selection was cleared.
    SelectionCleared,
    /// A mesh operation failed; nothing was changed.
    OperationFailed(String),
}
