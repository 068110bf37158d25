//! A mesh together with its display state.

use crate::color::{self, Color};
use crate::mesh::MeshData;
use crate::resource::Channel;
use crate::viewport::DisplaySettings;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

bitflags::bitflags! {
    /// Element classes of a mesh that can be shown or hidden.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ElementFlags: u8 {
        /// Vertices, drawn as points.
        const VERTICES = 1 << 0;
        /// Edges, drawn as lines.
        const EDGES = 1 << 1;
        /// Faces, drawn as triangles.
        const FACES = 1 << 2;
        /// Face normals, drawn as lines from the face centroids.
        const NORMALS = 1 << 3;
    }
}

/// A single element class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementClass {
    /// Vertices.
    Vertices,
    /// Edges.
    Edges,
    /// Faces.
    Faces,
    /// Face normals.
    Normals,
}

impl ElementClass {
    /// The flag of this class.
    pub fn flag(self) -> ElementFlags {
        match self {
            ElementClass::Vertices => ElementFlags::VERTICES,
            ElementClass::Edges => ElementFlags::EDGES,
            ElementClass::Faces => ElementFlags::FACES,
            ElementClass::Normals => ElementFlags::NORMALS,
        }
    }

    /// The color channels whose alpha encodes the visibility of this class.
    pub fn color_channels(self) -> &'static [Channel] {
        match self {
            ElementClass::Vertices => &[Channel::VertexColors],
            ElementClass::Edges => &[Channel::EdgeColors],
            ElementClass::Faces => &[Channel::FaceColorsFront, Channel::FaceColorsBack],
            ElementClass::Normals => &[Channel::NormalColors],
        }
    }
}

/// The recolorable parts of a mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorTarget {
    /// Vertex points.
    Vertices,
    /// Edge lines.
    Edges,
    /// Front faces of objects that are not highlighted (the base color).
    FacesFront,
    /// Back faces.
    FacesBack,
    /// Normal lines.
    Normals,
}

impl ColorTarget {
    /// The buffer channel holding this color.
    pub fn channel(self) -> Channel {
        match self {
            ColorTarget::Vertices => Channel::VertexColors,
            ColorTarget::Edges => Channel::EdgeColors,
            ColorTarget::FacesFront => Channel::FaceColorsFront,
            ColorTarget::FacesBack => Channel::FaceColorsBack,
            ColorTarget::Normals => Channel::NormalColors,
        }
    }
}

/// Colors of the element classes of one mesh, apart from its front faces
/// which use the object's base or highlight color.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementColors {
    /// Vertex color.
    pub vertices: Color,
    /// Edge color.
    pub edges: Color,
    /// Back face color.
    pub faces_back: Color,
    /// Normal color.
    pub normals: Color,
}

impl Default for ElementColors {
    fn default() -> Self {
        ElementColors {
            vertices: color::BLACK,
            edges: color::DIM_GRAY,
            faces_back: color::DARK_GRAY,
            normals: color::CYAN,
        }
    }
}

/// A mesh displayed by the viewport.
///
/// The mesh itself is shared with the code that owns it: the object only
/// keeps a reference and never copies it.
pub struct MeshObject<M> {
    mesh: Rc<RefCell<M>>,
    color: Color,
    colors: ElementColors,
    visible: ElementFlags,
    point_size: f32,
    line_width: f32,
    normal_scale: f32,
}

impl<M: MeshData> MeshObject<M> {
    /// Wraps a mesh with the default display settings.
    pub fn new(mesh: M) -> MeshObject<M> {
        MeshObject::with_settings(Rc::new(RefCell::new(mesh)), &DisplaySettings::default())
    }

    /// Wraps a shared mesh with the given display settings.
    pub fn with_settings(mesh: Rc<RefCell<M>>, settings: &DisplaySettings) -> MeshObject<M> {
        MeshObject {
            mesh,
            color: settings.base_color,
            colors: settings.colors,
            visible: settings.visible,
            point_size: settings.point_size,
            line_width: settings.line_width,
            normal_scale: settings.normal_scale,
        }
    }

    /// Sets the front face color.
    pub fn set_color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }
}

impl<M> MeshObject<M> {
    /// Borrows the mesh.
    #[inline]
    pub fn mesh(&self) -> Ref<'_, M> {
        self.mesh.borrow()
    }

    /// Mutably borrows the mesh.
    #[inline]
    pub fn mesh_mut(&self) -> RefMut<'_, M> {
        self.mesh.borrow_mut()
    }

    /// The shared mesh handle.
    #[inline]
    pub fn shared_mesh(&self) -> &Rc<RefCell<M>> {
        &self.mesh
    }

    /// Replaces the mesh by another one, e.g. the result of a subdivision.
    #[inline]
    pub fn replace_mesh(&mut self, mesh: M) -> M {
        self.mesh.replace(mesh)
    }

    /// The front face color: the base color, or the highlight color if the
    /// object is selected.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// The colors of the other element classes.
    #[inline]
    pub fn colors(&self) -> &ElementColors {
        &self.colors
    }

    /// The color of a recolorable part.
    pub fn target_color(&self, target: ColorTarget) -> Color {
        match target {
            ColorTarget::Vertices => self.colors.vertices,
            ColorTarget::Edges => self.colors.edges,
            ColorTarget::FacesFront => self.color,
            ColorTarget::FacesBack => self.colors.faces_back,
            ColorTarget::Normals => self.colors.normals,
        }
    }

    pub(crate) fn set_target_color(&mut self, target: ColorTarget, color: Color) {
        match target {
            ColorTarget::Vertices => self.colors.vertices = color,
            ColorTarget::Edges => self.colors.edges = color,
            ColorTarget::FacesFront => self.color = color,
            ColorTarget::FacesBack => self.colors.faces_back = color,
            ColorTarget::Normals => self.colors.normals = color,
        }
    }

    /// The displayed element classes.
    #[inline]
    pub fn visible(&self) -> ElementFlags {
        self.visible
    }

    /// Is the given class displayed?
    #[inline]
    pub fn is_visible(&self, class: ElementClass) -> bool {
        self.visible.contains(class.flag())
    }

    /// Shows or hides one element class.
    pub fn set_visible(&mut self, class: ElementClass, visible: bool) -> &mut Self {
        self.visible.set(class.flag(), visible);
        self
    }

    /// Vertex point size, in pixels.
    #[inline]
    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    /// Sets the vertex point size.
    pub fn set_point_size(&mut self, size: f32) -> &mut Self {
        self.point_size = size.max(0.0);
        self
    }

    /// Edge line width, in pixels.
    #[inline]
    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Sets the edge line width.
    pub fn set_line_width(&mut self, width: f32) -> &mut Self {
        self.line_width = width.max(0.0);
        self
    }

    /// Length of the displayed normals.
    #[inline]
    pub fn normal_scale(&self) -> f32 {
        self.normal_scale
    }

    /// Sets the length of the displayed normals.
    pub fn set_normal_scale(&mut self, scale: f32) -> &mut Self {
        self.normal_scale = scale.max(0.0);
        self
    }
}

impl<M: MeshData> From<M> for MeshObject<M> {
    fn from(mesh: M) -> Self {
        MeshObject::new(mesh)
    }
}
