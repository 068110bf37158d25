//! Names of the arrays produced by the geometry buffer cache.

use std::fmt;

/// One named array of the geometry buffers.
///
/// Attribute channels hold one entry per vertex (or per normal end point);
/// index channels hold primitives indexing into [`Channel::Positions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    /// Vertex positions, three floats per vertex.
    Positions,
    /// Vertex point colors, four floats per vertex.
    VertexColors,
    /// Edge line colors, four floats per vertex.
    EdgeColors,
    /// Front face colors, four floats per vertex.
    FaceColorsFront,
    /// Back face colors, four floats per vertex.
    FaceColorsBack,
    /// End points of the normal lines, two points per face.
    NormalPositions,
    /// Colors of the normal lines, four floats per end point.
    NormalColors,
    /// Vertex indices drawn as points.
    Points,
    /// Vertex index pairs drawn as lines.
    Lines,
    /// Front-facing triangles.
    FacesFront,
    /// Back-facing triangles: the front triangles with reversed winding.
    FacesBack,
}

impl Channel {
    /// Every channel, in upload order.
    pub const ALL: [Channel; 11] = [
        Channel::Positions,
        Channel::VertexColors,
        Channel::EdgeColors,
        Channel::FaceColorsFront,
        Channel::FaceColorsBack,
        Channel::NormalPositions,
        Channel::NormalColors,
        Channel::Points,
        Channel::Lines,
        Channel::FacesFront,
        Channel::FacesBack,
    ];

    /// The buffer name of this channel.
    pub fn name(self) -> &'static str {
        match self {
            Channel::Positions => "xyz",
            Channel::VertexColors => "vertices.color",
            Channel::EdgeColors => "edges.color",
            Channel::FaceColorsFront => "faces.color:front",
            Channel::FaceColorsBack => "faces.color:back",
            Channel::NormalPositions => "normals",
            Channel::NormalColors => "normals.color",
            Channel::Points => "vertices",
            Channel::Lines => "edges",
            Channel::FacesFront => "faces:front",
            Channel::FacesBack => "faces:back",
        }
    }

    /// Does this channel hold vertex indices?
    pub fn is_index(self) -> bool {
        matches!(
            self,
            Channel::Points | Channel::Lines | Channel::FacesFront | Channel::FacesBack
        )
    }

    /// Does this channel hold colors?
    pub fn is_color(self) -> bool {
        matches!(
            self,
            Channel::VertexColors
                | Channel::EdgeColors
                | Channel::FaceColorsFront
                | Channel::FaceColorsBack
                | Channel::NormalColors
        )
    }

    /// Number of scalars (floats or indices) per element of this channel.
    pub fn components(self) -> usize {
        match self {
            Channel::Positions | Channel::NormalPositions | Channel::FacesFront | Channel::FacesBack => 3,
            Channel::Lines => 2,
            Channel::Points => 1,
            _ => 4,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
