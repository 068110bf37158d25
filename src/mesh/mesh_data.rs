//! The capability a mesh must expose to be displayed by the viewport.

use crate::mesh::attribute::{AttributeName, AttributeValue, EntityKind};
use glamx::Vec3;
use thiserror::Error;

/// Key of a vertex, in the mesh's own key space.
pub type VertexKey = usize;
/// Key of an edge, in the mesh's own key space.
pub type EdgeKey = usize;
/// Key of a face, in the mesh's own key space.
pub type FaceKey = usize;

/// Maximum number of subdivision levels applied by a single operation.
pub const MAX_SUBDIVISION_LEVEL: usize = 6;

/// Subdivision schemes supported by [`MeshData::subdivide`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SubdivisionScheme {
    /// Every n-gon becomes n quads joining the face centroid to its edge midpoints.
    Quad,
    /// Every n-gon becomes a fan of n triangles around its centroid.
    Tri,
    /// Every corner is cut off along the edge midpoints, leaving a central polygon.
    Corner,
}

/// Errors reported by a mesh.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// A face loop is not a valid polygon.
    #[error("face {face} is invalid: {reason}")]
    InvalidFace {
        /// Position of the face in its input list.
        face: usize,
        /// Description of the defect.
        reason: &'static str,
    },
    /// The entity does not exist.
    #[error("unknown {kind} {key}")]
    UnknownEntity {
        /// Kind of the entity looked up.
        kind: EntityKind,
        /// Key of the entity looked up.
        key: usize,
    },
    /// The attribute is not part of the entity kind's attribute set, or the
    /// value has the wrong type.
    #[error("attribute `{name}` cannot be set on a {kind}")]
    InvalidAttribute {
        /// Kind of the entity.
        kind: EntityKind,
        /// The rejected attribute.
        name: AttributeName,
    },
    /// The requested number of subdivision levels is out of range.
    #[error("subdivision level {0} is outside 1..={max}", max = MAX_SUBDIVISION_LEVEL)]
    SubdivisionLevel(usize),
}

/// Read and edit access to a polygon mesh.
///
/// The viewport never copies a mesh: it derives its geometry buffers from the
/// entity iteration and attribute access exposed here, and invokes the editing
/// operations when the user runs a tool.
///
/// Iteration order must be stable between two calls if the mesh was not
/// modified: the geometry buffers and the outline both rely on it.
pub trait MeshData {
    /// Ordered keys of all vertices.
    fn vertices(&self) -> Vec<VertexKey>;

    /// Ordered keys of all edges.
    fn edges(&self) -> Vec<EdgeKey>;

    /// Ordered keys of all faces.
    fn faces(&self) -> Vec<FaceKey>;

    /// Position of a vertex.
    fn vertex_position(&self, key: VertexKey) -> Option<Vec3>;

    /// The two end points of an edge.
    fn edge_vertices(&self, key: EdgeKey) -> Option<[VertexKey; 2]>;

    /// The ordered vertex loop of a face.
    fn face_vertices(&self, key: FaceKey) -> Option<Vec<VertexKey>>;

    /// Value of one attribute of an entity.
    ///
    /// Returns `None` if the entity does not exist or if the attribute is not
    /// carried by entities of this kind.
    fn attribute(&self, kind: EntityKind, key: usize, name: AttributeName)
        -> Option<AttributeValue>;

    /// The attributes carried by every entity of the given kind.
    fn default_attribute_names(&self, kind: EntityKind) -> &'static [AttributeName] {
        AttributeName::defaults(kind)
    }

    /// Reverses the vertex cycle of every face in place.
    fn flip_cycles(&mut self);

    /// Returns a new mesh subdivided `k` times with the given scheme.
    fn subdivide(&self, scheme: SubdivisionScheme, k: usize) -> Result<Self, MeshError>
    where
        Self: Sized;

    /// Translates every vertex by `offset`.
    fn translate(&mut self, offset: Vec3);

    /// Number of vertices.
    fn number_of_vertices(&self) -> usize {
        self.vertices().len()
    }

    /// Number of edges.
    fn number_of_edges(&self) -> usize {
        self.edges().len()
    }

    /// Number of faces.
    fn number_of_faces(&self) -> usize {
        self.faces().len()
    }

    /// Does the entity exist?
    fn contains(&self, kind: EntityKind, key: usize) -> bool {
        match kind {
            EntityKind::Vertex => self.vertex_position(key).is_some(),
            EntityKind::Edge => self.edge_vertices(key).is_some(),
            EntityKind::Face => self.face_vertices(key).is_some(),
        }
    }

    /// Mean of all vertex positions, `None` for an empty mesh.
    fn centroid(&self) -> Option<Vec3> {
        let points: Vec<Vec3> = self
            .vertices()
            .into_iter()
            .filter_map(|key| self.vertex_position(key))
            .collect();

        if points.is_empty() {
            None
        } else {
            Some(points.iter().copied().sum::<Vec3>() / points.len() as f32)
        }
    }

    /// Axis-aligned bounds `(min, max)` of all vertex positions.
    fn aabb(&self) -> Option<(Vec3, Vec3)> {
        self.vertices()
            .into_iter()
            .filter_map(|key| self.vertex_position(key))
            .fold(None, |acc, p| match acc {
                None => Some((p, p)),
                Some((mn, mx)) => Some((mn.min(p), mx.max(p))),
            })
    }
}
