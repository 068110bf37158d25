//! The mesh collaborator: the capability the viewport consumes from meshes.
//!
//! The viewport only depends on the [`MeshData`] trait. [`PolyMesh`] is a
//! straightforward implementation used by the procedural generators, the
//! demos, and the tests.

pub use self::attribute::{AttributeName, AttributeValue, EntityKind};
pub use self::mesh_data::{
    EdgeKey, FaceKey, MeshData, MeshError, SubdivisionScheme, VertexKey, MAX_SUBDIVISION_LEVEL,
};
pub use self::poly_mesh::PolyMesh;

mod attribute;
pub mod geometry;
mod mesh_data;
mod poly_mesh;
