//! Procedural generation of simple polygon meshes.

pub use self::cuboid::{cuboid, unit_cuboid};
pub use self::polyhedron::{dodecahedron, icosahedron, octahedron, polyhedron, tetrahedron};

mod cuboid;
mod polyhedron;
