use crate::mesh::PolyMesh;
use glamx::Vec3;

/// Generates a cuboid (box) mesh with the specified extents.
///
/// Creates a box centered at the origin with six outward-facing quads.
///
/// # Arguments
/// * `extents` - The full dimensions of the cuboid along each axis (width, height, depth)
///
/// # Example
/// ```
/// # use meshview::procedural::cuboid;
/// # use meshview::mesh::MeshData;
/// # use glamx::Vec3;
/// // Create a 2x3x4 box
/// let box_mesh = cuboid(Vec3::new(2.0, 3.0, 4.0));
/// assert_eq!(box_mesh.number_of_faces(), 6);
/// ```
pub fn cuboid(extents: Vec3) -> PolyMesh {
    let mut coords = unit_coords();

    for c in coords.iter_mut() {
        *c *= extents;
    }

    cuboid_from_coords(coords)
}

/// Generates a unit cuboid mesh.
///
/// Creates a cube centered at the origin with dimensions 1x1x1 (half-extents of 0.5).
pub fn unit_cuboid() -> PolyMesh {
    cuboid_from_coords(unit_coords())
}

fn unit_coords() -> Vec<Vec3> {
    vec![
        Vec3::new(-0.5, -0.5, 0.5),
        Vec3::new(-0.5, -0.5, -0.5),
        Vec3::new(0.5, -0.5, -0.5),
        Vec3::new(0.5, -0.5, 0.5),
        Vec3::new(-0.5, 0.5, 0.5),
        Vec3::new(-0.5, 0.5, -0.5),
        Vec3::new(0.5, 0.5, -0.5),
        Vec3::new(0.5, 0.5, 0.5),
    ]
}

fn cuboid_from_coords(coords: Vec<Vec3>) -> PolyMesh {
    let faces = vec![
        vec![0, 1, 2, 3], // -y
        vec![4, 7, 6, 5], // +y
        vec![0, 3, 7, 4], // +z
        vec![1, 5, 6, 2], // -z
        vec![0, 4, 5, 1], // -x
        vec![3, 2, 6, 7], // +x
    ];

    PolyMesh::from_vertices_and_faces(coords, faces)
        .unwrap_or_else(|_| unreachable!("the cuboid faces are well formed"))
}
