//! Platonic solids.

use super::cuboid;
use crate::mesh::{geometry, PolyMesh};
use glamx::Vec3;

/// Generates the platonic solid with the given number of faces.
///
/// Supported face counts are 4 (tetrahedron), 6 (cube), 8 (octahedron),
/// 12 (dodecahedron), and 20 (icosahedron). Returns `None` otherwise.
///
/// # Example
/// ```
/// # use meshview::procedural::polyhedron;
/// # use meshview::mesh::MeshData;
/// let ico = polyhedron(20).unwrap();
/// assert_eq!(ico.number_of_vertices(), 12);
/// assert!(polyhedron(7).is_none());
/// ```
pub fn polyhedron(faces: usize) -> Option<PolyMesh> {
    match faces {
        4 => Some(tetrahedron()),
        6 => Some(cuboid(Vec3::splat(2.0))),
        8 => Some(octahedron()),
        12 => Some(dodecahedron()),
        20 => Some(icosahedron()),
        _ => None,
    }
}

/// A regular tetrahedron inscribed in the cube `[-1, 1]^3`.
pub fn tetrahedron() -> PolyMesh {
    let coords = vec![
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
    ];
    let faces = vec![vec![0, 1, 2], vec![0, 1, 3], vec![0, 2, 3], vec![1, 2, 3]];

    convex(coords, faces)
}

/// A regular octahedron with its vertices on the coordinate axes.
pub fn octahedron() -> PolyMesh {
    let coords = vec![Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z];
    let mut faces = Vec::with_capacity(8);

    for x in [0, 1] {
        for y in [2, 3] {
            for z in [4, 5] {
                faces.push(vec![x, y, z]);
            }
        }
    }

    convex(coords, faces)
}

/// A regular icosahedron with edge length 2.
pub fn icosahedron() -> PolyMesh {
    let (coords, faces) = icosahedron_data();
    convex(coords, faces)
}

/// A regular dodecahedron, built as the dual of the icosahedron.
pub fn dodecahedron() -> PolyMesh {
    let (ico_coords, ico_faces) = icosahedron_data();

    let coords: Vec<Vec3> = ico_faces
        .iter()
        .map(|f| geometry::centroid(&f.iter().map(|i| ico_coords[*i]).collect::<Vec<_>>()))
        .collect();

    // One pentagon per icosahedron vertex, made of the centroids of its five
    // incident triangles sorted by angle around the vertex direction.
    let faces = ico_coords
        .iter()
        .enumerate()
        .map(|(v, axis)| {
            let axis = axis.normalize();
            let u = axis.any_orthonormal_vector();
            let w = axis.cross(u);
            let mut ring: Vec<(f32, usize)> = ico_faces
                .iter()
                .enumerate()
                .filter(|(_, f)| f.contains(&v))
                .map(|(i, _)| {
                    let c = coords[i];
                    (c.dot(w).atan2(c.dot(u)), i)
                })
                .collect();
            ring.sort_by(|a, b| a.0.total_cmp(&b.0));
            ring.into_iter().map(|(_, i)| i).collect()
        })
        .collect();

    convex(coords, faces)
}

fn icosahedron_data() -> (Vec<Vec3>, Vec<Vec<usize>>) {
    let phi = (1.0 + 5.0f32.sqrt()) / 2.0;
    let mut coords = Vec::with_capacity(12);

    for a in [-1.0, 1.0] {
        for b in [-phi, phi] {
            coords.push(Vec3::new(0.0, a, b));
            coords.push(Vec3::new(a, b, 0.0));
            coords.push(Vec3::new(b, 0.0, a));
        }
    }

    // Adjacent vertices are exactly 2 apart.
    let adjacent = |i: usize, j: usize| ((coords[i] - coords[j]).length() - 2.0).abs() < 1.0e-3;
    let mut faces = Vec::with_capacity(20);

    for i in 0..coords.len() {
        for j in i + 1..coords.len() {
            for k in j + 1..coords.len() {
                if adjacent(i, j) && adjacent(j, k) && adjacent(i, k) {
                    faces.push(vec![i, j, k]);
                }
            }
        }
    }

    (coords, faces)
}

/// Orients every face of a convex solid centered at the origin outward.
fn convex(coords: Vec<Vec3>, mut faces: Vec<Vec<usize>>) -> PolyMesh {
    for face in faces.iter_mut() {
        let points: Vec<Vec3> = face.iter().map(|i| coords[*i]).collect();
        if geometry::polygon_normal(&points).dot(geometry::centroid(&points)) < 0.0 {
            face.reverse();
        }
    }

    PolyMesh::from_vertices_and_faces(coords, faces)
        .unwrap_or_else(|_| unreachable!("platonic solid faces are well formed"))
}
