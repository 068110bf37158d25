//! A plain polygon mesh implementing [`MeshData`].

use crate::mesh::attribute::{AttributeName, AttributeValue, EntityKind};
use crate::mesh::geometry;
use crate::mesh::mesh_data::{
    EdgeKey, FaceKey, MeshData, MeshError, SubdivisionScheme, VertexKey, MAX_SUBDIVISION_LEVEL,
};
use glamx::Vec3;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Clone, Debug, PartialEq)]
struct VertexData {
    position: Vec3,
    is_fixed: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct EdgeData {
    ends: [VertexKey; 2],
    weight: f32,
    is_crease: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct FaceData {
    cycle: Vec<VertexKey>,
    group: i64,
}

/// A polygon mesh with integer keys for vertices, edges, and faces.
///
/// Faces are arbitrary polygons given as ordered vertex loops. Edges are the
/// undirected pairs of consecutive loop vertices, keyed in lexicographic order
/// of their end points so that their keys do not depend on face winding.
///
/// # Example
/// ```
/// # use meshview::mesh::{MeshData, PolyMesh};
/// # use glamx::Vec3;
/// let quad = PolyMesh::from_vertices_and_faces(
///     vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
///     vec![vec![0, 1, 2, 3]],
/// )
/// .unwrap();
/// assert_eq!(quad.number_of_edges(), 4);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolyMesh {
    vertices: BTreeMap<VertexKey, VertexData>,
    edges: Vec<EdgeData>,
    faces: BTreeMap<FaceKey, FaceData>,
}

impl PolyMesh {
    /// Builds a mesh from vertex positions and face loops indexing into them.
    ///
    /// Vertex `i` gets key `i` and face `j` gets key `j`.
    pub fn from_vertices_and_faces(
        vertices: Vec<Vec3>,
        faces: Vec<Vec<VertexKey>>,
    ) -> Result<PolyMesh, MeshError> {
        for (i, cycle) in faces.iter().enumerate() {
            if cycle.len() < 3 {
                return Err(MeshError::InvalidFace {
                    face: i,
                    reason: "fewer than three vertices",
                });
            }

            if cycle.iter().any(|v| *v >= vertices.len()) {
                return Err(MeshError::InvalidFace {
                    face: i,
                    reason: "references a missing vertex",
                });
            }

            let unique: BTreeSet<_> = cycle.iter().collect();
            if unique.len() != cycle.len() {
                return Err(MeshError::InvalidFace {
                    face: i,
                    reason: "repeats a vertex",
                });
            }
        }

        let vertices = vertices
            .into_iter()
            .map(|position| VertexData {
                position,
                is_fixed: false,
            })
            .collect();
        let faces = faces
            .into_iter()
            .map(|cycle| FaceData { cycle, group: 0 })
            .collect();

        Ok(PolyMesh::assemble(vertices, faces))
    }

    fn assemble(vertices: Vec<VertexData>, faces: Vec<FaceData>) -> PolyMesh {
        let mut pairs = BTreeSet::new();

        for face in &faces {
            let n = face.cycle.len();
            for i in 0..n {
                let (a, b) = (face.cycle[i], face.cycle[(i + 1) % n]);
                pairs.insert([a.min(b), a.max(b)]);
            }
        }

        PolyMesh {
            vertices: vertices.into_iter().enumerate().collect(),
            edges: pairs
                .into_iter()
                .map(|ends| EdgeData {
                    ends,
                    weight: 1.0,
                    is_crease: false,
                })
                .collect(),
            faces: faces.into_iter().enumerate().collect(),
        }
    }

    /// Assigns an attribute of an entity.
    ///
    /// Assigning a coordinate moves the vertex.
    pub fn set_attribute(
        &mut self,
        kind: EntityKind,
        key: usize,
        name: AttributeName,
        value: AttributeValue,
    ) -> Result<(), MeshError> {
        if !AttributeName::defaults(kind).contains(&name) || !value.fits(name) {
            return Err(MeshError::InvalidAttribute { kind, name });
        }

        let unknown = MeshError::UnknownEntity { kind, key };

        match kind {
            EntityKind::Vertex => {
                let vertex = self.vertices.get_mut(&key).ok_or(unknown)?;
                match (name, value) {
                    (AttributeName::X, AttributeValue::Float(v)) => vertex.position.x = v,
                    (AttributeName::Y, AttributeValue::Float(v)) => vertex.position.y = v,
                    (AttributeName::Z, AttributeValue::Float(v)) => vertex.position.z = v,
                    (AttributeName::IsFixed, AttributeValue::Bool(b)) => vertex.is_fixed = b,
                    _ => return Err(MeshError::InvalidAttribute { kind, name }),
                }
            }
            EntityKind::Edge => {
                let edge = self.edges.get_mut(key).ok_or(unknown)?;
                match (name, value) {
                    (AttributeName::Weight, AttributeValue::Float(v)) => edge.weight = v,
                    (AttributeName::IsCrease, AttributeValue::Bool(b)) => edge.is_crease = b,
                    _ => return Err(MeshError::InvalidAttribute { kind, name }),
                }
            }
            EntityKind::Face => {
                let face = self.faces.get_mut(&key).ok_or(unknown)?;
                match (name, value) {
                    (AttributeName::Group, AttributeValue::Int(g)) => face.group = g,
                    _ => return Err(MeshError::InvalidAttribute { kind, name }),
                }
            }
        }

        Ok(())
    }

    fn subdivide_once(&self, scheme: SubdivisionScheme) -> PolyMesh {
        // Existing vertices keep their relative order and come first.
        let mut vertices: Vec<VertexData> = self.vertices.values().cloned().collect();
        let index: HashMap<VertexKey, usize> = self
            .vertices
            .keys()
            .enumerate()
            .map(|(i, k)| (*k, i))
            .collect();
        let mut midpoints: HashMap<[usize; 2], usize> = HashMap::new();
        let mut faces = Vec::new();

        let mut midpoint = |vertices: &mut Vec<VertexData>, a: usize, b: usize| -> usize {
            *midpoints.entry([a.min(b), a.max(b)]).or_insert_with(|| {
                let position = (vertices[a].position + vertices[b].position) * 0.5;
                vertices.push(VertexData {
                    position,
                    is_fixed: false,
                });
                vertices.len() - 1
            })
        };

        for face in self.faces.values() {
            let cycle: Vec<usize> = face.cycle.iter().map(|k| index[k]).collect();
            let n = cycle.len();
            let points: Vec<Vec3> = cycle.iter().map(|i| vertices[*i].position).collect();

            match scheme {
                SubdivisionScheme::Tri => {
                    vertices.push(VertexData {
                        position: geometry::centroid(&points),
                        is_fixed: false,
                    });
                    let c = vertices.len() - 1;

                    for i in 0..n {
                        faces.push(FaceData {
                            cycle: vec![cycle[i], cycle[(i + 1) % n], c],
                            group: face.group,
                        });
                    }
                }
                SubdivisionScheme::Quad => {
                    vertices.push(VertexData {
                        position: geometry::centroid(&points),
                        is_fixed: false,
                    });
                    let c = vertices.len() - 1;
                    let mids: Vec<usize> = (0..n)
                        .map(|i| midpoint(&mut vertices, cycle[i], cycle[(i + 1) % n]))
                        .collect();

                    for i in 0..n {
                        faces.push(FaceData {
                            cycle: vec![cycle[i], mids[i], c, mids[(i + n - 1) % n]],
                            group: face.group,
                        });
                    }
                }
                SubdivisionScheme::Corner => {
                    let mids: Vec<usize> = (0..n)
                        .map(|i| midpoint(&mut vertices, cycle[i], cycle[(i + 1) % n]))
                        .collect();

                    for i in 0..n {
                        faces.push(FaceData {
                            cycle: vec![cycle[i], mids[i], mids[(i + n - 1) % n]],
                            group: face.group,
                        });
                    }

                    faces.push(FaceData {
                        cycle: mids,
                        group: face.group,
                    });
                }
            }
        }

        PolyMesh::assemble(vertices, faces)
    }
}

impl MeshData for PolyMesh {
    fn vertices(&self) -> Vec<VertexKey> {
        self.vertices.keys().copied().collect()
    }

    fn edges(&self) -> Vec<EdgeKey> {
        (0..self.edges.len()).collect()
    }

    fn faces(&self) -> Vec<FaceKey> {
        self.faces.keys().copied().collect()
    }

    fn vertex_position(&self, key: VertexKey) -> Option<Vec3> {
        self.vertices.get(&key).map(|v| v.position)
    }

    fn edge_vertices(&self, key: EdgeKey) -> Option<[VertexKey; 2]> {
        self.edges.get(key).map(|e| e.ends)
    }

    fn face_vertices(&self, key: FaceKey) -> Option<Vec<VertexKey>> {
        self.faces.get(&key).map(|f| f.cycle.clone())
    }

    fn attribute(
        &self,
        kind: EntityKind,
        key: usize,
        name: AttributeName,
    ) -> Option<AttributeValue> {
        match kind {
            EntityKind::Vertex => {
                let vertex = self.vertices.get(&key)?;
                match name {
                    AttributeName::X => Some(AttributeValue::Float(vertex.position.x)),
                    AttributeName::Y => Some(AttributeValue::Float(vertex.position.y)),
                    AttributeName::Z => Some(AttributeValue::Float(vertex.position.z)),
                    AttributeName::IsFixed => Some(AttributeValue::Bool(vertex.is_fixed)),
                    _ => None,
                }
            }
            EntityKind::Edge => {
                let edge = self.edges.get(key)?;
                match name {
                    AttributeName::Weight => Some(AttributeValue::Float(edge.weight)),
                    AttributeName::IsCrease => Some(AttributeValue::Bool(edge.is_crease)),
                    _ => None,
                }
            }
            EntityKind::Face => {
                let face = self.faces.get(&key)?;
                match name {
                    AttributeName::Group => Some(AttributeValue::Int(face.group)),
                    _ => None,
                }
            }
        }
    }

    fn flip_cycles(&mut self) {
        for face in self.faces.values_mut() {
            face.cycle.reverse();
        }
    }

    fn subdivide(&self, scheme: SubdivisionScheme, k: usize) -> Result<PolyMesh, MeshError> {
        if k == 0 || k > MAX_SUBDIVISION_LEVEL {
            return Err(MeshError::SubdivisionLevel(k));
        }

        let mut mesh = self.subdivide_once(scheme);
        for _ in 1..k {
            mesh = mesh.subdivide_once(scheme);
        }

        Ok(mesh)
    }

    fn translate(&mut self, offset: Vec3) {
        for vertex in self.vertices.values_mut() {
            vertex.position += offset;
        }
    }

    fn number_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    fn number_of_edges(&self) -> usize {
        self.edges.len()
    }

    fn number_of_faces(&self) -> usize {
        self.faces.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedural;

    fn triangle() -> PolyMesh {
        PolyMesh::from_vertices_and_faces(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![vec![0, 1, 2]])
            .unwrap()
    }

    #[test]
    fn rejects_invalid_faces() {
        let err = PolyMesh::from_vertices_and_faces(vec![Vec3::ZERO, Vec3::X], vec![vec![0, 1]]);
        assert!(matches!(err, Err(MeshError::InvalidFace { face: 0, .. })));

        let err = PolyMesh::from_vertices_and_faces(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![vec![0, 1, 2], vec![0, 1, 7]],
        );
        assert!(matches!(err, Err(MeshError::InvalidFace { face: 1, .. })));
    }

    #[test]
    fn cube_counts() {
        let cube = procedural::unit_cuboid();
        assert_eq!(cube.number_of_vertices(), 8);
        assert_eq!(cube.number_of_edges(), 12);
        assert_eq!(cube.number_of_faces(), 6);
    }

    #[test]
    fn flipping_keeps_edges_and_reverses_faces() {
        let mut cube = procedural::unit_cuboid();
        let edges_before: Vec<_> = cube.edges().iter().map(|e| cube.edge_vertices(*e)).collect();
        let face_before = cube.face_vertices(0).unwrap();

        cube.flip_cycles();

        let edges_after: Vec<_> = cube.edges().iter().map(|e| cube.edge_vertices(*e)).collect();
        let mut face_after = cube.face_vertices(0).unwrap();
        face_after.reverse();

        assert_eq!(edges_before, edges_after);
        assert_eq!(face_before, face_after);
    }

    #[test]
    fn subdivision_counts() {
        let cube = procedural::unit_cuboid();

        let quad = cube.subdivide(SubdivisionScheme::Quad, 1).unwrap();
        assert_eq!(quad.number_of_faces(), 24);
        assert_eq!(quad.number_of_vertices(), 8 + 12 + 6);

        let tri = cube.subdivide(SubdivisionScheme::Tri, 1).unwrap();
        assert_eq!(tri.number_of_faces(), 24);
        assert_eq!(tri.number_of_vertices(), 8 + 6);

        let corner = triangle().subdivide(SubdivisionScheme::Corner, 2).unwrap();
        assert_eq!(corner.number_of_faces(), 16);
    }

    #[test]
    fn subdivision_keeps_original_vertices() {
        let cube = procedural::unit_cuboid();
        let quad = cube.subdivide(SubdivisionScheme::Quad, 1).unwrap();

        for key in cube.vertices() {
            assert_eq!(cube.vertex_position(key), quad.vertex_position(key));
        }
    }

    #[test]
    fn subdivision_level_is_bounded() {
        let cube = procedural::unit_cuboid();
        assert_eq!(
            cube.subdivide(SubdivisionScheme::Quad, 0),
            Err(MeshError::SubdivisionLevel(0))
        );
        assert!(cube
            .subdivide(SubdivisionScheme::Tri, MAX_SUBDIVISION_LEVEL + 1)
            .is_err());
    }

    #[test]
    fn attributes_round_through_setters() {
        let mut mesh = triangle();
        mesh.set_attribute(
            EntityKind::Vertex,
            1,
            AttributeName::Z,
            AttributeValue::Float(2.5),
        )
        .unwrap();
        assert_eq!(mesh.vertex_position(1), Some(Vec3::new(1.0, 0.0, 2.5)));

        let err = mesh.set_attribute(
            EntityKind::Edge,
            0,
            AttributeName::X,
            AttributeValue::Float(1.0),
        );
        assert!(matches!(err, Err(MeshError::InvalidAttribute { .. })));

        let err = mesh.set_attribute(
            EntityKind::Face,
            9,
            AttributeName::Group,
            AttributeValue::Int(1),
        );
        assert_eq!(
            err,
            Err(MeshError::UnknownEntity {
                kind: EntityKind::Face,
                key: 9
            })
        );
    }

    #[test]
    fn centroid_and_translation() {
        let mut cube = procedural::cuboid(Vec3::splat(2.0));
        cube.translate(Vec3::new(1.0, 2.0, 3.0));
        let c = cube.centroid().unwrap();
        assert!((c - Vec3::new(1.0, 2.0, 3.0)).length() < 1.0e-5);
        assert_eq!(PolyMesh::default().centroid(), None);
    }
}
