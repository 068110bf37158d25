//! Outline selections and their resolution to mesh entities.

use crate::mesh::{AttributeName, AttributeValue, EntityKind, MeshData};
use crate::scene::Scene;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Entity kinds in outline category order.
pub const CATEGORIES: [EntityKind; 3] = [EntityKind::Vertex, EntityKind::Edge, EntityKind::Face];

/// What an outline node designates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// A whole object, by scene index.
    ObjectOnly(usize),
    /// One category node of an object.
    Category(usize, EntityKind),
    /// One entity of an object, by its key in the mesh's own key space.
    Entity(usize, EntityKind, usize),
}

impl Selection {
    /// The scene index of the selected object.
    pub fn object(&self) -> usize {
        match *self {
            Selection::ObjectOnly(object)
            | Selection::Category(object, _)
            | Selection::Entity(object, _, _) => object,
        }
    }

    /// The selected entity kind, if any.
    pub fn kind(&self) -> Option<EntityKind> {
        match *self {
            Selection::ObjectOnly(_) => None,
            Selection::Category(_, kind) | Selection::Entity(_, kind, _) => Some(kind),
        }
    }

    /// The selected entity key, if any.
    pub fn key(&self) -> Option<usize> {
        match *self {
            Selection::Entity(_, _, key) => Some(key),
            _ => None,
        }
    }
}

/// A `(row, column)` trail from an outline root down to the selected node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SelectionPath(Vec<(usize, usize)>);

impl SelectionPath {
    /// Creates a path from its steps, root first.
    pub fn new(steps: Vec<(usize, usize)>) -> SelectionPath {
        SelectionPath(steps)
    }

    /// The steps of the path, root first.
    #[inline]
    pub fn steps(&self) -> &[(usize, usize)] {
        &self.0
    }

    /// Depth of the path.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Is the path empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends a step.
    pub fn push(&mut self, row: usize, column: usize) {
        self.0.push((row, column));
    }

    // Common structural checks; returns the rows.
    pub(crate) fn rows(&self) -> Result<Vec<usize>, MalformedSelection> {
        if self.0.is_empty() {
            return Err(MalformedSelection::Empty);
        }
        if self.0.len() > 3 {
            return Err(MalformedSelection::TooDeep(self.0.len()));
        }

        self.0
            .iter()
            .enumerate()
            .map(|(depth, &(row, column))| {
                if column != 0 {
                    Err(MalformedSelection::NonZeroColumn { depth, column })
                } else {
                    Ok(row)
                }
            })
            .collect()
    }
}

impl From<Vec<(usize, usize)>> for SelectionPath {
    fn from(steps: Vec<(usize, usize)>) -> Self {
        SelectionPath(steps)
    }
}

impl FromIterator<(usize, usize)> for SelectionPath {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        SelectionPath(iter.into_iter().collect())
    }
}

/// A selection path or selection that does not match the outline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedSelection {
    /// The path has no step.
    #[error("empty selection path")]
    Empty,
    /// The path goes below the entity level.
    #[error("a selection path of depth {0} is deeper than an entity")]
    TooDeep(usize),
    /// Only the first column of the outline holds nodes.
    #[error("column {column} at depth {depth} does not hold outline nodes")]
    NonZeroColumn {
        /// Depth of the offending step.
        depth: usize,
        /// Its column.
        column: usize,
    },
    /// No object at this top-level row.
    #[error("no object at row {0}")]
    UnknownObject(usize),
    /// No category at this row.
    #[error("object {object} has no category at row {row}")]
    UnknownCategory {
        /// Scene index of the object.
        object: usize,
        /// Row of the category.
        row: usize,
    },
    /// No entity at this row of a category.
    #[error("object {object} has no {kind} at row {row}")]
    UnknownEntityRow {
        /// Scene index of the object.
        object: usize,
        /// Kind of the category.
        kind: EntityKind,
        /// Row of the entity.
        row: usize,
    },
    /// No entity with this key.
    #[error("object {object} has no {kind} with key {key}")]
    UnknownEntity {
        /// Scene index of the object.
        object: usize,
        /// Kind of the entity.
        kind: EntityKind,
        /// Key of the entity.
        key: usize,
    },
}

/// The attributes of one selected entity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityAttributes {
    /// Scene index of the object.
    pub object: usize,
    /// Kind of the entity.
    pub kind: EntityKind,
    /// Key of the entity.
    pub key: usize,
    /// Every default attribute of the entity kind, by name.
    pub values: BTreeMap<AttributeName, AttributeValue>,
}

impl fmt::Display for EntityAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mesh {}: {} {} => {{", self.object, self.kind, self.key)?;

        for (i, (name, value)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }

        f.write_str("}")
    }
}

/// The ordered keys of one entity kind, as listed by the outline.
pub(crate) fn entity_keys<M: MeshData + ?Sized>(mesh: &M, kind: EntityKind) -> Vec<usize> {
    match kind {
        EntityKind::Vertex => mesh.vertices(),
        EntityKind::Edge => mesh.edges(),
        EntityKind::Face => mesh.faces(),
    }
}

/// Maps outline selections to scene objects and mesh entities.
pub struct SelectionResolver;

impl SelectionResolver {
    /// Decodes a positional outline path against the scene.
    ///
    /// The first step is the object's scene index, the second the category
    /// (vertices, edges, faces), and the third the entity's row in the
    /// category, which maps to the entity's key in the mesh's own ordering.
    pub fn resolve<M: MeshData>(
        path: &SelectionPath,
        scene: &Scene<M>,
    ) -> Result<Selection, MalformedSelection> {
        let rows = path.rows()?;

        let object = rows[0];
        let Some(target) = scene.object(object) else {
            return Err(MalformedSelection::UnknownObject(object));
        };

        let Some(&row) = rows.get(1) else {
            return Ok(Selection::ObjectOnly(object));
        };
        let Some(&kind) = CATEGORIES.get(row) else {
            return Err(MalformedSelection::UnknownCategory { object, row });
        };

        let Some(&row) = rows.get(2) else {
            return Ok(Selection::Category(object, kind));
        };

        entity_keys(&*target.mesh(), kind)
            .get(row)
            .map(|&key| Selection::Entity(object, kind, key))
            .ok_or(MalformedSelection::UnknownEntityRow { object, kind, row })
    }

    /// Checks that a tagged selection still designates something in the
    /// scene, e.g. after a subdivision replaced a mesh.
    pub fn validate<M: MeshData>(
        selection: Selection,
        scene: &Scene<M>,
    ) -> Result<Selection, MalformedSelection> {
        let object = selection.object();
        let Some(target) = scene.object(object) else {
            return Err(MalformedSelection::UnknownObject(object));
        };

        if let Selection::Entity(_, kind, key) = selection {
            if !target.mesh().contains(kind, key) {
                return Err(MalformedSelection::UnknownEntity { object, kind, key });
            }
        }

        Ok(selection)
    }

    /// Fetches every default attribute of an entity from its mesh.
    ///
    /// Returns `None` if the entity does not exist.
    pub fn fetch_attributes<M: MeshData + ?Sized>(
        object: usize,
        mesh: &M,
        kind: EntityKind,
        key: usize,
    ) -> Option<EntityAttributes> {
        if !mesh.contains(kind, key) {
            return None;
        }

        let values = mesh
            .default_attribute_names(kind)
            .iter()
            .filter_map(|&name| Some((name, mesh.attribute(kind, key, name)?)))
            .collect();

        Some(EntityAttributes {
            object,
            kind,
            key,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::PolyMesh;
    use crate::procedural;
    use crate::viewport::DisplaySettings;

    fn scene() -> Scene<PolyMesh> {
        let mut scene = Scene::new();
        scene.set_objects(
            [
                procedural::tetrahedron(),
                procedural::unit_cuboid(),
                procedural::octahedron(),
            ],
            &DisplaySettings::default(),
        );
        scene
    }

    #[test]
    fn resolve_by_depth() {
        let scene = scene();

        assert_eq!(
            SelectionResolver::resolve(&vec![(1, 0)].into(), &scene),
            Ok(Selection::ObjectOnly(1))
        );
        assert_eq!(
            SelectionResolver::resolve(&vec![(1, 0), (0, 0)].into(), &scene),
            Ok(Selection::Category(1, EntityKind::Vertex))
        );
        assert_eq!(
            SelectionResolver::resolve(&vec![(1, 0), (0, 0), (3, 0)].into(), &scene),
            Ok(Selection::Entity(1, EntityKind::Vertex, 3))
        );
        assert_eq!(
            SelectionResolver::resolve(&vec![(2, 0), (1, 0), (11, 0)].into(), &scene),
            Ok(Selection::Entity(2, EntityKind::Edge, 11))
        );
    }

    #[test]
    fn malformed_paths() {
        let scene = scene();
        let resolve = |steps: Vec<(usize, usize)>| SelectionResolver::resolve(&steps.into(), &scene);

        assert_eq!(resolve(vec![]), Err(MalformedSelection::Empty));
        assert_eq!(resolve(vec![(3, 0)]), Err(MalformedSelection::UnknownObject(3)));
        assert_eq!(
            resolve(vec![(0, 1)]),
            Err(MalformedSelection::NonZeroColumn { depth: 0, column: 1 })
        );
        assert_eq!(
            resolve(vec![(0, 0), (3, 0)]),
            Err(MalformedSelection::UnknownCategory { object: 0, row: 3 })
        );
        assert_eq!(
            resolve(vec![(0, 0), (0, 0), (4, 0)]),
            Err(MalformedSelection::UnknownEntityRow {
                object: 0,
                kind: EntityKind::Vertex,
                row: 4
            })
        );
        assert_eq!(
            resolve(vec![(0, 0), (0, 0), (0, 0), (0, 0)]),
            Err(MalformedSelection::TooDeep(4))
        );
    }

    #[test]
    fn attributes_cover_the_default_names() {
        let scene = scene();
        let mesh = scene.objects()[1].mesh();

        let vertex = SelectionResolver::fetch_attributes(1, &*mesh, EntityKind::Vertex, 3).unwrap();
        assert_eq!(vertex.values.len(), AttributeName::defaults(EntityKind::Vertex).len());
        assert_eq!(
            vertex.values.get(&AttributeName::IsFixed),
            Some(&AttributeValue::Bool(false))
        );
        assert!(vertex.to_string().starts_with("Mesh 1: Vertex 3 => {"));

        let edge = SelectionResolver::fetch_attributes(1, &*mesh, EntityKind::Edge, 0).unwrap();
        assert!(edge.values.contains_key(&AttributeName::Weight));

        assert!(SelectionResolver::fetch_attributes(1, &*mesh, EntityKind::Face, 6).is_none());
    }

    #[test]
    fn validation_follows_the_mesh() {
        let scene = scene();

        assert!(SelectionResolver::validate(Selection::Entity(0, EntityKind::Face, 3), &scene).is_ok());
        assert_eq!(
            SelectionResolver::validate(Selection::Entity(0, EntityKind::Face, 4), &scene),
            Err(MalformedSelection::UnknownEntity {
                object: 0,
                kind: EntityKind::Face,
                key: 4
            })
        );
        assert_eq!(
            SelectionResolver::validate(Selection::ObjectOnly(9), &scene),
            Err(MalformedSelection::UnknownObject(9))
        );
    }
}
