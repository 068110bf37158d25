//! The object tree shown next to the viewport.

use crate::mesh::{EntityKind, MeshData};
use crate::scene::selection::{entity_keys, CATEGORIES};
use crate::scene::{MalformedSelection, Scene, Selection, SelectionPath};

/// One node of the outline, tagged with what it selects.
#[derive(Clone, Debug, PartialEq)]
pub struct OutlineNode {
    /// Displayed text.
    pub label: String,
    /// What selecting this node designates.
    pub selection: Selection,
    /// Child nodes.
    pub children: Vec<OutlineNode>,
}

/// The outline tree: one root per scene object, in scene order, with one
/// child per entity category and one grandchild per entity key.
///
/// Every node carries its [`Selection`], so a GUI can select through the
/// tag directly instead of decoding rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outline {
    roots: Vec<OutlineNode>,
}

fn category_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Vertex => "Vertices",
        EntityKind::Edge => "Edges",
        EntityKind::Face => "Faces",
    }
}

impl Outline {
    /// Populates the outline from the scene.
    pub fn build<M: MeshData>(scene: &Scene<M>) -> Outline {
        let roots = scene
            .objects()
            .iter()
            .enumerate()
            .map(|(object, o)| {
                let mesh = o.mesh();
                let children = CATEGORIES
                    .iter()
                    .map(|&kind| OutlineNode {
                        label: category_label(kind).to_string(),
                        selection: Selection::Category(object, kind),
                        children: entity_keys(&*mesh, kind)
                            .into_iter()
                            .map(|key| OutlineNode {
                                label: key.to_string(),
                                selection: Selection::Entity(object, kind, key),
                                children: Vec::new(),
                            })
                            .collect(),
                    })
                    .collect();

                OutlineNode {
                    label: format!("Mesh {}", object),
                    selection: Selection::ObjectOnly(object),
                    children,
                }
            })
            .collect();

        Outline { roots }
    }

    /// The top-level nodes.
    #[inline]
    pub fn roots(&self) -> &[OutlineNode] {
        &self.roots
    }

    /// The node at the end of a path.
    pub fn node(&self, path: &SelectionPath) -> Option<&OutlineNode> {
        let (&(first, _), rest) = path.steps().split_first()?;
        rest.iter()
            .try_fold(self.roots.get(first)?, |node, &(row, _)| node.children.get(row))
    }

    /// The selection tagged on the node at the end of a path.
    pub fn resolve_path(&self, path: &SelectionPath) -> Result<Selection, MalformedSelection> {
        let rows = path.rows()?;

        let object = rows[0];
        let mut node = self
            .roots
            .get(object)
            .ok_or(MalformedSelection::UnknownObject(object))?;

        if let Some(&row) = rows.get(1) {
            node = node
                .children
                .get(row)
                .ok_or(MalformedSelection::UnknownCategory { object, row })?;
        }

        if let Some(&row) = rows.get(2) {
            let kind = node.selection.kind().unwrap_or(EntityKind::Vertex);
            node = node
                .children
                .get(row)
                .ok_or(MalformedSelection::UnknownEntityRow { object, kind, row })?;
        }

        Ok(node.selection)
    }

    /// The path of the node tagged with `selection`.
    pub fn path_of(&self, selection: Selection) -> Option<SelectionPath> {
        let object = selection.object();
        let root = self.roots.get(object)?;
        let mut path = SelectionPath::new(vec![(object, 0)]);

        if let Some(kind) = selection.kind() {
            let row = CATEGORIES.iter().position(|k| *k == kind)?;
            path.push(row, 0);

            if selection.key().is_some() {
                let entity = root.children.get(row)?
                    .children
                    .iter()
                    .position(|n| n.selection == selection)?;
                path.push(entity, 0);
            }
        }

        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::PolyMesh;
    use crate::procedural;
    use crate::scene::SelectionResolver;
    use crate::viewport::DisplaySettings;

    fn scene() -> Scene<PolyMesh> {
        let mut scene = Scene::new();
        scene.set_objects(
            [procedural::tetrahedron(), procedural::unit_cuboid()],
            &DisplaySettings::default(),
        );
        scene
    }

    #[test]
    fn tree_mirrors_the_scene() {
        let outline = Outline::build(&scene());

        assert_eq!(outline.roots().len(), 2);
        let cube = &outline.roots()[1];
        assert_eq!(cube.label, "Mesh 1");
        let labels: Vec<_> = cube.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Vertices", "Edges", "Faces"]);
        assert_eq!(cube.children[0].children.len(), 8);
        assert_eq!(cube.children[1].children.len(), 12);
        assert_eq!(cube.children[2].children.len(), 6);
        assert_eq!(cube.children[0].children[3].label, "3");
    }

    #[test]
    fn tags_agree_with_positional_decoding() {
        let scene = scene();
        let outline = Outline::build(&scene);

        for steps in [
            vec![(1, 0)],
            vec![(1, 0), (0, 0)],
            vec![(1, 0), (0, 0), (3, 0)],
            vec![(0, 0), (2, 0), (1, 0)],
        ] {
            let path = SelectionPath::new(steps);
            let tagged = outline.resolve_path(&path);
            assert_eq!(tagged, SelectionResolver::resolve(&path, &scene));
            assert_eq!(outline.path_of(tagged.unwrap()), Some(path));
        }
    }

    #[test]
    fn malformed_paths_are_rejected() {
        let outline = Outline::build(&scene());

        assert_eq!(
            outline.resolve_path(&SelectionPath::new(vec![(2, 0)])),
            Err(MalformedSelection::UnknownObject(2))
        );
        assert_eq!(
            outline.resolve_path(&SelectionPath::new(vec![(0, 0), (1, 0), (6, 0)])),
            Err(MalformedSelection::UnknownEntityRow {
                object: 0,
                kind: EntityKind::Edge,
                row: 6
            })
        );
        assert!(outline.node(&SelectionPath::new(vec![(0, 0), (5, 0)])).is_none());
    }
}
