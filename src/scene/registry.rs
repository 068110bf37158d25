//! The ordered collection of displayed mesh objects.

use crate::mesh::{MeshData, MeshError, SubdivisionScheme};
use crate::resource::{BufferUpdate, Channel};
use crate::scene::{ColorTarget, ElementClass, MeshObject};
use crate::viewport::DisplaySettings;
use glamx::Vec3;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Anything [`Scene::set_objects`] accepts: a raw mesh, a shared mesh, or an
/// already configured object.
pub enum SceneItem<M> {
    /// A mesh the scene takes ownership of.
    Mesh(M),
    /// A mesh shared with the caller.
    Shared(Rc<RefCell<M>>),
    /// An object that keeps its own display state.
    Object(MeshObject<M>),
}

impl<M> From<M> for SceneItem<M> {
    fn from(mesh: M) -> Self {
        SceneItem::Mesh(mesh)
    }
}

impl<M> From<Rc<RefCell<M>>> for SceneItem<M> {
    fn from(mesh: Rc<RefCell<M>>) -> Self {
        SceneItem::Shared(mesh)
    }
}

impl<M> From<MeshObject<M>> for SceneItem<M> {
    fn from(object: MeshObject<M>) -> Self {
        SceneItem::Object(object)
    }
}

impl<M: MeshData> SceneItem<M> {
    fn into_object(self, settings: &DisplaySettings) -> MeshObject<M> {
        match self {
            SceneItem::Mesh(mesh) => MeshObject::with_settings(Rc::new(RefCell::new(mesh)), settings),
            SceneItem::Shared(mesh) => MeshObject::with_settings(mesh, settings),
            SceneItem::Object(object) => object,
        }
    }
}

/// The scene registry.
///
/// Its order is both the concatenation order of the geometry buffers and the
/// top-level order of the outline. Every mutation returns the buffer work it
/// requires; the registry itself never touches the buffers.
pub struct Scene<M> {
    objects: Vec<MeshObject<M>>,
    highlighted: Option<usize>,
}

impl<M> Default for Scene<M> {
    fn default() -> Self {
        Scene {
            objects: Vec::new(),
            highlighted: None,
        }
    }
}

impl<M: MeshData> Scene<M> {
    /// Creates an empty scene.
    pub fn new() -> Scene<M> {
        Scene::default()
    }

    /// Replaces every object of the scene.
    ///
    /// Raw meshes are wrapped with the display settings; objects keep their
    /// own state. The highlight is cleared.
    pub fn set_objects<I, T>(&mut self, items: I, settings: &DisplaySettings) -> BufferUpdate
    where
        I: IntoIterator<Item = T>,
        T: Into<SceneItem<M>>,
    {
        self.objects = items
            .into_iter()
            .map(|item| item.into().into_object(settings))
            .collect();
        self.highlighted = None;

        log::debug!("scene holds {} objects", self.objects.len());
        BufferUpdate::Rebuild
    }

    /// Appends one object and returns its index.
    pub fn push(&mut self, item: impl Into<SceneItem<M>>, settings: &DisplaySettings) -> usize {
        self.objects.push(item.into().into_object(settings));
        self.objects.len() - 1
    }

    /// Number of objects.
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Is the scene empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// All objects, in scene order.
    #[inline]
    pub fn objects(&self) -> &[MeshObject<M>] {
        &self.objects
    }

    /// The object at `index`.
    #[inline]
    pub fn object(&self, index: usize) -> Option<&MeshObject<M>> {
        self.objects.get(index)
    }

    /// Index of the highlighted object.
    #[inline]
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Highlights one object and gives every other object the base color.
    ///
    /// Returns `None` if there is no object at `index`.
    pub fn set_highlight(&mut self, index: usize, settings: &DisplaySettings) -> Option<BufferUpdate> {
        if index >= self.objects.len() {
            return None;
        }

        self.highlighted = Some(index);
        Some(self.apply_highlight(settings))
    }

    /// Gives every object the base color.
    pub fn clear_highlight(&mut self, settings: &DisplaySettings) -> BufferUpdate {
        self.highlighted = None;
        self.apply_highlight(settings)
    }

    fn apply_highlight(&mut self, settings: &DisplaySettings) -> BufferUpdate {
        let mut changed = false;

        for (i, object) in self.objects.iter_mut().enumerate() {
            let color = if Some(i) == self.highlighted {
                settings.highlight_color
            } else {
                settings.base_color
            };

            if object.color() != color {
                object.set_target_color(ColorTarget::FacesFront, color);
                changed = true;
            }
        }

        if changed {
            BufferUpdate::channel(Channel::FaceColorsFront)
        } else {
            BufferUpdate::RedrawOnly
        }
    }

    /// Applies the color of `target` found in `settings` to every object.
    ///
    /// For front faces this is the base color, so the highlighted object is
    /// left alone.
    pub fn recolor(&mut self, target: ColorTarget, settings: &DisplaySettings) -> BufferUpdate {
        let color = match target {
            ColorTarget::Vertices => settings.colors.vertices,
            ColorTarget::Edges => settings.colors.edges,
            ColorTarget::FacesFront => settings.base_color,
            ColorTarget::FacesBack => settings.colors.faces_back,
            ColorTarget::Normals => settings.colors.normals,
        };

        for (i, object) in self.objects.iter_mut().enumerate() {
            if target == ColorTarget::FacesFront && Some(i) == self.highlighted {
                continue;
            }
            object.set_target_color(target, color);
        }

        BufferUpdate::channel(target.channel())
    }

    /// Shows or hides one element class on every object.
    pub fn set_visible(&mut self, class: ElementClass, visible: bool) -> BufferUpdate {
        for object in &mut self.objects {
            object.set_visible(class, visible);
        }

        BufferUpdate::Channels(class.color_channels().to_vec())
    }

    /// Sets the point size of every object.
    pub fn set_point_size(&mut self, size: f32) -> BufferUpdate {
        for object in &mut self.objects {
            object.set_point_size(size);
        }

        BufferUpdate::RedrawOnly
    }

    /// Sets the line width of every object.
    pub fn set_line_width(&mut self, width: f32) -> BufferUpdate {
        for object in &mut self.objects {
            object.set_line_width(width);
        }

        BufferUpdate::RedrawOnly
    }

    /// Sets the length of the displayed normals of every object.
    pub fn set_normal_scale(&mut self, scale: f32) -> BufferUpdate {
        for object in &mut self.objects {
            object.set_normal_scale(scale);
        }

        BufferUpdate::channel(Channel::NormalPositions)
    }

    /// Reverses the face cycles of one object, or of all of them.
    ///
    /// Counts do not change: only the face index lists and the normals are
    /// recomputed. Returns `None` if there is no object at `index`.
    pub fn flip_normals(&mut self, index: Option<usize>) -> Option<BufferUpdate> {
        match index {
            Some(i) => self.objects.get(i)?.mesh_mut().flip_cycles(),
            None => self
                .distinct_meshes()
                .for_each(|mesh| mesh.borrow_mut().flip_cycles()),
        }

        Some(BufferUpdate::Channels(vec![
            Channel::FacesFront,
            Channel::FacesBack,
            Channel::NormalPositions,
        ]))
    }

    /// Replaces the mesh of one object by its subdivision.
    ///
    /// The previous mesh is discarded.
    pub fn subdivide(
        &mut self,
        index: usize,
        scheme: SubdivisionScheme,
        k: usize,
    ) -> Result<Option<BufferUpdate>, MeshError> {
        let Some(object) = self.objects.get_mut(index) else {
            return Ok(None);
        };

        let subdivided = object.mesh().subdivide(scheme, k)?;
        log::info!(
            "subdivided object {} ({:?}, k = {}): {} faces",
            index,
            scheme,
            k,
            subdivided.number_of_faces()
        );
        object.replace_mesh(subdivided);

        Ok(Some(BufferUpdate::Rebuild))
    }

    /// Replaces the mesh of the object at `index`, or appends a new object if
    /// `index` is `None` or past the end.
    ///
    /// Returns the index of the object holding the mesh.
    pub fn load_mesh(&mut self, index: Option<usize>, mesh: M, settings: &DisplaySettings) -> usize {
        match index {
            Some(i) if i < self.objects.len() => {
                self.objects[i].replace_mesh(mesh);
                i
            }
            _ => self.push(mesh, settings),
        }
    }

    /// The meshes of the scene, each listed once even when several objects
    /// share it.
    fn distinct_meshes(&self) -> impl Iterator<Item = &Rc<RefCell<M>>> + '_ {
        let mut seen = HashSet::new();
        self.objects
            .iter()
            .map(|o| o.shared_mesh())
            .filter(move |mesh| seen.insert(Rc::as_ptr(mesh)))
    }

    /// Mean of the vertices of all distinct meshes.
    pub fn centroid(&self) -> Option<Vec3> {
        let (sum, count) = self.distinct_meshes().fold((Vec3::ZERO, 0), |(sum, count), mesh| {
            let mesh = mesh.borrow();
            let n = mesh.number_of_vertices();
            match mesh.centroid() {
                Some(c) => (sum + c * n as f32, count + n),
                None => (sum, count),
            }
        });

        (count > 0).then(|| sum / count as f32)
    }

    /// Translates every mesh so that the centroid of the scene lies at the
    /// origin.
    pub fn center(&mut self) -> BufferUpdate {
        let Some(centroid) = self.centroid() else {
            return BufferUpdate::RedrawOnly;
        };

        for mesh in self.distinct_meshes() {
            mesh.borrow_mut().translate(-centroid);
        }

        log::info!("centered {} objects on {:?}", self.objects.len(), centroid);
        BufferUpdate::Rebuild
    }

    /// Bounding sphere `(center, radius)` of the objects with at least one
    /// visible element class.
    pub fn bounding_sphere(&self) -> Option<(Vec3, f32)> {
        let (mins, maxs) = self
            .objects
            .iter()
            .filter(|o| !o.visible().is_empty())
            .filter_map(|o| o.mesh().aabb())
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))?;

        let center = (mins + maxs) * 0.5;
        Some((center, (maxs - center).length()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;
    use crate::mesh::PolyMesh;
    use crate::procedural;

    fn scene(n: usize) -> (Scene<PolyMesh>, DisplaySettings) {
        let settings = DisplaySettings::default();
        let mut scene: Scene<PolyMesh> = Scene::new();
        let update = scene.set_objects((0..n).map(|_| procedural::tetrahedron()), &settings);
        assert_eq!(update, BufferUpdate::Rebuild);
        (scene, settings)
    }

    #[test]
    fn single_highlight() {
        let (mut scene, settings) = scene(10);

        assert_eq!(
            scene.set_highlight(2, &settings),
            Some(BufferUpdate::channel(Channel::FaceColorsFront))
        );
        scene.set_highlight(5, &settings);

        for (i, object) in scene.objects().iter().enumerate() {
            let expected = if i == 5 {
                settings.highlight_color
            } else {
                settings.base_color
            };
            assert_eq!(object.color(), expected);
        }

        assert_eq!(scene.set_highlight(5, &settings), Some(BufferUpdate::RedrawOnly));
        assert_eq!(scene.set_highlight(10, &settings), None);
        assert_eq!(scene.highlighted(), Some(5));
    }

    #[test]
    fn recoloring_faces_keeps_the_highlight() {
        let (mut scene, mut settings) = scene(3);
        scene.set_highlight(1, &settings);

        settings.base_color = color::BLUE;
        scene.recolor(ColorTarget::FacesFront, &settings);

        assert_eq!(scene.objects()[0].color(), color::BLUE);
        assert_eq!(scene.objects()[1].color(), settings.highlight_color);
        assert_eq!(scene.objects()[2].color(), color::BLUE);
    }

    #[test]
    fn wrapped_objects_keep_their_state() {
        let settings = DisplaySettings::default();
        let mut object = MeshObject::new(procedural::unit_cuboid());
        object.set_color(color::YELLOW).set_point_size(12.0);

        let mut scene: Scene<PolyMesh> = Scene::new();
        scene.set_objects(
            vec![SceneItem::from(object), SceneItem::from(procedural::tetrahedron())],
            &settings,
        );

        assert_eq!(scene.objects()[0].color(), color::YELLOW);
        assert_eq!(scene.objects()[0].point_size(), 12.0);
        assert_eq!(scene.objects()[1].color(), settings.base_color);
    }

    #[test]
    fn shared_meshes_are_not_copied() {
        let settings = DisplaySettings::default();
        let mesh = Rc::new(RefCell::new(procedural::unit_cuboid()));

        let mut scene: Scene<PolyMesh> = Scene::new();
        scene.set_objects([mesh.clone()], &settings);
        scene.flip_normals(Some(0));

        assert_eq!(*mesh.borrow(), *scene.objects()[0].mesh());
        assert_ne!(*mesh.borrow(), procedural::unit_cuboid());
    }

    #[test]
    fn meshes_shared_by_several_objects_are_edited_once() {
        let settings = DisplaySettings::default();
        let mesh = Rc::new(RefCell::new(procedural::unit_cuboid()));
        mesh.borrow_mut().translate(Vec3::new(2.0, 0.0, 0.0));
        let face_before = mesh.borrow().face_vertices(0);

        let mut scene: Scene<PolyMesh> = Scene::new();
        scene.set_objects([mesh.clone(), mesh.clone()], &settings);

        scene.flip_normals(None);
        assert_ne!(mesh.borrow().face_vertices(0), face_before);

        assert_eq!(scene.center(), BufferUpdate::Rebuild);
        let c = mesh.borrow().centroid().unwrap();
        assert!(c.length() < 1.0e-5, "centroid {:?}", c);
    }

    #[test]
    fn centering_moves_the_centroid_to_the_origin() {
        let settings = DisplaySettings::default();
        let mut scene: Scene<PolyMesh> = Scene::new();
        scene.set_objects(
            [procedural::cuboid(Vec3::new(2.0, 4.0, 6.0))],
            &settings,
        );
        scene.objects()[0].mesh_mut().translate(Vec3::new(5.0, -3.0, 1.0));

        assert_eq!(scene.center(), BufferUpdate::Rebuild);
        let c = scene.centroid().unwrap();
        assert!(c.length() < 1.0e-5);
    }

    #[test]
    fn subdivision_replaces_the_mesh() {
        let (mut scene, _) = scene(2);
        let update = scene.subdivide(1, SubdivisionScheme::Tri, 1).unwrap();

        assert_eq!(update, Some(BufferUpdate::Rebuild));
        assert_eq!(scene.objects()[1].mesh().number_of_faces(), 12);
        assert_eq!(scene.objects()[0].mesh().number_of_faces(), 4);
        assert!(scene.subdivide(0, SubdivisionScheme::Tri, 0).is_err());
        assert_eq!(scene.subdivide(7, SubdivisionScheme::Tri, 1), Ok(None));
    }

    #[test]
    fn hidden_objects_do_not_count_for_the_bounds() {
        let (mut scene, settings) = scene(1);
        let mut far = MeshObject::new(procedural::unit_cuboid());
        far.mesh_mut().translate(Vec3::splat(100.0));
        for class in [
            ElementClass::Vertices,
            ElementClass::Edges,
            ElementClass::Faces,
            ElementClass::Normals,
        ] {
            far.set_visible(class, false);
        }
        scene.push(far, &settings);

        let (center, radius) = scene.bounding_sphere().unwrap();
        assert!(center.length() < 1.0e-5);
        assert!(radius < 2.0);
    }
}
