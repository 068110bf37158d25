//! The viewport controller: dispatches actions to the camera, the scene, and
//! the geometry buffers, and decides how much has to be redone.

use crate::camera::OrbitCamera3d;
use crate::mesh::MeshData;
use crate::renderer::RenderBackend;
use crate::resource::{BufferError, BufferUpdate, GeometryBuffers};
use crate::scene::{
    ColorTarget, MalformedSelection, Outline, Scene, SceneItem, Selection, SelectionResolver,
};
use crate::viewport::{DisplaySettings, ViewportAction, ViewportNotice};

/// Owns the camera, the scene registry, the geometry buffers, and the render
/// backend of one viewport.
///
/// Every action runs to completion on the calling thread. Mutations only
/// request a redraw; [`ViewportController::render`] draws at most one frame
/// for any number of requests.
///
/// # Example
/// ```
/// # use meshview::prelude::*;
/// let mut viewport: ViewportController<PolyMesh, _> =
///     ViewportController::new(DisplaySettings::default(), RecordingBackend::new());
/// viewport.set_objects([procedural::unit_cuboid(), procedural::tetrahedron()]);
/// viewport.apply(ViewportAction::ZoomIn);
/// viewport.apply(ViewportAction::Orbit { d_azimuth: 15.0, d_elevation: 0.0 });
/// assert!(viewport.render());
/// assert!(!viewport.render());
/// ```
pub struct ViewportController<M, B> {
    settings: DisplaySettings,
    camera: OrbitCamera3d,
    scene: Scene<M>,
    buffers: GeometryBuffers,
    outline: Outline,
    selection: Option<Selection>,
    backend: B,
    redraw: bool,
    notices: Vec<ViewportNotice>,
}

impl<M: MeshData, B: RenderBackend> ViewportController<M, B> {
    /// Creates an empty viewport.
    pub fn new(settings: DisplaySettings, mut backend: B) -> ViewportController<M, B> {
        let scene = Scene::new();
        let mut buffers = GeometryBuffers::new();
        buffers.rebuild_all(scene.objects(), &mut backend);

        ViewportController {
            camera: OrbitCamera3d::new(settings.camera, settings.camera_limits),
            settings,
            scene,
            buffers,
            outline: Outline::default(),
            selection: None,
            backend,
            redraw: true,
            notices: Vec::new(),
        }
    }

    /// The display settings.
    #[inline]
    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    /// The camera.
    #[inline]
    pub fn camera(&self) -> &OrbitCamera3d {
        &self.camera
    }

    /// The scene registry.
    #[inline]
    pub fn scene(&self) -> &Scene<M> {
        &self.scene
    }

    /// The geometry buffers.
    #[inline]
    pub fn buffers(&self) -> &GeometryBuffers {
        &self.buffers
    }

    /// The outline matching the current scene.
    #[inline]
    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    /// The current selection.
    #[inline]
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// The render backend.
    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the render backend.
    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Replaces every displayed object.
    pub fn set_objects<I, T>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<SceneItem<M>>,
    {
        let update = self.scene.set_objects(items, &self.settings);
        self.selection = None;
        self.commit(update);
        self.outline = Outline::build(&self.scene);
    }

    /// Rebuilds everything from the meshes, e.g. after they were edited
    /// through a shared handle.
    pub fn refresh(&mut self) {
        self.commit(BufferUpdate::Rebuild);
        self.outline = Outline::build(&self.scene);
        self.revalidate_selection();
    }

    /// Handles one action.
    pub fn apply(&mut self, action: ViewportAction<M>) {
        log::debug!("applying {:?} action", action.kind());

        match action {
            ViewportAction::LoadMesh { object, mesh } => {
                let index = self.scene.load_mesh(object, mesh, &self.settings);
                log::info!("loaded mesh into object {}", index);
                self.topology_changed(BufferUpdate::Rebuild);
            }
            ViewportAction::Subdivide { object, scheme, k } => {
                match self.scene.subdivide(object, scheme, k) {
                    Ok(Some(update)) => self.topology_changed(update),
                    Ok(None) => self.fail(format!("subdivision failed: no object {}", object)),
                    Err(err) => self.fail(format!("subdivision failed: {}", err)),
                }
            }
            ViewportAction::FlipNormals { object } => match self.scene.flip_normals(object) {
                Some(update) => {
                    match object {
                        Some(i) => log::info!("flipped the normals of object {}", i),
                        None => log::info!("flipped the normals of all objects"),
                    }
                    self.commit(update);
                }
                None => self.fail(format!("flip normals failed: no object {:?}", object)),
            },
            ViewportAction::CenterObjects => {
                let update = self.scene.center();
                self.commit(update);
            }
            ViewportAction::Recolor { target, color } => {
                match target {
                    ColorTarget::Vertices => self.settings.colors.vertices = color,
                    ColorTarget::Edges => self.settings.colors.edges = color,
                    ColorTarget::FacesFront => self.settings.base_color = color,
                    ColorTarget::FacesBack => self.settings.colors.faces_back = color,
                    ColorTarget::Normals => self.settings.colors.normals = color,
                }
                let update = self.scene.recolor(target, &self.settings);
                self.commit(update);
            }
            ViewportAction::SetVisible { class, visible } => {
                self.settings.visible.set(class.flag(), visible);
                let update = self.scene.set_visible(class, visible);
                self.commit(update);
            }
            ViewportAction::SetPointSize(size) => {
                self.settings.point_size = size.max(0.0);
                let update = self.scene.set_point_size(size);
                self.commit(update);
            }
            ViewportAction::SetLineWidth(width) => {
                self.settings.line_width = width.max(0.0);
                let update = self.scene.set_line_width(width);
                self.commit(update);
            }
            ViewportAction::SetNormalScale(scale) => {
                self.settings.normal_scale = scale.max(0.0);
                let update = self.scene.set_normal_scale(scale);
                self.commit(update);
            }
            ViewportAction::Orbit {
                d_azimuth,
                d_elevation,
            } => {
                let changed = self.camera.orbit(d_azimuth, d_elevation);
                self.camera_changed(changed);
            }
            ViewportAction::Drag { dx, dy } => {
                let changed = self.camera.handle_drag(dx, dy);
                self.camera_changed(changed);
            }
            ViewportAction::Scroll(notches) => {
                let changed = self.camera.handle_scroll(notches);
                self.camera_changed(changed);
            }
            ViewportAction::ZoomIn => {
                let changed = self.camera.zoom_in();
                self.camera_changed(changed);
            }
            ViewportAction::ZoomOut => {
                let changed = self.camera.zoom_out();
                self.camera_changed(changed);
            }
            ViewportAction::SetDistance(distance) => {
                let changed = self.camera.set_distance(distance);
                self.camera_changed(changed);
            }
            ViewportAction::SetFov(fov) => {
                let changed = self.camera.set_fov(fov);
                self.camera_changed(changed);
            }
            ViewportAction::SetAzimuth(azimuth) => {
                let changed = self.camera.set_azimuth(azimuth);
                self.camera_changed(changed);
            }
            ViewportAction::SetElevation(elevation) => {
                let changed = self.camera.set_elevation(elevation);
                self.camera_changed(changed);
            }
            ViewportAction::SetView(view) => {
                let changed = self.camera.set_view(view);
                self.camera_changed(changed);
            }
            ViewportAction::ZoomExtents => {
                let changed = match self.scene.bounding_sphere() {
                    Some((center, radius)) => self.camera.frame_sphere(center, radius),
                    None => false,
                };
                self.camera_changed(changed);
            }
            ViewportAction::Resize { width, height } => {
                if self.camera.set_viewport_size(width, height) {
                    self.request_redraw();
                }
            }
            ViewportAction::Select(selection) => {
                let result = SelectionResolver::validate(selection, &self.scene);
                self.select(result);
            }
            ViewportAction::SelectPath(path) => {
                let result = SelectionResolver::resolve(&path, &self.scene);
                self.select(result);
            }
            ViewportAction::ClearSelection => {
                self.selection = None;
                let update = self.scene.clear_highlight(&self.settings);
                self.commit(update);
                self.notices.push(ViewportNotice::SelectionCleared);
            }
        }
    }

    /// Requests a redraw. Any number of requests before the next
    /// [`ViewportController::render`] produce a single frame.
    #[inline]
    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// Is a redraw pending?
    #[inline]
    pub fn redraw_pending(&self) -> bool {
        self.redraw
    }

    /// Draws one frame if a redraw is pending.
    ///
    /// Returns `true` if a frame was drawn.
    pub fn render(&mut self) -> bool {
        if !self.redraw {
            return false;
        }

        let (view, projection) = self.camera.view_projection();
        self.backend.set_camera(view, projection);

        if let Err(err) = self.buffers.draw(self.scene.objects(), &mut self.backend) {
            self.recover(err);
            // Cannot fail right after a rebuild.
            let _ = self.buffers.draw(self.scene.objects(), &mut self.backend);
        }

        self.backend.present();
        self.redraw = false;
        true
    }

    /// Takes the notices emitted since the last call.
    pub fn take_notices(&mut self) -> Vec<ViewportNotice> {
        std::mem::take(&mut self.notices)
    }

    fn commit(&mut self, update: BufferUpdate) {
        match update {
            BufferUpdate::RedrawOnly => {}
            BufferUpdate::Rebuild => {
                self.buffers.rebuild_all(self.scene.objects(), &mut self.backend);
            }
            BufferUpdate::Channels(channels) => {
                for channel in channels {
                    let result = if channel.is_index() {
                        self.buffers
                            .update_index_channel(channel, self.scene.objects(), &mut self.backend)
                    } else {
                        self.buffers
                            .update_channel(channel, self.scene.objects(), &mut self.backend)
                    };

                    if let Err(err) = result {
                        self.recover(err);
                        break;
                    }
                }
            }
        }

        self.request_redraw();
    }

    // A buffer error means a mutation bypassed the topology path.
    fn recover(&mut self, err: BufferError) {
        if cfg!(debug_assertions) {
            panic!("geometry buffer precondition violated: {}", err);
        }

        log::error!("{}; rebuilding all buffers", err);
        self.buffers.rebuild_all(self.scene.objects(), &mut self.backend);
    }

    fn topology_changed(&mut self, update: BufferUpdate) {
        self.commit(update);
        self.outline = Outline::build(&self.scene);
        self.revalidate_selection();
    }

    fn revalidate_selection(&mut self) {
        let Some(selection) = self.selection else {
            return;
        };

        if SelectionResolver::validate(selection, &self.scene).is_err() {
            let object = selection.object();
            self.selection = (object < self.scene.len()).then_some(Selection::ObjectOnly(object));
            log::debug!("selection {:?} reset to {:?}", selection, self.selection);
        }
    }

    fn camera_changed(&mut self, changed: bool) {
        if changed {
            let state = self.camera.state();
            self.notices.push(ViewportNotice::CameraChanged(state));
            self.request_redraw();
        }
    }

    fn select(&mut self, result: Result<Selection, MalformedSelection>) {
        let selection = match result {
            Ok(selection) => selection,
            Err(err) => {
                log::warn!("ignoring selection: {}", err);
                return;
            }
        };

        let object = selection.object();
        if let Some(update) = self.scene.set_highlight(object, &self.settings) {
            self.commit(update);
        }
        self.selection = Some(selection);
        self.notices.push(ViewportNotice::ObjectSelected(object));

        if let Selection::Entity(_, kind, key) = selection {
            let attributes = self.scene.object(object).and_then(|o| {
                SelectionResolver::fetch_attributes(object, &*o.mesh(), kind, key)
            });

            if let Some(attributes) = attributes {
                log::info!("{}", attributes);
                self.notices.push(ViewportNotice::EntitySelected(attributes));
            }
        }
    }

    fn fail(&mut self, message: String) {
        log::warn!("{}", message);
        self.notices.push(ViewportNotice::OperationFailed(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::StandardView;
    use crate::color;
    use crate::mesh::{EntityKind, PolyMesh, SubdivisionScheme};
    use crate::procedural;
    use crate::renderer::RecordingBackend;
    use crate::resource::Channel;
    use crate::scene::ElementClass;

    fn viewport() -> ViewportController<PolyMesh, RecordingBackend> {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut viewport = ViewportController::new(DisplaySettings::default(), RecordingBackend::new());
        viewport.set_objects([
            procedural::tetrahedron(),
            procedural::unit_cuboid(),
            procedural::octahedron(),
        ]);
        viewport.render();
        viewport.backend_mut().clear_uploads();
        viewport
    }

    #[test]
    fn camera_actions_only_redraw() {
        let mut viewport = viewport();

        viewport.apply(ViewportAction::Orbit {
            d_azimuth: 10.0,
            d_elevation: 5.0,
        });
        viewport.apply(ViewportAction::SetFov(70.0));

        assert!(viewport.redraw_pending());
        assert_eq!(viewport.backend().upload_count(), 0);
        assert_eq!(viewport.take_notices().len(), 2);
        assert!(viewport.render());
        assert_eq!(viewport.backend().frames(), 2);
    }

    #[test]
    fn clamped_camera_actions_are_silent() {
        let mut viewport = viewport();
        viewport.apply(ViewportAction::SetElevation(89.0));
        viewport.take_notices();
        viewport.render();

        viewport.apply(ViewportAction::Orbit {
            d_azimuth: 0.0,
            d_elevation: 30.0,
        });
        assert!(viewport.take_notices().is_empty());
        assert!(!viewport.redraw_pending());
    }

    #[test]
    fn visibility_updates_color_channels_only() {
        let mut viewport = viewport();
        viewport.apply(ViewportAction::SetVisible {
            class: ElementClass::Faces,
            visible: false,
        });

        assert_eq!(
            viewport.backend().uploads(),
            &[Channel::FaceColorsFront, Channel::FaceColorsBack]
        );
        assert!(!viewport.settings().visible.contains(ElementClass::Faces.flag()));

        viewport.render();
        assert!(viewport
            .backend()
            .last_frame()
            .iter()
            .all(|call| call.colors != Channel::FaceColorsFront));
    }

    #[test]
    fn normal_scale_updates_normal_positions_only() {
        let mut viewport = viewport();
        viewport.apply(ViewportAction::SetNormalScale(0.5));
        assert_eq!(viewport.backend().uploads(), &[Channel::NormalPositions]);

        viewport.backend_mut().clear_uploads();
        viewport.apply(ViewportAction::SetPointSize(9.0));
        assert_eq!(viewport.backend().upload_count(), 0);
        assert!(viewport.redraw_pending());
    }

    #[test]
    fn line_width_only_redraws_edges_wider() {
        let mut viewport = viewport();
        viewport.apply(ViewportAction::SetLineWidth(4.0));

        assert_eq!(viewport.backend().upload_count(), 0);
        assert_eq!(viewport.settings().line_width, 4.0);
        assert!(viewport.render());
        assert!(viewport
            .backend()
            .last_frame()
            .iter()
            .filter(|call| call.colors == Channel::EdgeColors)
            .all(|call| call.size == 4.0));
    }

    #[test]
    fn clearing_the_selection_restores_the_base_color() {
        let mut viewport = viewport();
        viewport.apply(ViewportAction::Select(Selection::ObjectOnly(1)));
        viewport.take_notices();
        viewport.render();
        viewport.backend_mut().clear_uploads();

        viewport.apply(ViewportAction::ClearSelection);

        let base = viewport.settings().base_color;
        assert!(viewport.scene().objects().iter().all(|o| o.color() == base));
        assert_eq!(viewport.scene().highlighted(), None);
        assert_eq!(viewport.selection(), None);
        assert_eq!(viewport.backend().uploads(), &[Channel::FaceColorsFront]);
        assert_eq!(viewport.take_notices(), [ViewportNotice::SelectionCleared]);
        assert!(viewport.redraw_pending());
    }

    #[test]
    fn subdivision_rebuilds_everything() {
        let mut viewport = viewport();
        viewport.apply(ViewportAction::Subdivide {
            object: 1,
            scheme: SubdivisionScheme::Quad,
            k: 1,
        });

        assert_eq!(viewport.backend().upload_count(), Channel::ALL.len());
        assert_eq!(viewport.buffers().len(Channel::Positions), 4 + 26 + 6);
        assert_eq!(viewport.outline().roots()[1].children[2].children.len(), 24);
    }

    #[test]
    fn failed_operations_are_reported() {
        let mut viewport = viewport();
        viewport.apply(ViewportAction::Subdivide {
            object: 0,
            scheme: SubdivisionScheme::Tri,
            k: 99,
        });

        assert_eq!(viewport.backend().upload_count(), 0);
        assert!(matches!(
            viewport.take_notices().as_slice(),
            [ViewportNotice::OperationFailed(_)]
        ));
    }

    #[test]
    fn recolor_updates_one_channel() {
        let mut viewport = viewport();
        viewport.apply(ViewportAction::Recolor {
            target: ColorTarget::Edges,
            color: color::RED,
        });

        assert_eq!(viewport.backend().uploads(), &[Channel::EdgeColors]);
        assert_eq!(viewport.settings().colors.edges, color::RED);
        assert!(viewport
            .scene()
            .objects()
            .iter()
            .all(|o| o.colors().edges == color::RED));
    }

    #[test]
    fn entity_selection_emits_attributes() {
        let mut viewport = viewport();
        viewport.apply(ViewportAction::SelectPath(vec![(2, 0), (0, 0), (5, 0)].into()));

        let notices = viewport.take_notices();
        assert_eq!(notices[0], ViewportNotice::ObjectSelected(2));
        let ViewportNotice::EntitySelected(attributes) = &notices[1] else {
            panic!("expected entity attributes, got {:?}", notices);
        };
        assert_eq!((attributes.object, attributes.kind, attributes.key), (2, EntityKind::Vertex, 5));
        assert_eq!(viewport.backend().uploads(), &[Channel::FaceColorsFront]);
        assert_eq!(viewport.selection(), Some(Selection::Entity(2, EntityKind::Vertex, 5)));
    }

    #[test]
    fn malformed_selections_change_nothing() {
        let mut viewport = viewport();
        viewport.apply(ViewportAction::SelectPath(vec![(7, 0)].into()));
        viewport.apply(ViewportAction::Select(Selection::Entity(0, EntityKind::Face, 40)));

        assert!(viewport.take_notices().is_empty());
        assert!(!viewport.redraw_pending());
        assert_eq!(viewport.scene().highlighted(), None);
    }

    #[test]
    fn reloading_demotes_a_vanished_entity_selection() {
        let mut viewport = viewport();
        viewport.apply(ViewportAction::Select(Selection::Entity(0, EntityKind::Edge, 5)));
        viewport.apply(ViewportAction::LoadMesh {
            object: Some(0),
            mesh: PolyMesh::default(),
        });

        assert_eq!(viewport.selection(), Some(Selection::ObjectOnly(0)));
    }

    #[test]
    fn zoom_extents_frames_the_scene() {
        let mut viewport = viewport();
        viewport.apply(ViewportAction::SetDistance(500.0));
        viewport.apply(ViewportAction::SetView(StandardView::Top));
        viewport.apply(ViewportAction::ZoomExtents);

        assert!(viewport.camera().distance() < 10.0);
        assert_eq!(viewport.camera().elevation(), 89.0);
    }
}
