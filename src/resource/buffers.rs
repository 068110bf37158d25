//! The geometry buffer cache.
//!
//! [`GeometryBuffers`] derives flat arrays from the meshes of the scene, in
//! scene order, and uploads them to a [`RenderBackend`]. Entity counts are
//! recorded at every full rebuild: a partial update is only allowed while
//! every mesh still has the counts it had at that time.

use crate::color::{self, Color};
use crate::mesh::{geometry, MeshData, VertexKey};
use crate::renderer::{ChannelData, DrawCall, Primitive, RenderBackend};
use crate::resource::VertexIndex;
use crate::resource::Channel;
use crate::scene::{ColorTarget, ElementClass, MeshObject};
use glamx::Vec3;
use std::collections::HashMap;
use thiserror::Error;

/// Misuse of the geometry buffer cache.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// The meshes changed shape since the last full rebuild.
    #[error("the buffers are stale: `{0}` cannot be updated before a full rebuild")]
    StaleBuffers(Channel),
    /// An index channel was passed to [`GeometryBuffers::update_channel`].
    #[error("`{0}` is an index channel")]
    NotAnAttributeChannel(Channel),
    /// An attribute channel was passed to [`GeometryBuffers::update_index_channel`].
    #[error("`{0}` is not an index channel")]
    NotAnIndexChannel(Channel),
}

/// The buffer work required after a scene mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BufferUpdate {
    /// Nothing to upload, only redraw.
    RedrawOnly,
    /// Recompute these channels; entity counts are unchanged.
    Channels(Vec<Channel>),
    /// Entity counts may have changed: rebuild everything.
    Rebuild,
}

impl BufferUpdate {
    /// Update of a single channel.
    pub fn channel(channel: Channel) -> BufferUpdate {
        BufferUpdate::Channels(vec![channel])
    }

    /// The work needed to perform both `self` and `other`.
    pub fn merge(self, other: BufferUpdate) -> BufferUpdate {
        match (self, other) {
            (BufferUpdate::Rebuild, _) | (_, BufferUpdate::Rebuild) => BufferUpdate::Rebuild,
            (BufferUpdate::RedrawOnly, other) => other,
            (this, BufferUpdate::RedrawOnly) => this,
            (BufferUpdate::Channels(mut a), BufferUpdate::Channels(b)) => {
                for channel in b {
                    if !a.contains(&channel) {
                        a.push(channel);
                    }
                }
                BufferUpdate::Channels(a)
            }
        }
    }
}

/// Entity counts of one mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObjectShape {
    /// Number of vertices.
    pub vertices: usize,
    /// Number of edges.
    pub edges: usize,
    /// Number of faces.
    pub faces: usize,
    /// Number of triangles of the fan triangulation of all faces.
    pub triangles: usize,
}

impl ObjectShape {
    /// Counts the entities of a mesh.
    pub fn of<M: MeshData + ?Sized>(mesh: &M) -> ObjectShape {
        let faces = mesh.faces();
        let triangles = faces
            .iter()
            .filter_map(|f| mesh.face_vertices(*f))
            .map(|cycle| cycle.len().saturating_sub(2))
            .sum();

        ObjectShape {
            vertices: mesh.number_of_vertices(),
            edges: mesh.number_of_edges(),
            faces: faces.len(),
            triangles,
        }
    }
}

/// Where one object's entries start in the concatenated channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObjectRange {
    /// Entity counts at the last rebuild.
    pub shape: ObjectShape,
    /// First vertex, in the per-vertex channels.
    pub first_vertex: usize,
    /// First edge, in [`Channel::Lines`].
    pub first_edge: usize,
    /// First face, in the normal channels (two entries per face).
    pub first_face: usize,
    /// First triangle, in the face index channels.
    pub first_triangle: usize,
}

/// Freshness of the geometry buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferState {
    /// The buffers match the shape of the meshes.
    Fresh,
    /// The buffers must be rebuilt before any partial update or draw.
    Stale,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct ChannelArrays {
    positions: Vec<[f32; 3]>,
    vertex_colors: Vec<[f32; 4]>,
    edge_colors: Vec<[f32; 4]>,
    face_colors_front: Vec<[f32; 4]>,
    face_colors_back: Vec<[f32; 4]>,
    normal_positions: Vec<[f32; 3]>,
    normal_colors: Vec<[f32; 4]>,
    points: Vec<VertexIndex>,
    lines: Vec<[VertexIndex; 2]>,
    faces_front: Vec<[VertexIndex; 3]>,
    faces_back: Vec<[VertexIndex; 3]>,
}

/// GPU-bound arrays derived from an ordered list of mesh objects.
pub struct GeometryBuffers {
    state: BufferState,
    ranges: Vec<ObjectRange>,
    arrays: ChannelArrays,
}

impl Default for GeometryBuffers {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryBuffers {
    /// Creates empty buffers. They are stale until the first rebuild.
    pub fn new() -> GeometryBuffers {
        GeometryBuffers {
            state: BufferState::Stale,
            ranges: Vec::new(),
            arrays: ChannelArrays::default(),
        }
    }

    /// The freshness of the buffers.
    #[inline]
    pub fn state(&self) -> BufferState {
        self.state
    }

    /// Do the buffers match the shape recorded at the last rebuild?
    #[inline]
    pub fn is_fresh(&self) -> bool {
        self.state == BufferState::Fresh
    }

    /// Flags the buffers as needing a full rebuild.
    #[inline]
    pub fn mark_stale(&mut self) {
        self.state = BufferState::Stale;
    }

    /// The per-object ranges recorded at the last rebuild.
    #[inline]
    pub fn ranges(&self) -> &[ObjectRange] {
        &self.ranges
    }

    /// Recomputes and uploads every channel from scratch.
    pub fn rebuild_all<M: MeshData, B: RenderBackend + ?Sized>(
        &mut self,
        objects: &[MeshObject<M>],
        backend: &mut B,
    ) {
        self.ranges.clear();
        let mut next = ObjectRange::default();

        for object in objects {
            let shape = ObjectShape::of(&*object.mesh());
            let range = ObjectRange { shape, ..next };
            next.first_vertex += shape.vertices;
            next.first_edge += shape.edges;
            next.first_face += shape.faces;
            next.first_triangle += shape.triangles;
            self.ranges.push(range);
        }

        for channel in Channel::ALL {
            self.fill(channel, objects);
        }

        self.state = BufferState::Fresh;

        for channel in Channel::ALL {
            backend.upload(channel, self.data(channel));
        }

        log::debug!(
            "rebuilt geometry buffers: {} objects, {} vertices, {} triangles",
            objects.len(),
            next.first_vertex,
            next.first_triangle
        );
    }

    /// Recomputes and uploads a single attribute channel.
    ///
    /// Fails if the meshes changed shape since the last rebuild.
    pub fn update_channel<M: MeshData, B: RenderBackend + ?Sized>(
        &mut self,
        channel: Channel,
        objects: &[MeshObject<M>],
        backend: &mut B,
    ) -> Result<(), BufferError> {
        if channel.is_index() {
            return Err(BufferError::NotAnAttributeChannel(channel));
        }

        self.refresh(channel, objects, backend)
    }

    /// Recomputes and uploads a single index channel, e.g. after the face
    /// cycles were flipped.
    ///
    /// Fails if the meshes changed shape since the last rebuild.
    pub fn update_index_channel<M: MeshData, B: RenderBackend + ?Sized>(
        &mut self,
        channel: Channel,
        objects: &[MeshObject<M>],
        backend: &mut B,
    ) -> Result<(), BufferError> {
        if !channel.is_index() {
            return Err(BufferError::NotAnIndexChannel(channel));
        }

        self.refresh(channel, objects, backend)
    }

    fn refresh<M: MeshData, B: RenderBackend + ?Sized>(
        &mut self,
        channel: Channel,
        objects: &[MeshObject<M>],
        backend: &mut B,
    ) -> Result<(), BufferError> {
        let same_shape = self.ranges.len() == objects.len()
            && self
                .ranges
                .iter()
                .zip(objects)
                .all(|(range, object)| range.shape == ObjectShape::of(&*object.mesh()));

        if !self.is_fresh() || !same_shape {
            self.state = BufferState::Stale;
            return Err(BufferError::StaleBuffers(channel));
        }

        self.fill(channel, objects);
        backend.upload(channel, self.data(channel));
        log::debug!("updated channel `{}`", channel);

        Ok(())
    }

    /// Issues the draw calls of every visible element class of every object.
    ///
    /// Returns the number of draw calls.
    pub fn draw<M, B: RenderBackend + ?Sized>(
        &self,
        objects: &[MeshObject<M>],
        backend: &mut B,
    ) -> Result<usize, BufferError> {
        if !self.is_fresh() || self.ranges.len() != objects.len() {
            return Err(BufferError::StaleBuffers(Channel::Positions));
        }

        let mut calls = 0;
        let mut issue = |call: DrawCall| {
            if call.count > 0 {
                backend.draw(&call);
                calls += 1;
            }
        };

        for (range, object) in self.ranges.iter().zip(objects) {
            let shape = &range.shape;

            if object.is_visible(ElementClass::Faces) {
                for (colors, indices) in [
                    (Channel::FaceColorsFront, Channel::FacesFront),
                    (Channel::FaceColorsBack, Channel::FacesBack),
                ] {
                    issue(DrawCall {
                        primitive: Primitive::Triangles,
                        positions: Channel::Positions,
                        colors,
                        indices: Some(indices),
                        first: (range.first_triangle * 3) as u32,
                        count: (shape.triangles * 3) as u32,
                        size: 0.0,
                    });
                }
            }

            if object.is_visible(ElementClass::Edges) {
                issue(DrawCall {
                    primitive: Primitive::Lines,
                    positions: Channel::Positions,
                    colors: Channel::EdgeColors,
                    indices: Some(Channel::Lines),
                    first: (range.first_edge * 2) as u32,
                    count: (shape.edges * 2) as u32,
                    size: object.line_width(),
                });
            }

            if object.is_visible(ElementClass::Vertices) {
                issue(DrawCall {
                    primitive: Primitive::Points,
                    positions: Channel::Positions,
                    colors: Channel::VertexColors,
                    indices: Some(Channel::Points),
                    first: range.first_vertex as u32,
                    count: shape.vertices as u32,
                    size: object.point_size(),
                });
            }

            if object.is_visible(ElementClass::Normals) {
                issue(DrawCall {
                    primitive: Primitive::Lines,
                    positions: Channel::NormalPositions,
                    colors: Channel::NormalColors,
                    indices: None,
                    first: (range.first_face * 2) as u32,
                    count: (shape.faces * 2) as u32,
                    size: object.line_width(),
                });
            }
        }

        Ok(calls)
    }

    /// The current content of a channel.
    pub fn data(&self, channel: Channel) -> ChannelData<'_> {
        let a = &self.arrays;
        match channel {
            Channel::Positions => ChannelData::Floats(bytemuck::cast_slice(&a.positions)),
            Channel::VertexColors => ChannelData::Floats(bytemuck::cast_slice(&a.vertex_colors)),
            Channel::EdgeColors => ChannelData::Floats(bytemuck::cast_slice(&a.edge_colors)),
            Channel::FaceColorsFront => {
                ChannelData::Floats(bytemuck::cast_slice(&a.face_colors_front))
            }
            Channel::FaceColorsBack => {
                ChannelData::Floats(bytemuck::cast_slice(&a.face_colors_back))
            }
            Channel::NormalPositions => {
                ChannelData::Floats(bytemuck::cast_slice(&a.normal_positions))
            }
            Channel::NormalColors => ChannelData::Floats(bytemuck::cast_slice(&a.normal_colors)),
            Channel::Points => ChannelData::Indices(&a.points),
            Channel::Lines => ChannelData::Indices(bytemuck::cast_slice(&a.lines)),
            Channel::FacesFront => ChannelData::Indices(bytemuck::cast_slice(&a.faces_front)),
            Channel::FacesBack => ChannelData::Indices(bytemuck::cast_slice(&a.faces_back)),
        }
    }

    /// Number of elements (vertices, colors, or primitives) of a channel.
    pub fn len(&self, channel: Channel) -> usize {
        self.data(channel).len() / channel.components()
    }

    /// Are all channels empty?
    pub fn is_empty(&self) -> bool {
        self.arrays.positions.is_empty() && self.arrays.normal_positions.is_empty()
    }

    fn fill<M: MeshData>(&mut self, channel: Channel, objects: &[MeshObject<M>]) {
        let ranges = &self.ranges;
        let a = &mut self.arrays;

        match channel {
            Channel::Positions => {
                a.positions.clear();
                for object in objects {
                    let mesh = object.mesh();
                    a.positions.extend(
                        mesh.vertices()
                            .into_iter()
                            .map(|k| mesh.vertex_position(k).unwrap_or(Vec3::ZERO).to_array()),
                    );
                }
            }
            Channel::VertexColors => fill_colors(
                &mut a.vertex_colors,
                objects,
                ranges,
                ColorTarget::Vertices,
                ElementClass::Vertices,
            ),
            Channel::EdgeColors => fill_colors(
                &mut a.edge_colors,
                objects,
                ranges,
                ColorTarget::Edges,
                ElementClass::Edges,
            ),
            Channel::FaceColorsFront => fill_colors(
                &mut a.face_colors_front,
                objects,
                ranges,
                ColorTarget::FacesFront,
                ElementClass::Faces,
            ),
            Channel::FaceColorsBack => fill_colors(
                &mut a.face_colors_back,
                objects,
                ranges,
                ColorTarget::FacesBack,
                ElementClass::Faces,
            ),
            Channel::NormalColors => fill_colors(
                &mut a.normal_colors,
                objects,
                ranges,
                ColorTarget::Normals,
                ElementClass::Normals,
            ),
            Channel::NormalPositions => {
                a.normal_positions.clear();
                for object in objects {
                    let mesh = object.mesh();
                    for face in mesh.faces() {
                        let points: Vec<Vec3> = mesh
                            .face_vertices(face)
                            .unwrap_or_default()
                            .into_iter()
                            .map(|k| mesh.vertex_position(k).unwrap_or(Vec3::ZERO))
                            .collect();
                        let c = geometry::centroid(&points);
                        let n = geometry::polygon_normal(&points);
                        a.normal_positions.push(c.to_array());
                        a.normal_positions
                            .push((c + n * object.normal_scale()).to_array());
                    }
                }
            }
            Channel::Points => {
                a.points.clear();
                for range in ranges {
                    let first = range.first_vertex as VertexIndex;
                    a.points
                        .extend((0..range.shape.vertices as VertexIndex).map(|i| first + i));
                }
            }
            Channel::Lines => {
                a.lines.clear();
                for (range, object) in ranges.iter().zip(objects) {
                    let mesh = object.mesh();
                    let index = vertex_index_map(&*mesh, range);
                    a.lines.extend(mesh.edges().into_iter().map(|e| {
                        let [u, v] = mesh.edge_vertices(e).unwrap_or_default();
                        [lookup(&index, u, range), lookup(&index, v, range)]
                    }));
                }
            }
            Channel::FacesFront | Channel::FacesBack => {
                let back = channel == Channel::FacesBack;
                let out = if back {
                    &mut a.faces_back
                } else {
                    &mut a.faces_front
                };
                out.clear();

                for (range, object) in ranges.iter().zip(objects) {
                    let mesh = object.mesh();
                    let index = vertex_index_map(&*mesh, range);

                    for face in mesh.faces() {
                        let cycle: Vec<VertexIndex> = mesh
                            .face_vertices(face)
                            .unwrap_or_default()
                            .into_iter()
                            .map(|k| lookup(&index, k, range))
                            .collect();

                        out.extend(
                            geometry::fan_triangles(&cycle)
                                .map(|[i, j, k]| if back { [i, k, j] } else { [i, j, k] }),
                        );
                    }
                }
            }
        }
    }
}

fn fill_colors<M>(
    out: &mut Vec<[f32; 4]>,
    objects: &[MeshObject<M>],
    ranges: &[ObjectRange],
    target: ColorTarget,
    class: ElementClass,
) {
    out.clear();

    for (range, object) in ranges.iter().zip(objects) {
        let mut c: Color = object.target_color(target);
        // Hidden classes stay in the buffers, fully transparent.
        if !object.is_visible(class) {
            c = color::with_alpha(c, 0.0);
        }

        let count = if class == ElementClass::Normals {
            range.shape.faces * 2
        } else {
            range.shape.vertices
        };
        out.extend(std::iter::repeat(color::to_array(c)).take(count));
    }
}

fn vertex_index_map<M: MeshData + ?Sized>(
    mesh: &M,
    range: &ObjectRange,
) -> HashMap<VertexKey, VertexIndex> {
    mesh.vertices()
        .into_iter()
        .enumerate()
        .map(|(i, k)| (k, (range.first_vertex + i) as VertexIndex))
        .collect()
}

// Keys the mesh does not know map to the object's first vertex so that
// indices never leave the object's range.
fn lookup(index: &HashMap<VertexKey, VertexIndex>, key: VertexKey, range: &ObjectRange) -> VertexIndex {
    index
        .get(&key)
        .copied()
        .unwrap_or(range.first_vertex as VertexIndex)
}
