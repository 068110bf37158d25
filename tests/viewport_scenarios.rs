use meshview::prelude::*;
use meshview::color;

type Viewport = ViewportController<PolyMesh, RecordingBackend>;

fn viewport(meshes: Vec<PolyMesh>) -> Viewport {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut viewport = Viewport::new(DisplaySettings::default(), RecordingBackend::new());
    viewport.set_objects(meshes);
    viewport
}

fn max_index(backend: &RecordingBackend) -> Option<u32> {
    [Channel::Points, Channel::Lines, Channel::FacesFront, Channel::FacesBack]
        .into_iter()
        .flat_map(|channel| backend.indices(channel).iter().copied())
        .max()
}

#[test]
fn vertex_colors_follow_scene_order() {
    let viewport = viewport(vec![
        procedural::tetrahedron(),
        procedural::octahedron(),
        procedural::unit_cuboid(),
    ]);

    let colors = viewport.backend().floats(Channel::VertexColors);
    assert_eq!(colors.len(), 18 * 4);

    let ranges = viewport.buffers().ranges();
    let starts: Vec<_> = ranges.iter().map(|r| r.first_vertex).collect();
    let counts: Vec<_> = ranges.iter().map(|r| r.shape.vertices).collect();
    assert_eq!(starts, [0, 4, 10]);
    assert_eq!(counts, [4, 6, 8]);
}

#[test]
fn rebuild_is_idempotent() {
    let mut viewport = viewport(vec![procedural::dodecahedron(), procedural::unit_cuboid()]);

    let before: Vec<_> = Channel::ALL
        .iter()
        .map(|c| viewport.buffers().data(*c).as_bytes().to_vec())
        .collect();
    viewport.refresh();
    let after: Vec<_> = Channel::ALL
        .iter()
        .map(|c| viewport.buffers().data(*c).as_bytes().to_vec())
        .collect();

    assert_eq!(before, after);
}

#[test]
fn topology_edits_keep_indices_in_range() {
    let mut viewport = viewport(vec![
        procedural::tetrahedron(),
        procedural::unit_cuboid(),
        procedural::icosahedron(),
    ]);

    for (object, scheme) in [
        (0, SubdivisionScheme::Quad),
        (1, SubdivisionScheme::Corner),
        (2, SubdivisionScheme::Tri),
        (0, SubdivisionScheme::Tri),
    ] {
        viewport.apply(ViewportAction::Subdivide { object, scheme, k: 1 });
        viewport.apply(ViewportAction::FlipNormals { object: Some(object) });
        viewport.render();

        let backend = viewport.backend();
        let positions = backend.floats(Channel::Positions).len() as u32 / 3;
        assert!(max_index(backend).unwrap() < positions);

        for call in backend.last_frame() {
            if call.indices.is_some() {
                let end = (call.first + call.count) as usize;
                assert!(end <= backend.indices(call.indices.unwrap()).len());
            }
        }
    }
}

#[test]
fn highlight_is_exclusive() {
    let mut viewport = viewport((0..10).map(|_| procedural::tetrahedron()).collect());

    viewport.apply(ViewportAction::SelectPath(vec![(2, 0)].into()));
    viewport.apply(ViewportAction::SelectPath(vec![(5, 0)].into()));

    let settings = viewport.settings().clone();
    let highlighted: Vec<_> = viewport
        .scene()
        .objects()
        .iter()
        .enumerate()
        .filter(|(_, o)| o.color() == settings.highlight_color)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(highlighted, [5]);
    assert_eq!(
        viewport
            .scene()
            .objects()
            .iter()
            .filter(|o| o.color() == settings.base_color)
            .count(),
        9
    );

    // Four vertices per tetrahedron, the sixth one is red.
    let front = viewport.backend().floats(Channel::FaceColorsFront);
    let red = color::to_array(settings.highlight_color);
    for (vertex, rgba) in front.chunks(4).enumerate() {
        assert_eq!(rgba == red, vertex / 4 == 5);
    }
}

#[test]
fn selection_paths_by_depth() {
    let mut viewport = viewport(vec![procedural::tetrahedron(), procedural::unit_cuboid()]);

    viewport.apply(ViewportAction::SelectPath(vec![(1, 0)].into()));
    assert_eq!(viewport.selection(), Some(Selection::ObjectOnly(1)));
    assert_eq!(viewport.take_notices(), [ViewportNotice::ObjectSelected(1)]);

    viewport.apply(ViewportAction::SelectPath(vec![(1, 0), (0, 0)].into()));
    assert_eq!(
        viewport.selection(),
        Some(Selection::Category(1, EntityKind::Vertex))
    );
    assert_eq!(viewport.take_notices(), [ViewportNotice::ObjectSelected(1)]);

    viewport.apply(ViewportAction::SelectPath(vec![(1, 0), (0, 0), (3, 0)].into()));
    assert_eq!(
        viewport.selection(),
        Some(Selection::Entity(1, EntityKind::Vertex, 3))
    );

    let notices = viewport.take_notices();
    let expected = SelectionResolver::fetch_attributes(
        1,
        &*viewport.scene().objects()[1].mesh(),
        EntityKind::Vertex,
        3,
    )
    .unwrap();
    assert_eq!(
        notices,
        [
            ViewportNotice::ObjectSelected(1),
            ViewportNotice::EntitySelected(expected)
        ]
    );
}

#[test]
fn outline_tags_select_like_paths() {
    let mut viewport = viewport(vec![procedural::octahedron(), procedural::tetrahedron()]);

    let node = viewport
        .outline()
        .node(&vec![(0, 0), (2, 0), (4, 0)].into())
        .unwrap()
        .clone();
    assert_eq!(node.label, "4");

    viewport.apply(ViewportAction::Select(node.selection));
    assert_eq!(viewport.selection(), Some(Selection::Entity(0, EntityKind::Face, 4)));
    assert_eq!(viewport.scene().highlighted(), Some(0));
}

#[test]
fn flipping_normals_keeps_positions_and_colors() {
    let mut viewport = viewport(vec![procedural::unit_cuboid(), procedural::dodecahedron()]);
    let backend = viewport.backend().clone();
    viewport.backend_mut().clear_uploads();

    viewport.apply(ViewportAction::FlipNormals { object: None });

    let after = viewport.backend();
    for channel in [
        Channel::Positions,
        Channel::VertexColors,
        Channel::EdgeColors,
        Channel::FaceColorsFront,
        Channel::FaceColorsBack,
    ] {
        assert_eq!(backend.channel(channel), after.channel(channel));
        assert!(!after.uploads().contains(&channel));
    }

    assert_ne!(
        backend.indices(Channel::FacesFront),
        after.indices(Channel::FacesFront)
    );
    assert_eq!(
        backend.indices(Channel::FacesFront).len(),
        after.indices(Channel::FacesFront).len()
    );
}

#[test]
fn redraw_requests_coalesce() {
    let mut viewport = viewport(vec![procedural::unit_cuboid()]);
    assert!(viewport.render());
    assert!(!viewport.render());

    viewport.apply(ViewportAction::ZoomIn);
    viewport.apply(ViewportAction::SetAzimuth(120.0));
    viewport.apply(ViewportAction::SetVisible {
        class: ElementClass::Normals,
        visible: true,
    });
    viewport.request_redraw();

    assert!(viewport.render());
    assert!(!viewport.render());
    assert_eq!(viewport.backend().frames(), 2);

    // Normals are now drawn as plain lines, one segment per face.
    let normals = viewport
        .backend()
        .last_frame()
        .iter()
        .find(|call| call.positions == Channel::NormalPositions)
        .copied()
        .unwrap();
    assert_eq!(normals.indices, None);
    assert_eq!(normals.count, 12);
}

#[test]
fn centering_and_zoom_extents() {
    let mut cube = procedural::unit_cuboid();
    cube.translate(Vec3::new(10.0, 0.0, 0.0));
    let mut viewport = viewport(vec![cube]);

    viewport.apply(ViewportAction::CenterObjects);
    let positions = viewport.backend().floats(Channel::Positions);
    let mean_x = positions.chunks(3).map(|p| p[0]).sum::<f32>() / 8.0;
    assert!(mean_x.abs() < 1.0e-5);

    viewport.take_notices();
    viewport.apply(ViewportAction::ZoomExtents);
    assert!(matches!(
        viewport.take_notices().as_slice(),
        [ViewportNotice::CameraChanged(_)]
    ));
}
