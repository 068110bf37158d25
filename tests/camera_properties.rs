use approx::assert_relative_eq;
use meshview::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn view_projection_is_a_function_of_the_state() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut a = OrbitCamera3d::default();

    for _ in 0..100 {
        a.orbit(rng.random_range(-90.0..90.0), rng.random_range(-30.0..30.0));
        a.set_fov(rng.random_range(5.0..150.0));
        a.set_distance(rng.random_range(0.0..50.0));

        let b = OrbitCamera3d::new(a.state(), *a.limits());
        let (va, pa) = a.view_projection();
        let (vb, pb) = b.view_projection();
        assert!(va.abs_diff_eq(vb, 1.0e-5));
        assert!(pa.abs_diff_eq(pb, 1.0e-5));
    }
}

#[test]
fn viewport_camera_sliders_follow_notices() {
    let mut viewport: ViewportController<PolyMesh, _> =
        ViewportController::new(DisplaySettings::default(), RecordingBackend::new());

    viewport.apply(ViewportAction::Drag { dx: 40.0, dy: -10.0 });
    viewport.apply(ViewportAction::Scroll(2.0));

    let notices = viewport.take_notices();
    let Some(ViewportNotice::CameraChanged(state)) = notices.last() else {
        panic!("expected a camera notice, got {:?}", notices);
    };
    assert_eq!(*state, viewport.camera().state());
    assert_relative_eq!(state.distance, 10.0 / 1.1f32.powi(2), epsilon = 1.0e-4);
}
