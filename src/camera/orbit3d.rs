use crate::camera::Camera3d;
use glamx::{Mat4, Pose3, Vec3};

/// The four parameters of an orbit camera, in degrees and world units.
///
/// Everything the camera displays is a pure function of these values and of
/// the fixed frustum configuration of its [`OrbitCamera3d`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraState {
    /// Rotation around the up axis, in degrees, always in `[0, 360)`.
    pub azimuth: f32,
    /// Angle above the horizontal plane, in degrees.
    pub elevation: f32,
    /// Distance from the eye to the orbit target.
    pub distance: f32,
    /// Vertical field of view, in degrees.
    pub fov: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        CameraState {
            azimuth: 30.0,
            elevation: 20.0,
            distance: 10.0,
            fov: 50.0,
        }
    }
}

/// Bounds and step sizes applied by the orbit camera setters.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraLimits {
    /// Lowest elevation, in degrees.
    pub min_elevation: f32,
    /// Highest elevation, in degrees.
    pub max_elevation: f32,
    /// Distance floor. Must be positive.
    pub min_distance: f32,
    /// Distance ceiling.
    pub max_distance: f32,
    /// Narrowest field of view, in degrees.
    pub min_fov: f32,
    /// Widest field of view, in degrees.
    pub max_fov: f32,
    /// Multiplicative distance step of one zoom increment. Must be > 1.
    pub zoom_factor: f32,
    /// Degrees of rotation per dragged pixel.
    pub drag_sensitivity: f32,
}

impl Default for CameraLimits {
    fn default() -> Self {
        CameraLimits {
            min_elevation: -89.0,
            max_elevation: 89.0,
            min_distance: 0.1,
            max_distance: 1000.0,
            min_fov: 10.0,
            max_fov: 120.0,
            zoom_factor: 1.1,
            drag_sensitivity: 0.5,
        }
    }
}

/// Preset viewpoints.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StandardView {
    /// The default three-quarter view.
    Perspective,
    /// Looking along +Y.
    Front,
    /// Looking along -X.
    Right,
    /// Looking down along -Z.
    Top,
}

impl StandardView {
    /// The `(azimuth, elevation)` of this view, in degrees.
    pub fn angles(self) -> (f32, f32) {
        let default = CameraState::default();
        match self {
            StandardView::Perspective => (default.azimuth, default.elevation),
            StandardView::Front => (270.0, 0.0),
            StandardView::Right => (0.0, 0.0),
            StandardView::Top => (270.0, 90.0),
        }
    }
}

/// Orbit camera rotating around a target point.
///
/// The world is Z-up: the azimuth rotates around the Z axis (zero on +X,
/// counter-clockwise), and the elevation lifts the eye above the XY plane.
/// Setters never fail: out-of-range values are clamped, the azimuth wraps
/// modulo 360, and each setter returns `true` if the camera changed.
///
/// # Example
/// ```
/// # use meshview::camera::OrbitCamera3d;
/// let mut camera = OrbitCamera3d::default();
/// camera.orbit(400.0, 200.0);
/// assert!(camera.azimuth() < 360.0);
/// assert_eq!(camera.elevation(), 89.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrbitCamera3d {
    state: CameraState,
    target: Vec3,
    limits: CameraLimits,
    znear: f32,
    zfar: f32,
    aspect: f32,
}

impl Default for OrbitCamera3d {
    fn default() -> Self {
        OrbitCamera3d::new(CameraState::default(), CameraLimits::default())
    }
}

impl OrbitCamera3d {
    /// Creates a camera looking at the origin.
    ///
    /// The initial state is clamped to `limits`.
    pub fn new(state: CameraState, limits: CameraLimits) -> OrbitCamera3d {
        let mut res = OrbitCamera3d {
            state,
            target: Vec3::ZERO,
            limits,
            znear: 0.01,
            zfar: 1024.0,
            aspect: 800.0 / 600.0,
        };

        res.state = res.clamped(state, CameraState::default());
        res
    }

    /// Clamps `state` to the limits. Non-finite components keep their value
    /// from `previous`.
    fn clamped(&self, state: CameraState, previous: CameraState) -> CameraState {
        let l = &self.limits;
        let finite = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };
        let azimuth = finite(state.azimuth, previous.azimuth).rem_euclid(360.0);

        CameraState {
            // `rem_euclid` rounds tiny negative angles up to exactly 360.
            azimuth: if azimuth >= 360.0 { 0.0 } else { azimuth },
            elevation: finite(state.elevation, previous.elevation)
                .clamp(l.min_elevation, l.max_elevation),
            distance: finite(state.distance, previous.distance)
                .clamp(l.min_distance, l.max_distance),
            fov: finite(state.fov, previous.fov).clamp(l.min_fov, l.max_fov),
        }
    }

    fn apply(&mut self, state: CameraState) -> bool {
        let state = self.clamped(state, self.state);
        let changed = state != self.state;
        self.state = state;

        if changed {
            log::debug!("camera changed: {:?}", self.state);
        }

        changed
    }

    /// The current camera parameters.
    #[inline]
    pub fn state(&self) -> CameraState {
        self.state
    }

    /// The clamping configuration.
    #[inline]
    pub fn limits(&self) -> &CameraLimits {
        &self.limits
    }

    /// The azimuth, in degrees, in `[0, 360)`.
    #[inline]
    pub fn azimuth(&self) -> f32 {
        self.state.azimuth
    }

    /// The elevation, in degrees.
    #[inline]
    pub fn elevation(&self) -> f32 {
        self.state.elevation
    }

    /// The distance between the eye and the target.
    #[inline]
    pub fn distance(&self) -> f32 {
        self.state.distance
    }

    /// The vertical field of view, in degrees.
    #[inline]
    pub fn fov(&self) -> f32 {
        self.state.fov
    }

    /// The point the camera orbits around.
    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Adds angular deltas (in degrees) to the azimuth and the elevation.
    pub fn orbit(&mut self, d_azimuth: f32, d_elevation: f32) -> bool {
        let mut state = self.state;
        state.azimuth += d_azimuth;
        state.elevation += d_elevation;
        self.apply(state)
    }

    /// Sets the azimuth, in degrees.
    pub fn set_azimuth(&mut self, azimuth: f32) -> bool {
        self.apply(CameraState {
            azimuth,
            ..self.state
        })
    }

    /// Sets the elevation, in degrees.
    pub fn set_elevation(&mut self, elevation: f32) -> bool {
        self.apply(CameraState {
            elevation,
            ..self.state
        })
    }

    /// Sets the distance to the target.
    pub fn set_distance(&mut self, distance: f32) -> bool {
        self.apply(CameraState {
            distance,
            ..self.state
        })
    }

    /// Sets the vertical field of view, in degrees.
    pub fn set_fov(&mut self, fov: f32) -> bool {
        self.apply(CameraState { fov, ..self.state })
    }

    /// Moves the eye one zoom step closer to the target.
    pub fn zoom_in(&mut self) -> bool {
        self.set_distance(self.state.distance / self.limits.zoom_factor)
    }

    /// Moves the eye one zoom step away from the target.
    pub fn zoom_out(&mut self) -> bool {
        self.set_distance(self.state.distance * self.limits.zoom_factor)
    }

    /// Sets the azimuth and elevation of a preset view.
    pub fn set_view(&mut self, view: StandardView) -> bool {
        let (azimuth, elevation) = view.angles();
        self.apply(CameraState {
            azimuth,
            elevation,
            ..self.state
        })
    }

    /// Sets the point the camera orbits around.
    pub fn set_target(&mut self, target: Vec3) -> bool {
        if !target.is_finite() {
            return false;
        }

        let changed = target != self.target;
        self.target = target;
        changed
    }

    /// Updates the aspect ratio after the viewport was resized.
    pub fn set_viewport_size(&mut self, width: f32, height: f32) -> bool {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return false;
        }

        let aspect = width / height;
        let changed = aspect != self.aspect;
        self.aspect = aspect;
        changed
    }

    /// Centers the camera on a bounding sphere and backs off until the
    /// sphere fits the field of view.
    pub fn frame_sphere(&mut self, center: Vec3, radius: f32) -> bool {
        let half_fov = (self.state.fov * 0.5).to_radians();
        let moved = self.set_target(center);
        let zoomed = self.set_distance(radius.max(0.0) / half_fov.sin());
        moved || zoomed
    }

    /// Converts a mouse drag, in pixels, into an orbit.
    ///
    /// Dragging right turns the scene right and dragging down tilts the
    /// camera up.
    pub fn handle_drag(&mut self, dx: f32, dy: f32) -> bool {
        let s = self.limits.drag_sensitivity;
        self.orbit(-dx * s, dy * s)
    }

    /// Converts scroll notches into zoom steps. Positive values zoom in.
    pub fn handle_scroll(&mut self, notches: f32) -> bool {
        self.set_distance(self.state.distance * self.limits.zoom_factor.powf(-notches))
    }

    /// The view and projection matrices for the current state.
    pub fn view_projection(&self) -> (Mat4, Mat4) {
        (self.view_transform().to_mat4(), self.projection())
    }
}

impl Camera3d for OrbitCamera3d {
    fn eye(&self) -> Vec3 {
        let az = self.state.azimuth.to_radians();
        let el = self.state.elevation.to_radians();
        let dir = Vec3::new(el.cos() * az.cos(), el.cos() * az.sin(), el.sin());

        self.target + dir * self.state.distance
    }

    fn view_transform(&self) -> Pose3 {
        Pose3::look_at_rh(self.eye(), self.target, Vec3::Z)
    }

    fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.state.fov.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.znear, self.zfar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glamx::Vec2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn elevation_stays_clamped_and_azimuth_wraps() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut camera = OrbitCamera3d::default();

        for _ in 0..1000 {
            camera.orbit(
                rng.random_range(-720.0..720.0),
                rng.random_range(-180.0..180.0),
            );
            assert!((-89.0..=89.0).contains(&camera.elevation()));
            assert!((0.0..360.0).contains(&camera.azimuth()));
        }

        camera.set_azimuth(0.0);
        camera.orbit(-1.0e-6, 0.0);
        assert!((0.0..360.0).contains(&camera.azimuth()));
        camera.set_azimuth(-1.0e-6);
        assert!((0.0..360.0).contains(&camera.azimuth()));
    }

    #[test]
    fn non_finite_inputs_leave_the_state_untouched() {
        let mut camera = OrbitCamera3d::default();
        camera.set_target(Vec3::new(1.0, 0.0, 0.0));
        let state = camera.state();

        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert!(!camera.orbit(bad, 0.0));
            assert!(!camera.orbit(0.0, bad));
            assert!(!camera.set_azimuth(bad));
            assert!(!camera.set_elevation(bad));
            assert!(!camera.set_distance(bad));
            assert!(!camera.set_fov(bad));
            assert!(!camera.handle_drag(bad, bad));
            assert!(!camera.set_target(Vec3::splat(bad)));
            assert!(!camera.set_viewport_size(bad, 600.0));
            assert_eq!(camera.state(), state);
        }

        assert!(!camera.handle_scroll(f32::NEG_INFINITY));
        assert_eq!(camera.state(), state);
        assert_eq!(camera.target(), Vec3::new(1.0, 0.0, 0.0));

        assert!(camera.zoom_in());
        assert!(camera.distance() >= camera.limits().min_distance);
        assert!(camera.distance().is_finite());
    }

    #[test]
    fn non_finite_initial_state_falls_back_to_defaults() {
        let state = CameraState {
            azimuth: f32::NAN,
            distance: f32::INFINITY,
            ..CameraState::default()
        };
        let camera = OrbitCamera3d::new(state, CameraLimits::default());
        assert_eq!(camera.state(), CameraState::default());
    }

    #[test]
    fn zoom_never_crosses_the_floor() {
        let mut camera = OrbitCamera3d::default();

        for _ in 0..500 {
            camera.zoom_in();
        }

        assert_eq!(camera.distance(), camera.limits().min_distance);
        assert!(!camera.zoom_in());
        assert!(camera.zoom_out());
        assert!(camera.distance() > camera.limits().min_distance);
    }

    #[test]
    fn negative_distance_is_clamped() {
        let mut camera = OrbitCamera3d::default();
        camera.set_distance(-5.0);
        assert_eq!(camera.distance(), 0.1);
    }

    #[test]
    fn fov_is_clamped() {
        let mut camera = OrbitCamera3d::default();
        camera.set_fov(500.0);
        assert_eq!(camera.fov(), 120.0);
        camera.set_fov(0.0);
        assert_eq!(camera.fov(), 10.0);
    }

    #[test]
    fn setters_report_changes() {
        let mut camera = OrbitCamera3d::default();
        assert!(camera.set_azimuth(90.0));
        assert!(!camera.set_azimuth(90.0));
        assert!(!camera.set_azimuth(450.0));
        assert!(!camera.orbit(0.0, 0.0));
    }

    #[test]
    fn eye_sits_at_distance_from_target() {
        let mut camera = OrbitCamera3d::default();
        camera.set_target(Vec3::new(1.0, 2.0, 3.0));
        camera.orbit(77.0, -33.0);
        assert_relative_eq!(
            (camera.eye() - camera.target()).length(),
            camera.distance(),
            epsilon = 1.0e-4
        );
    }

    #[test]
    fn view_projection_is_pure() {
        let mut a = OrbitCamera3d::default();
        let mut b = OrbitCamera3d::default();
        a.orbit(10.0, 5.0);
        a.zoom_in();
        b.set_azimuth(a.azimuth());
        b.set_elevation(a.elevation());
        b.set_distance(a.distance());

        assert_eq!(a.view_projection(), b.view_projection());
        assert_eq!(a.view_projection(), a.view_projection());
    }

    #[test]
    fn target_projects_to_viewport_center() {
        let camera = OrbitCamera3d::default();
        let size = Vec2::new(800.0, 600.0);
        let p = camera.project(camera.target(), size);
        assert_relative_eq!(p.x, 400.0, epsilon = 1.0e-2);
        assert_relative_eq!(p.y, 300.0, epsilon = 1.0e-2);
    }

    #[test]
    fn top_view_is_clamped_below_the_pole() {
        let mut camera = OrbitCamera3d::default();
        camera.set_view(StandardView::Top);
        assert_eq!(camera.elevation(), 89.0);
        assert_eq!(camera.azimuth(), 270.0);
    }

    #[test]
    fn framing_fits_the_sphere() {
        let mut camera = OrbitCamera3d::default();
        camera.frame_sphere(Vec3::new(0.0, 0.0, 1.0), 2.0);
        let half_fov = (camera.fov() * 0.5).to_radians();
        assert_relative_eq!(camera.distance() * half_fov.sin(), 2.0, epsilon = 1.0e-4);
        assert_eq!(camera.target(), Vec3::new(0.0, 0.0, 1.0));
    }
}
