use glamx::{Mat4, Pose3, Vec2, Vec3, Vec4, Vec4Swizzles};

/// Trait that all viewport cameras implement.
///
/// A camera only answers questions about the viewpoint: where the eye is and
/// which transforms map world coordinates to normalized device coordinates.
/// Input handling is done by the concrete camera types, whose setters report
/// whether anything changed so that the caller can request a redraw.
pub trait Camera3d {
    /// Returns the camera's position in world space.
    fn eye(&self) -> Vec3;

    /// Returns the camera's view transformation (world → camera space).
    fn view_transform(&self) -> Pose3;

    /// Returns the projection matrix (camera space → NDC).
    fn projection(&self) -> Mat4;

    /// Returns the near and far clipping plane distances.
    fn clip_planes(&self) -> (f32, f32);

    /// Returns the view transformation and the projection matrix.
    #[inline]
    fn view_transform_pair(&self) -> (Pose3, Mat4) {
        (self.view_transform(), self.projection())
    }

    /// Returns the combined projection and view transformation matrix.
    fn transformation(&self) -> Mat4 {
        self.projection() * self.view_transform().to_mat4()
    }

    /// Returns the inverse of the combined transformation matrix.
    fn inverse_transformation(&self) -> Mat4 {
        self.transformation().inverse()
    }

    /// Projects a 3D point in world coordinates to 2D screen coordinates.
    ///
    /// # Arguments
    /// * `world_coord` - The 3D point in world space
    /// * `size` - The size of the viewport in pixels
    fn project(&self, world_coord: Vec3, size: Vec2) -> Vec2 {
        let h_world_coord = world_coord.extend(1.0);
        let h_normalized_coord = self.transformation() * h_world_coord;

        let normalized_coord = h_normalized_coord.xyz() / h_normalized_coord.w;

        Vec2::new(
            (1.0 + normalized_coord.x) * size.x / 2.0,
            (1.0 + normalized_coord.y) * size.y / 2.0,
        )
    }

    /// Unprojects a 2D screen point to a ray `(origin, direction)` in world space.
    ///
    /// Useful for picking: the ray starts on the near plane and passes through
    /// the given pixel (origin at the top-left corner of the viewport).
    fn unproject(&self, window_coord: Vec2, size: Vec2) -> (Vec3, Vec3) {
        let normalized_coord = Vec2::new(
            2.0 * window_coord.x / size.x - 1.0,
            2.0 * -window_coord.y / size.y + 1.0,
        );

        let normalized_begin = Vec4::new(normalized_coord.x, normalized_coord.y, 0.0, 1.0);
        let normalized_end = Vec4::new(normalized_coord.x, normalized_coord.y, 1.0, 1.0);

        let cam = self.inverse_transformation();

        let h_unprojected_begin = cam * normalized_begin;
        let h_unprojected_end = cam * normalized_end;

        let unprojected_begin = h_unprojected_begin.xyz() / h_unprojected_begin.w;
        let unprojected_end = h_unprojected_end.xyz() / h_unprojected_end.w;

        (
            unprojected_begin,
            (unprojected_end - unprojected_begin).normalize(),
        )
    }
}
