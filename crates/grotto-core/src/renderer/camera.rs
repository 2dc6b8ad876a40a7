use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

use crate::api::types::Rect;

/// Orthographic camera for 2D rendering.
/// Produces a projection matrix mapping world units to clip space.
pub struct Camera2D {
    /// Visible width in world units at zoom 1.
    pub width: f32,
    /// Visible height in world units at zoom 1.
    pub height: f32,
    /// Camera center position in world space.
    pub center: Vec2,
    /// Zoom factor; larger means closer (smaller visible area).
    pub zoom: f32,
    /// Optional world bounds the viewport may not leave.
    pub bounds: Option<Rect>,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub projection: [[f32; 4]; 4],
}

impl Camera2D {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            center: Vec2::ZERO,
            zoom: 1.0,
            bounds: None,
        }
    }

    /// Visible extent in world units at the current zoom.
    pub fn view_size(&self) -> Vec2 {
        Vec2::new(self.width / self.zoom, self.height / self.zoom)
    }

    /// Build an orthographic projection matrix.
    /// Origin at center, Y-up, Z in [0, 1].
    pub fn projection_matrix(&self) -> Mat4 {
        let half = self.view_size() / 2.0;
        Mat4::orthographic_rh(
            self.center.x - half.x,
            self.center.x + half.x,
            self.center.y - half.y,
            self.center.y + half.y,
            0.0,
            1.0,
        )
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            projection: self.projection_matrix().to_cols_array_2d(),
        }
    }

    /// Resize the camera viewport (e.g. on window resize).
    /// Maintains aspect ratio by fitting the game area.
    pub fn resize(
        &mut self,
        viewport_width: f32,
        viewport_height: f32,
        game_width: f32,
        game_height: f32,
    ) {
        let horiz_ratio = viewport_width / game_width;
        let vert_ratio = viewport_height / game_height;
        let scale = horiz_ratio.min(vert_ratio);
        self.width = viewport_width / scale;
        self.height = viewport_height / scale;
    }

    /// Keep the viewport inside `bounds` from now on.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
    }

    pub fn clear_bounds(&mut self) {
        self.bounds = None;
    }

    /// Snap the camera center to a position, respecting bounds.
    pub fn look_at(&mut self, target: Vec2) {
        self.center = target;
        self.clamp_to_bounds();
    }

    /// Clamp camera center so the viewport stays inside the bounds.
    /// A viewport larger than the bounds centers on them instead.
    fn clamp_to_bounds(&mut self) {
        let Some(bounds) = self.bounds else {
            return;
        };
        let half = self.view_size() / 2.0;

        if self.view_size().x >= bounds.w {
            self.center.x = bounds.center().x;
        } else {
            self.center.x = self.center.x.clamp(bounds.x + half.x, bounds.right() - half.x);
        }
        if self.view_size().y >= bounds.h {
            self.center.y = bounds.center().y;
        } else {
            self.center.y = self.center.y.clamp(bounds.y + half.y, bounds.top() - half.y);
        }
    }

    /// Current viewport as a world-space rectangle.
    pub fn view_rect(&self) -> Rect {
        Rect::from_center(self.center, self.view_size() / 2.0)
    }

    /// Check if a world-space rectangle overlaps the viewport.
    pub fn is_rect_visible(&self, rect: &Rect) -> bool {
        self.view_rect().overlaps(rect)
    }
}

/// Dead-zone follow tuning: the camera only pans when the focus leaves
/// a margin box around the center, and eases there instead of snapping.
#[derive(Debug, Clone, Copy)]
pub struct FollowConstraints {
    /// Horizontal slack on either side of the center.
    pub margin_horiz: f32,
    /// Vertical slack while the focus is grounded.
    pub margin_vert: f32,
    /// Vertical slack while airborne; much larger, so jumps and falls
    /// don't drag the view around.
    pub margin_vert_airborne: f32,
    /// Per-tick pan interpolation factor.
    pub pan_lerp: f32,
    /// Per-tick zoom interpolation factor.
    pub zoom_lerp: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
}

impl Default for FollowConstraints {
    fn default() -> Self {
        Self {
            margin_horiz: 40.0,
            margin_vert: 20.0,
            margin_vert_airborne: 150.0,
            pan_lerp: 0.2,
            zoom_lerp: 0.02,
            zoom_min: 0.1,
            zoom_max: 2.0,
        }
    }
}

impl FollowConstraints {
    /// Pan the camera one tick toward keeping `focus` inside the margin
    /// box, and ease zoom toward `target_zoom`. Bounds clamping applies
    /// after the pan.
    pub fn track(&self, camera: &mut Camera2D, focus: Vec2, grounded: bool, target_zoom: f32) {
        let margin_vert = if grounded {
            self.margin_vert
        } else {
            self.margin_vert_airborne
        };

        let mut desired = camera.center;
        let dx = focus.x - camera.center.x;
        if dx > self.margin_horiz {
            desired.x = focus.x - self.margin_horiz;
        } else if dx < -self.margin_horiz {
            desired.x = focus.x + self.margin_horiz;
        }
        let dy = focus.y - camera.center.y;
        if dy > margin_vert {
            desired.y = focus.y - margin_vert;
        } else if dy < -margin_vert {
            desired.y = focus.y + margin_vert;
        }

        camera.center += (desired - camera.center) * self.pan_lerp;

        let target_zoom = target_zoom.clamp(self.zoom_min, self.zoom_max);
        camera.zoom += (target_zoom - camera.zoom) * self.zoom_lerp;

        camera.clamp_to_bounds();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_matrix_is_orthographic() {
        let cam = Camera2D::new(800.0, 600.0);
        let cols = cam.projection_matrix().to_cols_array_2d();
        assert!((cols[3][3] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn resize_maintains_aspect() {
        let mut cam = Camera2D::new(800.0, 600.0);
        cam.resize(1920.0, 1080.0, 800.0, 600.0);
        let ratio = cam.width / cam.height;
        assert!((ratio - 1920.0 / 1080.0).abs() < 0.01);
    }

    #[test]
    fn zoom_shrinks_the_view() {
        let mut cam = Camera2D::new(800.0, 600.0);
        cam.zoom = 2.0;
        assert_eq!(cam.view_size(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn bounds_clamp_the_viewport() {
        let mut cam = Camera2D::new(100.0, 100.0);
        cam.set_bounds(Rect::new(0.0, 0.0, 500.0, 400.0));

        cam.look_at(Vec2::new(0.0, 0.0));
        assert_eq!(cam.center, Vec2::new(50.0, 50.0));

        cam.look_at(Vec2::new(1000.0, 1000.0));
        assert_eq!(cam.center, Vec2::new(450.0, 350.0));
    }

    #[test]
    fn small_bounds_center_the_camera() {
        let mut cam = Camera2D::new(100.0, 100.0);
        cam.set_bounds(Rect::new(0.0, 0.0, 60.0, 400.0));
        cam.look_at(Vec2::new(0.0, 200.0));
        assert_eq!(cam.center.x, 30.0);
    }

    #[test]
    fn focus_inside_margins_does_not_pan() {
        let mut cam = Camera2D::new(400.0, 300.0);
        cam.center = Vec2::new(100.0, 100.0);
        let follow = FollowConstraints::default();
        follow.track(&mut cam, Vec2::new(130.0, 110.0), true, 1.0);
        assert_eq!(cam.center, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn focus_outside_margin_eases_toward_it() {
        let mut cam = Camera2D::new(400.0, 300.0);
        cam.center = Vec2::new(100.0, 100.0);
        let follow = FollowConstraints::default();
        follow.track(&mut cam, Vec2::new(300.0, 100.0), true, 1.0);

        // One tick moves pan_lerp of the way toward (focus - margin).
        let desired = 300.0 - 40.0;
        let expected = 100.0 + (desired - 100.0) * 0.2;
        assert!((cam.center.x - expected).abs() < 1e-4);
        assert_eq!(cam.center.y, 100.0);
    }

    #[test]
    fn airborne_vertical_margin_is_wider() {
        let follow = FollowConstraints::default();

        let mut grounded_cam = Camera2D::new(400.0, 300.0);
        grounded_cam.center = Vec2::new(0.0, 0.0);
        follow.track(&mut grounded_cam, Vec2::new(0.0, 100.0), true, 1.0);
        assert!(grounded_cam.center.y > 0.0);

        let mut airborne_cam = Camera2D::new(400.0, 300.0);
        airborne_cam.center = Vec2::new(0.0, 0.0);
        follow.track(&mut airborne_cam, Vec2::new(0.0, 100.0), false, 1.0);
        assert_eq!(airborne_cam.center.y, 0.0);
    }

    #[test]
    fn zoom_eases_and_clamps() {
        let mut cam = Camera2D::new(400.0, 300.0);
        let follow = FollowConstraints::default();

        follow.track(&mut cam, Vec2::ZERO, true, 10.0);
        // Target clamped to zoom_max before easing.
        let expected = 1.0 + (2.0 - 1.0) * 0.02;
        assert!((cam.zoom - expected).abs() < 1e-5);

        for _ in 0..10_000 {
            follow.track(&mut cam, Vec2::ZERO, true, 0.0);
        }
        assert!(cam.zoom >= 0.1 - 1e-4);
    }

    #[test]
    fn view_rect_visibility() {
        let mut cam = Camera2D::new(100.0, 100.0);
        cam.center = Vec2::new(50.0, 50.0);
        assert!(cam.is_rect_visible(&Rect::new(40.0, 40.0, 20.0, 20.0)));
        assert!(cam.is_rect_visible(&Rect::new(-10.0, 40.0, 20.0, 20.0)));
        assert!(!cam.is_rect_visible(&Rect::new(-50.0, 40.0, 20.0, 20.0)));
    }
}
