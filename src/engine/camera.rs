// Camera and viewport projection for a 2D world

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

/// Corners of the viewport that can be projected into world space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportCorner {
    BottomLeft,
    TopRight,
}

/// Projects viewport corners into world space.
///
/// Implementations are queried every fixed tick, so a moving or zooming
/// camera is picked up without any caching on the caller's side.
pub trait ViewportProjector {
    fn world_point_for_viewport_corner(&self, corner: ViewportCorner) -> Vec2;
}

/// 2D orthographic camera
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec2,
    /// Camera zoom level (1.0 = normal, 2.0 = zoomed in 2x)
    pub zoom: f32,
    /// Viewport width in pixels
    viewport_width: f32,
    /// Viewport height in pixels
    viewport_height: f32,
    /// World units per pixel at zoom 1.0
    units_per_pixel: f32,
}

impl Camera {
    /// Create a new camera showing one world unit per pixel
    pub fn new(position: Vec2, viewport_width: f32, viewport_height: f32) -> Self {
        Self::with_scale(position, viewport_width, viewport_height, 1.0)
    }

    /// Create a camera with an explicit world-units-per-pixel scale
    pub fn with_scale(
        position: Vec2,
        viewport_width: f32,
        viewport_height: f32,
        units_per_pixel: f32,
    ) -> Self {
        Self {
            position,
            zoom: 1.0,
            viewport_width,
            viewport_height,
            units_per_pixel,
        }
    }

    fn half_extents(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height) * 0.5 * self.units_per_pixel
            / self.zoom
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.max(0.1); // Prevent zoom from being too small
    }

    /// Resize the viewport (in pixels)
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Convert screen coordinates (pixels, y down) to world coordinates
    pub fn screen_to_world(&self, screen_pos: Vec2) -> Vec2 {
        let normalized_x = (screen_pos.x / self.viewport_width) * 2.0 - 1.0;
        let normalized_y = 1.0 - (screen_pos.y / self.viewport_height) * 2.0;
        let half = self.half_extents();

        Vec2::new(
            self.position.x + normalized_x * half.x,
            self.position.y + normalized_y * half.y,
        )
    }

    /// Get the viewport bounds in world coordinates
    pub fn viewport_bounds(&self) -> Viewport {
        let half = self.half_extents();
        Viewport {
            min: self.position - half,
            max: self.position + half,
        }
    }
}

impl ViewportProjector for Camera {
    fn world_point_for_viewport_corner(&self, corner: ViewportCorner) -> Vec2 {
        match corner {
            ViewportCorner::BottomLeft => self.screen_to_world(Vec2::new(0.0, self.viewport_height)),
            ViewportCorner::TopRight => self.screen_to_world(Vec2::new(self.viewport_width, 0.0)),
        }
    }
}

/// A camera shared with the code that moves or resizes it
impl<T: ViewportProjector> ViewportProjector for Rc<RefCell<T>> {
    fn world_point_for_viewport_corner(&self, corner: ViewportCorner) -> Vec2 {
        self.borrow().world_point_for_viewport_corner(corner)
    }
}

/// Viewport bounds in world coordinates
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub min: Vec2,
    pub max: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_corners_match_bounds() {
        let camera = Camera::with_scale(Vec2::new(5.0, 3.0), 800.0, 600.0, 0.0125);
        let bounds = camera.viewport_bounds();

        let bottom_left = camera.world_point_for_viewport_corner(ViewportCorner::BottomLeft);
        let top_right = camera.world_point_for_viewport_corner(ViewportCorner::TopRight);

        assert_relative_eq!(bottom_left.x, bounds.min.x);
        assert_relative_eq!(bottom_left.y, bounds.min.y);
        assert_relative_eq!(top_right.x, bounds.max.x);
        assert_relative_eq!(top_right.y, bounds.max.y);
        assert_relative_eq!(bounds.max.x - bounds.min.x, 10.0);
    }

    #[test]
    fn test_zoom_shrinks_visible_area() {
        let mut camera = Camera::new(Vec2::ZERO, 100.0, 100.0);
        camera.set_zoom(2.0);
        let top_right = camera.world_point_for_viewport_corner(ViewportCorner::TopRight);
        assert_relative_eq!(top_right.x, 25.0);
    }

    #[test]
    fn test_moving_camera_moves_corners() {
        let mut camera = Camera::new(Vec2::ZERO, 100.0, 100.0);
        camera.set_position(Vec2::new(10.0, 0.0));
        let bottom_left = camera.world_point_for_viewport_corner(ViewportCorner::BottomLeft);
        assert_relative_eq!(bottom_left.x, -40.0);
    }

    #[test]
    fn test_shared_camera_sees_updates() {
        let camera = Rc::new(RefCell::new(Camera::new(Vec2::ZERO, 100.0, 100.0)));
        let projector: Box<dyn ViewportProjector> = Box::new(camera.clone());

        camera.borrow_mut().resize(200.0, 100.0);
        let top_right = projector.world_point_for_viewport_corner(ViewportCorner::TopRight);
        assert_relative_eq!(top_right.x, 100.0);
    }

    #[test]
    fn test_screen_centre_is_camera_position() {
        let camera = Camera::new(Vec2::new(3.0, -2.0), 640.0, 480.0);
        let centre = camera.screen_to_world(Vec2::new(320.0, 240.0));
        assert_relative_eq!(centre.x, 3.0);
        assert_relative_eq!(centre.y, -2.0);
    }
}
