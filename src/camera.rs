use glam::Vec2;

use crate::geometry::Rect;

/// Camera uniform uploaded to the GPU. Holds the combined view-projection matrix.
///
/// Layout (column-major, matching WGSL `mat4x4<f32>`):
/// ```text
/// col0: [sx,  0,   0,  0]
/// col1: [0,   sy,  0,  0]
/// col2: [0,   0,   1,  0]
/// col3: [tx,  ty,  0,  1]
/// ```
/// where `sx = 2z/w`, `sy = 2z/h`, `tx = -sx*cx`, `ty = -sy*cy`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// Column-major 4×4 view-projection matrix sent to the vertex shader.
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Apply the matrix to a world-space point and return its NDC (x, y).
    pub fn project(&self, point: Vec2) -> Vec2 {
        let m = &self.view_proj;
        Vec2::new(
            m[0][0] * point.x + m[1][0] * point.y + m[3][0],
            m[0][1] * point.x + m[1][1] * point.y + m[3][1],
        )
    }
}

/// 2D orthographic camera over y-up world space.
///
/// The viewport is measured in world units and is stretched to fill the
/// window, whatever its aspect ratio.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// World-space point the camera is centred on.
    pub position: Vec2,
    /// Visible width in world units at zoom 1.
    pub viewport_width: f32,
    /// Visible height in world units at zoom 1.
    pub viewport_height: f32,
    /// Zoom level (1.0 = viewport as configured, >1 zooms in).
    pub zoom: f32,
}

impl Camera {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        let mut camera = Self {
            position: Vec2::ZERO,
            viewport_width: 1.0,
            viewport_height: 1.0,
            zoom: 1.0,
        };
        camera.set_to_ortho(viewport_width, viewport_height);
        camera
    }

    /// Set the viewport size and centre the camera on `(w/2, h/2)`, so the
    /// visible area starts at the world origin.
    pub fn set_to_ortho(&mut self, viewport_width: f32, viewport_height: f32) {
        self.viewport_width = viewport_width.max(f32::EPSILON);
        self.viewport_height = viewport_height.max(f32::EPSILON);
        self.position = Vec2::new(self.viewport_width * 0.5, self.viewport_height * 0.5);
    }

    pub fn center_on(&mut self, point: Vec2) {
        self.position = point;
    }

    /// World rectangle currently in view.
    pub fn visible_rect(&self) -> Rect {
        let z = self.zoom.max(0.01);
        let w = self.viewport_width / z;
        let h = self.viewport_height / z;
        Rect::new(self.position.x - w * 0.5, self.position.y - h * 0.5, w, h)
    }

    /// Build the GPU-ready `CameraUniform`.
    ///
    /// Maps the visible rectangle onto NDC [-1, 1] on both axes with
    /// `self.position` at the centre of the screen and +y pointing up.
    pub fn build_view_proj(&self) -> CameraUniform {
        let z = self.zoom.max(0.01);
        let sx = 2.0 * z / self.viewport_width;
        let sy = 2.0 * z / self.viewport_height;
        let tx = -sx * self.position.x;
        let ty = -sy * self.position.y;

        CameraUniform {
            view_proj: [
                [sx,  0.0, 0.0, 0.0], // col0
                [0.0, sy,  0.0, 0.0], // col1
                [0.0, 0.0, 1.0, 0.0], // col2
                [tx,  ty,  0.0, 1.0], // col3
            ],
        }
    }
}
