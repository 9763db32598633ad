// ── Sprite batching ──────────────────────────────────────────────────────────
//
// Screens describe a frame as a list of textured quads in world space. The
// batch groups consecutive quads that share a texture into one draw call, so
// a frame of map tiles followed by the player costs two draws. Draw order is
// submission order.

use crate::engine::Color;
use crate::geometry::Rect;
use crate::renderer::pipeline::QuadVertex;

/// Handle to a texture uploaded through a `TextureUploader`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

impl TextureId {
    /// 1×1 opaque white texture; tinted quads use it as solid fills.
    pub const WHITE: Self = Self(0);
}

/// Full-texture UV rectangle.
pub const FULL_UV: ([f32; 2], [f32; 2]) = ([0.0, 0.0], [1.0, 1.0]);

/// Consecutive quads drawn with the same texture.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub texture: TextureId,
    pub vertices: Vec<QuadVertex>,
}

#[derive(Clone, Debug, Default)]
pub struct SpriteBatch {
    calls: Vec<DrawCall>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Total number of quads queued this frame.
    pub fn quad_count(&self) -> usize {
        self.calls.iter().map(|c| c.vertices.len() / 6).sum()
    }

    /// Queue `texture` stretched over `rect`.
    ///
    /// `uv_min` is the top-left of the source region (v = 0 is the top row of
    /// the image); world space is y-up, so it lands on the rectangle's top
    /// edge.
    pub fn draw(&mut self, texture: TextureId, rect: Rect, uv: ([f32; 2], [f32; 2]), tint: Color) {
        let (uv_min, uv_max) = uv;
        let c = tint.0;
        let (x0, y0, x1, y1) = (rect.x, rect.y, rect.right(), rect.top());

        let tl = QuadVertex { position: [x0, y1], uv: uv_min,                 color: c };
        let tr = QuadVertex { position: [x1, y1], uv: [uv_max[0], uv_min[1]], color: c };
        let bl = QuadVertex { position: [x0, y0], uv: [uv_min[0], uv_max[1]], color: c };
        let br = QuadVertex { position: [x1, y0], uv: uv_max,                 color: c };
        let quad = [tl, bl, tr, tr, bl, br];

        match self.calls.last_mut() {
            Some(call) if call.texture == texture => call.vertices.extend_from_slice(&quad),
            _ => self.calls.push(DrawCall { texture, vertices: quad.to_vec() }),
        }
    }

    /// Queue a solid-colour rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.draw(TextureId::WHITE, rect, FULL_UV, color);
    }
}
