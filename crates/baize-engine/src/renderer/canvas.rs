//! Render boundary.
//!
//! Games describe each frame as a handful of primitive draw calls against a
//! [`Canvas`]. The browser build hands them to [`VectorState`], which
//! tessellates into a vertex buffer; tests can record them instead.
//!
//! [`VectorState`]: crate::systems::vector::VectorState

use glam::Vec2;

/// RGBA color for drawing operations (components 0.0 - 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color from RGB components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Fully opaque color from RGB u8 values (0-255).
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Blend toward white by `t` (0.0 keeps the color, 1.0 is white).
    pub fn lighten(self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (1.0 - self.r) * t,
            g: self.g + (1.0 - self.g) * t,
            b: self.b + (1.0 - self.b) * t,
            a: self.a,
        }
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

impl Default for VectorColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Drawing primitives a game may use during its render pass.
/// Coordinates are world units; `pos` of a rectangle is its top-left corner.
pub trait Canvas {
    fn fill_rect(&mut self, pos: Vec2, width: f32, height: f32, color: VectorColor);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: VectorColor);

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: VectorColor);

    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: VectorColor);
}
