//! Short-lived visual records: motion trails and impact rings.

use baize_engine::VectorColor;
use glam::Vec2;

use crate::config::FadeConfig;

/// Fade counter value of a fresh record.
pub const FULL_INTENSITY: f32 = 255.0;

/// A record that weakens each tick and expires once its fade reaches zero.
pub trait Fade {
    /// Advance one tick. Returns false when the record has expired.
    fn decay(&mut self, fade: &FadeConfig) -> bool;

    /// Remaining intensity, 0..=255.
    fn intensity(&self) -> f32;

    /// Intensity mapped to an alpha value.
    fn alpha(&self) -> f32 {
        (self.intensity() / FULL_INTENSITY).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSample {
    pub pos: Vec2,
    pub color: VectorColor,
    pub fade: f32,
}

impl TrailSample {
    pub fn new(pos: Vec2, color: VectorColor) -> Self {
        Self { pos, color, fade: FULL_INTENSITY }
    }
}

impl Fade for TrailSample {
    fn decay(&mut self, fade: &FadeConfig) -> bool {
        self.fade -= fade.trail_fade;
        self.fade > 0.0
    }

    fn intensity(&self) -> f32 {
        self.fade
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactEffect {
    pub pos: Vec2,
    pub radius: f32,
    pub fade: f32,
}

impl ImpactEffect {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self { pos, radius, fade: FULL_INTENSITY }
    }
}

impl Fade for ImpactEffect {
    fn decay(&mut self, fade: &FadeConfig) -> bool {
        self.radius += fade.impact_grow;
        self.fade -= fade.impact_fade;
        self.fade > 0.0
    }

    fn intensity(&self) -> f32 {
        self.fade
    }
}

/// Ordered list of fading records, oldest first.
#[derive(Debug, Clone)]
pub struct FadeBuffer<T> {
    items: Vec<T>,
}

impl<T: Fade> FadeBuffer<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Decay every record and drop the expired ones.
    pub fn decay(&mut self, fade: &FadeConfig) {
        self.items.retain_mut(|item| item.decay(fade));
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Fade> Default for FadeBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}
