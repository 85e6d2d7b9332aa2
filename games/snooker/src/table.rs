//! Table dimensions and the terminal predicates evaluated every tick.
//!
//! Everything derives from the playable width. Coordinates are table-centred:
//! the origin is the centre spot, +x points away from baulk.

use glam::Vec2;

/// Why a ball left play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Pocketed,
    OutOfBounds,
}

/// A static cushion: centre and full size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cushion {
    pub center: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableGeometry {
    pub width: f32,
    pub height: f32,
    pub ball_diameter: f32,
    pub pocket_diameter: f32,
    pub cushion_thickness: f32,
    pub pockets: [Vec2; 6],
    pub cushions: [Cushion; 4],
    pub baulk_x: f32,
    pub d_radius: f32,
}

impl TableGeometry {
    pub fn new(width: f32) -> Self {
        let height = width / 2.0;
        let ball_diameter = width / 36.0;
        let pocket_diameter = ball_diameter * 1.5;
        let t = width / 45.0;
        let (hw, hh) = (width / 2.0, height / 2.0);

        let pockets = [
            Vec2::new(-hw, -hh),
            Vec2::new(0.0, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(-hw, hh),
            Vec2::new(0.0, hh),
            Vec2::new(hw, hh),
        ];

        // Inner faces sit on the table edges; the long rails cover the corners.
        let long = Vec2::new(width + 2.0 * t, t);
        let short = Vec2::new(t, height);
        let cushions = [
            Cushion { center: Vec2::new(0.0, -hh - t / 2.0), size: long },
            Cushion { center: Vec2::new(0.0, hh + t / 2.0), size: long },
            Cushion { center: Vec2::new(-hw - t / 2.0, 0.0), size: short },
            Cushion { center: Vec2::new(hw + t / 2.0, 0.0), size: short },
        ];

        Self {
            width,
            height,
            ball_diameter,
            pocket_diameter,
            cushion_thickness: t,
            pockets,
            cushions,
            baulk_x: -width / 4.0,
            d_radius: height / 3.0,
        }
    }

    pub fn ball_radius(&self) -> f32 {
        self.ball_diameter / 2.0
    }

    /// Centre of the D, on the baulk line.
    pub fn d_center(&self) -> Vec2 {
        Vec2::new(self.baulk_x, 0.0)
    }

    /// Capture radius around each pocket centre.
    pub fn pocket_capture_radius(&self) -> f32 {
        self.pocket_diameter / 1.8
    }

    pub fn in_pocket(&self, p: Vec2) -> bool {
        let r = self.pocket_capture_radius();
        self.pockets.iter().any(|c| c.distance(p) < r)
    }

    pub fn is_out_of_bounds(&self, p: Vec2, margin: f32) -> bool {
        p.x.abs() > self.width / 2.0 + margin || p.y.abs() > self.height / 2.0 + margin
    }

    /// Pocket wins when both hold.
    pub fn exit_for(&self, p: Vec2, margin: f32) -> Option<Exit> {
        if self.in_pocket(p) {
            Some(Exit::Pocketed)
        } else if self.is_out_of_bounds(p, margin) {
            Some(Exit::OutOfBounds)
        } else {
            None
        }
    }

    /// Baulk-side half disc; the boundary counts as inside.
    pub fn in_baulk_d(&self, p: Vec2) -> bool {
        p.x <= self.baulk_x && p.distance(self.d_center()) <= self.d_radius
    }
}
