//! Named starting arrangements.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::ball::BallColor;
use crate::table::TableGeometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Full snooker setup: 15 reds in a triangle plus the six colours on their spots.
    Triangle,
    /// Three jittered plus-shaped clusters in the far half.
    Clusters,
    /// One ball of each colour along the centre line.
    Line,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Triangle, Preset::Clusters, Preset::Line];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Triangle => "Triangle",
            Preset::Clusters => "Clusters",
            Preset::Line => "Line",
        }
    }

    /// Digit keys '1'..'3'.
    pub fn from_key(key_code: u32) -> Option<Preset> {
        match key_code {
            49 => Some(Preset::Triangle),
            50 => Some(Preset::Clusters),
            51 => Some(Preset::Line),
            _ => None,
        }
    }

    pub fn from_index(index: usize) -> Option<Preset> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            Preset::Triangle => 0,
            Preset::Clusters => 1,
            Preset::Line => 2,
        }
    }

    /// Ball positions and colours for this preset. Only `Clusters` draws from `rng`.
    pub fn layout(self, table: &TableGeometry, rng: &mut impl Rng) -> Vec<(Vec2, BallColor)> {
        match self {
            Preset::Triangle => triangle(table),
            Preset::Clusters => clusters(table, rng),
            Preset::Line => line(table),
        }
    }
}

fn triangle(table: &TableGeometry) -> Vec<(Vec2, BallColor)> {
    let d = table.ball_diameter;
    let gap = d + 1.0;
    let row_offset = gap * 0.866; // sqrt(3)/2

    let pink = Vec2::new(table.width / 4.0, 0.0);
    let apex = pink + Vec2::new(gap, 0.0);

    let mut balls = Vec::with_capacity(21);
    // Apex faces baulk; rows grow toward the black.
    for row in 0..5 {
        for i in 0..=row {
            let y = (i as f32 - row as f32 / 2.0) * gap;
            balls.push((apex + Vec2::new(row as f32 * row_offset, y), BallColor::Red));
        }
    }

    balls.extend([
        (Vec2::new(table.baulk_x, -table.d_radius), BallColor::Yellow),
        (table.d_center(), BallColor::Brown),
        (Vec2::new(table.baulk_x, table.d_radius), BallColor::Green),
        (Vec2::ZERO, BallColor::Blue),
        (pink, BallColor::Pink),
        (Vec2::new(table.width / 2.0 - table.width / 20.0, 0.0), BallColor::Black),
    ]);
    balls
}

fn clusters(table: &TableGeometry, rng: &mut impl Rng) -> Vec<(Vec2, BallColor)> {
    let d = table.ball_diameter;
    let (w, h) = (table.width, table.height);
    // Arms sit far enough out that worst-case jitter still leaves no overlap.
    let arm = d * 1.6;
    let jitter = d / 4.0;

    let centers = [
        (Vec2::new(w * 0.12, -h * 0.22), BallColor::Blue),
        (Vec2::new(w * 0.25, h * 0.22), BallColor::Pink),
        (Vec2::new(w * 0.36, -h * 0.10), BallColor::Black),
    ];
    let offsets = [
        Vec2::ZERO,
        Vec2::new(arm, 0.0),
        Vec2::new(-arm, 0.0),
        Vec2::new(0.0, arm),
        Vec2::new(0.0, -arm),
    ];

    let mut balls = Vec::with_capacity(15);
    for (center, middle) in centers {
        for (i, offset) in offsets.iter().enumerate() {
            let shake = Vec2::from_angle(rng.gen_range(0.0..TAU)) * rng.gen_range(0.0..=jitter);
            let color = if i == 0 { middle } else { BallColor::Red };
            balls.push((center + *offset + shake, color));
        }
    }
    balls
}

fn line(table: &TableGeometry) -> Vec<(Vec2, BallColor)> {
    let spacing = table.ball_diameter * 2.0;
    BallColor::SCORING
        .iter()
        .enumerate()
        .map(|(i, &color)| (Vec2::new(i as f32 * spacing, 0.0), color))
        .collect()
}
