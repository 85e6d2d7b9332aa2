//! Ball palette, point values and the live ball record.

use std::fmt;
use std::str::FromStr;

use baize_engine::{EntityId, PhysicsBody, VectorColor};

/// Snooker palette. White is the cue ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BallColor {
    Red,
    Yellow,
    Green,
    Brown,
    Blue,
    Pink,
    Black,
    White,
}

impl BallColor {
    /// The seven colours in ascending value order, reds first.
    pub const SCORING: [BallColor; 7] = [
        BallColor::Red,
        BallColor::Yellow,
        BallColor::Green,
        BallColor::Brown,
        BallColor::Blue,
        BallColor::Pink,
        BallColor::Black,
    ];

    pub fn value(self) -> u32 {
        match self {
            BallColor::Red => 1,
            BallColor::Yellow => 2,
            BallColor::Green => 3,
            BallColor::Brown => 4,
            BallColor::Blue => 5,
            BallColor::Pink => 6,
            BallColor::Black => 7,
            BallColor::White => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BallColor::Red => "red",
            BallColor::Yellow => "yellow",
            BallColor::Green => "green",
            BallColor::Brown => "brown",
            BallColor::Blue => "blue",
            BallColor::Pink => "pink",
            BallColor::Black => "black",
            BallColor::White => "white",
        }
    }

    pub fn color(self) -> VectorColor {
        match self {
            BallColor::Red => VectorColor::rgb8(200, 16, 30),
            BallColor::Yellow => VectorColor::rgb8(250, 210, 20),
            BallColor::Green => VectorColor::rgb8(0, 130, 60),
            BallColor::Brown => VectorColor::rgb8(120, 70, 30),
            BallColor::Blue => VectorColor::rgb8(20, 60, 200),
            BallColor::Pink => VectorColor::rgb8(245, 130, 170),
            BallColor::Black => VectorColor::rgb8(15, 15, 15),
            BallColor::White => VectorColor::rgb8(245, 245, 235),
        }
    }

    /// Points for a colour given by name. Names outside the palette score 1.
    pub fn points_for_name(name: &str) -> u32 {
        name.parse::<BallColor>().map(BallColor::value).unwrap_or(1)
    }
}

impl fmt::Display for BallColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColor(pub String);

impl FromStr for BallColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        [
            BallColor::Red,
            BallColor::Yellow,
            BallColor::Green,
            BallColor::Brown,
            BallColor::Blue,
            BallColor::Pink,
            BallColor::Black,
            BallColor::White,
        ]
        .into_iter()
        .find(|c| c.name() == lower)
        .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

/// A ball currently on the table. Colour and cue flag are fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub id: EntityId,
    pub body: PhysicsBody,
    pub color: BallColor,
    pub is_cue: bool,
}

impl Ball {
    pub fn object(id: EntityId, body: PhysicsBody, color: BallColor) -> Self {
        Self { id, body, color, is_cue: false }
    }

    pub fn cue(id: EntityId, body: PhysicsBody) -> Self {
        Self { id, body, color: BallColor::White, is_cue: true }
    }

    pub fn value(&self) -> u32 {
        self.color.value()
    }
}
