//! Aim-and-shoot state machine for the cue ball.
//!
//! Pure bookkeeping: callers resolve the cue ball position and apply the
//! returned force to the physics world.

use baize_engine::EntityId;
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueState {
    /// No cue ball on the table; the next press inside the D places one.
    AwaitingPlacement,
    PlacedIdle,
    Aiming,
}

impl CueState {
    /// Numeric code used in game events.
    pub fn code(self) -> f32 {
        match self {
            CueState::AwaitingPlacement => 0.0,
            CueState::PlacedIdle => 1.0,
            CueState::Aiming => 2.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CueControl {
    state: CueState,
    cue_id: Option<EntityId>,
    angle: Option<f32>,
    pointer: Vec2,
    held: bool,
    /// Set by placement so the release ending that press does not shoot.
    swallow_release: bool,
}

impl CueControl {
    pub fn new() -> Self {
        Self {
            state: CueState::AwaitingPlacement,
            cue_id: None,
            angle: None,
            pointer: Vec2::ZERO,
            held: false,
            swallow_release: false,
        }
    }

    pub fn state(&self) -> CueState {
        self.state
    }

    pub fn cue_id(&self) -> Option<EntityId> {
        self.cue_id
    }

    /// Aim angle in radians, pointing from the ball toward the pointer.
    pub fn angle(&self) -> Option<f32> {
        self.angle
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn awaiting_placement(&self) -> bool {
        self.state == CueState::AwaitingPlacement
    }

    /// A cue ball was created at `at` by the current press.
    pub fn placed(&mut self, id: EntityId, at: Vec2) {
        self.state = CueState::PlacedIdle;
        self.cue_id = Some(id);
        self.pointer = at;
        self.held = true;
        self.swallow_release = true;
        self.angle = None;
    }

    /// Pointer pressed while no placement happened.
    pub fn press(&mut self, at: Vec2) {
        self.pointer = at;
        self.held = true;
    }

    /// Pointer moved. Enters `Aiming` once a ball is placed.
    pub fn aim(&mut self, at: Vec2, ball: Option<Vec2>) {
        self.pointer = at;
        if self.state == CueState::PlacedIdle {
            self.state = CueState::Aiming;
        }
        self.reaim(ball);
    }

    /// Recompute the angle from the stored pointer for a ball that may have moved.
    pub fn reaim(&mut self, ball: Option<Vec2>) {
        self.angle = match (self.state, ball) {
            (CueState::AwaitingPlacement, _) | (_, None) => None,
            (_, Some(pos)) => {
                let d = self.pointer - pos;
                Some(d.y.atan2(d.x))
            }
        };
    }

    /// Pointer released. Returns the shot force when a shot is taken.
    pub fn release(&mut self, at: Vec2, ball: Option<Vec2>, strength: f32) -> Option<Vec2> {
        self.pointer = at;
        self.held = false;
        if std::mem::take(&mut self.swallow_release) {
            return None;
        }
        if self.state == CueState::AwaitingPlacement {
            return None;
        }
        let pos = ball?;
        self.state = CueState::PlacedIdle;
        Some((pos - at) * strength)
    }

    /// The cue ball left play.
    pub fn cue_lost(&mut self) {
        self.state = CueState::AwaitingPlacement;
        self.cue_id = None;
        self.angle = None;
        self.swallow_release = false;
    }

    /// Back to the initial state, keeping the last pointer position.
    pub fn reset(&mut self) {
        let pointer = self.pointer;
        *self = Self::new();
        self.pointer = pointer;
    }
}

impl Default for CueControl {
    fn default() -> Self {
        Self::new()
    }
}
