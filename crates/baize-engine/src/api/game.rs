use crate::api::types::{EntityId, GameEvent};
use crate::input::queue::InputQueue;
use crate::renderer::canvas::Canvas;
#[cfg(feature = "physics")]
use crate::core::physics::{PhysicsWorld, SolverSettings};
#[cfg(feature = "physics")]
use glam::Vec2;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Most ticks a single frame may run (default: 10).
    pub max_steps_per_frame: u32,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Maximum number of vector vertices per frame (default: 16384).
    pub max_vector_vertices: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Gravity vector for physics simulation. Default: zero (top-down tables).
    #[cfg(feature = "physics")]
    pub gravity: Vec2,
    /// Solver iterations and substeps per tick.
    #[cfg(feature = "physics")]
    pub solver: SolverSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_steps_per_frame: 10,
            world_width: 800.0,
            world_height: 600.0,
            max_vector_vertices: 16384,
            max_events: 32,
            #[cfg(feature = "physics")]
            gravity: Vec2::ZERO,
            #[cfg(feature = "physics")]
            solver: SolverSettings::default(),
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state and static geometry.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One simulation tick. `input` holds the events delivered since the last tick.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Read-only draw pass, once per frame after all ticks.
    fn render(&self, _ctx: &mut RenderContext) {}

    /// Heads-up text lines for the host page.
    fn hud_lines(&self) -> Vec<String> {
        Vec::new()
    }

    /// Apply settings handed over by the host page (JSON).
    fn load_settings(&mut self, _ctx: &mut EngineContext, _json: &str) {}

    /// Reseed any randomness the game uses.
    fn reseed(&mut self, _seed: u64) {}
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub events: Vec<GameEvent>,
    max_events: usize,
    next_id: u32,
    #[cfg(feature = "physics")]
    pub physics: PhysicsWorld,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::from_config(&GameConfig::default())
    }

    /// Create a context whose physics world follows the game's configuration.
    pub fn from_config(config: &GameConfig) -> Self {
        #[cfg(feature = "physics")]
        let physics = {
            let mut world = PhysicsWorld::new(config.gravity);
            world.apply_solver(config.solver);
            world.set_dt(config.fixed_dt);
            world
        };
        Self {
            events: Vec::with_capacity(config.max_events),
            max_events: config.max_events,
            next_id: 1,
            #[cfg(feature = "physics")]
            physics,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a game event to be forwarded to the host page.
    /// Events beyond the per-frame capacity are dropped.
    pub fn emit_event(&mut self, event: GameEvent) {
        if self.events.len() < self.max_events {
            self.events.push(event);
        } else {
            log::debug!("event buffer full, dropping kind {}", event.kind);
        }
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Render context for the per-frame draw pass.
pub struct RenderContext<'a> {
    pub canvas: &'a mut dyn Canvas,
}
