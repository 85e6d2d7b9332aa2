//! Snooker table game: wires the simulation into the engine loop.

use baize_engine::{
    EngineContext, Game, GameConfig, GameEvent, InputEvent, InputQueue, RenderContext,
};
use glam::Vec2;

use crate::config::SimConfig;
use crate::cue::CueState;
use crate::presets::Preset;
use crate::render::{self, Snapshot};
use crate::sim::Simulation;

/// Space around the table for the cue stick.
const TABLE_MARGIN: f32 = 80.0;

// Custom event kinds sent by the host page.
const CUSTOM_RESTART: u32 = 1;
const CUSTOM_PRESET: u32 = 2;

// Game event kinds forwarded to the host page.
pub const EVENT_SCORE: f32 = 1.0;
pub const EVENT_CUE_STATE: f32 = 2.0;
pub const EVENT_BALLS: f32 = 3.0;

pub struct SnookerGame {
    sim: Simulation,
    snapshot: Snapshot,
}

impl SnookerGame {
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    pub fn with_config(config: SimConfig) -> Self {
        Self {
            sim: Simulation::new(config),
            snapshot: Snapshot::default(),
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    fn world_size(&self) -> Vec2 {
        let table = self.sim.table();
        Vec2::new(table.width, table.height) + Vec2::splat(2.0 * TABLE_MARGIN)
    }

    /// World position of the table centre.
    fn origin(&self) -> Vec2 {
        self.world_size() / 2.0
    }

    fn to_table(&self, world: Vec2) -> Vec2 {
        world - self.origin()
    }

    fn handle_input(&mut self, ctx: &mut EngineContext, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown { x, y } => {
                let at = self.to_table(Vec2::new(x, y));
                self.sim.pointer_down(ctx, at);
            }
            InputEvent::PointerMove { x, y } => {
                let at = self.to_table(Vec2::new(x, y));
                self.sim.pointer_move(&ctx.physics, at);
            }
            InputEvent::PointerUp { x, y } => {
                let at = self.to_table(Vec2::new(x, y));
                self.sim.pointer_up(&mut ctx.physics, at);
            }
            InputEvent::KeyDown { key_code } => match Preset::from_key(key_code) {
                Some(preset) => self.sim.load_preset(ctx, preset),
                None => log::debug!("unmapped key {}", key_code),
            },
            InputEvent::Custom { kind: CUSTOM_RESTART, .. } => self.sim.restart(ctx),
            InputEvent::Custom { kind: CUSTOM_PRESET, a, .. } => {
                let index = (a.is_finite() && a >= 0.0).then(|| a as usize);
                match index.and_then(Preset::from_index) {
                    Some(preset) => self.sim.load_preset(ctx, preset),
                    None => log::debug!("unknown preset index {}", a),
                }
            }
            InputEvent::Custom { kind, .. } => log::debug!("unhandled custom event {}", kind),
            InputEvent::KeyUp { .. } => {}
        }
    }

    fn emit_state(&self, ctx: &mut EngineContext) {
        ctx.emit_event(GameEvent::scalar(EVENT_SCORE, self.sim.score() as f32));
        ctx.emit_event(GameEvent::scalar(EVENT_CUE_STATE, self.sim.cue_state().code()));
        ctx.emit_event(GameEvent::scalar(EVENT_BALLS, self.sim.balls().object_count() as f32));
    }
}

impl Default for SnookerGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for SnookerGame {
    fn config(&self) -> GameConfig {
        let size = self.world_size();
        let config = self.sim.config();
        GameConfig {
            fixed_dt: config.solver.tick_seconds,
            world_width: size.x,
            world_height: size.y,
            max_vector_vertices: 65536,
            gravity: Vec2::ZERO,
            solver: config.solver.settings(),
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.sim.setup(&mut ctx.physics);
        self.sim.load_preset(ctx, Preset::Triangle);
        self.snapshot = Snapshot::capture(&self.sim, &ctx.physics);
        log::info!(
            "table {}x{}, ball diameter {}",
            self.sim.table().width,
            self.sim.table().height,
            self.sim.table().ball_diameter
        );
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            self.handle_input(ctx, event);
        }

        self.sim.tick(&mut ctx.physics);
        self.snapshot = Snapshot::capture(&self.sim, &ctx.physics);
        self.emit_state(ctx);
    }

    fn render(&self, ctx: &mut RenderContext) {
        render::draw(ctx.canvas, &self.sim, &self.snapshot, self.origin());
    }

    fn hud_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Score: {}", self.sim.score()),
            format!("Preset: {}", self.sim.preset().name()),
        ];
        if self.sim.cue_state() == CueState::AwaitingPlacement {
            lines.push("Click inside the D to place the cue ball".to_string());
        }
        lines
    }

    fn load_settings(&mut self, ctx: &mut EngineContext, json: &str) {
        match SimConfig::from_json(json) {
            Ok(config) => {
                if config.table_width != self.sim.table().width {
                    log::warn!("table_width changes need a page reload to resize the view");
                }
                self.sim.reconfigure(ctx, config);
                self.snapshot = Snapshot::capture(&self.sim, &ctx.physics);
                log::info!("settings applied");
            }
            Err(err @ crate::config::ConfigError::Invalid(_)) => log::warn!("{}", err),
            Err(err) => log::error!("{}", err),
        }
    }

    fn reseed(&mut self, seed: u64) {
        self.sim.reseed(seed);
    }
}
