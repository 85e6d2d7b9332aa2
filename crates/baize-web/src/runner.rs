use baize_engine::{
    Game, GameConfig, EngineContext, RenderContext,
    InputEvent, InputQueue, FixedTimestep, GameEvent,
    VectorState, VectorVertex,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly (see [`export_game!`](crate::export_game)).
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    vectors: VectorState,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
    /// HUD text joined with newlines, rebuilt each frame.
    hud: String,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        Self {
            ctx: EngineContext::from_config(&config),
            input: InputQueue::new(),
            vectors: VectorState::with_capacity(config.max_vector_vertices),
            timestep: FixedTimestep::with_max_steps(config.fixed_dt, config.max_steps_per_frame),
            config,
            game,
            initialized: false,
            hud: String::new(),
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.redraw();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Hand JSON settings to the game.
    pub fn load_settings(&mut self, json: &str) {
        self.game.load_settings(&mut self.ctx, json);
    }

    pub fn reseed(&mut self, seed: u64) {
        self.game.reseed(seed);
    }

    /// Run one frame: zero or more fixed ticks, then one draw pass.
    ///
    /// Pending input goes to the first tick of the frame only. A frame that
    /// produces no tick leaves the input pending for the next frame.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            // Later ticks of the frame see an empty queue.
            let input = self.input.take();
            self.game.update(&mut self.ctx, &input);
        }

        self.redraw();
    }

    fn redraw(&mut self) {
        self.vectors.clear();
        {
            let mut render_ctx = RenderContext {
                canvas: &mut self.vectors,
            };
            self.game.render(&mut render_ctx);
        }
        if self.vectors.dropped_shapes() > 0 {
            log::warn!(
                "vector buffer full: {} shapes dropped (max {} vertices)",
                self.vectors.dropped_shapes(),
                self.vectors.max_vertices()
            );
        }
        self.hud = self.game.hud_lines().join("\n");
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    // ---- Pointer accessors for buffer reads from JS ----

    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.vectors.buffer_ptr()
    }

    pub fn vector_vertex_count(&self) -> u32 {
        self.vectors.vertex_count() as u32
    }

    pub fn max_vector_vertices(&self) -> u32 {
        self.vectors.max_vertices() as u32
    }

    pub fn vector_vertex_floats(&self) -> u32 {
        VectorVertex::FLOATS as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn game_event_floats(&self) -> u32 {
        GameEvent::FLOATS as u32
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }

    pub fn hud_text(&self) -> String {
        self.hud.clone()
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    pub fn ticks(&self) -> u64 {
        self.timestep.ticks()
    }
}
