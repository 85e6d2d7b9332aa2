/// Fixed timestep accumulator.
/// Turns variable frame deltas into a whole number of simulation ticks.
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    /// Most ticks a single frame may run (guards against the spiral of death).
    max_steps: u32,
    ticks: u64,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self::with_max_steps(dt, 10)
    }

    pub fn with_max_steps(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
            ticks: 0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of ticks to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        self.ticks += steps as u64;
        steps
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Ticks produced since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
