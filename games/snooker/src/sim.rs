//! The table simulation: balls, score, cue control and visual feedback.
//!
//! The physics world itself lives in [`EngineContext`] and is passed in by
//! reference, so the same `Simulation` can be driven from the game loop and
//! directly from tests.

use baize_engine::{EngineContext, PhysicsBody, PhysicsWorld};
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::ball::{Ball, BallColor};
use crate::config::SimConfig;
use crate::cue::{CueControl, CueState};
use crate::feedback::{FadeBuffer, ImpactEffect, TrailSample};
use crate::presets::Preset;
use crate::registry::BallRegistry;
use crate::table::{Exit, TableGeometry};

pub struct Simulation {
    config: SimConfig,
    table: TableGeometry,
    balls: BallRegistry,
    cushions: Vec<PhysicsBody>,
    score: u32,
    cue: CueControl,
    trails: FadeBuffer<TrailSample>,
    impacts: FadeBuffer<ImpactEffect>,
    preset: Preset,
    rng: SmallRng,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self {
            table: TableGeometry::new(config.table_width),
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            balls: BallRegistry::new(),
            cushions: Vec::with_capacity(4),
            score: 0,
            cue: CueControl::new(),
            trails: FadeBuffer::new(),
            impacts: FadeBuffer::new(),
            preset: Preset::Triangle,
        }
    }

    /// Configure the physics world for this table and build the cushions.
    pub fn setup(&mut self, physics: &mut PhysicsWorld) {
        physics.apply_solver(self.config.solver.settings());
        physics.set_dt(self.config.solver.tick_seconds);

        for body in self.cushions.drain(..) {
            physics.remove_body(&body);
        }
        let material = self.config.cushion_material.to_material();
        for cushion in &self.table.cushions {
            let body = physics.register_static_rect(cushion.center, cushion.size, material);
            self.cushions.push(body);
        }
    }

    /// Swap in a new configuration, rebuild the table and reload the current preset.
    pub fn reconfigure(&mut self, ctx: &mut EngineContext, config: SimConfig) {
        self.clear_table(&mut ctx.physics);
        self.table = TableGeometry::new(config.table_width);
        self.rng = SmallRng::seed_from_u64(config.seed);
        self.config = config;
        self.setup(&mut ctx.physics);
        self.load_preset(ctx, self.preset);
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    // ---- Simulation step ----

    /// Advance one tick.
    pub fn tick(&mut self, physics: &mut PhysicsWorld) {
        physics.step();

        let max_speed = self.config.max_speed;
        let trail_threshold = self.config.trail_threshold;
        let margin = self.config.out_of_bounds_margin;
        let table = &self.table;
        let trails = &mut self.trails;
        let impacts = &mut self.impacts;
        let score = &mut self.score;
        let cue = &mut self.cue;

        self.balls.sweep(
            physics,
            |ball, physics| {
                let mut speed = physics.speed(&ball.body);
                if speed > max_speed {
                    let clamped = physics.velocity(&ball.body) * (max_speed / speed);
                    physics.set_velocity(&ball.body, clamped);
                    speed = max_speed;
                }

                let pos = physics.position(&ball.body);
                if speed > trail_threshold {
                    trails.push(TrailSample::new(pos, ball.color.color()));
                }
                table.exit_for(pos, margin).map(|exit| (exit, pos))
            },
            |ball, (exit, pos)| {
                if ball.is_cue {
                    log::info!("cue ball lost ({:?})", exit);
                    cue.cue_lost();
                    return;
                }
                if exit == Exit::Pocketed {
                    *score += ball.value();
                    log::info!("{} pocketed, +{} (score {})", ball.color, ball.value(), *score);
                } else {
                    log::info!("{} left the table", ball.color);
                }
                impacts.push(ImpactEffect::new(pos, table.ball_radius()));
            },
        );

        let cue_pos = self.cue_position(physics);
        self.cue.reaim(cue_pos);

        self.trails.decay(&self.config.fade);
        self.impacts.decay(&self.config.fade);
    }

    // ---- Pointer input (table coordinates) ----

    /// Press: places the cue ball when one is due, otherwise starts a stroke.
    pub fn pointer_down(&mut self, ctx: &mut EngineContext, at: Vec2) {
        if !self.cue.awaiting_placement() {
            self.cue.press(at);
            return;
        }
        if !self.table.in_baulk_d(at) {
            log::debug!("cue placement outside the D ignored at ({:.1}, {:.1})", at.x, at.y);
            self.cue.press(at);
            return;
        }
        let id = ctx.next_id();
        let radius = self.table.ball_radius();
        let body = ctx.physics.create_circle(id, at, radius, self.config.ball_material.to_material());
        self.balls.add(Ball::cue(id, body));
        self.cue.placed(id, at);
        log::info!("cue ball placed at ({:.1}, {:.1})", at.x, at.y);
    }

    pub fn pointer_move(&mut self, physics: &PhysicsWorld, at: Vec2) {
        let cue_pos = self.cue_position(physics);
        self.cue.aim(at, cue_pos);
    }

    /// Release: shoots the cue ball away from the pointer. Returns the applied force.
    pub fn pointer_up(&mut self, physics: &mut PhysicsWorld, at: Vec2) -> Option<Vec2> {
        let cue_ball = self.cue_ball().map(|b| (b.body, physics.position(&b.body)));
        let force = self.cue.release(at, cue_ball.map(|(_, pos)| pos), self.config.shot_strength);
        let (Some(force), Some((body, pos))) = (force, cue_ball) else {
            log::debug!("release without a shot");
            return None;
        };

        physics.apply_impulse_at(&body, pos, force);
        self.impacts.push(ImpactEffect::new(pos, self.table.ball_radius()));
        log::info!(
            "shot: force ({:.4}, {:.4}), launch speed {:.2}",
            force.x,
            force.y,
            force.length() / physics.mass(&body)
        );
        Some(force)
    }

    // ---- Table lifecycle ----

    /// Remove every ball and reset score, cue state and feedback.
    pub fn clear_table(&mut self, physics: &mut PhysicsWorld) {
        self.balls.clear(physics);
        self.score = 0;
        self.cue.reset();
        self.trails.clear();
        self.impacts.clear();
    }

    pub fn load_preset(&mut self, ctx: &mut EngineContext, preset: Preset) {
        self.clear_table(&mut ctx.physics);
        self.preset = preset;

        for (pos, color) in preset.layout(&self.table, &mut self.rng) {
            self.add_ball(ctx, pos, color);
        }
        log::info!("preset {} loaded: {} balls", preset.name(), self.balls.len());
    }

    pub fn restart(&mut self, ctx: &mut EngineContext) {
        log::info!("restart");
        self.load_preset(ctx, self.preset);
    }

    // ---- Read access ----

    /// The ball tracked by the cue machine, if it is still on the table.
    fn cue_ball(&self) -> Option<&Ball> {
        self.cue.cue_id().and_then(|id| self.balls.get(id))
    }

    fn cue_position(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        self.cue_ball().map(|b| physics.position(&b.body))
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn table(&self) -> &TableGeometry {
        &self.table
    }

    pub fn balls(&self) -> &BallRegistry {
        &self.balls
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn cue(&self) -> &CueControl {
        &self.cue
    }

    pub fn cue_state(&self) -> CueState {
        self.cue.state()
    }

    pub fn trails(&self) -> &FadeBuffer<TrailSample> {
        &self.trails
    }

    pub fn impacts(&self) -> &FadeBuffer<ImpactEffect> {
        &self.impacts
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    /// Put one object ball on the table.
    pub fn add_ball(&mut self, ctx: &mut EngineContext, pos: Vec2, color: BallColor) -> PhysicsBody {
        let id = ctx.next_id();
        let body = ctx.physics.create_circle(
            id,
            pos,
            self.table.ball_radius(),
            self.config.ball_material.to_material(),
        );
        self.balls.add(Ball::object(id, body, color));
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baize_engine::GameConfig;

    fn setup() -> (Simulation, EngineContext) {
        let mut ctx = EngineContext::from_config(&GameConfig::default());
        let mut sim = Simulation::new(SimConfig::default());
        sim.setup(&mut ctx.physics);
        (sim, ctx)
    }

    /// Place the cue ball and finish the placement press.
    fn place_cue(sim: &mut Simulation, ctx: &mut EngineContext, at: Vec2) {
        sim.pointer_down(ctx, at);
        sim.pointer_up(&mut ctx.physics, at);
        assert_eq!(sim.cue_state(), CueState::PlacedIdle);
    }

    fn body_of(sim: &Simulation, color: BallColor) -> PhysicsBody {
        sim.balls()
            .iter()
            .find(|b| b.color == color)
            .map(|b| b.body)
            .expect("ball present")
    }

    #[test]
    fn setup_builds_four_cushions() {
        let (_sim, ctx) = setup();
        assert_eq!(ctx.physics.body_count(), 4);
        assert_eq!(ctx.physics.solver_iterations(), 10);
    }

    #[test]
    fn speed_never_exceeds_cap_after_tick() {
        let (mut sim, mut ctx) = setup();
        let body = sim.add_ball(&mut ctx, Vec2::ZERO, BallColor::Red);
        ctx.physics.set_velocity(&body, Vec2::new(40.0, 30.0));
        sim.tick(&mut ctx.physics);

        let speed = ctx.physics.speed(&body);
        assert!(speed <= 14.0 + 1e-3, "speed {}", speed);
        let v = ctx.physics.velocity(&body);
        assert!((v.y / v.x - 0.75).abs() < 1e-3, "direction kept: {:?}", v);
    }

    #[test]
    fn trail_only_for_moving_balls() {
        let (mut sim, mut ctx) = setup();
        sim.add_ball(&mut ctx, Vec2::new(-100.0, 0.0), BallColor::Blue);
        let moving = sim.add_ball(&mut ctx, Vec2::new(100.0, 0.0), BallColor::Pink);
        ctx.physics.set_velocity(&moving, Vec2::new(5.0, 0.0));

        sim.tick(&mut ctx.physics);
        assert_eq!(sim.trails().len(), 1);
        let first = sim.trails().iter().next().map(|t| t.fade).unwrap_or(0.0);
        assert!(first < 255.0);

        sim.tick(&mut ctx.physics);
        assert!(sim.trails().len() <= 2);
        let fades: Vec<f32> = sim.trails().iter().map(|t| t.fade).collect();
        assert!(fades.windows(2).all(|w| w[0] < w[1]), "oldest fades first: {:?}", fades);
    }

    #[test]
    fn pocketed_ball_scores_and_leaves() {
        let (mut sim, mut ctx) = setup();
        let pocket = sim.table().pockets[2];
        sim.add_ball(&mut ctx, pocket, BallColor::Pink);
        sim.tick(&mut ctx.physics);

        assert_eq!(sim.score(), 6);
        assert!(sim.balls().is_empty());
        assert_eq!(ctx.physics.body_count(), 4);
        assert_eq!(sim.impacts().len(), 1);
    }

    #[test]
    fn out_of_bounds_ball_leaves_without_score() {
        let (mut sim, mut ctx) = setup();
        let far = Vec2::new(0.0, sim.table().height / 2.0 + 100.0);
        sim.add_ball(&mut ctx, far, BallColor::Black);
        sim.tick(&mut ctx.physics);

        assert_eq!(sim.score(), 0);
        assert!(sim.balls().is_empty());
        assert_eq!(sim.impacts().len(), 1);
    }

    #[test]
    fn lost_cue_ball_returns_to_placement() {
        let (mut sim, mut ctx) = setup();
        let pocket = sim.table().pockets[0];
        let id = ctx.next_id();
        let material = sim.config().ball_material.to_material();
        let body = ctx.physics.create_circle(id, pocket, sim.table().ball_radius(), material);
        sim.balls.add(Ball::cue(id, body));
        sim.cue.placed(id, pocket);

        sim.tick(&mut ctx.physics);
        assert_eq!(sim.cue_state(), CueState::AwaitingPlacement);
        assert!(sim.balls().cue().is_none());
        assert!(!ctx.physics.contains(&body));
        assert_eq!(sim.score(), 0);
        assert!(sim.impacts().is_empty());
        assert_eq!(sim.cue().angle(), None);
    }

    #[test]
    fn cue_ball_off_the_table_returns_to_placement() {
        let (mut sim, mut ctx) = setup();
        let beyond = Vec2::new(0.0, sim.table().height / 2.0 + sim.config().out_of_bounds_margin + 25.0);
        let id = ctx.next_id();
        let material = sim.config().ball_material.to_material();
        let body = ctx.physics.create_circle(id, beyond, sim.table().ball_radius(), material);
        sim.balls.add(Ball::cue(id, body));
        sim.cue.placed(id, beyond);

        sim.tick(&mut ctx.physics);
        assert_eq!(sim.cue_state(), CueState::AwaitingPlacement);
        assert!(sim.balls().cue().is_none());
        assert!(!ctx.physics.contains(&body));
        assert_eq!(sim.score(), 0);
        assert!(sim.impacts().is_empty());
        assert_eq!(sim.cue().angle(), None);
    }

    #[test]
    fn clear_table_is_idempotent() {
        let (mut sim, mut ctx) = setup();
        sim.load_preset(&mut ctx, Preset::Triangle);
        let moving = body_of(&sim, BallColor::Blue);
        ctx.physics.set_velocity(&moving, Vec2::new(3.0, 0.0));
        sim.tick(&mut ctx.physics);
        assert!(!sim.trails().is_empty());

        sim.clear_table(&mut ctx.physics);
        let snapshot = (sim.balls().len(), sim.score(), sim.cue_state(), sim.trails().len(), sim.impacts().len());
        sim.clear_table(&mut ctx.physics);
        assert_eq!(snapshot, (0, 0, CueState::AwaitingPlacement, 0, 0));
        assert_eq!(
            (sim.balls().len(), sim.score(), sim.cue_state(), sim.trails().len(), sim.impacts().len()),
            snapshot
        );
        assert_eq!(ctx.physics.body_count(), 4);
    }

    #[test]
    fn placement_outside_the_d_is_ignored() {
        let (mut sim, mut ctx) = setup();
        let just_right = sim.table().d_center() + Vec2::new(0.5, 0.0);
        sim.pointer_down(&mut ctx, just_right);
        sim.pointer_up(&mut ctx.physics, just_right);
        assert!(sim.balls().cue().is_none());
        assert_eq!(sim.cue_state(), CueState::AwaitingPlacement);

        let edge = sim.table().d_center() + Vec2::new(0.0, sim.table().d_radius);
        sim.pointer_down(&mut ctx, edge);
        assert!(sim.balls().cue().is_some());
        assert_eq!(sim.cue_state(), CueState::PlacedIdle);
    }

    #[test]
    fn scenario_a_triangle_preset() {
        let (mut sim, mut ctx) = setup();
        sim.load_preset(&mut ctx, Preset::Triangle);
        assert_eq!(sim.balls().len(), 21);
        assert!(sim.balls().cue().is_none());
        assert_eq!(sim.cue_state(), CueState::AwaitingPlacement);
        assert_eq!(ctx.physics.body_count(), 21 + 4);
    }

    #[test]
    fn scenario_b_place_then_aim() {
        let (mut sim, mut ctx) = setup();
        sim.load_preset(&mut ctx, Preset::Line);
        let at = sim.table().d_center() + Vec2::new(-20.0, 10.0);
        place_cue(&mut sim, &mut ctx, at);
        assert_eq!(sim.balls().len(), 8);

        sim.pointer_move(&ctx.physics, at + Vec2::new(0.0, 80.0));
        assert_eq!(sim.cue_state(), CueState::Aiming);
        let angle = sim.cue().angle().expect("angle defined once placed");
        assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn scenario_c_release_applies_scaled_force() {
        let (mut sim, mut ctx) = setup();
        let at = sim.table().d_center();
        place_cue(&mut sim, &mut ctx, at);
        sim.tick(&mut ctx.physics);

        let ball = ctx.physics.position(&sim.balls().cue().map(|b| b.body).expect("cue"));
        let (dx, dy) = (60.0, -40.0);
        let pointer = ball + Vec2::new(dx, dy);
        sim.pointer_down(&mut ctx, pointer);
        sim.pointer_move(&ctx.physics, pointer);
        let force = sim.pointer_up(&mut ctx.physics, pointer).expect("shot taken");
        assert!((force.x + dx * 0.0025).abs() < 1e-5);
        assert!((force.y + dy * 0.0025).abs() < 1e-5);
        assert_eq!(sim.impacts().len(), 1);

        let v = ctx.physics.velocity(&sim.balls().cue().map(|b| b.body).expect("cue"));
        assert!(v.x < 0.0 && v.y > 0.0, "ball moves away from pointer: {:?}", v);
    }

    #[test]
    fn restart_resets_everything() {
        let (mut sim, mut ctx) = setup();
        sim.load_preset(&mut ctx, Preset::Line);
        let d = sim.table().d_center();
        place_cue(&mut sim, &mut ctx, d);
        let pink = body_of(&sim, BallColor::Pink);
        ctx.physics.set_velocity(&pink, Vec2::new(2.0, 0.0));
        sim.tick(&mut ctx.physics);
        sim.score = 9;

        sim.restart(&mut ctx);
        assert_eq!(sim.score(), 0);
        assert_eq!(sim.balls().len(), 7);
        assert!(sim.balls().cue().is_none());
        assert_eq!(sim.cue_state(), CueState::AwaitingPlacement);
        assert!(sim.trails().is_empty());
        assert!(sim.impacts().is_empty());
        assert_eq!(sim.preset(), Preset::Line);
    }

    #[test]
    fn reconfigure_rebuilds_table() {
        let (mut sim, mut ctx) = setup();
        sim.load_preset(&mut ctx, Preset::Line);
        let config = SimConfig { table_width: 720.0, ..SimConfig::default() };
        sim.reconfigure(&mut ctx, config);
        assert_eq!(sim.table().width, 720.0);
        assert_eq!(sim.balls().len(), 7);
        assert_eq!(ctx.physics.body_count(), 7 + 4);
    }
}
