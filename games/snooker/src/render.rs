//! Draw pass for the table.
//!
//! Rendering runs after all ticks of a frame and reads a [`Snapshot`] taken
//! at the end of the last update, so the `Canvas` never touches physics.

use std::f32::consts::{FRAC_PI_2, PI};

use baize_engine::{Canvas, PhysicsWorld, VectorColor};
use glam::Vec2;

use crate::ball::BallColor;
use crate::feedback::Fade;
use crate::sim::Simulation;

const FELT: VectorColor = VectorColor::rgb(0.05, 0.42, 0.2);
const CUSHION: VectorColor = VectorColor::rgb(0.03, 0.3, 0.14);
const POCKET: VectorColor = VectorColor::rgb(0.02, 0.02, 0.02);
const MARKINGS: VectorColor = VectorColor::new(1.0, 1.0, 1.0, 0.55);
const WOOD: VectorColor = VectorColor::rgb(0.55, 0.35, 0.15);
const FERRULE: VectorColor = VectorColor::rgb(0.9, 0.9, 0.85);
const CHALK: VectorColor = VectorColor::rgb(0.2, 0.4, 0.6);

const CUE_LENGTH: f32 = 180.0;
const MAX_PULL: f32 = 60.0;
const D_SEGMENTS: usize = 24;

/// Ball positions captured after the last tick.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub balls: Vec<(Vec2, BallColor)>,
    pub cue: Option<Vec2>,
}

impl Snapshot {
    pub fn capture(sim: &Simulation, physics: &PhysicsWorld) -> Self {
        let mut balls = Vec::with_capacity(sim.balls().len());
        let mut cue = None;
        for ball in sim.balls().iter() {
            let pos = physics.position(&ball.body);
            if ball.is_cue {
                cue = Some(pos);
            }
            balls.push((pos, ball.color));
        }
        Self { balls, cue }
    }
}

/// Draw one frame. `origin` is the world position of the table centre.
pub fn draw(canvas: &mut dyn Canvas, sim: &Simulation, snapshot: &Snapshot, origin: Vec2) {
    draw_table(canvas, sim, origin);

    let radius = sim.table().ball_radius();
    for trail in sim.trails().iter() {
        canvas.fill_circle(origin + trail.pos, radius * 0.4, trail.color.with_alpha(trail.alpha() * 0.5));
    }
    for ring in sim.impacts().iter() {
        canvas.stroke_circle(origin + ring.pos, ring.radius, 2.0, VectorColor::WHITE.with_alpha(ring.alpha()));
    }

    for &(pos, color) in &snapshot.balls {
        let center = origin + pos;
        canvas.fill_circle(center, radius, color.color());
        // Specular highlight, upper left.
        canvas.fill_circle(
            center + Vec2::splat(-radius * 0.35),
            radius * 0.3,
            color.color().lighten(0.7).with_alpha(0.8),
        );
    }

    if let (Some(cue), Some(angle)) = (snapshot.cue, sim.cue().angle()) {
        draw_cue_stick(canvas, sim, cue, origin, angle);
    }
}

fn draw_table(canvas: &mut dyn Canvas, sim: &Simulation, origin: Vec2) {
    let table = sim.table();
    let half = Vec2::new(table.width, table.height) / 2.0;

    canvas.fill_rect(origin - half, table.width, table.height, FELT);
    for cushion in &table.cushions {
        canvas.fill_rect(origin + cushion.center - cushion.size / 2.0, cushion.size.x, cushion.size.y, CUSHION);
    }
    for pocket in &table.pockets {
        canvas.fill_circle(origin + *pocket, table.pocket_diameter / 2.0, POCKET);
    }

    canvas.stroke_polyline(
        &[
            origin + Vec2::new(table.baulk_x, -half.y),
            origin + Vec2::new(table.baulk_x, half.y),
        ],
        1.5,
        MARKINGS,
    );

    // Half circle on the baulk side of the line.
    let center = origin + table.d_center();
    let arc: Vec<Vec2> = (0..=D_SEGMENTS)
        .map(|i| {
            let a = FRAC_PI_2 + PI * i as f32 / D_SEGMENTS as f32;
            center + Vec2::from_angle(a) * table.d_radius
        })
        .collect();
    canvas.stroke_polyline(&arc, 1.5, MARKINGS);
}

/// Stick lies on the pointer side of the ball; holding the pointer pulls it back.
fn draw_cue_stick(canvas: &mut dyn Canvas, sim: &Simulation, cue: Vec2, origin: Vec2, angle: f32) {
    let dir = Vec2::from_angle(angle);
    let retract = if sim.cue().is_held() {
        (sim.cue().pointer().distance(cue) * 0.15).min(MAX_PULL)
    } else {
        0.0
    };

    let tip = origin + cue + dir * (sim.table().ball_radius() + 3.0 + retract);
    let butt = tip + dir * CUE_LENGTH;
    let ferrule_start = tip + dir * 2.0;
    let ferrule_end = tip + dir * 10.0;

    canvas.stroke_polyline(&[tip, butt], 5.0, WOOD);
    canvas.stroke_polyline(&[ferrule_start, ferrule_end], 4.0, FERRULE);
    canvas.stroke_polyline(&[tip, ferrule_start], 3.5, CHALK);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::presets::Preset;
    use baize_engine::{EngineContext, GameConfig};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Rect(Vec2, f32, f32),
        Circle(Vec2, f32, VectorColor),
        Ring(Vec2, f32),
        Line(Vec<Vec2>, f32),
    }

    #[derive(Default)]
    struct RecordingCanvas {
        calls: Vec<Call>,
    }

    impl Canvas for RecordingCanvas {
        fn fill_rect(&mut self, pos: Vec2, width: f32, height: f32, _color: VectorColor) {
            self.calls.push(Call::Rect(pos, width, height));
        }

        fn fill_circle(&mut self, center: Vec2, radius: f32, color: VectorColor) {
            self.calls.push(Call::Circle(center, radius, color));
        }

        fn stroke_circle(&mut self, center: Vec2, radius: f32, _width: f32, _color: VectorColor) {
            self.calls.push(Call::Ring(center, radius));
        }

        fn stroke_polyline(&mut self, points: &[Vec2], width: f32, _color: VectorColor) {
            self.calls.push(Call::Line(points.to_vec(), width));
        }
    }

    impl RecordingCanvas {
        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(c)).count()
        }
    }

    fn setup() -> (Simulation, EngineContext) {
        let mut ctx = EngineContext::from_config(&GameConfig::default());
        let mut sim = Simulation::new(SimConfig::default());
        sim.setup(&mut ctx.physics);
        (sim, ctx)
    }

    #[test]
    fn empty_table_draws_felt_cushions_pockets_and_markings() {
        let (sim, ctx) = setup();
        let mut canvas = RecordingCanvas::default();
        let origin = Vec2::new(530.0, 305.0);
        draw(&mut canvas, &sim, &Snapshot::capture(&sim, &ctx.physics), origin);

        assert_eq!(canvas.count(|c| matches!(c, Call::Rect(..))), 5);
        assert_eq!(canvas.calls[0], Call::Rect(origin - Vec2::new(450.0, 225.0), 900.0, 450.0));
        assert_eq!(canvas.count(|c| matches!(c, Call::Circle(_, r, _) if *r == 18.75)), 6);
        let lines = canvas.count(|c| matches!(c, Call::Line(..)));
        assert_eq!(lines, 2);
        let arc_points = canvas
            .calls
            .iter()
            .find_map(|c| match c {
                Call::Line(points, _) if points.len() > 2 => Some(points.len()),
                _ => None,
            })
            .unwrap_or(0);
        assert_eq!(arc_points, D_SEGMENTS + 1);
    }

    #[test]
    fn every_ball_gets_a_disc_and_highlight() {
        let (mut sim, mut ctx) = setup();
        sim.load_preset(&mut ctx, Preset::Line);
        let mut canvas = RecordingCanvas::default();
        draw(&mut canvas, &sim, &Snapshot::capture(&sim, &ctx.physics), Vec2::ZERO);

        let r = sim.table().ball_radius();
        assert_eq!(canvas.count(|c| matches!(c, Call::Circle(_, rad, _) if *rad == r)), 7);
        assert_eq!(canvas.count(|c| matches!(c, Call::Circle(_, rad, _) if *rad == r * 0.3)), 7);
        let pink_drawn = canvas.calls.iter().any(|c| {
            matches!(c, Call::Circle(p, rad, col) if *rad == r && *col == BallColor::Pink.color() && (p.x - 250.0).abs() < 1e-3)
        });
        assert!(pink_drawn);
    }

    #[test]
    fn cue_stick_needs_placement_and_pulls_back_while_held() {
        let (mut sim, mut ctx) = setup();
        let mut canvas = RecordingCanvas::default();
        draw(&mut canvas, &sim, &Snapshot::capture(&sim, &ctx.physics), Vec2::ZERO);
        assert_eq!(canvas.count(|c| matches!(c, Call::Line(_, w) if *w == 5.0)), 0);

        let at = sim.table().d_center();
        sim.pointer_down(&mut ctx, at);
        sim.pointer_up(&mut ctx.physics, at);
        sim.pointer_move(&ctx.physics, at + Vec2::new(100.0, 0.0));

        let stick_tip = |sim: &Simulation, ctx: &EngineContext| {
            let mut canvas = RecordingCanvas::default();
            draw(&mut canvas, sim, &Snapshot::capture(sim, &ctx.physics), Vec2::ZERO);
            canvas
                .calls
                .into_iter()
                .find_map(|c| match c {
                    Call::Line(points, w) if w == 5.0 => Some(points[0]),
                    _ => None,
                })
        };

        let resting = stick_tip(&sim, &ctx).expect("stick drawn once aiming");
        assert!(resting.x > at.x, "stick on pointer side");

        sim.pointer_down(&mut ctx, at + Vec2::new(100.0, 0.0));
        let pulled = stick_tip(&sim, &ctx).expect("stick drawn while held");
        assert!(pulled.x > resting.x);
    }

    #[test]
    fn feedback_is_drawn_with_fading_alpha() {
        let (mut sim, mut ctx) = setup();
        let body = sim.add_ball(&mut ctx, Vec2::ZERO, BallColor::Red);
        ctx.physics.set_velocity(&body, Vec2::new(4.0, 0.0));
        sim.tick(&mut ctx.physics);

        let mut canvas = RecordingCanvas::default();
        draw(&mut canvas, &sim, &Snapshot::capture(&sim, &ctx.physics), Vec2::ZERO);
        let r = sim.table().ball_radius();
        let trail = canvas.calls.iter().find_map(|c| match c {
            Call::Circle(_, rad, col) if *rad == r * 0.4 => Some(col.a),
            _ => None,
        });
        let alpha = trail.expect("trail drawn");
        assert!(alpha > 0.0 && alpha < 0.5);
    }
}
