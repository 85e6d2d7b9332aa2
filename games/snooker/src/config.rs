//! Tunable simulation settings, loadable from JSON handed over by the page.

use baize_engine::{ColliderMaterial, SolverSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fast overlapping balls separate cleanly only with this many solver
/// iterations per tick, counted across substeps.
pub const MIN_ITERATIONS_PER_TICK: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("config rejected: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Surface properties of a body. Mirrors [`ColliderMaterial`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
    /// Fraction of velocity lost per tick.
    pub air_drag: f32,
}

impl MaterialConfig {
    pub fn to_material(self) -> ColliderMaterial {
        ColliderMaterial {
            restitution: self.restitution,
            friction: self.friction,
            density: self.density,
            air_drag: self.air_drag,
        }
    }

    fn cushion() -> Self {
        Self {
            restitution: 0.8,
            friction: 0.2,
            density: 1.0,
            air_drag: 0.0,
        }
    }
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            restitution: 0.92,
            friction: 0.05,
            density: 0.000_15,
            air_drag: 0.012,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub iterations: usize,
    pub substeps: u32,
    /// Seconds per simulation tick.
    pub tick_seconds: f32,
}

impl SolverConfig {
    pub fn settings(&self) -> SolverSettings {
        SolverSettings {
            iterations: self.iterations,
            substeps: self.substeps,
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            substeps: 2,
            tick_seconds: 1.0 / 60.0,
        }
    }
}

/// Per-tick decay of trails and impact rings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeConfig {
    pub trail_fade: f32,
    pub impact_grow: f32,
    pub impact_fade: f32,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            trail_fade: 5.0,
            impact_grow: 2.0,
            impact_fade: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Playable width; every other table dimension derives from it.
    pub table_width: f32,
    /// Speed cap in units per tick.
    pub max_speed: f32,
    /// Balls slower than this leave no trail.
    pub trail_threshold: f32,
    pub out_of_bounds_margin: f32,
    pub shot_strength: f32,
    pub fade: FadeConfig,
    pub ball_material: MaterialConfig,
    pub cushion_material: MaterialConfig,
    pub solver: SolverConfig,
    /// Seed for the cluster layout jitter.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            table_width: 900.0,
            max_speed: 14.0,
            trail_threshold: 0.5,
            out_of_bounds_margin: 20.0,
            shot_strength: 0.0025,
            fade: FadeConfig::default(),
            ball_material: MaterialConfig::default(),
            cushion_material: MaterialConfig::cushion(),
            solver: SolverConfig::default(),
            seed: 0x5eed,
        }
    }
}

impl SimConfig {
    /// Parse and validate. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        let problems = config.validate();
        if problems.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }

    /// Human-readable problems; empty when the config is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if !(self.table_width > 0.0) {
            w.push(format!("table_width must be > 0 (got {})", self.table_width));
        }
        if !(self.max_speed > 0.0) {
            w.push(format!("max_speed must be > 0 (got {})", self.max_speed));
        }
        if self.trail_threshold < 0.0 {
            w.push(format!("trail_threshold {} negative", self.trail_threshold));
        }
        if self.out_of_bounds_margin < 0.0 {
            w.push(format!(
                "out_of_bounds_margin {} negative",
                self.out_of_bounds_margin
            ));
        }
        if self.shot_strength < 0.0 {
            w.push(format!("shot_strength {} negative", self.shot_strength));
        }
        if self.fade.trail_fade <= 0.0 || self.fade.impact_fade <= 0.0 {
            w.push("fade steps must be > 0 or effects never expire".into());
        }
        if self.fade.impact_grow < 0.0 {
            w.push(format!("fade.impact_grow {} negative", self.fade.impact_grow));
        }
        for (name, m) in [("ball", &self.ball_material), ("cushion", &self.cushion_material)] {
            if !(m.density > 0.0) {
                w.push(format!("{}_material.density must be > 0", name));
            }
            if !(0.0..1.0).contains(&m.air_drag) {
                w.push(format!(
                    "{}_material.air_drag {} outside 0..1",
                    name, m.air_drag
                ));
            }
            if m.restitution < 0.0 || m.friction < 0.0 {
                w.push(format!("{}_material has negative restitution/friction", name));
            }
        }
        if self.solver.iterations == 0 {
            w.push("solver.iterations must be >= 1".into());
        }
        if self.solver.substeps == 0 {
            w.push("solver.substeps must be >= 1".into());
        }
        let per_tick = self
            .solver
            .iterations
            .saturating_mul(self.solver.substeps as usize);
        if per_tick > 0 && per_tick < MIN_ITERATIONS_PER_TICK {
            w.push(format!(
                "solver.iterations x solver.substeps must be >= {} (got {})",
                MIN_ITERATIONS_PER_TICK, per_tick
            ));
        }
        if !(self.solver.tick_seconds > 0.0) {
            w.push(format!(
                "solver.tick_seconds must be > 0 (got {})",
                self.solver.tick_seconds
            ));
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_empty(), "{:?}", config.validate());
        assert_eq!(config.max_speed, 14.0);
        assert_eq!(config.solver.iterations, 10);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SimConfig::from_json(r#"{ "max_speed": 9.5, "solver": { "substeps": 4 } }"#)
            .expect("valid config");
        assert_eq!(config.max_speed, 9.5);
        assert_eq!(config.solver.substeps, 4);
        assert_eq!(config.solver.iterations, 10);
        assert_eq!(config.table_width, 900.0);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = SimConfig::from_json("{ max_speed: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn out_of_range_values_are_reported() {
        let err = SimConfig::from_json(r#"{ "table_width": -1, "solver": { "iterations": 0 } }"#)
            .unwrap_err();
        match err {
            ConfigError::Invalid(problems) => {
                assert_eq!(problems.len(), 2, "{:?}", problems);
                assert!(problems[0].contains("table_width"));
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn fewer_than_ten_solver_iterations_per_tick_is_rejected() {
        let err = SimConfig::from_json(r#"{ "solver": { "iterations": 1, "substeps": 1 } }"#)
            .unwrap_err();
        match err {
            ConfigError::Invalid(problems) => {
                assert_eq!(problems.len(), 1, "{:?}", problems);
                assert!(problems[0].contains("iterations x solver.substeps"));
            }
            other => panic!("expected Invalid, got {:?}", other),
        }

        let split = SimConfig::from_json(r#"{ "solver": { "iterations": 5, "substeps": 2 } }"#)
            .expect("5 x 2 meets the floor");
        assert_eq!(split.solver.settings().iterations, 5);
    }

    #[test]
    fn material_maps_onto_engine_type() {
        let m = MaterialConfig::default().to_material();
        assert_eq!(m.density, MaterialConfig::default().density);
        assert_eq!(m.air_drag, 0.012);
    }
}
