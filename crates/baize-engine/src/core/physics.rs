//! Rapier2D wrapper used as the table's rigid-body solver.
//!
//! Kinematics cross this boundary in world units **per tick**: `velocity`,
//! `speed` and `set_velocity` speak distance per tick, and impulses are
//! mass × distance per tick. [`PhysicsWorld::set_dt`] fixes how many seconds
//! one tick lasts; rapier itself keeps integrating in seconds.

use std::num::NonZeroUsize;

use glam::Vec2;
use rapier2d::prelude::*;

use crate::api::types::EntityId;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam ↔ nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// Shape description for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_width: f32, half_height: f32 },
}

impl ColliderDesc {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderDesc::Cuboid { half_width, half_height } => {
                ColliderBuilder::cuboid(half_width, half_height)
            }
        }
    }
}

/// Physical material properties of a body and its collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
    /// Fraction of linear velocity lost per tick to rolling/air resistance.
    pub air_drag: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
            density: 1.0,
            air_drag: 0.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub ccd: bool,
    pub collider: ColliderDesc,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec2::ZERO,
            ccd: false,
            collider,
        }
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            position: Vec2::ZERO,
            ccd: false,
            collider,
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }
}

/// Handle pair owned by whatever entity the body belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// Solver tuning for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    /// Solver iterations per substep.
    pub iterations: usize,
    /// Substeps per tick.
    pub substeps: u32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            iterations: 10,
            substeps: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all Rapier2D boilerplate into a single struct.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    /// Seconds per tick.
    tick_dt: f32,
    substeps: u32,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity (units per second squared).
    pub fn new(gravity: Vec2) -> Self {
        let mut world = Self {
            gravity: vec2_to_na(gravity),
            tick_dt: 1.0 / 60.0,
            substeps: 1,
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        };
        world.apply_solver(SolverSettings::default());
        world
    }

    /// Set the length of one tick in seconds.
    ///
    /// Bodies created earlier keep the damping derived from the old tick length.
    pub fn set_dt(&mut self, dt: f32) {
        self.tick_dt = dt.max(f32::EPSILON);
        self.integration_parameters.dt = self.tick_dt / self.substeps as f32;
    }

    /// Seconds per tick.
    pub fn dt(&self) -> f32 {
        self.tick_dt
    }

    /// Configure solver iterations and substeps.
    pub fn apply_solver(&mut self, settings: SolverSettings) {
        self.substeps = settings.substeps.max(1);
        self.integration_parameters.num_solver_iterations =
            NonZeroUsize::new(settings.iterations).unwrap_or(NonZeroUsize::MIN);
        self.integration_parameters.dt = self.tick_dt / self.substeps as f32;
    }

    /// Solver iterations currently configured per substep.
    pub fn solver_iterations(&self) -> usize {
        self.integration_parameters.num_solver_iterations.get()
    }

    /// Create a rigid body + collider and return handles.
    /// The EntityId is stored in the body's `user_data`.
    pub fn create_body(
        &mut self,
        entity_id: EntityId,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec2_to_na(desc.position))
            .ccd_enabled(desc.ccd)
            .linear_damping(self.damping_for(material.air_drag))
            .angular_damping(self.damping_for(material.air_drag))
            .user_data(entity_id.0 as u128)
            .build();

        let body_handle = self.bodies.insert(rb);

        let collider = desc
            .collider
            .build_collider()
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .build();

        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Create a dynamic circular body with continuous collision detection.
    pub fn create_circle(
        &mut self,
        entity_id: EntityId,
        position: Vec2,
        radius: f32,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius })
            .with_position(position)
            .with_ccd(true);
        self.create_body(entity_id, &desc, material)
    }

    /// Register a static rectangle centred at `position` with full `size`.
    pub fn register_static_rect(
        &mut self,
        position: Vec2,
        size: Vec2,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let desc = BodyDesc::fixed(ColliderDesc::Cuboid {
            half_width: size.x / 2.0,
            half_height: size.y / 2.0,
        })
        .with_position(position);
        // Static geometry has no identity of its own.
        self.create_body(EntityId(u32::MAX), &desc, material)
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Advance the simulation by one tick.
    pub fn step(&mut self) {
        for _ in 0..self.substeps {
            self.physics_pipeline.step(
                &self.gravity,
                &self.integration_parameters,
                &mut self.island_manager,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                Some(&mut self.query_pipeline),
                &(),
                &(),
            );
        }
    }

    /// Apply an instantaneous impulse (mass × units per tick) at a world point.
    pub fn apply_impulse_at(&mut self, body: &PhysicsBody, point: Vec2, impulse: Vec2) {
        let scale = 1.0 / self.tick_dt;
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.apply_impulse_at_point(
                vec2_to_na(impulse * scale),
                nalgebra::Point2::new(point.x, point.y),
                true,
            );
        }
    }

    /// Set the linear velocity of a body (units per tick).
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec2) {
        let scale = 1.0 / self.tick_dt;
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(vec2_to_na(vel * scale), true);
        }
    }

    /// Current linear velocity of a body (units per tick).
    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.linvel()) * self.tick_dt)
            .unwrap_or(Vec2::ZERO)
    }

    /// Magnitude of [`velocity`](Self::velocity).
    pub fn speed(&self, body: &PhysicsBody) -> f32 {
        self.velocity(body).length()
    }

    /// Current centre of a body.
    pub fn position(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.translation()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Mass of a body as computed from its collider density.
    pub fn mass(&self, body: &PhysicsBody) -> f32 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.mass())
            .unwrap_or(0.0)
    }

    /// Whether the handle still refers to a live body.
    pub fn contains(&self, body: &PhysicsBody) -> bool {
        self.bodies.contains(body.body_handle)
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    // -- private helpers --

    /// Rapier damping `d` scales velocity by `1 / (1 + dt * d)` per step.
    /// Choose `d` so that a whole tick keeps `1 - air_drag` of the velocity.
    fn damping_for(&self, air_drag: f32) -> f32 {
        let keep = (1.0 - air_drag.clamp(0.0, 0.99)).powf(1.0 / self.substeps as f32);
        let step_dt = self.tick_dt / self.substeps as f32;
        (1.0 / keep - 1.0) / step_dt
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
