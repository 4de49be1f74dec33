//! Circle-body physics for launchers and travelers, on top of rapier.
//!
//! Zero gravity, elastic frictionless contacts, and four fixed walls
//! enclosing the viewport. The rest of the server works in pixels and talks
//! to the world only through [`BodyHandle`]s; rapier's generational arena
//! makes destroying a body O(1) and turns every stale handle into a miss.

use crane_shared::vec2::Vec2;
use rapier2d_f64::prelude::*;

use crate::error::PhysicsError;

/// Fixed simulation rate
pub const TICK_HZ: f64 = 60.0;

/// Pixels per meter
pub const PPM: f64 = 100.0;

/// Restitution for body-body and body-wall contacts
const BOUNCE: f64 = 1.0;

/// Half thickness of the enclosure walls, in pixels
const WALL_HALF_THICKNESS: f64 = 500.0;

/// Opaque reference to a body owned by [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

/// Snapshot of a body, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    /// Pixels per second
    pub velocity: Vec2,
    pub radius: f64,
    pub density: f64,
    /// Fixed bodies are never moved by the simulation
    pub fixed: bool,
}

/// Axis-aligned enclosure bodies cannot leave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn from_size(width: f64, height: f64) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }
}

fn to_world(v: Vec2) -> Vector<Real> {
    vector![v.x / PPM, v.y / PPM]
}

fn to_px(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x * PPM, v.y * PPM)
}

pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    pub fn new(bounds: Bounds) -> Self {
        let mut world = Self {
            gravity: vector![0.0, 0.0],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        };
        world.build_walls(bounds);
        world
    }

    /// Four parentless cuboids hugging the outside of `bounds`.
    fn build_walls(&mut self, bounds: Bounds) {
        let t = WALL_HALF_THICKNESS;
        let width = bounds.max.x - bounds.min.x;
        let height = bounds.max.y - bounds.min.y;
        let center = (bounds.min + bounds.max) * 0.5;
        let walls = [
            // left, right
            (Vec2::new(bounds.min.x - t, center.y), t, height * 0.5 + 2.0 * t),
            (Vec2::new(bounds.max.x + t, center.y), t, height * 0.5 + 2.0 * t),
            // top, bottom
            (Vec2::new(center.x, bounds.min.y - t), width * 0.5 + 2.0 * t, t),
            (Vec2::new(center.x, bounds.max.y + t), width * 0.5 + 2.0 * t, t),
        ];
        for (at, half_w, half_h) in walls {
            let wall = ColliderBuilder::cuboid(half_w / PPM, half_h / PPM)
                .translation(to_world(at))
                .restitution(BOUNCE)
                .friction(0.0)
                .build();
            self.colliders.insert(wall);
        }
    }

    /// Add a dynamic circle at rest.
    pub fn create_body(&mut self, density: f64, position: Vec2, radius: f64) -> BodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(to_world(position))
            .lock_rotations()
            .can_sleep(false)
            .ccd_enabled(true)
            .build();
        self.insert(body, density, radius)
    }

    /// Add a circle the simulation never moves. Dynamic bodies bounce off it.
    pub fn create_fixed_body(&mut self, position: Vec2, radius: f64) -> BodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(to_world(position))
            .build();
        self.insert(body, 1.0, radius)
    }

    fn insert(&mut self, body: RigidBody, density: f64, radius: f64) -> BodyHandle {
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::ball(radius / PPM)
            .density(density)
            .restitution(BOUNCE)
            .restitution_combine_rule(CoefficientCombineRule::Max)
            .friction(0.0)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        BodyHandle(handle)
    }

    /// Remove a body and its collider from the simulation. The handle is
    /// invalid afterwards.
    pub fn destroy_body(&mut self, handle: BodyHandle) -> Result<Body, PhysicsError> {
        let snapshot = self.body(handle).ok_or(PhysicsError::UnknownBody(handle))?;
        self.bodies.remove(
            handle.0,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        Ok(snapshot)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<Body> {
        let body = self.bodies.get(handle.0)?;
        let collider = body
            .colliders()
            .first()
            .and_then(|c| self.colliders.get(*c));
        let radius = collider
            .and_then(|c| c.shape().as_ball())
            .map_or(0.0, |ball| ball.radius * PPM);
        Some(Body {
            position: to_px(body.translation()),
            velocity: to_px(body.linvel()),
            radius,
            density: collider.map_or(0.0, |c| c.density()),
            fixed: body.is_fixed(),
        })
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    pub fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) -> Result<(), PhysicsError> {
        let body = self
            .bodies
            .get_mut(handle.0)
            .ok_or(PhysicsError::UnknownBody(handle))?;
        body.set_linvel(to_world(velocity), true);
        Ok(())
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Visit every live body. Order is unspecified.
    pub fn for_each_body(&self, mut visitor: impl FnMut(BodyHandle, Body)) {
        for (handle, _) in self.bodies.iter() {
            let handle = BodyHandle(handle);
            if let Some(body) = self.body(handle) {
                visitor(handle, body);
            }
        }
    }

    /// Advance all bodies by `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }
}
