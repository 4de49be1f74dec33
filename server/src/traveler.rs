//! Circles launched from a launcher.
//!
//! Lifecycle, by age since spawn:
//!
//! ```text
//! [0, fully_visible)                       Active   alpha = initial
//! [fully_visible, fully_visible + fade)    Fading   alpha ramps to 0
//! >= fully_visible + fade                  Dead     alpha = 0, terminated once
//! ```
//!
//! A dead traveler hands its body back through [`Termination`]; the caller
//! destroys it in the same frame. The sweep later drops the traveler itself.

use crane_shared::color::Rgb;
use crane_shared::protocol::TravelerWire;
use crane_shared::vec2::Vec2;

use crate::error::PhysicsError;
use crate::physics::{BodyHandle, PhysicsWorld};

/// Initial speed in pixels per second
pub const LAUNCH_SPEED: f64 = 750.0;
/// Per-frame velocity factor while moving
pub const DAMPING: f64 = 0.97;
/// Below this speed (pixels per second) damping stops
pub const MIN_MOVE_SPEED: f64 = 15.0;
pub const INNER_RADIUS: f64 = 5.0;
pub const OUTER_RADIUS: f64 = INNER_RADIUS * 2.0;
pub const STROKE: f64 = 2.0;
pub const BODY_RADIUS: f64 = OUTER_RADIUS + STROKE;
pub const TRAVELER_DENSITY: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelerTimings {
    /// Seconds at full alpha
    pub fully_visible: f64,
    /// Seconds to fade from full alpha to zero
    pub fade: f64,
}

impl TravelerTimings {
    pub fn lifetime(&self) -> f64 {
        self.fully_visible + self.fade
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Active,
    Fading,
    Dead,
}

/// Raised exactly once, by the update in which a traveler dies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "the released body must be destroyed"]
pub struct Termination {
    pub body: Option<BodyHandle>,
}

#[derive(Debug, Clone)]
pub struct Traveler {
    /// Launcher the traveler left from
    pub origin: Vec2,
    pub color: Rgb,
    pub track_color: Rgb,
    pub spawned_at: f64,
    alpha: u8,
    initial_alpha: u8,
    body: Option<BodyHandle>,
    enabled: bool,
    timings: TravelerTimings,
}

impl Traveler {
    pub fn new(color: Rgb, origin: Vec2, spawned_at: f64, timings: TravelerTimings) -> Self {
        Self {
            origin,
            color,
            track_color: color,
            spawned_at,
            alpha: u8::MAX,
            initial_alpha: u8::MAX,
            body: None,
            enabled: true,
            timings,
        }
    }

    /// Create the traveler's body at `position` and send it off along `direction`.
    pub fn launch(
        &mut self,
        world: &mut PhysicsWorld,
        position: Vec2,
        direction: Vec2,
    ) -> Result<BodyHandle, PhysicsError> {
        let handle = world.create_body(TRAVELER_DENSITY, position, BODY_RADIUS);
        world.set_velocity(handle, direction * LAUNCH_SPEED)?;
        self.body = Some(handle);
        Ok(handle)
    }

    pub fn phase(&self, now: f64) -> Phase {
        let age = now - self.spawned_at;
        if age >= self.timings.lifetime() {
            Phase::Dead
        } else if age >= self.timings.fully_visible {
            Phase::Fading
        } else {
            Phase::Active
        }
    }

    /// Per-frame damping and fade. Returns the termination on the frame the
    /// traveler dies, and never again.
    pub fn update(&mut self, now: f64, world: &mut PhysicsWorld) -> Option<Termination> {
        if !self.enabled {
            return None;
        }

        if let Some(handle) = self.body {
            if let Some(body) = world.body(handle) {
                if body.velocity.length() > MIN_MOVE_SPEED {
                    let _ = world.set_velocity(handle, body.velocity * DAMPING);
                }
            }
        }

        match self.phase(now) {
            Phase::Active => None,
            Phase::Fading => {
                let remaining = self.timings.lifetime() - (now - self.spawned_at);
                let fraction = (remaining / self.timings.fade).clamp(0.0, 1.0);
                self.alpha = (fraction * self.initial_alpha as f64) as u8;
                None
            }
            Phase::Dead => {
                self.alpha = 0;
                self.enabled = false;
                Some(Termination {
                    body: self.body.take(),
                })
            }
        }
    }

    /// Detach the body reference, leaving the traveler bodiless.
    pub fn take_body(&mut self) -> Option<BodyHandle> {
        self.body.take()
    }

    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn position(&self, world: &PhysicsWorld) -> Option<Vec2> {
        self.body.and_then(|h| world.body(h)).map(|b| b.position)
    }

    pub fn to_wire(&self, world: &PhysicsWorld) -> Option<TravelerWire> {
        let pos = self.position(world)?;
        Some(TravelerWire {
            origin: self.origin.round2(),
            pos: pos.round2(),
            radius: BODY_RADIUS,
            color: self.color,
            alpha: self.alpha,
        })
    }
}
