use crane_shared::color::Rgb;
use crane_shared::protocol::{SceneStateMsg, WelcomeMsg, PROTOCOL_VERSION};
use std::collections::HashMap;

use crate::config::{InstallationConfig, Viewport};
use crate::ingest::{ColorEvent, DatagramSource, IngestBridge};
use crate::launcher::Launcher;
use crate::osc::ColorSink;
use crate::physics::{Bounds, PhysicsWorld};
use crate::traveler::{Traveler, TravelerTimings};

/// Launcher targeted by the keyboard debug trigger
pub const DEBUG_LAUNCHER_ID: &str = "1";

/// What happened during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub launched: usize,
    pub terminated: usize,
    pub swept: usize,
}

/// Central simulation state owned by the frame loop task.
pub struct Installation {
    world: PhysicsWorld,
    launchers: Vec<Launcher>,
    launcher_index: HashMap<String, usize>,
    travelers: Vec<Traveler>,
    timings: TravelerTimings,
    viewport: Viewport,
    tick_dt: f64,
    gc_interval: f64,
    next_gc_at: f64,
}

impl Installation {
    pub fn new(config: &InstallationConfig) -> Self {
        let viewport = config.viewport;
        let mut world = PhysicsWorld::new(Bounds::from_size(viewport.width, viewport.height));

        for color in &config.colors {
            tracing::info!(
                "Color accepted: {} Shown as {} (threshold {})",
                color.rgb,
                color.representation,
                color.threshold
            );
        }

        let mut launchers = Vec::with_capacity(config.launchers.len());
        let mut launcher_index = HashMap::new();
        for entry in &config.launchers {
            let mut launcher = Launcher::new(entry, config.secs_between_launches);
            launcher.attach_body(&mut world);
            tracing::info!(
                "Launcher added at ({}, {}) with id {:?} and angles: [{}, {}]",
                launcher.position.x,
                launcher.position.y,
                launcher.id,
                launcher.min_angle,
                launcher.max_angle
            );
            launcher_index.insert(launcher.id.clone(), launchers.len());
            launchers.push(launcher);
        }

        Self {
            world,
            launchers,
            launcher_index,
            travelers: Vec::new(),
            timings: config.traveler_timings(),
            viewport,
            tick_dt: 1.0 / config.tick_rate_hz as f64,
            gc_interval: config.gc_interval_secs,
            next_gc_at: 0.0,
        }
    }

    /// Run one frame: drain reports, step physics, animate launchers,
    /// age travelers, and sweep when the interval has elapsed.
    pub fn tick<S: DatagramSource>(
        &mut self,
        now: f64,
        ingest: &mut IngestBridge<S>,
        sink: &mut impl ColorSink,
    ) -> FrameReport {
        let mut launched = 0;
        for event in ingest.drain() {
            if self.handle_color(&event, now, sink).is_some() {
                launched += 1;
            }
        }
        let mut report = self.advance(now);
        report.launched += launched;
        report
    }

    /// Frame steps after ingest.
    pub fn advance(&mut self, now: f64) -> FrameReport {
        let mut report = FrameReport::default();

        self.world.step(self.tick_dt);

        for launcher in &mut self.launchers {
            launcher.update(now, self.viewport.width);
        }

        for traveler in &mut self.travelers {
            let Some(termination) = traveler.update(now, &mut self.world) else {
                continue;
            };
            report.terminated += 1;
            if let Some(handle) = termination.body {
                if let Err(e) = self.world.destroy_body(handle) {
                    tracing::warn!("Terminated traveler: {}", e);
                }
            }
        }

        if now > self.next_gc_at {
            report.swept = self.sweep();
            self.next_gc_at = now + self.gc_interval;
        }

        report
    }

    /// React to a resolved crane report. Returns the new traveler's index,
    /// or `None` when the launcher is unknown or cooling down.
    pub fn handle_color(
        &mut self,
        event: &ColorEvent,
        now: f64,
        sink: &mut impl ColorSink,
    ) -> Option<usize> {
        let Some(&idx) = self.launcher_index.get(&event.sender_id) else {
            tracing::debug!("No launcher for crane {}", event.sender_id);
            return None;
        };
        let launcher = &mut self.launchers[idx];
        if !launcher.can_launch(now) {
            return None;
        }

        let reservation = launcher.launch(now);
        let direction = launcher.direction(event.position);
        let spawn_at = launcher.traveler_position(direction);

        let mut traveler = Traveler::new(event.display, launcher.position, now, self.timings);
        if let Err(e) = traveler.launch(&mut self.world, spawn_at, direction) {
            tracing::warn!("Launch from {} failed: {}", launcher.id, e);
            return None;
        }
        tracing::debug!(
            "Launched {} from {} at position {:.3}, next launch at {:.2}s",
            event.display,
            launcher.id,
            event.position,
            reservation.next_allowed_at
        );
        self.travelers.push(traveler);

        if let Err(e) = sink.send_color(event.display) {
            tracing::warn!("Failed to forward color {}: {}", event.display, e);
        }

        Some(self.travelers.len() - 1)
    }

    /// Debug launch from launcher "1" at position `digit / 10`.
    pub fn trigger_debug(
        &mut self,
        digit: u8,
        now: f64,
        sink: &mut impl ColorSink,
    ) -> Option<usize> {
        if digit > 9 {
            return None;
        }
        let event = ColorEvent {
            sender_id: DEBUG_LAUNCHER_ID.to_string(),
            display: Rgb::GRAY,
            reference: Rgb::GRAY,
            position: digit as f64 / 10.0,
        };
        self.handle_color(&event, now, sink)
    }

    /// Release bodies still held by disabled travelers, then drop those
    /// travelers. Returns how many were removed.
    pub fn sweep(&mut self) -> usize {
        let mut garbage = Vec::new();
        for (idx, traveler) in self.travelers.iter_mut().enumerate() {
            if traveler.is_enabled() {
                continue;
            }
            if let Some(handle) = traveler.take_body() {
                if let Err(e) = self.world.destroy_body(handle) {
                    tracing::warn!("Sweep: {}", e);
                }
            }
            garbage.push(idx);
        }

        // Back to front so earlier indices stay valid
        for &idx in garbage.iter().rev() {
            self.travelers.remove(idx);
        }

        if !garbage.is_empty() {
            tracing::debug!(
                "Swept {} travelers, {} remain",
                garbage.len(),
                self.travelers.len()
            );
        }
        garbage.len()
    }

    pub fn launcher(&self, id: &str) -> Option<&Launcher> {
        self.launcher_index.get(id).map(|&idx| &self.launchers[idx])
    }

    pub fn launchers(&self) -> &[Launcher] {
        &self.launchers
    }

    pub fn travelers(&self) -> &[Traveler] {
        &self.travelers
    }

    pub fn active_traveler_count(&self) -> usize {
        self.travelers.iter().filter(|t| t.is_enabled()).count()
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn welcome(&self) -> WelcomeMsg {
        WelcomeMsg {
            protocol_version: PROTOCOL_VERSION,
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            viewport: [self.viewport.width, self.viewport.height],
            launchers: self.launchers.iter().map(Launcher::to_wire).collect(),
        }
    }

    pub fn scene_state(&self, now: f64) -> SceneStateMsg {
        SceneStateMsg {
            time: (now * 1000.0).round() / 1000.0,
            launchers: self.launchers.iter().map(|l| l.state_wire(now)).collect(),
            travelers: self
                .travelers
                .iter()
                .filter(|t| t.is_enabled())
                .filter_map(|t| t.to_wire(&self.world))
                .collect(),
        }
    }
}
