use crane_shared::color::Rgba;
use crane_shared::protocol::{LauncherStateWire, LauncherWire};
use crane_shared::vec2::Vec2;

use crate::config::LauncherEntry;
use crate::physics::{BodyHandle, PhysicsWorld};

/// Number of idle wave slots per launcher
pub const WAVE_SLOTS: usize = 50;
/// Wave growth in pixels per frame
pub const WAVE_VELOCITY: f64 = 0.5;
/// Seconds between new idle waves
pub const WAVE_INTERVAL: f64 = 2.0;
pub const INNER_RADIUS: f64 = 50.0;
pub const OUTER_RADIUS: f64 = 60.0;
/// Extra gap between the launcher rim and a freshly spawned traveler
pub const LAUNCH_OFFSET: f64 = 25.0;

/// Returned by [`Launcher::launch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reservation {
    pub launched_at: f64,
    pub next_allowed_at: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LauncherColors {
    pub inner: Rgba,
    pub border: Rgba,
    pub wave: Rgba,
}

/// Stationary emitter. Lives for the whole run.
#[derive(Debug, Clone)]
pub struct Launcher {
    pub id: String,
    pub position: Vec2,
    pub min_angle: f64,
    pub max_angle: f64,
    pub colors: LauncherColors,
    cooldown: f64,
    /// Forward-dated: set to `launch time + cooldown` on every launch
    last_launch: f64,
    /// 0.0 marks an inactive slot
    waves: [f64; WAVE_SLOTS],
    next_wave_at: f64,
    body: Option<BodyHandle>,
}

impl Launcher {
    pub fn new(entry: &LauncherEntry, cooldown: f64) -> Self {
        Self {
            id: entry.id.clone(),
            position: entry.position.0,
            min_angle: entry.min_angle,
            max_angle: entry.max_angle,
            colors: LauncherColors {
                inner: entry.rgb,
                border: entry.border,
                wave: entry.wave,
            },
            cooldown,
            last_launch: f64::NEG_INFINITY,
            waves: [0.0; WAVE_SLOTS],
            next_wave_at: 0.0,
            body: None,
        }
    }

    /// Register the launcher's fixed body with the world.
    pub fn attach_body(&mut self, world: &mut PhysicsWorld) -> BodyHandle {
        let handle = world.create_fixed_body(self.position, OUTER_RADIUS);
        self.body = Some(handle);
        handle
    }

    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    pub fn can_launch(&self, now: f64) -> bool {
        now >= self.last_launch + self.cooldown
    }

    /// Reserve the launcher. The reservation is dated one cooldown after
    /// `now`, so the next launch is allowed at `now + 2 * cooldown`.
    pub fn launch(&mut self, now: f64) -> Reservation {
        self.last_launch = now + self.cooldown;
        Reservation {
            launched_at: now,
            next_allowed_at: self.last_launch + self.cooldown,
        }
    }

    /// Unit launch direction for `t` in [0, 1] across the angular range.
    pub fn direction(&self, t: f64) -> Vec2 {
        let angle = (self.max_angle - self.min_angle) * t + self.min_angle;
        Vec2::from_angle_deg(angle)
    }

    /// Spawn point for a traveler leaving in `direction`.
    pub fn traveler_position(&self, direction: Vec2) -> Vec2 {
        self.position + direction * (OUTER_RADIUS + LAUNCH_OFFSET)
    }

    /// Advance the idle ripple animation by one frame.
    pub fn update(&mut self, now: f64, viewport_width: f64) {
        if self.next_wave_at < now {
            if let Some(slot) = self.waves.iter_mut().find(|w| **w == 0.0) {
                *slot = OUTER_RADIUS;
            }
            self.next_wave_at = now + WAVE_INTERVAL;
        }

        let limit = viewport_width * 2.0;
        for wave in self.waves.iter_mut().filter(|w| **w != 0.0) {
            *wave += WAVE_VELOCITY;
            if *wave > limit {
                *wave = 0.0;
            }
        }
    }

    /// Radii of active waves
    pub fn waves(&self) -> impl Iterator<Item = f64> + '_ {
        self.waves.iter().copied().filter(|w| *w != 0.0)
    }

    pub fn to_wire(&self) -> LauncherWire {
        LauncherWire {
            id: self.id.clone(),
            pos: self.position.round2(),
            min_angle: self.min_angle,
            max_angle: self.max_angle,
            inner_radius: INNER_RADIUS,
            outer_radius: OUTER_RADIUS,
            inner: self.colors.inner,
            border: self.colors.border,
            wave: self.colors.wave,
        }
    }

    pub fn state_wire(&self, now: f64) -> LauncherStateWire {
        LauncherStateWire {
            id: self.id.clone(),
            ready: self.can_launch(now),
            waves: self.waves().map(|w| (w * 10.0).round() / 10.0).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Bounds;
    use crane_shared::color::PointStr;
    use crane_shared::vec2::vec2;

    const COOLDOWN: f64 = 0.25;

    fn entry(min_angle: f64, max_angle: f64) -> LauncherEntry {
        LauncherEntry {
            id: "1".to_string(),
            position: PointStr(vec2(300.0, 500.0)),
            rgb: Rgba::new(240, 240, 240, 255),
            border: Rgba::new(215, 185, 140, 255),
            wave: Rgba::new(255, 222, 166, 255),
            min_angle,
            max_angle,
        }
    }

    fn launcher() -> Launcher {
        Launcher::new(&entry(-60.0, 60.0), COOLDOWN)
    }

    fn assert_close(a: Vec2, b: Vec2) {
        assert!(a.distance(b) < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn fresh_launcher_can_launch() {
        assert!(launcher().can_launch(0.0));
    }

    #[test]
    fn launch_blocks_for_two_cooldowns() {
        let mut l = launcher();
        let t = 10.0;
        let reservation = l.launch(t);
        assert_eq!(reservation.launched_at, t);
        assert_eq!(reservation.next_allowed_at, t + 2.0 * COOLDOWN);
        assert!(!l.can_launch(t));
        assert!(!l.can_launch(t + COOLDOWN));
        assert!(!l.can_launch(t + 2.0 * COOLDOWN - 1e-6));
        assert!(l.can_launch(t + 2.0 * COOLDOWN));
        assert!(l.can_launch(t + 100.0));
    }

    #[test]
    fn zero_cooldown_never_blocks() {
        let mut l = Launcher::new(&entry(0.0, 90.0), 0.0);
        l.launch(3.0);
        assert!(l.can_launch(3.0));
    }

    #[test]
    fn direction_endpoints_match_angle_range() {
        let l = launcher();
        assert_close(l.direction(0.0), Vec2::from_angle_deg(-60.0));
        assert_close(l.direction(1.0), Vec2::from_angle_deg(60.0));
        assert_close(l.direction(0.5), vec2(1.0, 0.0));
    }

    #[test]
    fn direction_interpolates_monotonically() {
        let l = Launcher::new(&entry(10.0, 170.0), COOLDOWN);
        let mut previous = f64::NEG_INFINITY;
        for i in 0..=20 {
            let d = l.direction(i as f64 / 20.0);
            assert!((d.length() - 1.0).abs() < 1e-12);
            let angle = d.y.atan2(d.x).to_degrees();
            assert!(angle > previous);
            previous = angle;
        }
    }

    #[test]
    fn traveler_spawns_outside_rim() {
        let l = launcher();
        let p = l.traveler_position(vec2(1.0, 0.0));
        assert_close(p, vec2(300.0 + OUTER_RADIUS + LAUNCH_OFFSET, 500.0));
    }

    #[test]
    fn first_update_starts_a_wave() {
        let mut l = launcher();
        l.update(0.1, 1920.0);
        let waves: Vec<f64> = l.waves().collect();
        assert_eq!(waves, vec![OUTER_RADIUS + WAVE_VELOCITY]);
    }

    #[test]
    fn waves_spawn_on_interval() {
        let mut l = launcher();
        let mut now = 0.0;
        for _ in 0..(60 * 5) {
            now += 1.0 / 60.0;
            l.update(now, 1920.0);
        }
        // t ~ 0.017, ~2.03, ~4.05
        assert_eq!(l.waves().count(), 3);
    }

    #[test]
    fn waves_reset_past_twice_viewport_width() {
        let mut l = launcher();
        l.update(0.1, 40.0);
        // 60 + 0.5 > 80 only after enough frames
        for _ in 0..40 {
            l.update(0.2, 40.0);
        }
        assert_eq!(l.waves().count(), 0);
    }

    #[test]
    fn wave_slots_are_bounded() {
        let mut l = launcher();
        for i in 0..200 {
            l.update(i as f64 * (WAVE_INTERVAL + 0.1), 100_000.0);
        }
        assert_eq!(l.waves().count(), WAVE_SLOTS);
    }

    #[test]
    fn attach_body_registers_fixed_circle() {
        let mut world = PhysicsWorld::new(Bounds::from_size(1920.0, 1080.0));
        let mut l = launcher();
        let h = l.attach_body(&mut world);
        assert_eq!(l.body(), Some(h));
        let body = world.body(h).unwrap();
        assert!((body.radius - OUTER_RADIUS).abs() < 1e-9);
        assert!(body.fixed);
        assert_eq!(body.position, vec2(300.0, 500.0));
    }
}
