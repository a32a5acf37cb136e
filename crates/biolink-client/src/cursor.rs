//! Particle trail that follows the pointer. Headless: the simulation runs and
//! reports what would be drawn, but nothing is rendered.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

pub const PARTICLES_PER_MOVE: usize = 3;
const FIRE_COLORS: [&str; 4] = ["#ff0000", "#ff4500", "#ffa500", "#ffff00"];
const FIRE_SHRINK: f64 = 0.95;
const MIN_SIZE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Snow,
    Bubbles,
    Fire,
}

impl EffectKind {
    /// `none` and unknown names map to `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "snow" => Some(Self::Snow),
            "bubbles" => Some(Self::Bubbles),
            "fire" => Some(Self::Fire),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub kind: EffectKind,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    /// 1.0 at spawn, dead at 0.
    pub life: f64,
    pub decay: f64,
    pub color: &'static str,
    wobble: f64,
}

impl Particle {
    fn spawn(kind: EffectKind, x: f64, y: f64, rng: &mut impl Rng) -> Self {
        let mut p = Self {
            kind,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            size: 0.0,
            life: 1.0,
            decay: 0.0,
            color: "#ffffff",
            wobble: 0.0,
        };
        match kind {
            EffectKind::Snow => {
                p.vx = (rng.gen::<f64>() - 0.5) * 2.0;
                p.vy = rng.gen::<f64>() * 2.0 + 1.0;
                p.size = rng.gen::<f64>() * 3.0 + 2.0;
                p.decay = 0.01;
            }
            EffectKind::Bubbles => {
                p.vx = rng.gen::<f64>() - 0.5;
                p.vy = -(rng.gen::<f64>() * 2.0 + 1.0);
                p.size = rng.gen::<f64>() * 4.0 + 2.0;
                p.color = "rgba(255, 255, 255, 0.3)";
                p.decay = 0.015;
                p.wobble = rng.gen::<f64>() * PI * 2.0;
            }
            EffectKind::Fire => {
                p.vx = (rng.gen::<f64>() - 0.5) * 3.0;
                p.vy = -(rng.gen::<f64>() * 3.0 + 2.0);
                p.size = rng.gen::<f64>() * 6.0 + 4.0;
                p.color = FIRE_COLORS[rng.gen_range(0..FIRE_COLORS.len())];
                p.decay = 0.04;
            }
        }
        p
    }

    fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.life -= self.decay;
        match self.kind {
            EffectKind::Bubbles => self.x += (self.life * 10.0 + self.wobble).sin() * 0.5,
            EffectKind::Fire => self.size *= FIRE_SHRINK,
            EffectKind::Snow => {}
        }
    }

    fn is_dead(&self) -> bool {
        self.life <= 0.0 || self.size <= MIN_SIZE
    }
}

/// The full-viewport overlay particles are drawn on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    /// Particles drawn in the last frame.
    pub drawn: usize,
}

pub struct CursorEffects {
    name: String,
    kind: Option<EffectKind>,
    particles: Vec<Particle>,
    canvas: Option<Canvas>,
    viewport: (f64, f64),
    pointer: (f64, f64),
    running: bool,
    frames: u64,
    rng: StdRng,
}

impl Default for CursorEffects {
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl CursorEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic particles, for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            name: "none".into(),
            kind: None,
            particles: Vec::new(),
            canvas: None,
            viewport: (1920.0, 1080.0),
            pointer: (0.0, 0.0),
            running: false,
            frames: 0,
            rng,
        }
    }

    /// Switching to the current effect does nothing. Any other switch drops
    /// every live particle.
    pub fn set_effect(&mut self, name: &str) {
        if name == self.name {
            return;
        }
        self.name = name.to_string();
        self.particles.clear();
        self.kind = EffectKind::from_name(name);

        match self.kind {
            None => {
                if name != "none" {
                    tracing::warn!("cursor: unknown effect {:?}, disabling", name);
                }
                self.running = false;
                if let Some(canvas) = &mut self.canvas {
                    canvas.drawn = 0;
                }
            }
            Some(_) => {
                let (width, height) = self.viewport;
                self.canvas.get_or_insert(Canvas {
                    width,
                    height,
                    drawn: 0,
                });
                self.running = true;
            }
        }
    }

    pub fn effect(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.running
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = (width, height);
        if let Some(canvas) = &mut self.canvas {
            canvas.width = width;
            canvas.height = height;
        }
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer = (x, y);
        let Some(kind) = self.kind.filter(|_| self.running) else {
            return;
        };
        for _ in 0..PARTICLES_PER_MOVE {
            let particle = Particle::spawn(kind, x, y, &mut self.rng);
            self.particles.push(particle);
        }
    }

    /// One animation frame. Returns how many particles are still alive; a
    /// halted animator does nothing and returns 0.
    pub fn step(&mut self) -> usize {
        if !self.running {
            return 0;
        }
        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(|p| !p.is_dead());
        self.frames += 1;
        if let Some(canvas) = &mut self.canvas {
            canvas.drawn = self.particles.len();
        }
        self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_by_default_and_lazily_creates_canvas() {
        let mut fx = CursorEffects::with_seed(1);
        assert!(!fx.is_active());
        assert!(fx.canvas().is_none());

        fx.pointer_moved(10.0, 10.0);
        assert!(fx.particles().is_empty());

        fx.set_effect("snow");
        assert!(fx.is_active());
        assert!(fx.canvas().is_some());
    }

    #[test]
    fn each_move_spawns_three_particles_at_the_pointer() {
        let mut fx = CursorEffects::with_seed(2);
        fx.set_effect("fire");
        fx.pointer_moved(100.0, 50.0);

        assert_eq!(fx.particles().len(), PARTICLES_PER_MOVE);
        for p in fx.particles() {
            assert_eq!((p.x, p.y), (100.0, 50.0));
            assert!(p.vy <= -2.0 && p.vy >= -5.0);
            assert!(p.size >= 4.0 && p.size <= 10.0);
            assert!(FIRE_COLORS.contains(&p.color));
        }
    }

    #[test]
    fn snow_falls_and_expires_after_its_life() {
        let mut fx = CursorEffects::with_seed(3);
        fx.set_effect("snow");
        fx.pointer_moved(0.0, 0.0);

        fx.step();
        assert!(fx.particles().iter().all(|p| p.y > 0.0));

        // decay 0.01 -> gone after 100 frames
        let mut alive = fx.particles().len();
        for _ in 0..110 {
            alive = fx.step();
        }
        assert_eq!(alive, 0);
        assert_eq!(fx.canvas().unwrap().drawn, 0);
    }

    #[test]
    fn fire_shrinks_every_frame() {
        let mut fx = CursorEffects::with_seed(4);
        fx.set_effect("fire");
        fx.pointer_moved(0.0, 0.0);
        let before: Vec<f64> = fx.particles().iter().map(|p| p.size).collect();

        fx.step();
        for (p, size) in fx.particles().iter().zip(before) {
            assert!((p.size - size * 0.95).abs() < 1e-9);
            assert!((p.life - 0.96).abs() < 1e-9);
        }
    }

    #[test]
    fn bubbles_rise() {
        let mut fx = CursorEffects::with_seed(5);
        fx.set_effect("bubbles");
        fx.pointer_moved(0.0, 100.0);
        fx.step();
        assert!(fx.particles().iter().all(|p| p.y < 100.0));
    }

    #[test]
    fn same_effect_is_a_no_op_and_changes_clear_particles() {
        let mut fx = CursorEffects::with_seed(6);
        fx.set_effect("snow");
        fx.pointer_moved(0.0, 0.0);

        fx.set_effect("snow");
        assert_eq!(fx.particles().len(), 3);

        fx.set_effect("bubbles");
        assert!(fx.particles().is_empty());
        assert!(fx.is_active());
    }

    #[test]
    fn none_halts_the_loop() {
        let mut fx = CursorEffects::with_seed(7);
        fx.set_effect("fire");
        fx.pointer_moved(0.0, 0.0);
        fx.step();

        fx.set_effect("none");
        assert!(!fx.is_active());
        assert!(fx.particles().is_empty());
        assert_eq!(fx.step(), 0);
        assert_eq!(fx.frames(), 1);
        // The canvas outlives the effect, cleared.
        assert_eq!(fx.canvas().unwrap().drawn, 0);
    }

    #[test]
    fn unknown_effect_behaves_like_none() {
        let mut fx = CursorEffects::with_seed(8);
        fx.set_effect("sparkles");
        assert_eq!(fx.effect(), "sparkles");
        assert!(!fx.is_active());
        fx.pointer_moved(1.0, 1.0);
        assert!(fx.particles().is_empty());
    }
}
