//! Per-region screen shake.
//!
//! Shake never touches framing state. The manager samples an offset every
//! tick and adds it to the region's view focus only.

use bevy::math::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// An in-progress shake on one region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeState {
    /// Peak displacement in world units.
    pub intensity: f32,
    /// Seconds until the shake has fully decayed.
    pub duration: f32,
    pub elapsed: f32,
}

impl ShakeState {
    pub fn new(intensity: f32, duration: f32) -> Self {
        Self {
            intensity: intensity.max(0.0),
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    /// Current displacement, decaying linearly from `intensity` to zero.
    pub fn amplitude(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.intensity * (1.0 - t)
    }

    pub fn advance(&mut self, delta_seconds: f32) {
        self.elapsed += delta_seconds.max(0.0);
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Samples this tick's offset: current amplitude in a random direction.
    pub fn sample(&self, rng: &mut ChaCha8Rng) -> Vec2 {
        let amplitude = self.amplitude();
        if amplitude <= 0.0 {
            return Vec2::ZERO;
        }
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        Vec2::from_angle(angle) * amplitude
    }
}
