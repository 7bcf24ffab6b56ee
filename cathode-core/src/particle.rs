use glam::DVec3;

/// Brightness lost by a particle on every `decay` call
pub const DECAY_PER_SUBSTEP: f64 = 0.001;

/// A beam particle: kinematic state plus the fading brightness that doubles
/// as its liveness signal
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pos: DVec3,
    vel: DVec3,
    acc: DVec3,
    brightness: f64,
}

impl Particle {
    /// Fresh particle at full brightness with no pending force
    pub fn new(pos: DVec3, vel: DVec3) -> Self {
        Self {
            pos,
            vel,
            acc: DVec3::ZERO,
            brightness: 1.0,
        }
    }

    pub fn position(&self) -> DVec3 {
        self.pos
    }

    pub fn velocity(&self) -> DVec3 {
        self.vel
    }

    /// Force gathered since the last `integrate`
    pub fn accumulated_force(&self) -> DVec3 {
        self.acc
    }

    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    /// Greyscale colour used by renderers (r = g = b = brightness)
    pub fn color(&self) -> [f64; 3] {
        [self.brightness; 3]
    }

    pub fn apply_force(&mut self, force: DVec3) {
        self.acc += force;
    }

    pub fn decay(&mut self) {
        self.brightness -= DECAY_PER_SUBSTEP;
    }

    pub fn is_dead(&self) -> bool {
        self.brightness < 0.0
    }

    /// Catch the particle at `x` along the beam axis and stop it.
    /// The pending force is kept and still lands in the next `integrate`.
    pub fn pin_at(&mut self, x: f64) {
        self.pos.x = x;
        self.vel = DVec3::ZERO;
    }

    /// Semi-implicit Euler: v += a, then x += v, then the force is cleared
    pub fn integrate(&mut self) {
        self.vel += self.acc;
        self.pos += self.vel;
        self.acc = DVec3::ZERO;
    }
}
