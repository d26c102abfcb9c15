use std::f32::consts::TAU;

use rand::Rng;

use crate::world::grid::Vec2;

/// Visual flavor of a burst; each kind carries its own count, lifetime,
/// size, and palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Sparkle,
    Dust,
    Footstep,
}

#[derive(Debug, Clone, Copy)]
struct BurstProfile {
    count: usize,
    base_life: f32,
    base_speed: f32,
    size: f32,
    color: [u8; 4],
}

impl ParticleKind {
    fn profile(self) -> BurstProfile {
        match self {
            ParticleKind::Sparkle => BurstProfile {
                count: 12,
                base_life: 0.6,
                base_speed: 60.0,
                size: 3.0,
                color: [255, 224, 96, 255],
            },
            ParticleKind::Dust => BurstProfile {
                count: 8,
                base_life: 0.45,
                base_speed: 30.0,
                size: 2.0,
                color: [168, 144, 120, 255],
            },
            ParticleKind::Footstep => BurstProfile {
                count: 3,
                base_life: 0.3,
                base_speed: 14.0,
                size: 1.5,
                color: [120, 120, 128, 200],
            },
        }
    }
}

/// Transient decorative point effect. Created by event triggers, destroyed
/// when life reaches zero. The renderer reads these, never mutates them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub color: [u8; 4],
    pub kind: ParticleKind,
}

impl Particle {
    /// Fade factor for rendering; 1.0 fresh, 0.0 expired.
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    /// Spawns one burst of a kind at a point, with jittered directions,
    /// speeds, and lifetimes drawn from the caller's RNG.
    pub fn spawn_burst<R: Rng>(&mut self, kind: ParticleKind, at: Vec2, rng: &mut R) {
        let profile = kind.profile();
        for _ in 0..profile.count {
            let angle = rng.gen_range(0.0..TAU);
            let speed = profile.base_speed * rng.gen_range(0.5..1.5);
            let life = profile.base_life * rng.gen_range(0.7..1.3);
            self.particles.push(Particle {
                position: at,
                velocity: Vec2::new(angle.cos() * speed, angle.sin() * speed),
                life,
                max_life: life,
                size: profile.size,
                color: profile.color,
                kind,
            });
        }
    }

    /// Integrates positions and decays lifetimes; expired particles are
    /// dropped.
    pub fn update(&mut self, dt_seconds: f32) {
        for particle in &mut self.particles {
            particle.position.x += particle.velocity.x * dt_seconds;
            particle.position.y += particle.velocity.y * dt_seconds;
            particle.life -= dt_seconds;
        }
        self.particles.retain(|particle| particle.life > 0.0);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
