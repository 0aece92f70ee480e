use std::{
    collections::VecDeque,
    f32::consts::{FRAC_PI_2, PI, TAU},
};

use glam::Vec2;
use pacboy_core::{AbilityKind, Direction};
use rand::Rng;

use crate::{Particle, ParticleBehavior, ParticleHint};

/// Closed interval a particle property is sampled from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl Span {
    /// Creates a span. Inverted bounds collapse to `min`.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Span that always yields `value`.
    #[must_use]
    pub const fn fixed(value: f32) -> Self {
        Self::new(value, value)
    }

    fn sample<R>(&self, rng: &mut R) -> f32
    where
        R: Rng + ?Sized,
    {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

/// Probabilities of attaching each secondary behavior. At most one applies.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BehaviorMix {
    /// Chance of erratic redirection.
    pub erratic: f64,
    /// Chance of an oscillating shake.
    pub shake: f64,
    /// Chance of a trailing history.
    pub trail: f64,
    /// Positions remembered by trailing particles.
    pub trail_length: usize,
}

/// Kinematic ranges a burst samples its particles from.
#[derive(Clone, Debug, PartialEq)]
pub struct BurstProfile {
    /// Central launch angle in radians, y axis pointing down.
    pub heading: f32,
    /// Total angular width of the launch cone in radians.
    pub spread: f32,
    /// Launch speed in cells per second.
    pub speed: Span,
    /// Initial normalised life.
    pub life: Span,
    /// Life lost per second.
    pub decay: Span,
    /// Visual size in cells.
    pub size: Span,
    /// Rotation speed in radians per second.
    pub spin: Span,
    /// Downward acceleration applied to every particle.
    pub gravity: f32,
    /// Fraction of speed kept on edge bounces.
    pub restitution: f32,
    /// Glyph families picked uniformly per particle.
    pub hints: Vec<ParticleHint>,
    /// Secondary behavior probabilities.
    pub behaviors: BehaviorMix,
}

impl BurstProfile {
    /// Fireworks released when a level is cleared.
    #[must_use]
    pub fn celebration() -> Self {
        Self {
            heading: -FRAC_PI_2,
            spread: TAU,
            speed: Span::new(2.0, 6.0),
            life: Span::new(0.9, 1.0),
            decay: Span::new(0.4, 0.8),
            size: Span::new(0.2, 0.5),
            spin: Span::new(-4.0, 4.0),
            gravity: 6.0,
            restitution: 0.6,
            hints: vec![
                ParticleHint::Emoji,
                ParticleHint::Circle,
                ParticleHint::Star,
                ParticleHint::Sparkle,
            ],
            behaviors: BehaviorMix {
                erratic: 0.2,
                shake: 0.0,
                trail: 0.4,
                trail_length: 5,
            },
        }
    }

    /// Slow smoky collapse shown when the campaign is lost.
    #[must_use]
    pub fn defeat() -> Self {
        Self {
            heading: -FRAC_PI_2,
            spread: PI,
            speed: Span::new(0.5, 2.5),
            life: Span::fixed(1.0),
            decay: Span::new(0.25, 0.5),
            size: Span::new(0.3, 0.8),
            spin: Span::new(-1.0, 1.0),
            gravity: 1.5,
            restitution: 0.3,
            hints: vec![ParticleHint::Smoke, ParticleHint::Emoji],
            behaviors: BehaviorMix {
                erratic: 0.0,
                shake: 0.5,
                trail: 0.0,
                trail_length: 0,
            },
        }
    }

    /// Narrow cone fired along the player's facing direction.
    #[must_use]
    pub fn weapon(kind: AbilityKind, facing: Direction) -> Self {
        let (dx, dy) = facing.delta();
        let (hint, speed, trail) = match kind {
            AbilityKind::Fire => (ParticleHint::Flame, Span::new(5.0, 9.0), 0.3),
            AbilityKind::Freeze => (ParticleHint::Frost, Span::new(3.0, 6.0), 0.0),
        };
        Self {
            heading: (dy as f32).atan2(dx as f32),
            spread: 0.6,
            speed,
            life: Span::fixed(1.0),
            decay: Span::new(1.5, 2.5),
            size: Span::new(0.2, 0.4),
            spin: Span::new(-6.0, 6.0),
            gravity: 0.0,
            restitution: 0.3,
            hints: vec![hint],
            behaviors: BehaviorMix {
                erratic: 0.0,
                shake: 0.0,
                trail,
                trail_length: 3,
            },
        }
    }

    pub(crate) fn sample<R>(&self, origin: Vec2, rng: &mut R) -> Particle
    where
        R: Rng + ?Sized,
    {
        let offset = if self.spread > 0.0 {
            rng.gen_range(-0.5_f32..0.5) * self.spread
        } else {
            0.0
        };
        let speed = self.speed.sample(rng);
        let velocity = Vec2::from_angle(self.heading + offset) * speed;
        let hint = if self.hints.is_empty() {
            ParticleHint::Circle
        } else {
            self.hints[rng.gen_range(0..self.hints.len())]
        };

        Particle {
            position: origin,
            velocity,
            life: self.life.sample(rng),
            decay: self.decay.sample(rng),
            size: self.size.sample(rng),
            rotation: rng.gen_range(0.0..TAU),
            spin: self.spin.sample(rng),
            gravity: self.gravity,
            restitution: self.restitution,
            hint,
            behavior: self.sample_behavior(rng),
        }
    }

    fn sample_behavior<R>(&self, rng: &mut R) -> ParticleBehavior
    where
        R: Rng + ?Sized,
    {
        let mix = &self.behaviors;
        let roll: f64 = rng.gen();
        if roll < mix.erratic {
            ParticleBehavior::Erratic {
                turn: rng.gen_range(0.3..1.2),
                interval: rng.gen_range(0.1..0.3),
                timer: rng.gen_range(0.0..0.3),
            }
        } else if roll < mix.erratic + mix.shake {
            ParticleBehavior::Shake {
                amplitude: rng.gen_range(0.05..0.2),
                frequency: rng.gen_range(10.0..20.0),
                phase: rng.gen_range(0.0..TAU),
            }
        } else if roll < mix.erratic + mix.shake + mix.trail && mix.trail_length > 0 {
            ParticleBehavior::Trail {
                history: VecDeque::with_capacity(mix.trail_length + 1),
                capacity: mix.trail_length,
            }
        } else {
            ParticleBehavior::Plain
        }
    }
}
