#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decaying particle physics shared by celebration, defeat and weapon bursts.
//!
//! Positions are expressed in maze cells with the origin at the top-left corner
//! and the y axis pointing down. Velocities are in cells per second and life is
//! normalised so a fresh particle starts close to `1.0` and is evicted once it
//! reaches zero. Nothing here knows how particles are drawn; the
//! [`ParticleHint`] only tells a renderer which glyph family to use.

use std::{collections::VecDeque, ops::RangeInclusive, time::Duration};

use glam::Vec2;
use pacboy_core::CellCoord;
use rand::Rng;

mod profile;

pub use profile::{BehaviorMix, BurstProfile, Span};

/// Visual family a renderer should use for a particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleHint {
    /// Celebratory emoji glyph.
    Emoji,
    /// Filled circle.
    Circle,
    /// Five pointed star.
    Star,
    /// Small cross shaped sparkle.
    Sparkle,
    /// Slow drifting smoke puff.
    Smoke,
    /// Flame released by the fire ability.
    Flame,
    /// Ice crystal released by the freeze ability.
    Frost,
}

/// Optional secondary motion attached to a particle.
#[derive(Clone, Debug, PartialEq)]
pub enum ParticleBehavior {
    /// Ballistic motion only.
    Plain,
    /// Periodically rotates the velocity, alternating the turn direction.
    Erratic {
        /// Rotation applied at each redirection, in radians.
        turn: f32,
        /// Seconds between redirections.
        interval: f32,
        /// Seconds left until the next redirection.
        timer: f32,
    },
    /// Oscillates sideways around the simulated position.
    Shake {
        /// Peak sideways displacement in cells.
        amplitude: f32,
        /// Angular frequency in radians per second.
        frequency: f32,
        /// Current oscillation phase.
        phase: f32,
    },
    /// Remembers recent positions so a renderer can draw a tail.
    Trail {
        /// Oldest position first.
        history: VecDeque<Vec2>,
        /// Maximum number of remembered positions.
        capacity: usize,
    },
}

/// Single simulated particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Simulated position in cells.
    pub position: Vec2,
    /// Velocity in cells per second.
    pub velocity: Vec2,
    /// Remaining normalised life.
    pub life: f32,
    /// Life lost per second.
    pub decay: f32,
    /// Visual size in cells.
    pub size: f32,
    /// Current rotation in radians.
    pub rotation: f32,
    /// Rotation speed in radians per second.
    pub spin: f32,
    /// Downward acceleration in cells per second squared.
    pub gravity: f32,
    /// Fraction of speed kept when bouncing off an edge.
    pub restitution: f32,
    /// Glyph family for renderers.
    pub hint: ParticleHint,
    /// Secondary behavior.
    pub behavior: ParticleBehavior,
}

impl Particle {
    /// Reports whether the particle still has life left.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Position a renderer should draw at, including any shake offset.
    #[must_use]
    pub fn render_position(&self) -> Vec2 {
        match &self.behavior {
            ParticleBehavior::Shake {
                amplitude, phase, ..
            } => self.position + Vec2::new(amplitude * phase.sin(), 0.0),
            _ => self.position,
        }
    }

    fn step(&mut self, seconds: f32, bounds: &Bounds) {
        match &mut self.behavior {
            ParticleBehavior::Plain => {}
            ParticleBehavior::Erratic {
                turn,
                interval,
                timer,
            } => {
                *timer -= seconds;
                if *timer <= 0.0 {
                    self.velocity = Vec2::from_angle(*turn).rotate(self.velocity);
                    *turn = -*turn;
                    *timer += interval.max(f32::EPSILON);
                }
            }
            ParticleBehavior::Shake {
                frequency, phase, ..
            } => {
                *phase += *frequency * seconds;
            }
            ParticleBehavior::Trail { history, capacity } => {
                history.push_back(self.position);
                while history.len() > *capacity {
                    let _ = history.pop_front();
                }
            }
        }

        self.velocity.y += self.gravity * seconds;
        self.position += self.velocity * seconds;
        self.bounce(bounds);
        self.rotation += self.spin * seconds;
        self.life -= self.decay * seconds;
    }

    fn bounce(&mut self, bounds: &Bounds) {
        if self.position.x < bounds.min.x {
            self.position.x = bounds.min.x;
            self.velocity.x = -self.velocity.x * self.restitution;
        } else if self.position.x > bounds.max.x {
            self.position.x = bounds.max.x;
            self.velocity.x = -self.velocity.x * self.restitution;
        }

        if self.position.y < bounds.min.y {
            self.position.y = bounds.min.y;
            self.velocity.y = -self.velocity.y * self.restitution;
        } else if self.position.y > bounds.max.y {
            self.position.y = bounds.max.y;
            self.velocity.y = -self.velocity.y * self.restitution;
        }
    }
}

/// Rectangle particles bounce inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Top-left corner.
    pub min: Vec2,
    /// Bottom-right corner.
    pub max: Vec2,
}

impl Bounds {
    /// Bounds covering a maze of the provided dimensions.
    #[must_use]
    pub fn for_grid(columns: u32, rows: u32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(columns as f32, rows as f32),
        }
    }
}

/// Centre of a maze cell in particle space.
#[must_use]
pub fn cell_center(cell: CellCoord) -> Vec2 {
    Vec2::new(cell.column() as f32 + 0.5, cell.row() as f32 + 0.5)
}

/// Spawns a burst of particles around `origin`.
///
/// The particle count is drawn uniformly from `count`; every particle samples
/// its own kinematics and behavior from `profile`.
pub fn spawn_burst<R>(
    origin: Vec2,
    count: RangeInclusive<u32>,
    profile: &BurstProfile,
    rng: &mut R,
) -> Vec<Particle>
where
    R: Rng + ?Sized,
{
    let total = if count.is_empty() {
        0
    } else {
        rng.gen_range(count)
    };
    (0..total).map(|_| profile.sample(origin, rng)).collect()
}

/// Advances every particle by `dt` and evicts the expired ones.
pub fn advance(particles: &mut Vec<Particle>, dt: Duration, bounds: &Bounds) {
    let seconds = dt.as_secs_f32();
    if seconds > 0.0 {
        for particle in particles.iter_mut() {
            particle.step(seconds, bounds);
        }
    }
    particles.retain(Particle::is_alive);
}

/// Particle collection with an "is animating" flag that clears once the set
/// empties.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleSet {
    particles: Vec<Particle>,
    animating: bool,
}

impl ParticleSet {
    /// Creates an empty, idle set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a burst and marks the set as animating when anything was added.
    pub fn extend(&mut self, burst: Vec<Particle>) {
        if !burst.is_empty() {
            self.animating = true;
        }
        self.particles.extend(burst);
    }

    /// Advances the set. Returns `true` on the step that drained it.
    pub fn advance(&mut self, dt: Duration, bounds: &Bounds) -> bool {
        advance(&mut self.particles, dt, bounds);
        if self.animating && self.particles.is_empty() {
            self.animating = false;
            return true;
        }
        false
    }

    /// Drops every particle and clears the animating flag.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.animating = false;
    }

    /// Whether the set still has a running animation.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Live particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the set holds no particles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
