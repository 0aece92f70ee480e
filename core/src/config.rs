//! Tunable parameters for maze generation, timing, abilities and progression.
//!
//! Every section carries `#[serde(default)]` so configuration files only need
//! to name the values they override.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::AbilityKind;

/// Complete set of tuning knobs consumed by the engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid dimensions and divider density.
    pub maze: MazeConfig,
    /// Schedule intervals and transition delays.
    pub timing: TimingConfig,
    /// Ability cooldowns and ranges.
    pub abilities: AbilitiesConfig,
    /// Level parameter curves.
    pub progression: ProgressionConfig,
    /// Level completion score formula.
    pub scoring: ScoringConfig,
    /// Particle counts for each effect burst.
    pub effects: EffectsConfig,
    /// Seed shared by every random source; entropy is used when absent.
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Checks the configuration for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let maze = &self.maze;
        if maze.width < 3 || maze.height < 3 {
            return Err(ConfigError::GridTooSmall {
                width: maze.width,
                height: maze.height,
            });
        }
        for (name, value) in [
            ("base_density", maze.base_density),
            ("max_density", maze.max_density),
            ("density_increment", maze.density_increment),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::DensityOutOfRange { name, value });
            }
        }
        if maze.base_density > maze.max_density {
            return Err(ConfigError::DensityInverted {
                base: maze.base_density,
                max: maze.max_density,
            });
        }

        let timing = &self.timing;
        for (name, value) in [
            ("ghost_move_interval_ms", timing.ghost_move_interval_ms),
            ("weapon_interval_ms", timing.weapon_interval_ms),
            ("particle_interval_ms", timing.particle_interval_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroInterval(name));
            }
        }

        for kind in AbilityKind::ALL {
            if self.abilities.get(kind).range == 0 {
                return Err(ConfigError::ZeroRange(kind));
            }
        }

        let progression = &self.progression;
        if progression.max_level == 0 {
            return Err(ConfigError::ZeroMaxLevel);
        }
        if progression.lives_progression == 0 {
            return Err(ConfigError::ZeroLivesProgression);
        }
        if progression.ghost_breakpoints.is_empty() {
            return Err(ConfigError::MissingBreakpoints);
        }
        let ascending = progression
            .ghost_breakpoints
            .windows(2)
            .all(|pair| pair[0].0 < pair[1].0);
        if !ascending {
            return Err(ConfigError::UnorderedBreakpoints);
        }

        if self.scoring.time_bonus_divisor == 0 {
            return Err(ConfigError::ZeroTimeBonusDivisor);
        }

        Ok(())
    }
}

/// Reasons a configuration is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid cannot host an entrance, an exit and interior divider sites.
    #[error("maze must be at least 3x3, got {width}x{height}")]
    GridTooSmall {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// A density knob lies outside `0..=1`.
    #[error("{name} must lie within 0..=1, got {value}")]
    DensityOutOfRange {
        /// Name of the offending knob.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// The base density exceeds the density cap.
    #[error("base_density {base} exceeds max_density {max}")]
    DensityInverted {
        /// Configured base density.
        base: f64,
        /// Configured density cap.
        max: f64,
    },
    /// A schedule interval is zero.
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    /// An ability cannot reach any cell.
    #[error("{0} range must be greater than zero")]
    ZeroRange(AbilityKind),
    /// The campaign has no levels.
    #[error("max_level must be greater than zero")]
    ZeroMaxLevel,
    /// Lives would never change between levels.
    #[error("lives_progression must be greater than zero")]
    ZeroLivesProgression,
    /// The adversary count curve is empty.
    #[error("ghost_breakpoints must not be empty")]
    MissingBreakpoints,
    /// Breakpoint thresholds are not strictly ascending.
    #[error("ghost_breakpoints thresholds must be strictly ascending")]
    UnorderedBreakpoints,
    /// The time bonus formula would divide by zero.
    #[error("time_bonus_divisor must be greater than zero")]
    ZeroTimeBonusDivisor,
}

/// Grid dimensions and divider density.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Divider probability at level 1.
    pub base_density: f64,
    /// Upper bound for the divider probability.
    pub max_density: f64,
    /// Probability added per level after the first.
    pub density_increment: f64,
    /// Divider count below which extra dividers are injected.
    pub min_dividers: u32,
    /// Random injection attempts made while below `min_dividers`.
    pub injection_attempts: u32,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 16,
            base_density: 0.15,
            max_density: 0.4,
            density_increment: 0.02,
            min_dividers: 10,
            injection_attempts: 40,
        }
    }
}

impl MazeConfig {
    /// Divider probability for the provided level.
    #[must_use]
    pub fn density_for_level(&self, level: u32) -> f64 {
        let steps = f64::from(level.saturating_sub(1));
        (self.base_density + steps * self.density_increment).min(self.max_density)
    }
}

/// Schedule intervals and transition delays, in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Period of adversary movement.
    pub ghost_move_interval_ms: u64,
    /// Period of cooldown decay and weapon particle updates.
    pub weapon_interval_ms: u64,
    /// Period of celebration and defeat particle updates.
    pub particle_interval_ms: u64,
    /// Delay before a struck adversary returns.
    pub respawn_delay_ms: u64,
    /// Delay between game over and the fresh campaign.
    pub game_over_delay_ms: u64,
    /// Delay between clearing a level and starting the next one.
    pub level_complete_delay_ms: u64,
    /// How long transient banners stay visible.
    pub message_duration_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            ghost_move_interval_ms: 350,
            weapon_interval_ms: 16,
            particle_interval_ms: 16,
            respawn_delay_ms: 3_000,
            game_over_delay_ms: 2_000,
            level_complete_delay_ms: 2_000,
            message_duration_ms: 2_000,
        }
    }
}

impl TimingConfig {
    /// Period of adversary movement.
    #[must_use]
    pub const fn ghost_move_interval(&self) -> Duration {
        Duration::from_millis(self.ghost_move_interval_ms)
    }

    /// Period of cooldown decay and weapon particle updates.
    #[must_use]
    pub const fn weapon_interval(&self) -> Duration {
        Duration::from_millis(self.weapon_interval_ms)
    }

    /// Period of celebration and defeat particle updates.
    #[must_use]
    pub const fn particle_interval(&self) -> Duration {
        Duration::from_millis(self.particle_interval_ms)
    }

    /// Delay before a struck adversary returns.
    #[must_use]
    pub const fn respawn_delay(&self) -> Duration {
        Duration::from_millis(self.respawn_delay_ms)
    }

    /// Delay between game over and the fresh campaign.
    #[must_use]
    pub const fn game_over_delay(&self) -> Duration {
        Duration::from_millis(self.game_over_delay_ms)
    }

    /// Delay between clearing a level and starting the next one.
    #[must_use]
    pub const fn level_complete_delay(&self) -> Duration {
        Duration::from_millis(self.level_complete_delay_ms)
    }

    /// How long transient banners stay visible.
    #[must_use]
    pub const fn message_duration(&self) -> Duration {
        Duration::from_millis(self.message_duration_ms)
    }
}

/// Cooldown and reach of a single ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityConfig {
    /// Time the ability stays unavailable after firing, in milliseconds.
    pub cooldown_ms: u64,
    /// Number of cells scanned along the facing direction.
    pub range: u32,
}

impl AbilityConfig {
    /// Time the ability stays unavailable after firing.
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

/// Per-ability configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilitiesConfig {
    /// Fire Blast settings.
    pub fire: AbilityConfig,
    /// Freeze Wind settings.
    pub freeze: AbilityConfig,
}

impl Default for AbilitiesConfig {
    fn default() -> Self {
        Self {
            fire: AbilityConfig {
                cooldown_ms: 5_000,
                range: 5,
            },
            freeze: AbilityConfig {
                cooldown_ms: 3_000,
                range: 3,
            },
        }
    }
}

impl AbilitiesConfig {
    /// Settings of the provided ability.
    #[must_use]
    pub const fn get(&self, kind: AbilityKind) -> AbilityConfig {
        match kind {
            AbilityKind::Fire => self.fire,
            AbilityKind::Freeze => self.freeze,
        }
    }
}

/// Level parameter curves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Highest level before the campaign wraps to level 1.
    pub max_level: u32,
    /// Levels needed to earn an additional life.
    pub lives_progression: u32,
    /// Upper bound on lives per level.
    pub max_lives: u32,
    /// `(level threshold, adversary count)` pairs in ascending threshold order.
    pub ghost_breakpoints: Vec<(u32, u32)>,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            max_level: 100,
            lives_progression: 25,
            max_lives: 5,
            ghost_breakpoints: vec![(10, 1), (30, 2), (50, 3), (75, 4), (100, 5)],
        }
    }
}

/// Level completion score formula.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points awarded per collected pellet.
    pub pellet_points: u64,
    /// Time after which the speed bonus is exhausted, in milliseconds.
    pub time_budget_ms: u64,
    /// Milliseconds of unused budget per bonus point.
    pub time_bonus_divisor: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pellet_points: 100,
            time_budget_ms: 30_000,
            time_bonus_divisor: 100,
        }
    }
}

/// Particle counts for each effect burst.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Particles released when a level is cleared.
    pub celebration_particles: u32,
    /// Particles released when the campaign is lost.
    pub defeat_particles: u32,
    /// Particles released by every ability activation.
    pub weapon_particles: u32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            celebration_particles: 20,
            defeat_particles: 30,
            weapon_particles: 8,
        }
    }
}
