#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level parameter curves and campaign bookkeeping.

use std::time::Duration;

use pacboy_core::config::{ProgressionConfig, ScoringConfig};
use tracing::{debug, info};

/// Parameters that shape a single level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelParams {
    /// Lives granted when the level starts.
    pub lives: u32,
    /// Number of adversaries roaming the level.
    pub ghost_count: u32,
}

/// Derives the lives and adversary count for `level`.
///
/// Lives grow by one every `lives_progression` levels up to `max_lives`. The
/// adversary count is taken from the first breakpoint whose threshold is at
/// least `level`, falling back to a single adversary past the last one.
#[must_use]
pub fn params_for_level(config: &ProgressionConfig, level: u32) -> LevelParams {
    let step = config.lives_progression.max(1);
    let lives = (1 + level.saturating_sub(1) / step).min(config.max_lives);
    let ghost_count = config
        .ghost_breakpoints
        .iter()
        .find(|(threshold, _)| level <= *threshold)
        .map_or(1, |(_, count)| *count);

    LevelParams { lives, ghost_count }
}

/// Score awarded for clearing a level.
///
/// Every collected pellet is worth `pellet_points`; the unused part of the time
/// budget converts into bonus points at `time_bonus_divisor` milliseconds each.
#[must_use]
pub fn level_score(config: &ScoringConfig, pellets_collected: u32, elapsed: Duration) -> u64 {
    let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    let bonus = config.time_budget_ms.saturating_sub(elapsed_ms) / config.time_bonus_divisor.max(1);
    u64::from(pellets_collected)
        .saturating_mul(config.pellet_points)
        .saturating_add(bonus)
}

/// Outcome of a cleared level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelSummary {
    /// Level that was cleared.
    pub level: u32,
    /// Pellets collected while the level was running.
    pub pellets_collected: u32,
    /// Time spent on the level.
    pub elapsed: Duration,
    /// Score earned for the level.
    pub level_score: u64,
    /// Cumulative campaign score including this level.
    pub total_score: u64,
    /// Floor of the total score divided by cleared levels.
    pub average_score: u64,
    /// Level that will be played next.
    pub next_level: u32,
}

/// Level, lives and score tracked across a campaign.
#[derive(Clone, Debug)]
pub struct Campaign {
    progression: ProgressionConfig,
    scoring: ScoringConfig,
    level: u32,
    lives: u32,
    total_score: u64,
    completed_levels: u32,
    average_score: u64,
    level_elapsed: Duration,
    pellets_collected: u32,
    total_pellets: u32,
}

impl Campaign {
    /// Creates a campaign positioned at level 1.
    #[must_use]
    pub fn new(progression: ProgressionConfig, scoring: ScoringConfig) -> Self {
        let lives = params_for_level(&progression, 1).lives;
        Self {
            progression,
            scoring,
            level: 1,
            lives,
            total_score: 0,
            completed_levels: 0,
            average_score: 0,
            level_elapsed: Duration::ZERO,
            pellets_collected: 0,
            total_pellets: 0,
        }
    }

    /// Current one-based level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Lives remaining on the current level.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Cumulative score across cleared levels.
    #[must_use]
    pub const fn total_score(&self) -> u64 {
        self.total_score
    }

    /// Number of levels cleared since the campaign started.
    #[must_use]
    pub const fn completed_levels(&self) -> u32 {
        self.completed_levels
    }

    /// Running average score per cleared level.
    #[must_use]
    pub const fn average_score(&self) -> u64 {
        self.average_score
    }

    /// Time spent on the current level so far.
    #[must_use]
    pub const fn level_elapsed(&self) -> Duration {
        self.level_elapsed
    }

    /// Pellets collected on the current level.
    #[must_use]
    pub const fn pellets_collected(&self) -> u32 {
        self.pellets_collected
    }

    /// Pellets the current level started with.
    #[must_use]
    pub const fn total_pellets(&self) -> u32 {
        self.total_pellets
    }

    /// Parameters for the current level.
    #[must_use]
    pub fn current_params(&self) -> LevelParams {
        params_for_level(&self.progression, self.level)
    }

    /// Resets per-level statistics and refills lives for the current level.
    pub fn begin_level(&mut self, total_pellets: u32) -> LevelParams {
        let params = self.current_params();
        self.lives = params.lives;
        self.level_elapsed = Duration::ZERO;
        self.pellets_collected = 0;
        self.total_pellets = total_pellets;
        params
    }

    /// Records a collected pellet on the current level.
    pub fn record_pellet(&mut self) {
        self.pellets_collected = self.pellets_collected.saturating_add(1);
    }

    /// Advances the level clock.
    pub fn advance_clock(&mut self, dt: Duration) {
        self.level_elapsed = self.level_elapsed.saturating_add(dt);
    }

    /// Removes one life and returns how many remain.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        debug!(lives = self.lives, "life_lost");
        self.lives
    }

    /// Scores the current level, folds it into the campaign and moves on to the
    /// next level, wrapping to level 1 after the configured maximum.
    pub fn complete_level(&mut self) -> LevelSummary {
        let cleared = self.level;
        let level_score = level_score(&self.scoring, self.pellets_collected, self.level_elapsed);
        self.total_score = self.total_score.saturating_add(level_score);
        self.completed_levels = self.completed_levels.saturating_add(1);
        self.average_score = self.total_score / u64::from(self.completed_levels.max(1));

        self.level = if cleared >= self.progression.max_level {
            info!(max_level = self.progression.max_level, "campaign_wrapped");
            1
        } else {
            cleared + 1
        };

        LevelSummary {
            level: cleared,
            pellets_collected: self.pellets_collected,
            elapsed: self.level_elapsed,
            level_score,
            total_score: self.total_score,
            average_score: self.average_score,
            next_level: self.level,
        }
    }

    /// Returns the campaign to level 1 with no score.
    pub fn reset(&mut self) {
        self.level = 1;
        self.total_score = 0;
        self.completed_levels = 0;
        self.average_score = 0;
        self.level_elapsed = Duration::ZERO;
        self.pellets_collected = 0;
        self.lives = self.current_params().lives;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lives_grow_every_twenty_five_levels() {
        let config = ProgressionConfig::default();
        assert_eq!(params_for_level(&config, 1).lives, 1);
        assert_eq!(params_for_level(&config, 25).lives, 1);
        assert_eq!(params_for_level(&config, 26).lives, 2);
        assert_eq!(params_for_level(&config, 76).lives, 4);
        assert_eq!(params_for_level(&config, 100).lives, 4);
        assert_eq!(params_for_level(&config, 500).lives, 5);
    }

    #[test]
    fn ghost_count_follows_first_matching_breakpoint() {
        let config = ProgressionConfig::default();
        assert_eq!(params_for_level(&config, 1).ghost_count, 1);
        assert_eq!(params_for_level(&config, 10).ghost_count, 1);
        assert_eq!(params_for_level(&config, 11).ghost_count, 2);
        assert_eq!(params_for_level(&config, 50).ghost_count, 3);
        assert_eq!(params_for_level(&config, 76).ghost_count, 5);
        assert_eq!(params_for_level(&config, 101).ghost_count, 1);
    }

    #[test]
    fn level_score_adds_time_bonus() {
        let config = ScoringConfig::default();
        assert_eq!(level_score(&config, 10, Duration::from_millis(10_000)), 1_200);
        assert_eq!(level_score(&config, 3, Duration::from_millis(29_950)), 300);
        assert_eq!(level_score(&config, 3, Duration::from_secs(60)), 300);
        assert_eq!(level_score(&config, 0, Duration::ZERO), 300);
    }
}
