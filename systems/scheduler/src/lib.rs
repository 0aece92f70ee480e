#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-interval scheduler driven by injected time steps.
//!
//! Callers feed wall-clock deltas through [`Scheduler::advance`] and receive
//! the ticks that became due. Nothing here owns a timer or a thread.

use std::time::Duration;

use pacboy_core::config::TimingConfig;
use tracing::trace;

/// Repeating schedule the simulation runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lane {
    /// Adversary movement rounds.
    GhostMovement,
    /// Cooldowns, respawn timers, transition delays and weapon particles.
    Weapons,
    /// Celebration and defeat particle animation.
    Effects,
}

/// How a lane behaves when several intervals elapse inside one advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Firing {
    /// Fires once per elapsed interval, each tick carrying one interval.
    CatchUp,
    /// Fires at most once per advance, carrying the full time since the
    /// lane last fired.
    Coalesce,
}

/// A lane that became due during an advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTick {
    /// Lane that fired.
    pub lane: Lane,
    /// Time the tick accounts for.
    pub elapsed: Duration,
}

#[derive(Clone, Debug)]
struct LaneState {
    lane: Lane,
    interval: Duration,
    firing: Firing,
    accumulator: Duration,
    since_fired: Duration,
}

impl LaneState {
    fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
        self.since_fired = Duration::ZERO;
    }

    fn advance(&mut self, dt: Duration, out: &mut Vec<ScheduledTick>) {
        if self.interval.is_zero() {
            return;
        }
        self.accumulator = self.accumulator.saturating_add(dt);
        self.since_fired = self.since_fired.saturating_add(dt);

        match self.firing {
            Firing::CatchUp => {
                while self.accumulator >= self.interval {
                    self.accumulator -= self.interval;
                    self.since_fired = self.accumulator;
                    out.push(ScheduledTick {
                        lane: self.lane,
                        elapsed: self.interval,
                    });
                }
            }
            Firing::Coalesce => {
                if self.accumulator >= self.interval {
                    let phase = self.accumulator.as_nanos() % self.interval.as_nanos();
                    self.accumulator = Duration::from_nanos(u64::try_from(phase).unwrap_or(0));
                    out.push(ScheduledTick {
                        lane: self.lane,
                        elapsed: self.since_fired,
                    });
                    self.since_fired = Duration::ZERO;
                }
            }
        }
    }
}

/// Set of independent repeating lanes that can be halted and resumed.
#[derive(Clone, Debug)]
pub struct Scheduler {
    lanes: Vec<LaneState>,
    running: bool,
}

impl Scheduler {
    /// Creates a stopped scheduler with no lanes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lanes: Vec::new(),
            running: false,
        }
    }

    /// Creates a stopped scheduler with the three simulation lanes.
    #[must_use]
    pub fn from_timing(timing: &TimingConfig) -> Self {
        Self::new()
            .with_lane(
                Lane::GhostMovement,
                timing.ghost_move_interval(),
                Firing::CatchUp,
            )
            .with_lane(Lane::Weapons, timing.weapon_interval(), Firing::Coalesce)
            .with_lane(Lane::Effects, timing.particle_interval(), Firing::Coalesce)
    }

    /// Adds a lane. Lanes fire in the order they were added. A zero interval
    /// disables the lane.
    #[must_use]
    pub fn with_lane(mut self, lane: Lane, interval: Duration, firing: Firing) -> Self {
        self.lanes.push(LaneState {
            lane,
            interval,
            firing,
            accumulator: Duration::ZERO,
            since_fired: Duration::ZERO,
        });
        self
    }

    /// Starts every lane from a fresh accumulator.
    pub fn start(&mut self) {
        for lane in &mut self.lanes {
            lane.reset();
        }
        self.running = true;
    }

    /// Halts every lane. Accumulated time is discarded.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the scheduler is producing ticks.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Interval configured for a lane, if present.
    #[must_use]
    pub fn interval(&self, lane: Lane) -> Option<Duration> {
        self.lanes
            .iter()
            .find(|state| state.lane == lane)
            .map(|state| state.interval)
    }

    /// Advances time and returns the ticks that became due, grouped by lane.
    pub fn advance(&mut self, dt: Duration) -> Vec<ScheduledTick> {
        let mut ticks = Vec::new();
        if !self.running || dt.is_zero() {
            return ticks;
        }
        for lane in &mut self.lanes {
            lane.advance(dt, &mut ticks);
        }
        for tick in &ticks {
            trace!(lane = ?tick.lane, elapsed_ms = tick.elapsed.as_millis() as u64, "lane_fired");
        }
        ticks
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
