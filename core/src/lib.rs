#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pacboy engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! collaborators to react to. Systems consume immutable snapshots and respond
//! exclusively with new command batches.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

pub mod config;
pub mod maze;

pub use config::{ConfigError, GameConfig};
pub use maze::{CellKind, Divider, DividerOrientation, Maze};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Pacboy.";

/// Lifecycle stage of the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayState {
    /// The world exists but no level has been generated yet.
    Loading,
    /// A level is in progress and accepts player input.
    Playing,
    /// The level was cleared and the celebration delay is running.
    LevelComplete,
    /// The last life was lost and the campaign reset delay is running.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Generates the maze for the current campaign level and starts play.
    BeginLevel,
    /// Requests that the player advance a single cell in the given direction.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests activation of one of the player's abilities.
    UseAbility {
        /// Ability the player wants to fire.
        kind: AbilityKind,
    },
    /// Applies one round of adversary movement followed by a collision check.
    MoveGhosts {
        /// Steps proposed by the movement system, applied in order.
        steps: Vec<GhostStep>,
    },
    /// Advances cooldowns, respawn timers, transition delays and weapon
    /// particles by the elapsed wall-clock time.
    Tick {
        /// Time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Advances the celebration and defeat particle sets.
    AnimateEffects {
        /// Time that elapsed since the previous animation step.
        dt: Duration,
    },
}

/// Single adversary step proposed by the movement system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GhostStep {
    /// Adversary attempting to move.
    pub ghost: GhostId,
    /// Direction of travel for the attempted step.
    pub direction: Direction,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the simulation entered a new play state.
    PlayStateChanged {
        /// State that became active.
        state: PlayState,
    },
    /// Announces that a freshly generated level is ready for play.
    LevelStarted {
        /// One-based level number.
        level: u32,
        /// Lives granted for the level.
        lives: u32,
        /// Number of adversaries roaming the level.
        ghosts: u32,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
        /// Direction the player now faces.
        direction: Direction,
    },
    /// Confirms that a pellet was collected.
    PelletCollected {
        /// Cell that held the pellet.
        cell: CellCoord,
        /// Pellets still present in the level.
        remaining: u32,
    },
    /// Confirms that an adversary moved between two cells.
    GhostAdvanced {
        /// Adversary that moved.
        ghost: GhostId,
        /// Cell the adversary occupied before moving.
        from: CellCoord,
        /// Cell the adversary occupies after moving.
        to: CellCoord,
    },
    /// Reports that the player collided with an adversary and lost a life.
    LifeLost {
        /// Lives left after the collision.
        remaining: u32,
    },
    /// Reports that the last life was lost.
    GameOver {
        /// Level reached when the campaign ended.
        level: u32,
        /// Cumulative score when the campaign ended.
        total_score: u64,
    },
    /// Reports that level, score and lives returned to their initial values.
    CampaignReset,
    /// Reports that the player cleared the current level.
    LevelCompleted {
        /// Level that was cleared.
        level: u32,
        /// Score earned for the level.
        level_score: u64,
        /// Cumulative score across completed levels.
        total_score: u64,
        /// Running average score per completed level.
        average_score: u64,
    },
    /// Confirms that an ability was activated.
    AbilityFired {
        /// Ability that fired.
        kind: AbilityKind,
        /// Cell the ability was fired from.
        origin: CellCoord,
        /// Direction the ability travelled.
        direction: Direction,
    },
    /// Reports that an ability struck an adversary.
    GhostHit {
        /// Ability that struck.
        kind: AbilityKind,
        /// Adversary that was removed.
        ghost: GhostId,
        /// Cell the adversary occupied when struck.
        cell: CellCoord,
    },
    /// Reports that a previously struck adversary re-entered the maze.
    GhostRespawned {
        /// Adversary that returned.
        ghost: GhostId,
        /// Cell the adversary was placed on.
        cell: CellCoord,
    },
    /// Reports that a pending respawn was dropped because its level ended.
    RespawnDiscarded {
        /// Adversary whose respawn was dropped.
        ghost: GhostId,
    },
    /// Reports that an ability cooldown reached zero.
    CooldownReady {
        /// Ability that became ready.
        kind: AbilityKind,
    },
    /// Reports that a celebration or defeat particle set emptied.
    EffectsSettled {
        /// Particle set that stopped animating.
        set: EffectSet,
    },
}

/// Offensive abilities available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Long range blast with a long cooldown.
    Fire,
    /// Short range gust with a short cooldown.
    Freeze,
}

impl AbilityKind {
    /// Every ability in a stable order.
    pub const ALL: [AbilityKind; 2] = [AbilityKind::Fire, AbilityKind::Freeze];

    /// Human readable ability name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fire => "Fire Blast",
            Self::Freeze => "Freeze Wind",
        }
    }
}

impl fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Particle sets maintained by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectSet {
    /// Burst played when a level is cleared.
    Celebration,
    /// Burst played when the campaign is lost.
    Defeat,
    /// Projectiles and impacts emitted by abilities.
    Weapon,
}

/// Visual appearance applied to an adversary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GhostColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl GhostColor {
    /// Creates a new ghost color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Name and color pair that identifies an adversary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GhostIdentity {
    name: &'static str,
    color: GhostColor,
}

impl GhostIdentity {
    /// Creates a new identity.
    #[must_use]
    pub const fn new(name: &'static str, color: GhostColor) -> Self {
        Self { name, color }
    }

    /// Display name of the adversary.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Appearance of the adversary.
    #[must_use]
    pub const fn color(&self) -> GhostColor {
        self.color
    }
}

/// Adversary identities handed out in order as levels grow crowded.
pub const GHOST_ROSTER: [GhostIdentity; 5] = [
    GhostIdentity::new("Clement", GhostColor::from_rgb(0x14, 0x78, 0x80)),
    GhostIdentity::new("Chase", GhostColor::from_rgb(0x60, 0xee, 0xe3)),
    GhostIdentity::new("Ray", GhostColor::from_rgb(0x25, 0xbf, 0x94)),
    GhostIdentity::new("Jayden", GhostColor::from_rgb(0xe9, 0xe1, 0x2e)),
    GhostIdentity::new("Andrew", GhostColor::from_rgb(0xff, 0x6b, 0x41)),
];

/// Cardinal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in a stable order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Maps a unit vector onto a direction. Anything but the four unit
    /// vectors yields `None`.
    #[must_use]
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Self::Up),
            (0, 1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            _ => None,
        }
    }

    /// Unit vector expressed as `(dx, dy)`.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Unique identifier assigned to an adversary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GhostId(u32);

impl GhostId {
    /// Creates a new ghost identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Cell one step away in the provided direction, if it stays within a
    /// grid of the given dimensions.
    #[must_use]
    pub fn neighbor(self, direction: Direction, columns: u32, rows: u32) -> Option<CellCoord> {
        let (dx, dy) = direction.delta();
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        if column < columns && row < rows {
            Some(CellCoord::new(column, row))
        } else {
            None
        }
    }
}

/// Direction of travel between two orthogonally adjacent cells.
#[must_use]
pub fn direction_between(from: CellCoord, to: CellCoord) -> Option<Direction> {
    let column_diff = from.column().abs_diff(to.column());
    let row_diff = from.row().abs_diff(to.row());

    if column_diff + row_diff != 1 {
        return None;
    }

    if column_diff == 1 {
        if to.column() > from.column() {
            Some(Direction::Right)
        } else {
            Some(Direction::Left)
        }
    } else if to.row() > from.row() {
        Some(Direction::Down)
    } else {
        Some(Direction::Up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn from_delta_accepts_only_unit_vectors() {
        assert_eq!(Direction::from_delta(1, 0), Some(Direction::Right));
        assert_eq!(Direction::from_delta(0, -1), Some(Direction::Up));
        assert_eq!(Direction::from_delta(1, 1), None);
        assert_eq!(Direction::from_delta(0, 0), None);
        assert_eq!(Direction::from_delta(2, 0), None);
    }

    #[test]
    fn delta_round_trips_through_from_delta() {
        for direction in Direction::ALL {
            let (dx, dy) = direction.delta();
            assert_eq!(Direction::from_delta(dx, dy), Some(direction));
        }
    }

    #[test]
    fn neighbor_respects_grid_bounds() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.neighbor(Direction::Up, 3, 3), None);
        assert_eq!(corner.neighbor(Direction::Left, 3, 3), None);
        assert_eq!(
            corner.neighbor(Direction::Right, 3, 3),
            Some(CellCoord::new(1, 0))
        );

        let far = CellCoord::new(2, 2);
        assert_eq!(far.neighbor(Direction::Down, 3, 3), None);
        assert_eq!(far.neighbor(Direction::Right, 3, 3), None);
    }

    #[test]
    fn direction_between_rejects_diagonals() {
        let origin = CellCoord::new(1, 1);
        assert_eq!(
            direction_between(origin, CellCoord::new(1, 0)),
            Some(Direction::Up)
        );
        assert_eq!(direction_between(origin, CellCoord::new(2, 2)), None);
        assert_eq!(direction_between(origin, origin), None);
    }

    #[test]
    fn roster_names_are_unique() {
        for (index, identity) in GHOST_ROSTER.iter().enumerate() {
            assert!(GHOST_ROSTER[index + 1..]
                .iter()
                .all(|other| other.name() != identity.name()));
        }
    }
}
