//! Player and adversary state stored inside the world.

use std::time::Duration;

use pacboy_core::{AbilityKind, CellCoord, Direction, GhostId, GhostIdentity};

/// Remaining cooldown per ability. Zero means ready.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Cooldowns {
    fire: Duration,
    freeze: Duration,
}

impl Cooldowns {
    pub(crate) fn remaining(&self, kind: AbilityKind) -> Duration {
        match kind {
            AbilityKind::Fire => self.fire,
            AbilityKind::Freeze => self.freeze,
        }
    }

    pub(crate) fn start(&mut self, kind: AbilityKind, duration: Duration) {
        *self.slot_mut(kind) = duration;
    }

    /// Decays every active cooldown by `dt`, flooring at zero, and reports the
    /// abilities that became ready during this step.
    pub(crate) fn decay(&mut self, dt: Duration) -> Vec<AbilityKind> {
        let mut ready = Vec::new();
        for kind in AbilityKind::ALL {
            let slot = self.slot_mut(kind);
            if slot.is_zero() {
                continue;
            }
            *slot = slot.saturating_sub(dt);
            if slot.is_zero() {
                ready.push(kind);
            }
        }
        ready
    }

    fn slot_mut(&mut self, kind: AbilityKind) -> &mut Duration {
        match kind {
            AbilityKind::Fire => &mut self.fire,
            AbilityKind::Freeze => &mut self.freeze,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Player {
    pub(crate) cell: CellCoord,
    pub(crate) direction: Direction,
    pub(crate) cooldowns: Cooldowns,
}

impl Player {
    /// Player standing on `cell`, facing right with every ability ready.
    pub(crate) fn spawn(cell: CellCoord) -> Self {
        Self {
            cell,
            direction: Direction::Right,
            cooldowns: Cooldowns::default(),
        }
    }

    /// Returns the player to `cell` facing right. Cooldowns keep running.
    pub(crate) fn respawn(&mut self, cell: CellCoord) {
        self.cell = cell;
        self.direction = Direction::Right;
    }
}

/// Whether an adversary is roaming or waiting to return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Liveness {
    /// Roaming the maze.
    Alive,
    /// Removed by an ability and queued for respawn.
    Respawning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Ghost {
    pub(crate) id: GhostId,
    pub(crate) identity: GhostIdentity,
    pub(crate) cell: CellCoord,
    pub(crate) direction: Direction,
    pub(crate) liveness: Liveness,
}

impl Ghost {
    pub(crate) fn new(id: GhostId, identity: GhostIdentity, cell: CellCoord) -> Self {
        Self {
            id,
            identity,
            cell,
            direction: Direction::Left,
            liveness: Liveness::Alive,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.liveness == Liveness::Alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldowns_floor_at_zero_and_report_readiness_once() {
        let mut cooldowns = Cooldowns::default();
        cooldowns.start(AbilityKind::Fire, Duration::from_millis(40));

        assert!(cooldowns.decay(Duration::from_millis(16)).is_empty());
        assert_eq!(
            cooldowns.remaining(AbilityKind::Fire),
            Duration::from_millis(24)
        );
        assert_eq!(
            cooldowns.decay(Duration::from_millis(100)),
            vec![AbilityKind::Fire]
        );
        assert_eq!(cooldowns.remaining(AbilityKind::Fire), Duration::ZERO);
        assert!(cooldowns.decay(Duration::from_millis(100)).is_empty());
        assert_eq!(cooldowns.remaining(AbilityKind::Fire), Duration::ZERO);
    }

    #[test]
    fn respawn_resets_position_and_facing() {
        let mut player = Player::spawn(CellCoord::new(0, 0));
        player.cell = CellCoord::new(3, 4);
        player.direction = Direction::Up;
        player.cooldowns.start(AbilityKind::Freeze, Duration::from_secs(1));

        player.respawn(CellCoord::new(0, 0));
        assert_eq!(player.cell, CellCoord::new(0, 0));
        assert_eq!(player.direction, Direction::Right);
        assert_eq!(
            player.cooldowns.remaining(AbilityKind::Freeze),
            Duration::from_secs(1)
        );
    }
}
