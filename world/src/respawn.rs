//! Delayed adversary respawns tagged with the level epoch they were queued in.

use std::time::Duration;

use pacboy_core::GhostId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PendingRespawn {
    pub(crate) ghost: GhostId,
    pub(crate) epoch: u64,
    remaining: Duration,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct RespawnQueue {
    pending: Vec<PendingRespawn>,
}

impl RespawnQueue {
    pub(crate) fn schedule(&mut self, ghost: GhostId, delay: Duration, epoch: u64) {
        self.pending.push(PendingRespawn {
            ghost,
            epoch,
            remaining: delay,
        });
    }

    /// Advances every timer and drains the entries that became due, in the
    /// order they were scheduled.
    pub(crate) fn advance(&mut self, dt: Duration) -> Vec<PendingRespawn> {
        let mut due = Vec::new();
        self.pending.retain_mut(|entry| {
            entry.remaining = entry.remaining.saturating_sub(dt);
            if entry.remaining.is_zero() {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn remaining_for(&self, ghost: GhostId, epoch: u64) -> Option<Duration> {
        self.pending
            .iter()
            .find(|entry| entry.ghost == ghost && entry.epoch == epoch)
            .map(|entry| entry.remaining)
    }
}
