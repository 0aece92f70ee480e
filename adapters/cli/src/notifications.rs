//! Audio and HUD notifications turned into log records.

use std::time::Duration;

use anyhow::Result;
use pacboy_core::AbilityKind;
use pacboy_presentation::{AudioSink, UiSink};
use tracing::{debug, info};

/// Headless stand-in for speakers and the HUD.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LogSink;

impl AudioSink for LogSink {
    fn on_pellet_collected(&mut self) -> Result<()> {
        debug!(cue = "chomp", "sound");
        Ok(())
    }

    fn on_ability_fired(&mut self, kind: AbilityKind) -> Result<()> {
        debug!(cue = "whoosh", ability = %kind, "sound");
        Ok(())
    }

    fn on_adversary_hit(&mut self, kind: AbilityKind) -> Result<()> {
        debug!(cue = "hit", ability = %kind, "sound");
        Ok(())
    }

    fn on_level_complete(&mut self) -> Result<()> {
        debug!(cue = "fanfare", "sound");
        Ok(())
    }

    fn on_game_over(&mut self) -> Result<()> {
        debug!(cue = "dirge", "sound");
        Ok(())
    }
}

impl UiSink for LogSink {
    fn on_score_changed(&mut self, total: u64, average: u64) -> Result<()> {
        info!(total, average, "score_changed");
        Ok(())
    }

    fn on_lives_changed(&mut self, lives: u32) -> Result<()> {
        info!(lives, "lives_changed");
        Ok(())
    }

    fn on_level_changed(&mut self, level: u32) -> Result<()> {
        info!(level, "level_changed");
        Ok(())
    }

    fn on_message(&mut self, text: &str, duration: Duration) -> Result<()> {
        info!(text, duration_ms = duration.as_millis() as u64, "banner");
        Ok(())
    }
}
