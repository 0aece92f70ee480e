#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collaborator contracts for Pacboy adapters.
//!
//! The simulation never draws, plays sounds or touches a HUD itself. It hands
//! a [`Scene`] to a [`Renderer`] and fires notifications at an [`AudioSink`]
//! and a [`UiSink`]. Every call is best-effort: failures are reported back as
//! errors and never alter simulation state.

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use pacboy_core::{AbilityKind, CellCoord, Direction, GhostColor, Maze, PlayState};
use pacboy_system_effects::{Particle, ParticleHint};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Hex notation such as `#147880`, ignoring alpha.
    #[must_use]
    pub fn to_hex(self) -> String {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}",
            channel(self.red),
            channel(self.green),
            channel(self.blue)
        )
    }
}

impl From<GhostColor> for Color {
    fn from(color: GhostColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Player avatar as drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerPresentation {
    /// Cell the avatar occupies.
    pub cell: CellCoord,
    /// Facing direction, used to orient the mouth.
    pub direction: Direction,
    /// Remaining Fire Blast cooldown.
    pub fire_cooldown: Duration,
    /// Remaining Freeze Wind cooldown.
    pub freeze_cooldown: Duration,
}

impl PlayerPresentation {
    /// Remaining cooldown of an ability.
    #[must_use]
    pub const fn cooldown(&self, kind: AbilityKind) -> Duration {
        match kind {
            AbilityKind::Fire => self.fire_cooldown,
            AbilityKind::Freeze => self.freeze_cooldown,
        }
    }
}

/// Roaming adversary as drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct GhostPresentation {
    /// Display name.
    pub name: &'static str,
    /// Body color.
    pub color: Color,
    /// Cell the adversary occupies.
    pub cell: CellCoord,
    /// Direction of its last step.
    pub direction: Direction,
}

/// A particle reduced to what a renderer draws.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticlePresentation {
    /// Position in cell units, shake offset included.
    pub position: Vec2,
    /// Size in cells.
    pub size: f32,
    /// Rotation in radians.
    pub rotation: f32,
    /// Opacity derived from remaining life.
    pub opacity: f32,
    /// Glyph family.
    pub hint: ParticleHint,
}

impl From<&Particle> for ParticlePresentation {
    fn from(particle: &Particle) -> Self {
        Self {
            position: particle.render_position(),
            size: particle.size,
            rotation: particle.rotation,
            opacity: particle.life.clamp(0.0, 1.0),
            hint: particle.hint,
        }
    }
}

/// Heads-up display counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hud {
    /// Current level.
    pub level: u32,
    /// Lives left.
    pub lives: u32,
    /// Cumulative campaign score.
    pub total_score: u64,
    /// Average score per cleared level.
    pub average_score: u64,
    /// Pellets still on the board.
    pub pellets_left: u32,
}

/// Everything a renderer needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Simulation state.
    pub play_state: PlayState,
    /// Grid cells and dividers.
    pub maze: Maze,
    /// Cells still holding a pellet.
    pub pellets: Vec<CellCoord>,
    /// Player avatar.
    pub player: PlayerPresentation,
    /// Roaming adversaries. Adversaries awaiting respawn are omitted.
    pub ghosts: Vec<GhostPresentation>,
    /// Weapon, celebration and defeat particles.
    pub particles: Vec<ParticlePresentation>,
    /// Counters for the HUD.
    pub hud: Hud,
}

impl Scene {
    /// Adversary standing on `cell`, if any.
    #[must_use]
    pub fn ghost_at(&self, cell: CellCoord) -> Option<&GhostPresentation> {
        self.ghosts.iter().find(|ghost| ghost.cell == cell)
    }

    /// Whether a pellet remains on `cell`.
    #[must_use]
    pub fn has_pellet(&self, cell: CellCoord) -> bool {
        self.pellets.contains(&cell)
    }
}

/// Draws scenes. Implementations must treat the scene as read-only input.
pub trait Renderer {
    /// Presents one frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Fire-and-forget sound notifications.
pub trait AudioSink {
    /// A pellet was eaten.
    fn on_pellet_collected(&mut self) -> AnyResult<()>;

    /// An ability was activated.
    fn on_ability_fired(&mut self, kind: AbilityKind) -> AnyResult<()>;

    /// An ability struck an adversary.
    fn on_adversary_hit(&mut self, kind: AbilityKind) -> AnyResult<()>;

    /// The level was cleared.
    fn on_level_complete(&mut self) -> AnyResult<()>;

    /// The campaign was lost.
    fn on_game_over(&mut self) -> AnyResult<()>;
}

/// Fire-and-forget HUD notifications.
pub trait UiSink {
    /// Score counters changed.
    fn on_score_changed(&mut self, total: u64, average: u64) -> AnyResult<()>;

    /// Life counter changed.
    fn on_lives_changed(&mut self, lives: u32) -> AnyResult<()>;

    /// Level counter changed.
    fn on_level_changed(&mut self, level: u32) -> AnyResult<()>;

    /// A transient banner should be shown for `duration`.
    fn on_message(&mut self, text: &str, duration: Duration) -> AnyResult<()>;
}

/// Sink that discards every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct Muted;

impl AudioSink for Muted {
    fn on_pellet_collected(&mut self) -> AnyResult<()> {
        Ok(())
    }

    fn on_ability_fired(&mut self, _kind: AbilityKind) -> AnyResult<()> {
        Ok(())
    }

    fn on_adversary_hit(&mut self, _kind: AbilityKind) -> AnyResult<()> {
        Ok(())
    }

    fn on_level_complete(&mut self) -> AnyResult<()> {
        Ok(())
    }

    fn on_game_over(&mut self) -> AnyResult<()> {
        Ok(())
    }
}

impl UiSink for Muted {
    fn on_score_changed(&mut self, _total: u64, _average: u64) -> AnyResult<()> {
        Ok(())
    }

    fn on_lives_changed(&mut self, _lives: u32) -> AnyResult<()> {
        Ok(())
    }

    fn on_level_changed(&mut self, _level: u32) -> AnyResult<()> {
        Ok(())
    }

    fn on_message(&mut self, _text: &str, _duration: Duration) -> AnyResult<()> {
        Ok(())
    }
}

impl Renderer for Muted {
    fn present(&mut self, _scene: &Scene) -> AnyResult<()> {
        Ok(())
    }
}
